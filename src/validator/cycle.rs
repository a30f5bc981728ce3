use ahash::AHashMap;
use itertools::Itertools;

/// DFS colouring of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Node-to-node projection of a pipeline: handles are ignored and parallel
/// edges between the same pair of nodes collapse into one arc.
pub(crate) struct ArcGraph<'a> {
    ids: Vec<&'a str>,
    adjacency: Vec<Vec<usize>>,
}

impl<'a> ArcGraph<'a> {
    /// Arcs naming an unknown node are dropped; callers check endpoints first.
    pub(crate) fn build(
        node_ids: impl IntoIterator<Item = &'a str>,
        arcs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let ids: Vec<&str> = node_ids.into_iter().collect();
        let index: AHashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut adjacency = vec![Vec::new(); ids.len()];

        for (from, to) in arcs
            .into_iter()
            .filter_map(|(source, target)| Some((*index.get(source)?, *index.get(target)?)))
            .unique()
        {
            adjacency[from].push(to);
        }

        Self { ids, adjacency }
    }

    pub(crate) fn arc_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Runs an iterative three-colour depth-first search over every component.
    ///
    /// Returns the first back arc found, as `(from, to)` node ids, or `None` when
    /// the graph is acyclic. Each node is entered at most once.
    pub(crate) fn find_back_arc(&self) -> Option<(&'a str, &'a str)> {
        let mut marks = vec![Mark::Unvisited; self.ids.len()];
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.ids.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::InProgress;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                match self.adjacency[node].get(frame.1) {
                    Some(&child) => {
                        frame.1 += 1;
                        match marks[child] {
                            Mark::InProgress => return Some((self.ids[node], self.ids[child])),
                            Mark::Unvisited => {
                                marks[child] = Mark::InProgress;
                                stack.push((child, 0));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[node] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acyclic(nodes: &[&'static str], arcs: &[(&'static str, &'static str)]) -> bool {
        ArcGraph::build(nodes.iter().copied(), arcs.iter().copied())
            .find_back_arc()
            .is_none()
    }

    #[test]
    fn test_isolated_nodes_are_acyclic() {
        assert!(acyclic(&[], &[]));
        assert!(acyclic(&["a", "b", "c"], &[]));
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        assert!(!acyclic(&["a", "b"], &[("b", "b")]));
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let arcs = [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")];
        assert!(acyclic(&["a", "b", "c", "d"], &arcs));
        assert!(acyclic(&["d", "c", "b", "a"], &arcs));
    }

    #[test]
    fn test_cycle_in_second_component() {
        let arcs = [("a", "b"), ("c", "d"), ("d", "e"), ("e", "c")];
        assert!(!acyclic(&["a", "b", "c", "d", "e"], &arcs));
        assert!(!acyclic(&["e", "d", "c", "b", "a"], &arcs));
    }

    #[test]
    fn test_parallel_arcs_collapse() {
        let graph = ArcGraph::build(["a", "b"], [("a", "b"), ("a", "b"), ("a", "b")]);
        assert_eq!(graph.arc_count(), 1);
        assert!(graph.find_back_arc().is_none());
    }

    #[test]
    fn test_back_arc_is_reported() {
        let graph = ArcGraph::build(["a", "b"], [("a", "b"), ("b", "a")]);
        assert_eq!(graph.find_back_arc(), Some(("b", "a")));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let ids: Vec<String> = (0..100_000).map(|i| format!("n{i}")).collect();
        let arcs: Vec<(&str, &str)> = ids
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
            .collect();
        let graph = ArcGraph::build(ids.iter().map(String::as_str), arcs.iter().copied());
        assert!(graph.find_back_arc().is_none());
    }
}
