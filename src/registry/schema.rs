use crate::graph::HandleDirection;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Form-control kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Select,
    Number,
}

/// One choice of a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// How a field's initial value is produced when a node is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldDefault {
    Literal(Value),
    /// `"{prefix}{suffix}"`, where the suffix is the part of the node id after its last `-`.
    NodeName { prefix: &'static str },
}

impl FieldDefault {
    pub fn value_for(&self, node_id: &str) -> Value {
        match self {
            FieldDefault::Literal(value) => value.clone(),
            FieldDefault::NodeName { prefix } => match node_id.rsplit_once('-') {
                Some((_, suffix)) if !suffix.is_empty() => json!(format!("{prefix}{suffix}")),
                _ => json!(node_id),
            },
        }
    }
}

/// Declared schema of one configurable field of a node type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, kind: FieldKind, default: Value) -> Self {
        Self {
            name,
            label,
            kind,
            default: FieldDefault::Literal(default),
            placeholder: None,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn text(name: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(name, label, FieldKind::Text, json!(default))
    }

    pub fn textarea(name: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(name, label, FieldKind::Textarea, json!(default))
    }

    pub fn number(name: &'static str, label: &'static str, default: f64) -> Self {
        Self::new(name, label, FieldKind::Number, json!(default))
    }

    /// A `select` field; the default is the first option.
    pub fn select(
        name: &'static str,
        label: &'static str,
        options: &[(&'static str, &'static str)],
    ) -> Self {
        let default = options
            .first()
            .map(|(value, _)| json!(value))
            .unwrap_or(Value::Null);
        let mut spec = Self::new(name, label, FieldKind::Select, default);
        spec.options = options
            .iter()
            .map(|&(value, label)| SelectOption { value, label })
            .collect();
        spec
    }

    pub fn named_after_node(mut self, prefix: &'static str) -> Self {
        self.default = FieldDefault::NodeName { prefix };
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self.step = step;
        self
    }
}

/// A fixed connection point declared by a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandleTemplate {
    pub name: &'static str,
    pub direction: HandleDirection,
}

/// Fields and static handles of a node type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSchema {
    pub fields: Vec<FieldSpec>,
    pub handles: Vec<HandleTemplate>,
    /// Whether target handles are derived from the node's template variables.
    pub derives_variables: bool,
}

impl NodeSchema {
    pub fn targets(&self) -> impl Iterator<Item = &HandleTemplate> {
        self.handles
            .iter()
            .filter(|h| h.direction == HandleDirection::Target)
    }

    pub fn sources(&self) -> impl Iterator<Item = &HandleTemplate> {
        self.handles
            .iter()
            .filter(|h| h.direction == HandleDirection::Source)
    }
}

/// Master macro defining every built-in node type with its tag, title and static handles.
macro_rules! define_node_types {
    ( $( ($variant:ident, $tag:literal, $title:literal, targets: [$($target:literal),*], sources: [$($source:literal),*]) ),* $(,)? ) => {
        /// The built-in node types.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeType {
            $( $variant, )*
        }

        impl NodeType {
            pub const ALL: &'static [NodeType] = &[ $( NodeType::$variant, )* ];

            /// The canonical tag used on the wire.
            pub fn tag(&self) -> &'static str {
                match self {
                    $( NodeType::$variant => $tag, )*
                }
            }

            /// Human-readable title shown on the palette.
            pub fn title(&self) -> &'static str {
                match self {
                    $( NodeType::$variant => $title, )*
                }
            }

            /// Looks up a type by its canonical tag.
            pub fn from_tag(tag: &str) -> Option<NodeType> {
                match tag {
                    $( $tag => Some(NodeType::$variant), )*
                    _ => None,
                }
            }

            pub(crate) fn static_handles(&self) -> Vec<HandleTemplate> {
                match self {
                    $( NodeType::$variant => vec![
                        $( HandleTemplate { name: $target, direction: HandleDirection::Target }, )*
                        $( HandleTemplate { name: $source, direction: HandleDirection::Source }, )*
                    ], )*
                }
            }
        }
    };
}

define_node_types! {
    (Input, "input", "Input", targets: [], sources: ["value"]),
    (Output, "output", "Output", targets: ["value"], sources: []),
    (Text, "text", "Text", targets: [], sources: ["output"]),
    (Llm, "llm", "LLM", targets: ["system", "prompt"], sources: ["response"]),
    (Math, "math", "Math", targets: ["a", "b"], sources: ["result"]),
    (Filter, "filter", "Filter", targets: ["input"], sources: ["passed", "failed"]),
    (Transform, "transform", "Transform", targets: ["input"], sources: ["output"]),
    (Delay, "delay", "Delay", targets: ["input"], sources: ["output"]),
    (Api, "api", "API Call", targets: ["body", "params"], sources: ["response", "error"]),
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Data field holding a text node's template.
pub const TEMPLATE_FIELD: &str = "text";

/// Template used when a text node has none.
pub const DEFAULT_TEMPLATE: &str = "{{input}}";

/// Returns the declared schema of a built-in node type.
pub fn schema_for(node_type: NodeType) -> NodeSchema {
    let fields = match node_type {
        NodeType::Input => vec![
            FieldSpec::text("inputName", "Name", "")
                .named_after_node("input_")
                .placeholder("Enter input name"),
            FieldSpec::select("inputType", "Type", &[("Text", "Text"), ("File", "File")]),
        ],
        NodeType::Output => vec![
            FieldSpec::text("outputName", "Name", "")
                .named_after_node("output_")
                .placeholder("Enter output name"),
            FieldSpec::select("outputType", "Type", &[("Text", "Text"), ("Image", "Image")]),
        ],
        NodeType::Text => vec![
            FieldSpec::textarea(TEMPLATE_FIELD, "Text Content", DEFAULT_TEMPLATE)
                .placeholder("Enter text with variables like {{variable_name}}"),
        ],
        NodeType::Llm => Vec::new(),
        NodeType::Math => vec![FieldSpec::select(
            "operation",
            "Operation",
            &[
                ("add", "Addition (+)"),
                ("subtract", "Subtraction (-)"),
                ("multiply", "Multiplication (×)"),
                ("divide", "Division (÷)"),
                ("power", "Power (^)"),
            ],
        )],
        NodeType::Filter => vec![
            FieldSpec::select(
                "condition",
                "Condition",
                &[
                    ("contains", "Contains"),
                    ("equals", "Equals"),
                    ("startsWith", "Starts With"),
                    ("endsWith", "Ends With"),
                    ("regex", "Regex Match"),
                ],
            ),
            FieldSpec::text("value", "Filter Value", "").placeholder("Enter filter criteria"),
        ],
        NodeType::Transform => vec![
            FieldSpec::select(
                "transformation",
                "Transform Type",
                &[
                    ("uppercase", "To Uppercase"),
                    ("lowercase", "To Lowercase"),
                    ("trim", "Trim Whitespace"),
                    ("reverse", "Reverse Text"),
                    ("length", "Get Length"),
                ],
            ),
            FieldSpec::textarea("customScript", "Custom Script", "")
                .placeholder("Optional: JavaScript transformation code"),
        ],
        NodeType::Delay => vec![
            FieldSpec::number("duration", "Delay Duration", 1000.0)
                .placeholder("Milliseconds")
                .range(Some(0.0), None, Some(100.0)),
            FieldSpec::select(
                "unit",
                "Time Unit",
                &[("ms", "Milliseconds"), ("s", "Seconds"), ("m", "Minutes")],
            ),
        ],
        NodeType::Api => vec![
            FieldSpec::select(
                "method",
                "HTTP Method",
                &[
                    ("GET", "GET"),
                    ("POST", "POST"),
                    ("PUT", "PUT"),
                    ("DELETE", "DELETE"),
                    ("PATCH", "PATCH"),
                ],
            ),
            FieldSpec::text("url", "API Endpoint", "")
                .placeholder("https://api.example.com/endpoint"),
            FieldSpec::textarea("headers", "Headers (JSON)", "{}")
                .placeholder("{\"Authorization\": \"Bearer token\"}"),
        ],
    };

    NodeSchema {
        fields,
        handles: node_type.static_handles(),
        derives_variables: node_type == NodeType::Text,
    }
}

/// Schema of a node whose type is unknown but tolerated: no fields, one input, one output.
pub fn passthrough_schema() -> NodeSchema {
    NodeSchema {
        fields: Vec::new(),
        handles: vec![
            HandleTemplate {
                name: "input",
                direction: HandleDirection::Target,
            },
            HandleTemplate {
                name: "output",
                direction: HandleDirection::Source,
            },
        ],
        derives_variables: false,
    }
}
