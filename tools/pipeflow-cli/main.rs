use clap::{Args, Parser, Subcommand};
use pipeflow::gallery::{self, Example, Validity};
use pipeflow::prelude::*;
use pipeflow::server::{self, ServerConfig};
use pipeflow::transport::{HttpTransport, HttpTransportConfig};
use std::net::IpAddr;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Pipeline graph validation toolkit
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a pipeline JSON file
    Validate {
        /// Path to the pipeline JSON file
        path: String,
        /// Base URL of a remote validation service (validates locally when omitted)
        #[arg(long, env = "PIPEFLOW_REMOTE")]
        remote: Option<String>,
        /// Request timeout for the remote validator, in seconds
        #[arg(long, env = "PIPEFLOW_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Browse the built-in example pipelines
    #[command(subcommand)]
    Examples(ExamplesCommand),
    /// List the handles of one node of a pipeline file
    Handles {
        /// Path to the pipeline JSON file
        path: String,
        /// Id of the node to inspect
        node_id: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Run the HTTP validation service
    Serve(ServeArgs),
}

#[derive(Subcommand, Debug)]
enum ExamplesCommand {
    /// List every example with its expected verdict
    List,
    /// Validate one example, or all of them, against their expected verdict
    Validate {
        /// Example id (all examples when omitted)
        id: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct OptionArgs {
    /// Only check edge endpoints, not handle ids
    #[arg(long, env = "PIPEFLOW_LENIENT_HANDLES")]
    lenient_handles: bool,
    /// Accept unknown node types as bare passthrough nodes
    #[arg(long, env = "PIPEFLOW_PASSTHROUGH_UNKNOWN")]
    passthrough_unknown: bool,
}

impl OptionArgs {
    /// Flags that only apply to local validation and were set anyway.
    fn local_only_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.lenient_handles {
            flags.push("--lenient-handles");
        }
        if self.passthrough_unknown {
            flags.push("--passthrough-unknown");
        }
        flags
    }
}

impl From<OptionArgs> for ValidationOptions {
    fn from(args: OptionArgs) -> Self {
        ValidationOptions {
            handle_policy: if args.lenient_handles {
                HandlePolicy::EndpointsOnly
            } else {
                HandlePolicy::Strict
            },
            unknown_types: if args.passthrough_unknown {
                UnknownTypePolicy::Passthrough
            } else {
                UnknownTypePolicy::Reject
            },
        }
    }
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "PIPEFLOW_HOST", default_value = "127.0.0.1")]
    host: IpAddr,
    /// Port to bind
    #[arg(long, env = "PIPEFLOW_PORT", default_value_t = 8000)]
    port: u16,
    /// Browser origins allowed to call the service
    #[arg(
        long = "allowed-origin",
        env = "PIPEFLOW_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    allowed_origins: Vec<String>,
    #[command(flatten)]
    options: OptionArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            path,
            remote,
            timeout_secs,
            options,
        } => run_validate(&path, remote, timeout_secs, options).await,
        Command::Examples(ExamplesCommand::List) => run_examples_list(),
        Command::Examples(ExamplesCommand::Validate { id }) => run_examples_validate(id),
        Command::Handles {
            path,
            node_id,
            options,
        } => run_handles(&path, &node_id, options.into()),
        Command::Serve(args) => run_serve(args).await,
    }
}

async fn run_validate(
    path: &str,
    remote: Option<String>,
    timeout_secs: u64,
    options: OptionArgs,
) {
    let payload = PipelinePayload::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load pipeline: {}", e)));

    let transport: Box<dyn ValidationTransport> = match remote {
        Some(base_url) => {
            let ignored = options.local_only_flags();
            if !ignored.is_empty() {
                eprintln!(
                    "Warning: {} only apply to local validation; the remote validator uses its own settings.",
                    ignored.join(", ")
                );
            }
            let config = HttpTransportConfig {
                base_url,
                timeout_secs,
            };
            let transport = HttpTransport::new(&config).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to set up HTTP transport: {}", e))
            });
            println!("\nValidating '{}' via {}...", path, transport.endpoint());
            Box::new(transport)
        }
        None => {
            println!("\nValidating '{}' locally...", path);
            Box::new(LocalTransport::new(options.into()))
        }
    };

    let start = Instant::now();
    let summary = transport
        .validate(&payload)
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));
    let duration = start.elapsed();

    println!("\n--- Validation Summary ---");
    println!("Nodes:        {}", summary.num_nodes);
    println!("Edges:        {}", summary.num_edges);
    println!(
        "Verdict:      {}",
        if summary.is_dag {
            "valid DAG"
        } else {
            "contains a cycle"
        }
    );
    println!("Duration:     {:?}", duration);
    println!();
}

fn run_examples_list() {
    println!("\n--- Example Pipelines ---");
    for example in gallery::catalog() {
        println!(
            "{:<20} {:<8} {} ({} nodes, {} edges)",
            example.id,
            verdict_label(example.validity),
            example.name,
            example.pipeline.nodes.len(),
            example.pipeline.edges.len()
        );
        println!("{:<29} {}", "", example.description);
    }
    println!();
}

fn run_examples_validate(id: Option<String>) {
    let examples: Vec<Example> = match id {
        Some(id) => vec![
            gallery::find(&id)
                .unwrap_or_else(|| exit_with_error(&format!("Unknown example '{}'", id))),
        ],
        None => gallery::catalog(),
    };

    println!("\nValidating {} example(s)...", examples.len());
    let mut mismatches = 0;
    for example in &examples {
        let mut graph = Graph::new();
        example.load_into(&mut graph).unwrap_or_else(|e| {
            exit_with_error(&format!("Example '{}' failed to load: {}", example.id, e))
        });
        let summary = validate(&graph);
        let expected = example.validity == Validity::Valid;
        let status = if summary.is_dag == expected {
            "ok"
        } else {
            mismatches += 1;
            "MISMATCH"
        };
        println!(
            "  -> {:<20} expected {:<8} got {} [{}]",
            example.id,
            verdict_label(example.validity),
            summary,
            status
        );
    }

    if mismatches > 0 {
        exit_with_error(&format!(
            "{} example(s) did not match their expected verdict",
            mismatches
        ));
    }
    println!("\nAll examples matched their expected verdict.");
}

fn run_handles(path: &str, node_id: &str, options: ValidationOptions) {
    let payload = PipelinePayload::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load pipeline: {}", e)));
    let graph = Graph::from_payload(payload, options.registry(), options.handle_policy)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid pipeline: {}", e)));
    let handles = graph
        .handles_of(node_id)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let title = graph
        .node(node_id)
        .and_then(|node| graph.registry().resolve(node_id, &node.node_type).ok())
        .map_or("Unknown", |resolved| resolved.title());

    println!("\n--- Handles of '{}' ({}) ---", node_id, title);
    if handles.is_empty() {
        println!("  (none)");
    }
    for handle in handles {
        println!(
            "  {:<8} {:<16} {}",
            handle.direction,
            handle.id,
            handle.qualified_id()
        );
    }
    println!();
}

async fn run_serve(args: ServeArgs) {
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        allowed_origins: args.allowed_origins,
        options: args.options.into(),
    };
    println!("\nStarting validation service on {}...", config.server_addr());
    if let Err(e) = server::serve(config).await {
        exit_with_error(&format!("Server failed: {}", e));
    }
}

fn verdict_label(validity: Validity) -> &'static str {
    match validity {
        Validity::Valid => "valid",
        Validity::Invalid => "invalid",
    }
}

/// Builds the log filter from `RUST_LOG` directives, falling back to warnings only.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
