//! flowsync command-line client.
//!
//! Provides the `flowsync` binary for working with graphs on a flowsync
//! server. Every mutating subcommand goes through the same `CanvasSession`
//! the canvas uses, so edits get the same version checks and the same
//! single retry on conflict.

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use flowsync_canvas::{CanvasSession, GraphApi, HttpGraphApi};
use flowsync_core::{GraphId, GraphKey, NodeId, Position, SourceHandle, Viewport, WorkspaceId};

/// flowsync graph client.
#[derive(Parser)]
#[command(name = "flowsync", about = "Inspect and edit flowsync workflow graphs")]
struct Cli {
    /// Base URL of the flowsync server.
    #[arg(long, env = "FLOWSYNC_URL", default_value = "http://127.0.0.1:3000", global = true)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

/// Address of an existing graph.
#[derive(clap::Args)]
struct GraphArgs {
    /// Workspace ID.
    #[arg(short, long)]
    workspace: Uuid,

    /// Graph ID.
    #[arg(short, long)]
    graph: Uuid,
}

impl GraphArgs {
    fn key(&self) -> GraphKey {
        GraphKey::new(WorkspaceId(self.workspace), GraphId(self.graph))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum HandleArg {
    Success,
    Error,
}

impl From<HandleArg> for SourceHandle {
    fn from(arg: HandleArg) -> Self {
        match arg {
            HandleArg::Success => SourceHandle::Success,
            HandleArg::Error => SourceHandle::Error,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create a graph and print it.
    Create {
        /// Workspace ID.
        #[arg(short, long)]
        workspace: Uuid,

        /// Graph title.
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Print the current graph as JSON.
    Show {
        #[command(flatten)]
        graph: GraphArgs,
    },
    /// Add an action, optionally wired from an existing node.
    Add {
        #[command(flatten)]
        graph: GraphArgs,

        /// Action type, e.g. `send_email`.
        #[arg(long = "type")]
        action_type: String,

        /// Action title.
        #[arg(long)]
        title: String,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        x: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        y: f64,

        /// Node to connect from.
        #[arg(long)]
        from: Option<String>,

        /// Branch of `--from` to connect through.
        #[arg(long, value_enum)]
        handle: Option<HandleArg>,
    },
    /// Auto-layout the graph top to bottom and save the positions.
    Layout {
        #[command(flatten)]
        graph: GraphArgs,
    },
    /// Save a new viewport.
    Viewport {
        #[command(flatten)]
        graph: GraphArgs,

        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    tracing::debug!("using server {}", cli.url);

    let exit_code = match cli.command {
        Commands::Create { workspace, title } => run_create(&cli.url, workspace, title).await,
        Commands::Show { graph } => run_show(&cli.url, graph.key()).await,
        Commands::Add {
            graph,
            action_type,
            title,
            x,
            y,
            from,
            handle,
        } => {
            let from = from.map(|id| (NodeId::new(id), handle.map(SourceHandle::from)));
            run_add(&cli.url, graph.key(), &action_type, &title, Position::new(x, y), from).await
        }
        Commands::Layout { graph } => run_layout(&cli.url, graph.key()).await,
        Commands::Viewport { graph, x, y, zoom } => {
            run_viewport(&cli.url, graph.key(), Viewport { x, y, zoom }).await
        }
    };
    process::exit(exit_code);
}

/// Returns exit code: 0 = success, 1 = request failed.
async fn run_create(url: &str, workspace: Uuid, title: Option<String>) -> i32 {
    match HttpGraphApi::create_graph(url, WorkspaceId(workspace), title.as_deref()).await {
        Ok((api, graph)) => {
            println!("graph {}", api.key().graph_id);
            print_json(&graph);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to create graph: {}", e);
            1
        }
    }
}

async fn run_show(url: &str, key: GraphKey) -> i32 {
    match HttpGraphApi::new(url, key).fetch_graph().await {
        Ok(graph) => {
            print_json(&graph);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to fetch graph {}: {}", key, e);
            1
        }
    }
}

async fn run_add(
    url: &str,
    key: GraphKey,
    action_type: &str,
    title: &str,
    at: Position,
    from: Option<(NodeId, Option<SourceHandle>)>,
) -> i32 {
    let Some(mut session) = open(url, key).await else {
        return 1;
    };
    let Some(created) = session.add_action(action_type, title, at).await else {
        return report(&mut session);
    };
    println!("node {}", created);

    if let Some((source, handle)) = from {
        if !session.connect(source, created, handle).await {
            return report(&mut session);
        }
    }
    println!("version {}", session.version().unwrap_or_default());
    0
}

async fn run_layout(url: &str, key: GraphKey) -> i32 {
    let Some(mut session) = open(url, key).await else {
        return 1;
    };
    if !session.auto_layout().await {
        return report(&mut session);
    }
    for node in session.nodes() {
        println!("{} ({}, {})", node.id, node.position.x, node.position.y);
    }
    println!("version {}", session.version().unwrap_or_default());
    0
}

async fn run_viewport(url: &str, key: GraphKey, viewport: Viewport) -> i32 {
    let Some(mut session) = open(url, key).await else {
        return 1;
    };
    if !session.settle_viewport(viewport).await {
        return report(&mut session);
    }
    println!("version {}", session.version().unwrap_or_default());
    0
}

async fn open(url: &str, key: GraphKey) -> Option<CanvasSession<HttpGraphApi>> {
    let mut session = CanvasSession::new(HttpGraphApi::new(url, key));
    if session.open().await {
        Some(session)
    } else {
        report(&mut session);
        None
    }
}

/// Prints pending notifications to stderr and returns the failure code.
fn report<A>(session: &mut CanvasSession<A>) -> i32
where
    A: GraphApi,
{
    for note in session.take_notifications() {
        eprintln!("Error: {}: {}", note.title, note.message);
    }
    1
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: failed to render JSON: {}", e),
    }
}
