use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minirag::connector::http;
use minirag::{Commands, Container, ContainerConfig, Router, DEFAULT_MAX_CHARS};

#[derive(Parser)]
#[command(name = "minirag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, env = "MINIRAG_DATA_DIR", default_value = "~/.minirag")]
    data_dir: String,

    /// File name of the JSON vector store inside the data directory
    #[arg(long, global = true, env = "MINIRAG_STORE_FILE", default_value = minirag::DEFAULT_STORE_FILE)]
    store_file: String,

    #[arg(long, global = true, env = "MINIRAG_MOCK_EMBEDDINGS")]
    mock_embeddings: bool,

    /// Answer with an offline stub instead of calling the LLM
    #[arg(long, global = true, env = "MINIRAG_MOCK_LLM")]
    mock_llm: bool,

    #[arg(long, global = true, env = "MINIRAG_MEMORY_STORAGE")]
    memory_storage: bool,

    /// HuggingFace id of the ONNX embedding model
    #[arg(long, global = true, env = "MINIRAG_MODEL")]
    model: Option<String>,

    /// Maximum characters per chunk
    #[arg(long, global = true, env = "MINIRAG_CHUNK_SIZE", default_value_t = DEFAULT_MAX_CHARS)]
    chunk_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = expand_tilde(&cli.data_dir);

    let config = ContainerConfig {
        data_dir,
        store_file: cli.store_file,
        mock_embeddings: cli.mock_embeddings,
        mock_llm: cli.mock_llm,
        memory_storage: cli.memory_storage,
        model: cli.model,
        chunk_size: cli.chunk_size,
    };

    let container = Container::new(config)?;

    match cli.command {
        Commands::Serve {
            port,
            public,
            cors_origins,
        } => {
            let ip = if public {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            info!("Vector store: {}", container.store_location());
            http::serve(Arc::new(container), SocketAddr::new(ip, port), &cors_origins).await?;
        }
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
