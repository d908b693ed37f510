use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(short, long, env = "MINIRAG_PORT", default_value = "3000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,

        /// Allowed CORS origin; repeat for several. Any origin is allowed when omitted
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Chunk, embed and store a text file (`-` reads standard input)
    Ingest {
        path: String,

        #[arg(short, long)]
        source: Option<String>,
    },

    /// Answer a question from the indexed chunks
    Ask {
        question: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Show the best matching chunks without generating an answer
    Search {
        query: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        #[arg(short, long)]
        min_score: Option<f32>,
    },

    /// Remove every chunk ingested under a source
    Delete { source: String },

    Stats,
}
