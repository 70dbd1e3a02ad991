// cli.rs - Command-line interface configuration
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "part-viewer")]
#[command(about = "CAD part viewer over an asynchronous translation service", long_about = None)]
pub struct Cli {
    /// Base URL of the translation/directory service
    #[arg(long, default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Document to browse
    #[arg(long)]
    pub document_id: String,

    /// Workspace within the document
    #[arg(long)]
    pub workspace_id: String,

    /// Seconds between job status polls
    #[arg(long, default_value_t = 2)]
    pub poll_interval: u64,

    /// Window width in pixels
    #[arg(long, default_value_t = 1024.0)]
    pub window_width: f32,

    /// Window height in pixels
    #[arg(long, default_value_t = 768.0)]
    pub window_height: f32,

    /// Height reserved for the element selector
    #[arg(long, default_value_t = 48.0)]
    pub selector_height: f32,
}
