use clap::Parser;
use std::path::PathBuf;

/// Compare a traditional LLM prompt against a structured agent, side by side
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The query to send to both approaches
    #[arg(index = 1)] // Positional argument
    pub query: Option<String>,

    /// Enter interactive mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// List the backend's demo queries
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Run demo query N (1-based, as listed by --demo)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub pick: Option<u32>,

    /// Origin of the comparison API, e.g. http://localhost:5000
    #[arg(long, env = "COMPARE_API_URL")]
    pub api_url: Option<String>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the reasoning trace without colors
    #[arg(long, default_value_t = false)]
    pub plain: bool,

    /// Show backend errors verbatim instead of rephrasing them
    #[arg(long, default_value_t = false)]
    pub no_friendly_errors: bool,

    /// Do not check backend readiness before the first query
    #[arg(long, default_value_t = false)]
    pub skip_health: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
