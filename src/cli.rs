use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "noteboard")]
#[command(about = "Browse, filter and edit notes in the terminal")]
#[command(version)]
pub struct Config {
    /// Start with an empty board instead of the sample notes
    #[arg(long)]
    pub empty: bool,

    /// Pixels per terminal column, used for the layout breakpoints
    #[arg(long, value_name = "PX", default_value_t = 8)]
    pub cell_width: u32,

    /// File that receives the application log
    #[arg(long, value_name = "PATH", default_value = "noteboard.log")]
    pub log_file: PathBuf,

    /// Log filter directive, e.g. `noteboard=debug` (defaults to RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}
