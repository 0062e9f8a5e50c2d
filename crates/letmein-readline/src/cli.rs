use std::path::PathBuf;

use clap::Parser;

/// Terminal client for the Let Me In challenge.
///
/// Talk each level's AI guardian into revealing its password, then submit it
/// to unlock the next level.
#[derive(Debug, Parser)]
#[command(name = "letmein", version, about)]
pub struct Args {
    /// Game server base URL (overrides config.toml)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the saved game
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long)]
    pub no_save: bool,
}
