use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ringcut",
    about = "ringcut: cut ringtones out of uploaded audio",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
    /// Print the content hash a file would be stored under
    Hash(HashArgs),
}

/// Configuration sources shared by `serve` and `config`.
///
/// Precedence, lowest first: defaults, `--config` file, environment, flags.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address, e.g. 0.0.0.0:8877
    #[arg(long)]
    pub bind: Option<std::net::SocketAddr>,
    /// Directory holding uploads and ringtones
    #[arg(long)]
    pub storage_root: Option<PathBuf>,
    /// Transcoder program
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,
    /// Upper bound for one transcode, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct HashArgs {
    pub paths: Vec<PathBuf>,
}
