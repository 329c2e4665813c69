use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct CliArgs {
    /// Docker host, either a socket path or a tcp:// address, defaults to DOCKER_HOST or the local socket
    #[clap(long)]
    pub host: Option<String>,

    /// Also list intermediate images
    #[clap(short = 'a', long = "all-images")]
    pub all_images: bool,

    /// Write logs to this file, nothing is logged while the gui is running otherwise
    #[clap(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Include debug level events in the log file
    #[clap(short = 'v', long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse cli arguments
    pub fn new() -> Self {
        Self::parse()
    }
}
