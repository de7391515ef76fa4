//! Command line interface

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "vantage", about = "Avatar scene viewer with desktop and VR modes", version)]
pub struct Cli {
    /// Settings file (JSON); defaults apply when omitted
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Run without a window, driving frames from a script
    #[arg(long)]
    pub headless: bool,

    /// Number of frames to run headless; defaults to the script length
    #[arg(long)]
    pub frames: Option<u64>,

    /// Input script to replay (JSON)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Record windowed input to a script file (JSON) on exit
    #[arg(long)]
    pub record: Option<PathBuf>,
}
