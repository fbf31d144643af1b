use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use image_patcher::{shrink, ShrinkOutcome};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "shrink")]
#[command(about = "Cut trailing NUL padding off an image file", long_about = None)]
#[command(version)]
struct Cli {
    /// Image file to shrink in place
    filename: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cmd_shrink(&cli.filename) {
        eprintln!("{}", format!(" ! shrink: {:#}", e).red());
        std::process::exit(1);
    }
}

fn cmd_shrink(path: &Path) -> Result<()> {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match shrink(path)? {
        ShrinkOutcome::AlreadyShrunk { .. } => {
            println!(" - shrink: {} is already shrunk", base);
        }
        ShrinkOutcome::Shrunk { to, .. } => {
            println!(" - shrink: Shrinking {}", base);
            println!(" - shrink: {} Shrunk to {} bytes", base, to);
        }
    }

    Ok(())
}
