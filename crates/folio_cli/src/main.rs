//! Folio CLI
//!
//! Check page files, resolve the active section at an offset, and replay
//! scripted scrolling against the headless scroll-spy.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_core::resolve;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod page;
mod replay;

use page::PageFile;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Folio scroll-spy tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a page file and report region geometry problems
    Check {
        /// Page file (TOML)
        page: PathBuf,
    },

    /// Print the active region at a scroll offset
    Resolve {
        /// Page file (TOML)
        page: PathBuf,

        /// Scroll offset in pixels
        offset: f32,
    },

    /// Run the page's script frame by frame and print every transition
    Replay {
        /// Page file (TOML)
        page: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Frame interval in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so replay output stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { page } => cmd_check(&page),
        Commands::Resolve { page, offset } => cmd_resolve(&page, offset),
        Commands::Replay {
            page,
            json,
            frame_ms,
        } => cmd_replay(&page, json, frame_ms),
    }
}

fn cmd_check(path: &Path) -> Result<()> {
    let page = PageFile::load(path)?;
    let mut registry = page.registry()?;
    let report = registry.refresh(|id| page.geometry(id.as_str()));

    info!(
        "Checking {} ({} regions, {} measured)",
        path.display(),
        registry.len(),
        report.measured
    );

    for id in &report.unmeasured {
        warn!("Region '{}' has no geometry", id);
    }
    for id in &report.out_of_order {
        warn!("Region '{}' starts above an earlier region", id);
    }

    if !report.out_of_order.is_empty() {
        anyhow::bail!(
            "{} region(s) out of document order",
            report.out_of_order.len()
        );
    }

    println!("ok: {} regions", registry.len());
    Ok(())
}

fn cmd_resolve(path: &Path, offset: f32) -> Result<()> {
    let page = PageFile::load(path)?;
    let mut registry = page.registry()?;
    registry.refresh(|id| page.geometry(id.as_str()));

    let line = page.config.activation_line();
    match resolve(offset, page.viewport.height, registry.regions(), line) {
        Some(id) => println!("{}", id),
        None => {
            warn!("No region has geometry");
            println!("-");
        }
    }
    Ok(())
}

fn cmd_replay(path: &Path, json: bool, frame_ms: u64) -> Result<()> {
    if frame_ms == 0 {
        anyhow::bail!("--frame-ms must be at least 1");
    }
    let page = PageFile::load(path)?;
    let report = replay::replay(&page, Duration::from_millis(frame_ms))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for transition in &report.transitions {
        println!(
            "{:>6}ms  {:<12} {} -> {}",
            transition.at_ms,
            format!("{:?}", transition.source).to_lowercase(),
            display(transition.previous.as_ref()),
            display(transition.current.as_ref()),
        );
    }
    println!();
    println!(
        "{} frames, {} scroll events, {} resolutions, {} suppressed, {} navigations",
        report.frames,
        report.scroll_events,
        report.resolutions,
        report.suppressed,
        report.navigations
    );
    println!(
        "final: {} at offset {}",
        display(report.final_active.as_ref()),
        report.final_offset
    );
    if report.detached {
        warn!("Scroll container detached during replay");
    }
    Ok(())
}

fn display(id: Option<&folio_core::RegionId>) -> &str {
    id.map_or("-", |id| id.as_str())
}
