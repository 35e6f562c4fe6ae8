use std::convert::TryFrom;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{ info, Level };

use ray_tracer_core::scene::{ Probe, ProbeJson };

/// Fires rays at a single shape and prints what each one hits.
///
/// Each ray produces one line of JSON on stdout: every intersection `t`, the
/// hit, the hit point, the surface normal there and (for patterned
/// materials) the pattern color.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Path to a probe description (JSON).
    scene: PathBuf,

    /// Log more; repeat for trace output.
    #[clap(short, long, parse(from_occurrences))]
    verbose: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let text = fs::read_to_string(&args.scene)
        .with_context(|| format!("reading {}", args.scene.display()))?;
    let probe_json: ProbeJson = text.parse()
        .with_context(|| format!("parsing {}", args.scene.display()))?;
    let probe = Probe::try_from(&probe_json)?;

    info!(rays = probe.rays.len(), shape = probe.shape.ty().name(), "probing");
    for report in probe.run() {
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}
