use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use ntup_ana::{run_file, AnalysisConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ntup-tracks", about = "Track and truth-muon ntuple production")]
struct Cli {
    /// Event file, one JSON encoded event per line.
    #[arg(short = 'i', long = "inFile", default_value = "Output_REC.jsonl")]
    in_file: PathBuf,
    /// Output base name; `.hist.json` and `.json` are appended.
    #[arg(short = 'o', long = "outFile", default_value = "ntup_tracks")]
    out_file: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ntup_ana=info,ntup_hist=info,ntup_tracks=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let provenance = run_file(&cli.in_file, &cli.out_file, &AnalysisConfig::default())?;
    info!(
        events = provenance.events,
        accepted_tracks = provenance.accepted_tracks,
        input_hash = %provenance.input_hash,
        "done"
    );
    Ok(())
}
