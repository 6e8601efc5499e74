//! Extracts the notes of named MIDI tracks into per-track text files.

use anyhow::{Context, Result};
use clap::Parser;
use midi_tracks::{
    export::{self, Target, TargetMap},
    prelude::*,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// MIDI file to read
    midi_file: PathBuf,

    /// Directory the track files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Extract a track into a file, as NAME=FILE. Repeatable.
    #[arg(short, long = "map", value_name = "NAME=FILE")]
    maps: Vec<Target>,

    /// Only extract the tracks given with --map
    #[arg(long, requires = "maps")]
    no_defaults: bool,

    /// Print the header and every track name instead of extracting
    #[arg(short, long)]
    list: bool,

    /// More logging; repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut file = MidiFile::open(&args.midi_file)
        .with_context(|| format!("open {}", args.midi_file.display()))?;

    if args.list {
        return list(&mut file, &args);
    }

    let mut targets = if args.no_defaults {
        TargetMap::empty()
    } else {
        TargetMap::default()
    };
    targets.extend(args.maps);

    let extracted = export::extract(&mut file, &targets, &args.out_dir)
        .with_context(|| format!("extract tracks from {}", args.midi_file.display()))?;
    for e in &extracted {
        println!("{} (track {}): {} rows -> {}", e.name, e.track, e.rows, e.path.display());
    }
    file.close();
    Ok(())
}

fn list(file: &mut MidiFile<std::io::BufReader<std::fs::File>>, args: &Args) -> Result<()> {
    let header = *file.header();
    println!("Signature: {}", String::from_utf8_lossy(&header.magic()));
    println!("Header size: {}", header.size());
    println!("Format: {}", header.format());
    println!("Tracks: {}", header.tracks());
    println!("Division: {}", header.division().raw());

    for track in file.tracks() {
        let track = track.with_context(|| format!("read track from {}", args.midi_file.display()))?;
        let name = track
            .name()
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();
        println!(
            "Track {}: {} events, {} bytes, name {:?}",
            track.index(),
            track.len(),
            track.header().size(),
            name
        );
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
