//! Match simulator CLI: replay a point sequence or simulate seeded random
//! matches entirely in memory.
//!
//! Each match is written as one JSON line (result, per-team statistics and,
//! at the detailed level, the final snapshot with its point history).

mod metrics;
mod output;
mod simulator;
mod types;

use clap::Parser;
use metrics::{build_match_metrics, RunInfo};
use output::OutputWriter;
use scoreboard::domain::MatchOpening;
use scoreboard::telemetry;
use simulator::{match_seed, parse_points, replay_points, MatchResult, Simulator};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use types::{FormatArg, MetricsLevel, TeamArg};

#[derive(Parser)]
#[command(name = "match-simulator")]
#[command(about = "Replay or simulate tennis and padel matches through the scoring engine")]
struct Args {
    /// Replay this point sequence (e.g. "AABAB") instead of simulating
    #[arg(long, conflicts_with_all = ["matches", "seed", "serve_win_pct"])]
    points: Option<String>,

    /// Number of matches to simulate
    #[arg(short, long, default_value = "1")]
    matches: u32,

    /// Match format
    #[arg(short, long, default_value = "tennis3")]
    format: FormatArg,

    /// Team serving the first game
    #[arg(long, default_value = "a")]
    first_server: TeamArg,

    /// Base seed for reproducible runs; each match derives its own seed from it
    #[arg(long)]
    seed: Option<u64>,

    /// Probability that the server wins a point
    #[arg(long, default_value = "0.62")]
    serve_win_pct: f64,

    /// Output directory; JSON lines go to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gzip the JSON lines file (requires --output)
    #[arg(long, requires = "output")]
    compress: bool,

    /// Metrics detail level
    #[arg(long, default_value = "basic")]
    metrics_level: MetricsLevel,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays pure JSON lines
    telemetry::init_tracing_with(if args.verbose { "debug" } else { "warn" });

    let format = args.format.format();
    let config = format.config();
    let opening = MatchOpening::new(args.first_server.team());

    let mut output_writer = match &args.output {
        Some(dir) => OutputWriter::to_dir(dir, args.compress)?,
        None => OutputWriter::stdout(),
    };

    if let Some(raw) = &args.points {
        let points = parse_points(raw)?;
        let start = Instant::now();
        let result = replay_points(config, opening, &points)?;
        let info = RunInfo {
            match_no: 1,
            seed: None,
            format: Some(format),
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
            level: args.metrics_level,
        };
        output_writer.write_match(&build_match_metrics(info, &result))?;
        info!(
            points = result.points_played,
            score = %result.snapshot.score_line(),
            "Sequence replayed"
        );
        output_writer.finish()?;
        return Ok(());
    }

    info!(
        matches = args.matches,
        format = %format,
        serve_win_pct = args.serve_win_pct,
        "Starting match simulator"
    );

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for match_no in 1..=args.matches {
        let match_start = Instant::now();
        let seed = match_seed(args.seed, match_no);

        let run = Simulator::new(config, opening, seed, args.serve_win_pct)
            .and_then(Simulator::simulate_match);

        match run {
            Ok(result) => {
                let info = RunInfo {
                    match_no,
                    seed: Some(&seed),
                    format: Some(format),
                    duration_ms: match_start.elapsed().as_secs_f64() * 1000.0,
                    level: args.metrics_level,
                };
                let metrics = build_match_metrics(info, &result);
                if let Err(e) = output_writer.write_match(&metrics) {
                    warn!("Failed to write metrics for match {}: {}", match_no, e);
                }
                debug!(
                    match_no,
                    score = %result.snapshot.score_line(),
                    "Match completed"
                );
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Match {} failed: {}", match_no, e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let jsonl_path = jsonl_path.cloned();
    let csv_path = csv_path.cloned();
    output_writer.finish()?;

    if let Some(path) = jsonl_path {
        info!("Detailed results written to: {}", path.display());
    }
    if let Some(path) = csv_path {
        info!("Summary CSV written to: {}", path.display());
    }

    print_summary(&results, errors, elapsed, args.matches);
    Ok(())
}

/// Aggregate statistics, printed to stderr.
fn print_summary(results: &[MatchResult], errors: u32, elapsed: std::time::Duration, total: u32) {
    eprintln!("\n=== Simulation Summary ===");
    eprintln!("Matches completed: {}/{}", results.len(), total);
    if errors > 0 {
        eprintln!("Errors: {}", errors);
    }
    eprintln!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }
    eprintln!(
        "Average time per match: {:?}",
        elapsed / results.len() as u32
    );

    let n = results.len() as f64;
    let mut wins = [0u32; 2];
    let mut points = 0usize;
    let mut games = 0u64;
    let mut tiebreaks = 0u32;
    let mut breaks = [0u32; 2];

    for result in results {
        if let Some(winner) = result.winner() {
            wins[winner.index()] += 1;
        }
        points += result.points_played;
        games += u64::from(result.snapshot.games_played);
        tiebreaks += result.tiebreaks_played;
        for (i, tally) in result.tallies.iter().enumerate() {
            breaks[i] += tally.break_points_converted;
        }
    }

    eprintln!("\n=== Results by Team ===");
    for (i, team) in ["A", "B"].iter().enumerate() {
        eprintln!(
            "Team {}: wins={} ({:.1}%), breaks/match={:.2}",
            team,
            wins[i],
            wins[i] as f64 / n * 100.0,
            breaks[i] as f64 / n
        );
    }
    eprintln!(
        "Avg points={:.1}, avg games={:.1}, tiebreaks/match={:.2}",
        points as f64 / n,
        games as f64 / n,
        tiebreaks as f64 / n
    );
}
