//! Zombie Siege headless runner
//!
//! Plays a session with the autopilot (or until the tick limit), optionally
//! streams render snapshots as JSON lines, and posts the final score.
//!
//! Usage:
//!   RUST_LOG=info cargo run --release -- --seed 42 --max-ticks 3600 --no-pacing

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use zombie_siege::audio::LogAudioBackend;
use zombie_siege::game::{Autopilot, JsonLinesRenderer, LogRenderer, RenderSink, SessionEnd};
use zombie_siege::highscores::{LeaderboardClient, SubmitOutcome, mask_email};
use zombie_siege::sim::GameState;
use zombie_siege::{AssetBundle, AudioBundle, Game, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "zombie-siege")]
#[command(about = "Top-down zombie wave shooter (headless autopilot runner)")]
struct Args {
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Balance overrides JSON
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Sprite manifest JSON
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Local leaderboard file (offline board when omitted)
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Submit the final score under this email
    #[arg(long)]
    email: Option<String>,

    /// Run as fast as possible instead of at 60 ticks per second
    #[arg(long)]
    no_pacing: bool,

    /// Write one JSON render snapshot per tick to this file
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Disable sound output
    #[arg(long)]
    quiet_audio: bool,
}

/// Fans one snapshot out to every attached sink
struct Tee<'a>(Vec<&'a mut dyn RenderSink>);

impl RenderSink for Tee<'_> {
    fn present(&mut self, snapshot: &zombie_siege::sim::RenderSnapshot) {
        for sink in self.0.iter_mut() {
            sink.present(snapshot);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    if let Some(path) = args.settings.as_deref().filter(|p| !p.exists()) {
        // First run: leave a file to edit
        settings.save(path)?;
    }
    if args.no_pacing {
        settings.frame_pacing = false;
    }

    let tuning = args.tuning.as_deref().map(Tuning::load).unwrap_or_default();
    let assets = args
        .assets
        .as_deref()
        .map(AssetBundle::load)
        .unwrap_or_else(AssetBundle::generated);
    let audio = if args.quiet_audio {
        AudioBundle::disabled()
    } else {
        AudioBundle::from_settings(Box::new(LogAudioBackend::new()), &settings)
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Zombie Siege starting (seed {seed})");

    let mut game = Game::new(GameState::new(seed, tuning), assets, audio, &settings);
    let mut autopilot = Autopilot::new();
    let mut hud = LogRenderer::new(settings.hud_log_interval);

    let summary = match &args.snapshots {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed creating {}", path.display()))?;
            let mut json = JsonLinesRenderer::new(BufWriter::new(file));
            let summary = {
                let mut tee = Tee(vec![&mut hud as &mut dyn RenderSink, &mut json]);
                game.run(&mut autopilot, &mut tee, args.max_ticks)
            };
            let lines = json.lines_written();
            json.finish()
                .with_context(|| format!("failed writing snapshots to {}", path.display()))?;
            log::info!("Wrote {lines} snapshots to {}", path.display());
            summary
        }
        None => game.run(&mut autopilot, &mut hud, args.max_ticks),
    };

    println!();
    println!("=== SESSION OVER ({:?}) ===", summary.end);
    println!("  Seed:   {seed}");
    println!("  Score:  {}", summary.score);
    println!("  Wave:   {}", summary.wave);
    println!("  Ticks:  {}", summary.ticks);

    let mut board = match &args.leaderboard {
        Some(path) => LeaderboardClient::local_or_offline(path),
        None => LeaderboardClient::offline(),
    };

    if let Some(email) = &args.email {
        if summary.end == SessionEnd::Quit {
            log::info!("Session quit; not submitting a score");
        } else {
            match board.submit(email, summary.score) {
                SubmitOutcome::Accepted => println!("  Submitted for {}", mask_email(email)),
                SubmitOutcome::Rejected(msg) => println!("  {msg}"),
                SubmitOutcome::Failed => println!("  Could not submit score right now"),
            }
        }
    }

    println!();
    println!("=== LEADERBOARD ===");
    for (rank, entry) in board.top(10).iter().enumerate() {
        println!("  {:>2}. {:<30} {:>6}", rank + 1, mask_email(&entry.email), entry.score);
    }

    Ok(())
}
