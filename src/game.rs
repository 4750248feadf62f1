//! Frame loop orchestrator
//!
//! `Game` owns the state and the presentation bundles and runs one tick per
//! frame: sample input, step the simulation, play sounds, present the
//! snapshot, then wait out the rest of the frame. Wall-clock time never
//! reaches the simulation.

use std::collections::VecDeque;
use std::io::Write;
use std::time::{Duration, Instant};

use glam::Vec2;
use serde::Serialize;

use crate::assets::AssetBundle;
use crate::audio::{AudioBundle, MusicTrack};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, RenderSnapshot, SpriteKind, TickInput, tick};

/// Produces the input for the next tick
pub trait InputSource {
    fn sample(&mut self, snapshot: &RenderSnapshot) -> TickInput;
}

/// Consumes one snapshot per tick
pub trait RenderSink {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

/// Replays a fixed list of inputs, then idles
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<TickInput>,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
        }
    }

    /// The same input `ticks` times
    pub fn repeat(input: TickInput, ticks: usize) -> Self {
        Self::new(std::iter::repeat_n(input, ticks))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self, _snapshot: &RenderSnapshot) -> TickInput {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Demo player: shoots the closest zombie and keeps its distance
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Back off when an enemy center is this close
    pub danger_radius: f32,
    /// Ignore movement smaller than this on an axis
    pub deadzone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            danger_radius: 120.0,
            deadzone: 4.0,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn steer(&self, dir: Vec2, input: &mut TickInput) {
        input.left = dir.x < -self.deadzone;
        input.right = dir.x > self.deadzone;
        input.up = dir.y < -self.deadzone;
        input.down = dir.y > self.deadzone;
    }
}

impl InputSource for Autopilot {
    fn sample(&mut self, snapshot: &RenderSnapshot) -> TickInput {
        let mut input = TickInput::default();
        let Some(me) = snapshot.player().map(|p| p.pos + Vec2::splat(p.size / 2.0)) else {
            return input;
        };

        let enemy = closest(
            me,
            snapshot
                .sprites_of(SpriteKind::Enemy)
                .map(|s| s.pos + Vec2::splat(s.size / 2.0)),
        );
        let pickup = closest(
            me,
            snapshot
                .sprites
                .iter()
                .filter(|s| matches!(s.kind, SpriteKind::Pickup(_)))
                .map(|s| s.pos),
        );

        match enemy {
            Some(target) => {
                input.pointer = target;
                input.fire = true;
            }
            None => input.pointer = me + Vec2::X,
        }

        let heading = match (enemy, pickup) {
            (Some(threat), _) if threat.distance(me) < self.danger_radius => me - threat,
            (_, Some(orb)) => orb - me,
            _ => Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0) - me,
        };
        self.steer(heading, &mut input);
        input
    }
}

fn closest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| {
        a.distance_squared(from)
            .partial_cmp(&b.distance_squared(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Drops every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn present(&mut self, _snapshot: &RenderSnapshot) {}
}

/// Logs a HUD line every `interval` ticks
#[derive(Debug, Clone)]
pub struct LogRenderer {
    pub interval: u64,
}

impl LogRenderer {
    pub fn new(interval: u64) -> Self {
        Self { interval }
    }

    /// HUD line for this snapshot, if it falls on the interval
    fn hud_line(&self, snapshot: &RenderSnapshot) -> Option<String> {
        if self.interval == 0 || snapshot.tick % self.interval != 0 {
            return None;
        }
        let hud = &snapshot.hud;
        let powerups: Vec<String> = hud
            .powerups
            .iter()
            .map(|p| format!("{} {}s", p.kind.name(), p.seconds_left))
            .collect();
        Some(format!(
            "tick {} | wave {} | health {}/{} | score {} | zombies {} | {}",
            snapshot.tick,
            hud.wave,
            hud.health,
            hud.max_health,
            hud.score,
            snapshot.sprites_of(SpriteKind::Enemy).count(),
            if powerups.is_empty() { "-".to_string() } else { powerups.join(", ") }
        ))
    }
}

impl RenderSink for LogRenderer {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        if let Some(line) = self.hud_line(snapshot) {
            log::info!("{line}");
        }
    }
}

/// Writes each snapshot as one JSON line
#[derive(Debug)]
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    lines: u64,
    error: Option<std::io::Error>,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines: 0,
            error: None,
        }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    /// Flush and hand back the writer, or the first error hit while writing
    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_line(&mut self, snapshot: &RenderSnapshot) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> RenderSink for JsonLinesRenderer<W> {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        // Stop writing after the first failure; `finish` reports it
        if self.error.is_some() {
            return;
        }
        match self.write_line(snapshot) {
            Ok(()) => self.lines += 1,
            Err(err) => {
                log::warn!("Snapshot output failed at tick {}: {err}", snapshot.tick);
                self.error = Some(err);
            }
        }
    }
}

/// Sleeps out the remainder of each frame and tracks the achieved rate
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    next_deadline: Option<Instant>,
    frame_times: [Option<Instant>; 60],
    frame_index: usize,
    fps: u32,
}

impl FramePacer {
    pub fn new(rate: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / rate.max(1) as f64),
            next_deadline: None,
            frame_times: [None; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Block until the current frame's slot is over
    pub fn wait(&mut self) {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now + self.frame);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        // A long stall resets the schedule instead of bursting to catch up
        let after = Instant::now();
        self.next_deadline = Some(if after > deadline + self.frame {
            after + self.frame
        } else {
            deadline + self.frame
        });
        self.record(after);
    }

    fn record(&mut self, time: Instant) {
        // FPS from the oldest of the last 60 frames
        let oldest = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = Some(time);
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        if let Some(oldest) = oldest {
            let elapsed = time.duration_since(oldest).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = (self.frame_times.len() as f64 / elapsed).round() as u32;
            }
        }
    }

    /// Frames per second over the last 60 frames (0 until measured)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionEnd {
    GameOver,
    Quit,
    TickLimit,
}

/// Final tally of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub score: u64,
    pub wave: u32,
    pub ticks: u64,
    pub end: SessionEnd,
}

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    state: GameState,
    assets: AssetBundle,
    audio: AudioBundle,
    pacer: Option<FramePacer>,
    fades: bool,
    snapshot: RenderSnapshot,
}

impl Game {
    pub fn new(
        mut state: GameState,
        assets: AssetBundle,
        audio: AudioBundle,
        settings: &Settings,
    ) -> Self {
        state.effect_frames = assets.effect_frames();
        let fades = settings.effective_fades();
        let snapshot = RenderSnapshot::capture_with(&state, &assets, fades);
        let pacer = settings
            .frame_pacing
            .then(|| FramePacer::new(settings.target_tick_rate));
        Self {
            state,
            assets,
            audio,
            pacer,
            fades,
            snapshot,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Snapshot of the latest tick
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    /// Measured frame rate, when pacing
    pub fn fps(&self) -> Option<u32> {
        self.pacer.as_ref().map(FramePacer::fps)
    }

    /// Run one tick and rebuild the snapshot
    pub fn step(&mut self, input: &TickInput) -> &RenderSnapshot {
        tick(&mut self.state, input);
        self.audio.play_events(&self.state.events);
        self.snapshot = RenderSnapshot::capture_with(&self.state, &self.assets, self.fades);
        &self.snapshot
    }

    /// Loop until quit, game over, or `max_ticks` ticks have run
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        render: &mut dyn RenderSink,
        max_ticks: Option<u64>,
    ) -> SessionSummary {
        log::info!(
            "Session start: seed {}, {} rocks, pacing {}",
            self.state.seed,
            self.state.obstacles.len(),
            if self.pacer.is_some() { "on" } else { "off" }
        );

        self.audio.start_music(MusicTrack::Siege);
        let mut ran = 0u64;
        let end = loop {
            match self.state.phase {
                GamePhase::GameOver => break SessionEnd::GameOver,
                GamePhase::Quit => break SessionEnd::Quit,
                GamePhase::Playing => {}
            }
            if max_ticks.is_some_and(|max| ran >= max) {
                break SessionEnd::TickLimit;
            }

            let cmd = input.sample(&self.snapshot);
            self.step(&cmd);
            render.present(&self.snapshot);
            ran += 1;

            if let Some(pacer) = self.pacer.as_mut() {
                pacer.wait();
            }
        };

        self.audio.stop_music();

        let summary = SessionSummary {
            score: self.state.player.score,
            wave: self.state.waves.wave,
            ticks: self.state.tick_count,
            end,
        };
        log::info!(
            "Session end ({:?}): score {}, wave {}, {} ticks",
            summary.end,
            summary.score,
            summary.wave,
            summary.ticks
        );
        summary
    }
}
