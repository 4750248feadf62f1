//! Audio system
//!
//! Sound effects and the background loop are procedural tone recipes, so no
//! sample files are needed. Actual playback goes through an injected
//! `AudioBackend`; without one the bundle is a silent stub and the game runs
//! the same either way.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{GameEvent, ProjectileOrigin};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundEffect {
    /// Player fires a volley
    Shoot,
    /// Zombie killed by a projectile
    ZombieHit,
    /// Zombie reached the player
    PlayerDamage,
    GameOver,
    /// Power-up collected
    Powerup,
    /// New wave begins
    WaveStart,
    /// Shield absorbed a hit
    ShieldHit,
}

/// Oscillator shape for a tone layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator with a linear pitch sweep and exponential fade
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Voice {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Delay from trigger (seconds)
    pub offset: f32,
    /// Length (seconds)
    pub duration: f32,
    /// Relative loudness before volume is applied
    pub gain: f32,
}

const fn voice(
    waveform: Waveform,
    start_hz: f32,
    end_hz: f32,
    offset: f32,
    duration: f32,
    gain: f32,
) -> Voice {
    Voice {
        waveform,
        start_hz,
        end_hz,
        offset,
        duration,
        gain,
    }
}

// === Tone recipes ===

/// Short snappy zap
const SHOOT: &[Voice] = &[voice(Waveform::Square, 900.0, 300.0, 0.0, 0.06, 0.25)];

/// Wet crunch with a low thump
const ZOMBIE_HIT: &[Voice] = &[
    voice(Waveform::Sawtooth, 220.0, 60.0, 0.0, 0.12, 0.35),
    voice(Waveform::Sine, 80.0, 40.0, 0.0, 0.1, 0.3),
];

const PLAYER_DAMAGE: &[Voice] = &[voice(Waveform::Square, 150.0, 70.0, 0.0, 0.2, 0.4)];

/// Descending arpeggio
const GAME_OVER: &[Voice] = &[
    voice(Waveform::Sine, 392.0, 392.0, 0.0, 0.25, 0.4),
    voice(Waveform::Sine, 330.0, 330.0, 0.2, 0.25, 0.4),
    voice(Waveform::Sine, 262.0, 262.0, 0.4, 0.25, 0.4),
    voice(Waveform::Sine, 196.0, 196.0, 0.6, 0.5, 0.4),
];

/// Rising sparkle
const POWERUP: &[Voice] = &[
    voice(Waveform::Sine, 523.0, 523.0, 0.0, 0.1, 0.3),
    voice(Waveform::Sine, 659.0, 659.0, 0.06, 0.1, 0.3),
    voice(Waveform::Sine, 784.0, 784.0, 0.12, 0.15, 0.3),
];

const WAVE_START: &[Voice] = &[
    voice(Waveform::Triangle, 110.0, 220.0, 0.0, 0.4, 0.4),
    voice(Waveform::Triangle, 165.0, 330.0, 0.1, 0.4, 0.25),
];

/// Metallic ping
const SHIELD_HIT: &[Voice] = &[voice(Waveform::Triangle, 1200.0, 800.0, 0.0, 0.1, 0.3)];

/// Two-bar minor bass pulse with a high drone on top
const SIEGE: &[Voice] = &[
    voice(Waveform::Triangle, 55.0, 55.0, 0.0, 0.45, 0.5),
    voice(Waveform::Triangle, 55.0, 55.0, 0.5, 0.45, 0.5),
    voice(Waveform::Triangle, 65.4, 65.4, 1.0, 0.45, 0.5),
    voice(Waveform::Triangle, 49.0, 49.0, 1.5, 0.45, 0.5),
    voice(Waveform::Sine, 220.0, 220.0, 0.0, 2.0, 0.15),
];

/// Time from trigger until the last voice ends (seconds)
fn span(voices: &[Voice]) -> f32 {
    voices.iter().map(|v| v.offset + v.duration).fold(0.0, f32::max)
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 7] = [
        SoundEffect::Shoot,
        SoundEffect::ZombieHit,
        SoundEffect::PlayerDamage,
        SoundEffect::GameOver,
        SoundEffect::Powerup,
        SoundEffect::WaveStart,
        SoundEffect::ShieldHit,
    ];

    /// Tone recipe for this effect
    pub fn voices(self) -> &'static [Voice] {
        match self {
            SoundEffect::Shoot => SHOOT,
            SoundEffect::ZombieHit => ZOMBIE_HIT,
            SoundEffect::PlayerDamage => PLAYER_DAMAGE,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::Powerup => POWERUP,
            SoundEffect::WaveStart => WAVE_START,
            SoundEffect::ShieldHit => SHIELD_HIT,
        }
    }

    /// Total length of the recipe (seconds)
    pub fn length(self) -> f32 {
        span(self.voices())
    }

    /// Sound a game event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Shot {
                origin: ProjectileOrigin::Player,
                ..
            } => Some(SoundEffect::Shoot),
            GameEvent::Shot { .. } => None,
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::ZombieHit),
            GameEvent::PlayerHurt { .. } => Some(SoundEffect::PlayerDamage),
            GameEvent::ShieldBlocked => Some(SoundEffect::ShieldHit),
            GameEvent::PowerupCollected(_) => Some(SoundEffect::Powerup),
            GameEvent::WaveStarted(_) => Some(SoundEffect::WaveStart),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::PickupSpawned(_) | GameEvent::PowerupExpired(_) => None,
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MusicTrack {
    /// Plays for the whole session
    Siege,
}

impl MusicTrack {
    pub fn voices(self) -> &'static [Voice] {
        match self {
            MusicTrack::Siege => SIEGE,
        }
    }

    /// Length of one pass before it repeats (seconds)
    pub fn loop_length(self) -> f32 {
        span(self.voices())
    }
}

/// Something that can make noise
pub trait AudioBackend {
    /// Play `effect` at `volume` (0.0 - 1.0, already mixed)
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Loop `track` at `volume`, replacing whatever music is playing
    fn start_music(&mut self, _track: MusicTrack, _volume: f32) {}

    fn set_music_volume(&mut self, _volume: f32) {}

    fn stop_music(&mut self) {}
}

/// Backend that writes every sound to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudioBackend;

impl LogAudioBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for LogAudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!(
            "sfx {effect:?} at {:.0}% ({} voices, {:.2}s)",
            volume * 100.0,
            effect.voices().len(),
            effect.length()
        );
    }

    fn start_music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!(
            "music {track:?} looping every {:.1}s at {:.0}%",
            track.loop_length(),
            volume * 100.0
        );
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("music volume {:.0}%", volume * 100.0);
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }
}

/// Audio bundle handed to the game
pub struct AudioBundle {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    music_enabled: bool,
    muted: bool,
    /// Track the game asked for
    music: Option<MusicTrack>,
    /// Track the backend is looping right now
    playing: Option<MusicTrack>,
}

impl std::fmt::Debug for AudioBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioBundle")
            .field("enabled", &self.backend.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("music_volume", &self.music_volume)
            .field("muted", &self.muted)
            .field("playing", &self.playing)
            .finish()
    }
}

impl Default for AudioBundle {
    fn default() -> Self {
        Self::disabled()
    }
}

impl AudioBundle {
    /// Silent stub
    pub fn disabled() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            music_enabled: true,
            muted: false,
            music: None,
            playing: None,
        }
    }

    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::disabled()
        }
    }

    /// Bundle with the backend, unless settings turn sound off entirely
    pub fn from_settings(backend: Box<dyn AudioBackend>, settings: &Settings) -> Self {
        if !settings.sound_enabled {
            log::info!("Sound disabled in settings");
            return Self::disabled();
        }
        let mut bundle = Self::new(backend);
        bundle.set_master_volume(settings.master_volume);
        bundle.set_sfx_volume(settings.sfx_volume);
        bundle.set_music_volume(settings.music_volume);
        bundle.music_enabled = settings.music_enabled;
        bundle.set_muted(settings.muted);
        bundle
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.sync_music();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.sync_music();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sync_music();
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.play(effect, vol);
        }
    }

    /// Loop `track` until `stop_music`. Muting pauses it and unmuting resumes.
    pub fn start_music(&mut self, track: MusicTrack) {
        self.music = Some(track);
        self.sync_music();
    }

    pub fn stop_music(&mut self) {
        self.music = None;
        self.sync_music();
    }

    fn music_level(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Bring the backend in line with the requested track and volume
    fn sync_music(&mut self) {
        let volume = self.music_level();
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        match (self.music, self.playing) {
            (Some(want), Some(now)) if want == now && volume > 0.0 => {
                backend.set_music_volume(volume);
            }
            (Some(want), _) if volume > 0.0 => {
                backend.start_music(want, volume);
                self.playing = Some(want);
            }
            (_, Some(_)) => {
                backend.stop_music();
                self.playing = None;
            }
            _ => {}
        }
    }

    /// Play whatever a tick's events call for
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}
