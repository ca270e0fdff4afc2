//! Console Folio - a retro-console personal portfolio front-end
//!
//! Core modules:
//! - `session`: UI session state machine (intro phase, sections, audio, entries)
//! - `intro`: one-time activation -> announcement -> video -> reveal flow
//! - `nav`: exclusive section switching with keyboard and mobile entry points
//! - `pjax`: fetch-based partial page navigation
//! - `entries`: collapsible entries with narrated labels
//! - `audio`/`speech`: background audio and speech synthesis controllers

#[cfg(target_arch = "wasm32")]
pub mod app;
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod effects;
#[cfg(target_arch = "wasm32")]
pub mod entries;
pub mod intro;
#[cfg(target_arch = "wasm32")]
pub mod lazy;
#[cfg(target_arch = "wasm32")]
pub mod nav;
pub mod pjax;
pub mod session;
pub mod settings;
pub mod speech;
pub mod storage;

pub use session::Session;
pub use settings::Settings;

/// Page behavior constants
pub mod consts {
    /// Intro overlay fade-out duration (ms)
    pub const INTRO_FADE_MS: i32 = 800;
    /// Activation fallback delay when speech synthesis is unavailable (ms)
    pub const SPEECH_FALLBACK_MS: i32 = 3000;
    /// Cut to the reveal this many seconds before the intro video ends
    pub const INTRO_EARLY_CUT_SECS: f64 = 2.0;
    /// Slack added to the whole-video wall-clock fallback timer (ms)
    pub const INTRO_TIMER_SLACK_MS: f64 = 1000.0;

    /// Background audio volume
    pub const AUDIO_VOLUME: f64 = 0.3;
    /// Minimum interval between playback-position saves (ms)
    pub const AUDIO_SAVE_INTERVAL_MS: f64 = 3000.0;
    /// Persisted audio preference / playback position keys
    pub const AUDIO_ENABLED_KEY: &str = "bk_audio_enabled";
    pub const AUDIO_TIME_KEY: &str = "bk_audio_time";

    /// Narration rate and pitch
    pub const SPEECH_RATE: f32 = 0.8;
    pub const SPEECH_PITCH: f32 = 0.8;
    /// Preferred speech synthesis voice
    pub const PREFERRED_VOICE: &str = "Trinoids";

    /// Settle delay before layout passes after a content swap (ms)
    pub const PJAX_SETTLE_MS: i32 = 80;

    /// Decorative particle spawn interval and lifetime (ms)
    pub const PARTICLE_INTERVAL_MS: i32 = 2000;
    pub const PARTICLE_LIFETIME_MS: i32 = 6000;
    /// Name typewriter start delay and per-character delay (ms)
    pub const TYPE_START_DELAY_MS: i32 = 500;
    pub const TYPE_DELAY_MS: i32 = 60;
    /// Scroll offset before the scroll-to-top button appears (px)
    pub const SCROLL_TOP_THRESHOLD: f64 = 300.0;
}
