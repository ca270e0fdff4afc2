//! Session state and core UI types
//!
//! Every flag the page mutates at runtime lives here; the DOM wiring reads
//! and writes it through one shared `Rc<RefCell<Session>>`.

/// Lifecycle phase of the one-time intro sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntroPhase {
    /// Waiting for the activation click
    #[default]
    Idle,
    /// Activation clicked, announcement (or its fallback timer) running
    Activating,
    /// Intro video overlay visible and playing
    PlayingIntro,
    /// Main site revealed (terminal)
    Revealed,
}

/// What a toggle request should do to the audio element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAction {
    Play,
    Pause,
}

/// Result of an attempted media playback, reported by whoever awaited it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// Autoplay policy or decode failure rejected the play call
    Rejected,
}

/// Background audio flags
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioState {
    /// Set once the element is wired; later init calls only refresh visuals
    pub initialized: bool,
    /// Whether the element is currently playing
    pub playing: bool,
    /// Persisted user preference (the "audio enabled" key)
    pub enabled_pref: bool,
}

/// Owner of the single speech-synthesis channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The intro activation announcement
    Intro,
    /// A disclosure entry, by registration index
    Entry(usize),
}

/// Disclosure entry category, classified once at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Timeline/experience/project category header
    Category,
    /// Experience card with a bullet list
    Experience,
    /// Project card with a bullet list
    Project,
    /// Mission statement block with full body text
    Mission,
}

impl EntryKind {
    /// Classify an entry from its element's class names.
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        for class in classes {
            match class {
                "timeline-category" | "experience-category" | "project-category" => {
                    return EntryKind::Category;
                }
                "experience-card" => return EntryKind::Experience,
                "project-card" => return EntryKind::Project,
                _ => {}
            }
        }
        EntryKind::Mission
    }
}

/// A collapsible content entry
#[derive(Debug, Clone)]
pub struct Entry {
    /// Short label narrated on expand
    pub label: String,
    pub kind: EntryKind,
    pub expanded: bool,
}

/// Section/tab selection; exactly one section is active at a time
#[derive(Debug, Clone, Default)]
pub struct NavState {
    /// Section ids in document order
    pub sections: Vec<String>,
    /// Index of the active section
    pub active: Option<usize>,
}

/// The one UI-session context object
#[derive(Debug, Default)]
pub struct Session {
    pub intro: IntroPhase,
    pub audio: AudioState,
    pub nav: NavState,
    /// Disclosure entries, rebuilt on every content swap
    pub entries: Vec<Entry>,
    /// Current owner of the speech channel, if any
    pub speaking: Option<Speaker>,
    /// One-time decorative effects installed (survive content swaps)
    pub decor_installed: bool,
}
