//! Session transitions
//!
//! Pure state mutation; DOM side effects happen in the callers, which feed
//! media/speech outcomes back in through explicit results.

use super::state::{
    AudioAction, AudioState, IntroPhase, NavState, PlayOutcome, Session, Speaker,
};

/// Effect the caller must apply to the DOM after toggling an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryToggle {
    /// Entry opened; narrate the label (subject to settings/capability)
    Expanded { narrate: String },
    /// Entry closed; hide content and cancel narration
    Collapsed,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activation click. Only the first click from `Idle` wins; anything
    /// after that is ignored.
    pub fn activate(&mut self) -> bool {
        if self.intro == IntroPhase::Idle {
            self.intro = IntroPhase::Activating;
            true
        } else {
            false
        }
    }

    /// The announcement finished (or its fallback timer fired); start the
    /// intro video.
    pub fn begin_intro_playback(&mut self) -> bool {
        if self.intro == IntroPhase::Activating {
            self.intro = IntroPhase::PlayingIntro;
            true
        } else {
            false
        }
    }

    /// Transition to the revealed main site. Video end, the early cut, the
    /// wall-clock fallback and media errors all funnel through here; only
    /// the first qualifying trigger returns `true`.
    pub fn reveal(&mut self) -> bool {
        match self.intro {
            IntroPhase::Activating | IntroPhase::PlayingIntro => {
                self.intro = IntroPhase::Revealed;
                true
            }
            IntroPhase::Idle | IntroPhase::Revealed => false,
        }
    }

    /// Claim the speech channel, displacing any current owner.
    pub fn start_speaking(&mut self, who: Speaker) {
        self.speaking = Some(who);
    }

    /// Release the channel unconditionally (global cancel).
    pub fn stop_speaking(&mut self) {
        self.speaking = None;
    }

    /// An utterance for `who` finished naturally; release the channel only
    /// if it still belongs to that speaker.
    pub fn finish_speaking(&mut self, who: Speaker) {
        if self.speaking == Some(who) {
            self.speaking = None;
        }
    }

    /// Toggle entry `idx`. Expanding claims the speech channel; collapsing
    /// releases it only if this entry owns it.
    pub fn toggle_entry(&mut self, idx: usize) -> Option<EntryToggle> {
        let entry = self.entries.get_mut(idx)?;
        if entry.expanded {
            entry.expanded = false;
            if self.speaking == Some(Speaker::Entry(idx)) {
                self.speaking = None;
            }
            Some(EntryToggle::Collapsed)
        } else {
            entry.expanded = true;
            let narrate = entry.label.clone();
            self.speaking = Some(Speaker::Entry(idx));
            Some(EntryToggle::Expanded { narrate })
        }
    }
}

impl NavState {
    pub fn register(sections: Vec<String>) -> Self {
        Self {
            sections,
            active: None,
        }
    }

    /// Activate the section with `id`. Unknown ids leave the prior
    /// selection in place and return `None`.
    pub fn show(&mut self, id: &str) -> Option<usize> {
        let idx = self.sections.iter().position(|s| s == id)?;
        self.active = Some(idx);
        Some(idx)
    }

    /// Id of the section at `idx`.
    pub fn id(&self, idx: usize) -> Option<&str> {
        self.sections.get(idx).map(String::as_str)
    }

    /// Id of the active section.
    pub fn active_id(&self) -> Option<&str> {
        self.active.and_then(|i| self.id(i))
    }

    /// Index after the active one, wrapping at the end.
    pub fn next(&self) -> Option<usize> {
        let len = self.sections.len();
        if len == 0 {
            return None;
        }
        Some(match self.active {
            Some(i) => (i + 1) % len,
            None => 0,
        })
    }

    /// Index before the active one, wrapping at the start.
    pub fn prev(&self) -> Option<usize> {
        let len = self.sections.len();
        if len == 0 {
            return None;
        }
        Some(match self.active {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        })
    }
}

impl AudioState {
    /// What the next toggle click should do.
    pub fn next_action(&self) -> AudioAction {
        if self.playing {
            AudioAction::Pause
        } else {
            AudioAction::Play
        }
    }

    /// Fold the outcome of an attempted action back into the state.
    pub fn apply(&mut self, action: AudioAction, outcome: PlayOutcome) {
        match (action, outcome) {
            (AudioAction::Play, PlayOutcome::Started) => {
                self.playing = true;
                self.enabled_pref = true;
            }
            (AudioAction::Play, PlayOutcome::Rejected) => {
                self.playing = false;
            }
            // Pausing a media element cannot fail
            (AudioAction::Pause, _) => {
                self.playing = false;
                self.enabled_pref = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::{Entry, EntryKind};
    use proptest::prelude::*;

    fn nav3() -> NavState {
        NavState::register(vec![
            "about".to_owned(),
            "projects".to_owned(),
            "contact".to_owned(),
        ])
    }

    fn session_with_entries(labels: &[&str]) -> Session {
        let mut session = Session::new();
        session.entries = labels
            .iter()
            .map(|l| Entry {
                label: (*l).to_owned(),
                kind: EntryKind::Category,
                expanded: false,
            })
            .collect();
        session
    }

    #[test]
    fn test_intro_happy_path() {
        let mut session = Session::new();
        assert_eq!(session.intro, IntroPhase::Idle);
        assert!(session.activate());
        assert_eq!(session.intro, IntroPhase::Activating);
        assert!(session.begin_intro_playback());
        assert_eq!(session.intro, IntroPhase::PlayingIntro);
        assert!(session.reveal());
        assert_eq!(session.intro, IntroPhase::Revealed);
    }

    #[test]
    fn test_activate_only_once() {
        let mut session = Session::new();
        assert!(session.activate());
        assert!(!session.activate());
        session.intro = IntroPhase::Revealed;
        assert!(!session.activate());
    }

    #[test]
    fn test_reveal_fires_once_across_triggers() {
        let mut session = Session::new();
        session.activate();
        session.begin_intro_playback();

        // First trigger (say, the early cut) wins; the video-end event, the
        // wall-clock fallback and a late stalled event must all be no-ops.
        assert!(session.reveal());
        assert!(!session.reveal());
        assert!(!session.reveal());
        assert!(!session.reveal());
        assert_eq!(session.intro, IntroPhase::Revealed);
    }

    #[test]
    fn test_reveal_not_from_idle() {
        let mut session = Session::new();
        assert!(!session.reveal());
        assert_eq!(session.intro, IntroPhase::Idle);
    }

    #[test]
    fn test_reveal_after_play_failure_during_activation() {
        // A rejected play() can arrive while the announcement is still
        // running; the reveal must still work and playback must not restart.
        let mut session = Session::new();
        session.activate();
        assert!(session.reveal());
        assert!(!session.begin_intro_playback());
    }

    #[test]
    fn test_show_unknown_section_keeps_selection() {
        let mut nav = nav3();
        assert_eq!(nav.show("projects"), Some(1));
        assert_eq!(nav.show("bogus"), None);
        assert_eq!(nav.active_id(), Some("projects"));
    }

    #[test]
    fn test_show_scenario_three_sections() {
        let mut nav = nav3();
        nav.show("projects");
        nav.show("contact");
        assert_eq!(nav.active, Some(2));
        assert_eq!(nav.active_id(), Some("contact"));
    }

    #[test]
    fn test_tab_cycle_wraps_right() {
        let mut nav = nav3();
        nav.show("contact");
        assert_eq!(nav.next(), Some(0));
    }

    #[test]
    fn test_tab_cycle_wraps_left() {
        let mut nav = nav3();
        nav.show("about");
        assert_eq!(nav.prev(), Some(2));
    }

    #[test]
    fn test_tab_cycle_without_selection() {
        let nav = nav3();
        assert_eq!(nav.next(), Some(0));
        assert_eq!(nav.prev(), Some(2));

        let empty = NavState::register(Vec::new());
        assert_eq!(empty.next(), None);
        assert_eq!(empty.prev(), None);
    }

    #[test]
    fn test_audio_toggle_roundtrip() {
        let mut audio = AudioState::default();
        let original = audio.playing;

        let action = audio.next_action();
        assert_eq!(action, AudioAction::Play);
        audio.apply(action, PlayOutcome::Started);
        assert!(audio.playing);
        assert!(audio.enabled_pref);

        let action = audio.next_action();
        assert_eq!(action, AudioAction::Pause);
        audio.apply(action, PlayOutcome::Started);
        assert_eq!(audio.playing, original);
        assert!(!audio.enabled_pref);
    }

    #[test]
    fn test_audio_autoplay_rejected() {
        let mut audio = AudioState::default();
        audio.apply(AudioAction::Play, PlayOutcome::Rejected);
        assert!(!audio.playing);
        assert!(!audio.enabled_pref);
    }

    #[test]
    fn test_entry_expand_claims_channel() {
        let mut session = session_with_entries(&["Education"]);
        let effect = session.toggle_entry(0);
        assert_eq!(
            effect,
            Some(EntryToggle::Expanded {
                narrate: "Education".to_owned()
            })
        );
        assert_eq!(session.speaking, Some(Speaker::Entry(0)));
    }

    #[test]
    fn test_expanding_b_silences_a() {
        let mut session = session_with_entries(&["Education", "Projects"]);
        session.toggle_entry(0);
        assert_eq!(session.speaking, Some(Speaker::Entry(0)));

        session.toggle_entry(1);
        // Only one narration may ever be active
        assert_eq!(session.speaking, Some(Speaker::Entry(1)));
    }

    #[test]
    fn test_collapse_releases_channel() {
        let mut session = session_with_entries(&["Education"]);
        session.toggle_entry(0);
        assert_eq!(session.toggle_entry(0), Some(EntryToggle::Collapsed));
        assert_eq!(session.speaking, None);
        assert!(!session.entries[0].expanded);
    }

    #[test]
    fn test_collapse_keeps_other_entrys_channel() {
        let mut session = session_with_entries(&["Education", "Projects"]);
        session.toggle_entry(0);
        session.toggle_entry(1);
        // Collapsing the silenced entry must not cut off the active one
        session.toggle_entry(0);
        assert_eq!(session.speaking, Some(Speaker::Entry(1)));
    }

    #[test]
    fn test_finish_speaking_only_for_owner() {
        let mut session = session_with_entries(&["Education", "Projects"]);
        session.toggle_entry(0);
        session.toggle_entry(1);
        session.finish_speaking(Speaker::Entry(0));
        assert_eq!(session.speaking, Some(Speaker::Entry(1)));
        session.finish_speaking(Speaker::Entry(1));
        assert_eq!(session.speaking, None);
    }

    #[test]
    fn test_toggle_entry_out_of_range() {
        let mut session = session_with_entries(&["Education"]);
        assert_eq!(session.toggle_entry(5), None);
    }

    #[test]
    fn test_classify_entry_kinds() {
        assert_eq!(
            EntryKind::from_classes(["clickable-entry", "timeline-category"]),
            EntryKind::Category
        );
        assert_eq!(
            EntryKind::from_classes(["clickable-entry", "experience-category"]),
            EntryKind::Category
        );
        assert_eq!(
            EntryKind::from_classes(["clickable-entry", "experience-card"]),
            EntryKind::Experience
        );
        assert_eq!(
            EntryKind::from_classes(["clickable-entry", "project-card"]),
            EntryKind::Project
        );
        assert_eq!(EntryKind::from_classes(["clickable-entry"]), EntryKind::Mission);
    }

    proptest! {
        // Any mix of valid and bogus show() calls leaves exactly one active
        // section: the most recent valid id (or none if none was valid).
        #[test]
        fn show_sequences_leave_one_active(seq in prop::collection::vec(0usize..5, 1..40)) {
            let ids = ["about", "projects", "contact", "bogus", "nope"];
            let mut nav = nav3();
            let mut last_valid: Option<&str> = None;

            for &pick in &seq {
                let id = ids[pick];
                let result = nav.show(id);
                if pick < 3 {
                    prop_assert_eq!(result, Some(pick));
                    last_valid = Some(id);
                } else {
                    prop_assert_eq!(result, None);
                }
            }

            prop_assert_eq!(nav.active_id(), last_valid);
        }
    }
}
