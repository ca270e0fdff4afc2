//! Speech synthesis narration
//!
//! One `Narrator` owns the browser's single speechSynthesis channel.
//! Capability detection happens once at construction; absence degrades
//! narration to silence and lets callers fall back to timers.

/// Pick the preferred voice from a list of voice names.
pub fn pick_voice(names: &[String], preferred: &str) -> Option<usize> {
    names.iter().position(|n| n.contains(preferred))
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice};

    use super::pick_voice;
    use crate::consts::{PREFERRED_VOICE, SPEECH_PITCH, SPEECH_RATE};

    /// Handle on the browser speech synthesis channel
    pub struct Narrator {
        synth: Option<SpeechSynthesis>,
    }

    impl Default for Narrator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Narrator {
        pub fn new() -> Self {
            let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
            if synth.is_none() {
                log::warn!("speechSynthesis unavailable - narration disabled");
            }
            Self { synth }
        }

        /// Cancel whatever is queued or currently speaking.
        pub fn stop_all(&self) {
            if let Some(synth) = &self.synth {
                synth.cancel();
            }
        }

        /// Dump the voice inventory to the console (debug aid).
        pub fn log_voices(&self) {
            let Some(synth) = &self.synth else { return };
            for voice in synth.get_voices().iter() {
                let voice: SpeechSynthesisVoice = voice.unchecked_into();
                log::debug!("voice: {} ({})", voice.name(), voice.lang());
            }
        }

        fn build_utterance(
            &self,
            synth: &SpeechSynthesis,
            text: &str,
        ) -> Option<SpeechSynthesisUtterance> {
            let utterance = SpeechSynthesisUtterance::new_with_text(text).ok()?;
            utterance.set_rate(SPEECH_RATE);
            utterance.set_pitch(SPEECH_PITCH);
            utterance.set_volume(1.0);

            let voices: Vec<SpeechSynthesisVoice> = synth
                .get_voices()
                .iter()
                .map(|v| v.unchecked_into())
                .collect();
            let names: Vec<String> = voices.iter().map(|v| v.name()).collect();
            if let Some(idx) = pick_voice(&names, PREFERRED_VOICE) {
                utterance.set_voice(Some(&voices[idx]));
            }
            Some(utterance)
        }

        /// Speak `text` and run `done` when the utterance finishes.
        ///
        /// Returns `false` without calling `done` when synthesis is
        /// unavailable, so the caller can arm its own fallback timer.
        /// `done` is not invoked for cancelled utterances.
        pub fn speak_then(&self, text: &str, done: impl FnOnce() + 'static) -> bool {
            let Some(synth) = &self.synth else {
                return false;
            };
            let Some(utterance) = self.build_utterance(synth, text) else {
                return false;
            };
            let cb = Closure::once_into_js(move |_event: web_sys::Event| done());
            utterance.set_onend(Some(cb.unchecked_ref()));
            synth.speak(&utterance);
            true
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::Narrator;

#[cfg(test)]
mod tests {
    use super::pick_voice;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_pick_voice_prefers_match() {
        let voices = names(&["Alex", "Trinoids", "Samantha"]);
        assert_eq!(pick_voice(&voices, "Trinoids"), Some(1));
    }

    #[test]
    fn test_pick_voice_matches_substring() {
        let voices = names(&["Alex (en-US)", "Trinoids (en-US)"]);
        assert_eq!(pick_voice(&voices, "Trinoids"), Some(1));
    }

    #[test]
    fn test_pick_voice_none_when_absent() {
        let voices = names(&["Alex", "Samantha"]);
        assert_eq!(pick_voice(&voices, "Trinoids"), None);
    }
}
