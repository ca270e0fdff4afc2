//! Background audio controller
//!
//! One looping `<audio>` element: its toggle button, the persisted playback
//! position, and the auto-resume preference. Init is idempotent so a partial
//! navigation can never restart playback or double-bind the button.

use crate::consts::AUDIO_SAVE_INTERVAL_MS;

/// Throttle for persisting the playback position from `timeupdate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetSaver {
    last_saved_ms: f64,
}

impl OffsetSaver {
    /// Whether enough wall-clock time has passed to persist again.
    pub fn should_save(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_saved_ms > AUDIO_SAVE_INTERVAL_MS {
            self.last_saved_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Clamp a stored offset to the element's duration. A NaN duration means
/// metadata is not loaded yet, so the stored value is trusted as-is.
pub fn clamp_offset(stored: f64, duration: f64) -> f64 {
    if duration.is_nan() {
        stored
    } else {
        stored.min(duration)
    }
}

/// Parse the persisted offset key; only finite positive values count.
pub fn parse_offset(raw: &str) -> Option<f64> {
    let v = raw.parse::<f64>().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{AddEventListenerOptions, Element, HtmlAudioElement, HtmlMediaElement};

    use super::{OffsetSaver, clamp_offset, parse_offset};
    use crate::app::Ui;
    use crate::consts::{AUDIO_ENABLED_KEY, AUDIO_TIME_KEY};
    use crate::session::{AudioAction, PlayOutcome};
    use crate::storage;

    /// Visual state of the toggle button
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub enum ButtonFace {
        On,
        Off,
        Error,
    }

    pub fn set_button_face(btn: &Element, face: ButtonFace) {
        let (html, playing) = match face {
            ButtonFace::On => (
                r#"<i class="fas fa-volume-up"></i><span>Audio On</span>"#,
                true,
            ),
            ButtonFace::Off => (
                r#"<i class="fas fa-volume-mute"></i><span>Enable Audio</span>"#,
                false,
            ),
            ButtonFace::Error => (
                r#"<i class="fas fa-exclamation-triangle"></i><span>Audio Error</span>"#,
                false,
            ),
        };
        btn.set_inner_html(html);
        let _ = if playing {
            btn.class_list().add_1("playing")
        } else {
            btn.class_list().remove_1("playing")
        };
        if face == ButtonFace::Error {
            let _ = btn.set_attribute("disabled", "");
        }
    }

    /// Attempt playback and report how it went; the caller folds the outcome
    /// back into the session and the button.
    pub async fn try_play(media: &HtmlMediaElement) -> PlayOutcome {
        match media.play() {
            Ok(promise) => match JsFuture::from(promise).await {
                Ok(_) => PlayOutcome::Started,
                Err(err) => {
                    log::warn!("media play rejected: {err:?}");
                    PlayOutcome::Rejected
                }
            },
            Err(err) => {
                log::warn!("media play call failed: {err:?}");
                PlayOutcome::Rejected
            }
        }
    }

    pub fn init(ui: &Ui) {
        let audio = ui
            .document
            .get_element_by_id("backgroundAudio")
            .and_then(|e| e.dyn_into::<HtmlAudioElement>().ok());
        let btn = ui.document.get_element_by_id("playAudioBtn");
        let (Some(audio), Some(btn)) = (audio, btn) else {
            log::warn!("audio: #backgroundAudio or #playAudioBtn missing - feature disabled");
            return;
        };

        if ui.session.borrow().audio.initialized {
            // Partial-navigation pass: only refresh the button visuals.
            set_button_face(
                &btn,
                if audio.paused() {
                    ButtonFace::Off
                } else {
                    ButtonFace::On
                },
            );
            return;
        }
        ui.session.borrow_mut().audio.initialized = true;

        audio.set_volume(ui.settings.audio_volume);
        audio.set_loop(true);

        restore_offset(&audio);
        wire_offset_saves(&audio);
        wire_toggle(ui, &audio, &btn);

        set_button_face(&btn, ButtonFace::Off);

        // Resume if the user had audio on during the previous page view.
        if storage::get(AUDIO_ENABLED_KEY).as_deref() == Some("true") {
            ui.session.borrow_mut().audio.enabled_pref = true;
            audio.load();
            let session = ui.session.clone();
            let audio = audio.clone();
            let btn = btn.clone();
            spawn_local(async move {
                let outcome = try_play(&audio).await;
                session.borrow_mut().audio.apply(AudioAction::Play, outcome);
                match outcome {
                    PlayOutcome::Started => {
                        set_button_face(&btn, ButtonFace::On);
                        log::info!("background audio resumed from previous page");
                    }
                    PlayOutcome::Rejected => {
                        log::warn!("could not auto-resume audio (autoplay policy)");
                    }
                }
            });
        }

        log::info!("background audio initialized");
    }

    /// First-gesture start from the intro activation click. A rejection here
    /// means the element itself is unwilling, so the button is put into its
    /// error state.
    pub fn kick_start(ui: &Ui) {
        let audio = ui
            .document
            .get_element_by_id("backgroundAudio")
            .and_then(|e| e.dyn_into::<HtmlAudioElement>().ok());
        let btn = ui.document.get_element_by_id("playAudioBtn");
        let (Some(audio), Some(btn)) = (audio, btn) else {
            return;
        };
        if !audio.paused() {
            return;
        }

        audio.load();
        let session = ui.session.clone();
        spawn_local(async move {
            let outcome = try_play(&audio).await;
            session.borrow_mut().audio.apply(AudioAction::Play, outcome);
            match outcome {
                PlayOutcome::Started => set_button_face(&btn, ButtonFace::On),
                PlayOutcome::Rejected => set_button_face(&btn, ButtonFace::Error),
            }
        });
    }

    fn restore_offset(audio: &HtmlAudioElement) {
        let Some(stored) = storage::get(AUDIO_TIME_KEY).as_deref().and_then(parse_offset) else {
            return;
        };
        if audio.ready_state() > 0 {
            audio.set_current_time(clamp_offset(stored, audio.duration()));
        } else {
            // Metadata not in yet; seek once it arrives.
            let a = audio.clone();
            let cb = Closure::once_into_js(move |_e: web_sys::Event| {
                a.set_current_time(clamp_offset(stored, a.duration()));
            });
            let opts = AddEventListenerOptions::new();
            opts.set_once(true);
            let _ = audio.add_event_listener_with_callback_and_add_event_listener_options(
                "loadedmetadata",
                cb.unchecked_ref(),
                &opts,
            );
        }
    }

    fn wire_offset_saves(audio: &HtmlAudioElement) {
        // Throttled save while playing
        {
            let a = audio.clone();
            let mut saver = OffsetSaver::default();
            let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_e| {
                if saver.should_save(js_sys::Date::now()) {
                    storage::set(AUDIO_TIME_KEY, &a.current_time().to_string());
                }
            });
            let _ = audio
                .add_event_listener_with_callback("timeupdate", cb.as_ref().unchecked_ref());
            cb.forget();
        }

        // Final position on pause and on unload
        {
            let a = audio.clone();
            let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_e| {
                storage::set(AUDIO_TIME_KEY, &a.current_time().to_string());
            });
            let _ = audio.add_event_listener_with_callback("pause", cb.as_ref().unchecked_ref());
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("beforeunload", cb.as_ref().unchecked_ref());
            }
            cb.forget();
        }
    }

    fn wire_toggle(ui: &Ui, audio: &HtmlAudioElement, btn: &Element) {
        let session = ui.session.clone();
        let audio = audio.clone();
        let btn = btn.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_e: web_sys::MouseEvent| {
            let action = session.borrow().audio.next_action();
            match action {
                AudioAction::Pause => {
                    let _ = audio.pause();
                    session
                        .borrow_mut()
                        .audio
                        .apply(AudioAction::Pause, PlayOutcome::Started);
                    set_button_face(&btn, ButtonFace::Off);
                    storage::set(AUDIO_ENABLED_KEY, "false");
                    log::info!("background audio paused");
                }
                AudioAction::Play => {
                    if audio.ready_state() == 0 {
                        audio.load();
                    }
                    let session = session.clone();
                    let audio = audio.clone();
                    let btn = btn.clone();
                    spawn_local(async move {
                        let outcome = try_play(&audio).await;
                        session.borrow_mut().audio.apply(AudioAction::Play, outcome);
                        match outcome {
                            PlayOutcome::Started => {
                                set_button_face(&btn, ButtonFace::On);
                                storage::set(AUDIO_ENABLED_KEY, "true");
                                log::info!("background audio started");
                            }
                            PlayOutcome::Rejected => set_button_face(&btn, ButtonFace::Off),
                        }
                    });
                }
            }
        });
        let _ = btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::{init, kick_start, try_play};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_saver_throttles() {
        let mut saver = OffsetSaver::default();
        assert!(saver.should_save(10_000.0));
        assert!(!saver.should_save(12_999.0));
        assert!(saver.should_save(13_100.0));
        assert!(!saver.should_save(13_200.0));
    }

    #[test]
    fn test_clamp_offset_to_duration() {
        assert_eq!(clamp_offset(12.0, 90.0), 12.0);
        assert_eq!(clamp_offset(120.0, 90.0), 90.0);
        // Metadata not loaded yet
        assert_eq!(clamp_offset(120.0, f64::NAN), 120.0);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("12.5"), Some(12.5));
        assert_eq!(parse_offset("0"), None);
        assert_eq!(parse_offset("-3"), None);
        assert_eq!(parse_offset("NaN"), None);
        assert_eq!(parse_offset("garbage"), None);
    }
}
