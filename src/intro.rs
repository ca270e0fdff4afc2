//! Intro sequencer
//!
//! One-time gate in front of the main content: activation click ->
//! spoken announcement (or fixed fallback delay) -> muted intro video ->
//! reveal. Every path to the reveal goes through the session's phase guard,
//! so late events cannot run the fade twice.

use crate::consts::INTRO_EARLY_CUT_SECS;

/// Loading-bar progress for the intro video, in percent.
pub fn progress_percent(current: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        ((current / duration) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Whether playback is close enough to the end to cut to the reveal.
pub fn should_cut_early(current: f64, duration: f64) -> bool {
    duration > 0.0 && current >= duration - INTRO_EARLY_CUT_SECS
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, Element, HtmlVideoElement};

    use super::{progress_percent, should_cut_early};
    use crate::app::{self, Ui, set_style};
    use crate::consts::{
        AUDIO_ENABLED_KEY, INTRO_FADE_MS, INTRO_TIMER_SLACK_MS, SPEECH_FALLBACK_MS,
    };
    use crate::session::{PlayOutcome, Session, Speaker};
    use crate::storage;

    /// Everything the activation path needs once the click lands
    #[derive(Clone)]
    struct IntroCtx {
        document: Document,
        session: Rc<RefCell<Session>>,
        sequence: Element,
        flashing_box: Element,
        overlay: Element,
        video: HtmlVideoElement,
    }

    pub fn init(ui: &Ui) {
        let Some(sequence) = ui.document.get_element_by_id("initiateSequence") else {
            log::warn!("intro: #initiateSequence missing - activation disabled");
            return;
        };
        let Some(flashing_box) = sequence.query_selector(".flashing-box").ok().flatten() else {
            log::warn!("intro: .flashing-box missing - activation disabled");
            return;
        };
        let Some(overlay) = ui.document.get_element_by_id("videoIntro") else {
            log::warn!("intro: #videoIntro missing - activation disabled");
            return;
        };
        let Some(video) = ui
            .document
            .get_element_by_id("introVideo")
            .and_then(|e| e.dyn_into::<HtmlVideoElement>().ok())
        else {
            log::warn!("intro: #introVideo missing - activation disabled");
            return;
        };

        let ctx = IntroCtx {
            document: ui.document.clone(),
            session: ui.session.clone(),
            sequence,
            flashing_box,
            overlay,
            video,
        };

        wire_video_events(&ctx);
        wire_activation(ui, &ctx);

        log::info!("intro sequencer initialized");
    }

    fn wire_activation(ui: &Ui, ctx: &IntroCtx) {
        let target = ctx.flashing_box.clone();
        let ui = ui.clone();
        let ctx = ctx.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_e: web_sys::MouseEvent| {
            if !ctx.session.borrow_mut().activate() {
                return;
            }
            log::info!("activation sequence started");

            // Lock page scrolling for the duration of the intro.
            if let Some(body) = ctx.document.body() {
                let _ = body.class_list().add_1("intro-active");
            }
            if let Some(text) = ctx.flashing_box.query_selector(".sequence-text").ok().flatten() {
                text.set_text_content(Some("System Activated"));
            }
            let _ = ctx.flashing_box.class_list().add_1("activated");

            // First user gesture: opportunistic background-audio start.
            crate::audio::kick_start(&ui);

            let spoken = if ui.settings.speech_enabled {
                let ctx = ctx.clone();
                ui.narrator
                    .speak_then("System activated", move || finish_activation(&ctx))
            } else {
                false
            };
            if spoken {
                ctx.session.borrow_mut().start_speaking(Speaker::Intro);
            } else {
                // No synthesis: fixed delay instead of the utterance end.
                let ctx = ctx.clone();
                app::set_timeout(move || finish_activation(&ctx), SPEECH_FALLBACK_MS);
            }
        });
        let _ = target.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    fn finish_activation(ctx: &IntroCtx) {
        ctx.session.borrow_mut().finish_speaking(Speaker::Intro);
        if !ctx.session.borrow_mut().begin_intro_playback() {
            return;
        }

        let _ = ctx.flashing_box.class_list().remove_1("activated");
        set_style(&ctx.sequence, "display", "none");
        start_video(ctx);
    }

    fn start_video(ctx: &IntroCtx) {
        log::info!("starting intro video");
        set_style(&ctx.overlay, "display", "block");
        set_style(&ctx.overlay, "opacity", "1");
        set_style(&ctx.overlay, "visibility", "visible");

        // Muted inline playback is required for unattended start.
        ctx.video.set_muted(true);
        let _ = ctx.video.set_attribute("playsinline", "");

        let ctx = ctx.clone();
        spawn_local(async move {
            if let PlayOutcome::Rejected = crate::audio::try_play(&ctx.video).await {
                log::warn!("intro video refused to play, skipping to main site");
                reveal_main_site(&ctx);
            }
        });
    }

    fn wire_video_events(ctx: &IntroCtx) {
        let video = ctx.video.clone();

        // Wall-clock fallback armed once the duration is known.
        {
            let ctx = ctx.clone();
            let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_e| {
                let duration = ctx.video.duration();
                if !duration.is_finite() {
                    return;
                }
                log::info!("intro video duration: {duration:.1}s");
                let ctx = ctx.clone();
                app::set_timeout(
                    move || reveal_main_site(&ctx),
                    (duration * 1000.0 + INTRO_TIMER_SLACK_MS) as i32,
                );
            });
            let _ =
                video.add_event_listener_with_callback("loadedmetadata", cb.as_ref().unchecked_ref());
            cb.forget();
        }

        // Progress bar plus the early cut shortly before the natural end.
        {
            let ctx = ctx.clone();
            let bar = ctx.document.query_selector(".loading-progress").ok().flatten();
            let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_e| {
                let current = ctx.video.current_time();
                let duration = ctx.video.duration();
                if let Some(bar) = &bar {
                    let pct = progress_percent(current, duration);
                    set_style(bar, "width", &format!("{pct:.1}%"));
                }
                if should_cut_early(current, duration) {
                    let _ = ctx.video.pause();
                    reveal_main_site(&ctx);
                }
            });
            let _ =
                video.add_event_listener_with_callback("timeupdate", cb.as_ref().unchecked_ref());
            cb.forget();
        }

        // Natural end and every kind of wedged playback reveal as well; the
        // phase guard makes the extras no-ops.
        {
            let ctx = ctx.clone();
            let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
                log::info!("intro video event: {}", e.type_());
                reveal_main_site(&ctx);
            });
            for event in ["ended", "error", "stalled", "waiting"] {
                let _ = video.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
            }
            cb.forget();
        }
    }

    fn reveal_main_site(ctx: &IntroCtx) {
        if !ctx.session.borrow_mut().reveal() {
            return;
        }
        log::info!("revealing main site");

        let _ = ctx.overlay.class_list().add_1("fade-out");
        let ctx = ctx.clone();
        app::set_timeout(
            move || {
                if let Some(body) = ctx.document.body() {
                    let _ = body.class_list().remove_1("intro-active");
                }
                set_style(&ctx.overlay, "display", "none");
                let _ = ctx.overlay.class_list().remove_1("fade-out");
                if let Some(container) = ctx.document.query_selector(".container").ok().flatten() {
                    let _ = container.class_list().remove_1("site-hidden");
                }
                // Remember the audio state for the next page view.
                let enabled = ctx.session.borrow().audio.playing;
                storage::set(AUDIO_ENABLED_KEY, if enabled { "true" } else { "false" });
            },
            INTRO_FADE_MS,
        );
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0.0, 10.0), 0.0);
        assert_eq!(progress_percent(5.0, 10.0), 50.0);
        assert_eq!(progress_percent(10.0, 10.0), 100.0);
        // Overshoot and unknown duration both stay sane
        assert_eq!(progress_percent(12.0, 10.0), 100.0);
        assert_eq!(progress_percent(3.0, 0.0), 0.0);
        assert_eq!(progress_percent(3.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_early_cut_threshold() {
        assert!(!should_cut_early(7.9, 10.0));
        assert!(should_cut_early(8.0, 10.0));
        assert!(should_cut_early(9.5, 10.0));
        // No duration yet: never cut
        assert!(!should_cut_early(5.0, 0.0));
        assert!(!should_cut_early(5.0, f64::NAN));
    }
}
