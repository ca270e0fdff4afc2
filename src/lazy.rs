//! Lazy loading for below-the-fold videos
//!
//! Videos carrying the `lazy` class keep their sources in `data-src` until
//! they first scroll into view. Without IntersectionObserver support they
//! just load eagerly.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlVideoElement, IntersectionObserver, IntersectionObserverEntry};

use crate::app::{Ui, elements};
use crate::session::PlayOutcome;

pub fn init(ui: &Ui) {
    let videos = elements(&ui.document, "video.lazy");
    if videos.is_empty() {
        return;
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let supported = js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false);
    if !supported {
        log::debug!("IntersectionObserver unavailable - lazy videos load eagerly");
        for el in &videos {
            if let Some(video) = el.dyn_ref::<HtmlVideoElement>() {
                promote(video);
                let _ = el.class_list().remove_1("lazy");
            }
        }
        return;
    }

    let cb = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(video) = target.dyn_ref::<HtmlVideoElement>() {
                    promote(video);
                    let _ = target.class_list().remove_1("lazy");
                    observer.unobserve(&target);
                    log::info!("lazy-loaded video");
                }
            }
        },
    );

    match IntersectionObserver::new(cb.as_ref().unchecked_ref()) {
        Ok(observer) => {
            for video in &videos {
                observer.observe(video);
            }
            cb.forget();
        }
        Err(err) => log::warn!("could not create IntersectionObserver: {err:?}"),
    }
}

/// Promote `data-src` sources, load, and try to start playback.
fn promote(video: &HtmlVideoElement) {
    let children = video.children();
    for i in 0..children.length() {
        let Some(source) = children.item(i) else {
            continue;
        };
        if source.tag_name() != "SOURCE" {
            continue;
        }
        if let Some(src) = source.get_attribute("data-src") {
            let _ = source.set_attribute("src", &src);
        }
    }
    video.load();

    let video = video.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let PlayOutcome::Rejected = crate::audio::try_play(&video).await {
            log::warn!("lazy video autoplay rejected");
        }
    });
}
