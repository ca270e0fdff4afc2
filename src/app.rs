//! Application wiring
//!
//! [`Ui`] bundles the handles every initializer needs. `boot` runs once at
//! module start; `reinit_content` runs after every partial-navigation swap,
//! because the swapped markup takes its listeners with it.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::session::Session;
use crate::settings::Settings;
use crate::speech::Narrator;

/// Shared context handed to every initializer
#[derive(Clone)]
pub struct Ui {
    pub document: Document,
    pub session: Rc<RefCell<Session>>,
    pub narrator: Rc<Narrator>,
    pub settings: Rc<Settings>,
}

/// Wire up the whole page. Called once from the wasm entry point.
pub fn boot() {
    let window = web_sys::window().expect("no window");
    let document = window.document().expect("no document");

    let ui = Ui {
        document,
        session: Rc::new(RefCell::new(Session::new())),
        narrator: Rc::new(Narrator::new()),
        settings: Rc::new(Settings::load_or_init()),
    };

    ui.narrator.log_voices();

    crate::intro::init(&ui);
    crate::audio::init(&ui);
    crate::nav::init(&ui);
    crate::nav::init_mobile(&ui);
    crate::nav::init_header_layout(&ui);
    crate::entries::init(&ui);
    crate::lazy::init(&ui);
    crate::effects::init_decor(&ui);
    crate::effects::init_content(&ui);
    crate::pjax::init(&ui);

    log::info!("console-folio ready");
}

/// Re-run every initializer whose bindings died with the replaced markup.
/// Anything document- or header-scoped stays bound; the audio init is
/// idempotent and only refreshes its button.
pub fn reinit_content(ui: &Ui) {
    crate::audio::init(ui);
    crate::nav::refresh(ui);
    crate::entries::init(ui);
    crate::lazy::init(ui);
    crate::effects::init_content(ui);
}

/// Run `f` once after `ms` milliseconds.
pub fn set_timeout(f: impl FnOnce() + 'static, ms: i32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let cb = Closure::once_into_js(f);
    if let Err(err) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
    {
        log::error!("set_timeout failed: {err:?}");
    }
}

/// Run `f` every `ms` milliseconds; returns the interval handle.
pub fn set_interval(f: impl FnMut() + 'static, ms: i32) -> Option<i32> {
    let window = web_sys::window()?;
    let cb = Closure::<dyn FnMut()>::new(f);
    let id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms)
        .ok();
    cb.forget();
    id
}

/// All elements matching `selector`, document-wide.
pub fn elements(document: &Document, selector: &str) -> Vec<Element> {
    let mut out = Vec::new();
    if let Ok(list) = document.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

/// All elements matching `selector` under `root`.
pub fn child_elements(root: &Element, selector: &str) -> Vec<Element> {
    let mut out = Vec::new();
    if let Ok(list) = root.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

/// Best-effort inline style mutation.
pub fn set_style(el: &Element, prop: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(prop, value);
    }
}

/// Smooth-scroll the window back to the top.
pub fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        let opts = ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&opts);
    }
}

/// File name of the current page, defaulting to the site root document.
pub fn current_page() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .and_then(|p| p.rsplit('/').next().map(str::to_owned))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "index.html".to_owned())
}
