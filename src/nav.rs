//! Section navigation
//!
//! Exactly one content section carries the `active` class at a time, and the
//! matching tab mirrors it. Tab clicks, in-page anchors, arrow keys and the
//! mobile tree all funnel through [`show_section`].

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::app::{Ui, elements, set_style};
use crate::session::NavState;

/// Document-scoped wiring, done once at boot.
pub fn init(ui: &Ui) {
    refresh(ui);
    wire_tabs(ui);
    wire_anchor_links(ui);
    wire_keyboard(ui);
}

/// Re-collect the sections after the main content changed and re-apply an
/// initial selection: an explicit `active` class wins, then a section named
/// after the current page, then the first section.
pub fn refresh(ui: &Ui) {
    let sections = elements(&ui.document, ".content-section");
    if sections.is_empty() {
        log::warn!("nav: no content sections found");
        ui.session.borrow_mut().nav = NavState::register(Vec::new());
        return;
    }

    let mut ids = Vec::new();
    let mut initial: Option<String> = None;
    for section in &sections {
        let id = section.id();
        if id.is_empty() {
            log::warn!("nav: content section without id skipped");
            continue;
        }
        if initial.is_none() && section.class_list().contains("active") {
            initial = Some(id.clone());
        }
        ids.push(id);
    }

    let initial = initial
        .or_else(|| {
            let stem = crate::app::current_page();
            let stem = stem.strip_suffix(".html").unwrap_or(&stem).to_owned();
            ids.iter().find(|id| **id == stem).cloned()
        })
        .or_else(|| ids.first().cloned());

    ui.session.borrow_mut().nav = NavState::register(ids);
    if let Some(id) = initial {
        show_section(ui, &id);
    }
}

/// Activate the section with `id` and its tab, deactivating all others.
/// Unknown ids log an error and leave the prior selection as-is.
pub fn show_section(ui: &Ui, id: &str) {
    if ui.session.borrow_mut().nav.show(id).is_none() {
        log::error!("nav: unknown section: {id}");
        return;
    }

    for section in elements(&ui.document, ".content-section") {
        let _ = section.class_list().remove_1("active");
    }
    for tab in elements(&ui.document, ".nav-tab") {
        let _ = tab.class_list().remove_1("active");
    }
    if let Some(section) = ui.document.get_element_by_id(id) {
        let _ = section.class_list().add_1("active");
    }
    if let Some(tab) = ui
        .document
        .query_selector(&format!(".nav-tab[data-section=\"{id}\"]"))
        .ok()
        .flatten()
    {
        let _ = tab.class_list().add_1("active");
    }
}

fn wire_tabs(ui: &Ui) {
    for tab in elements(&ui.document, ".nav-tab") {
        let Some(id) = tab.get_attribute("data-section") else {
            continue;
        };
        let ui = ui.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            e.prevent_default();
            show_section(&ui, &id);
        });
        let _ = tab.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

/// In-page anchor links switch sections too. Delegated at the document so
/// links inside swapped content keep working.
fn wire_anchor_links(ui: &Ui) {
    let handler_ui = ui.clone();
    let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
        let Some(anchor) = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("a").ok().flatten())
        else {
            return;
        };
        let Some(href) = anchor.get_attribute("href") else {
            return;
        };
        if let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) {
            e.prevent_default();
            show_section(&handler_ui, id);
        }
    });
    let _ = ui
        .document
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
    cb.forget();
}

fn wire_keyboard(ui: &Ui) {
    let handler_ui = ui.clone();
    let cb = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
        move |e: web_sys::KeyboardEvent| {
            let target = {
                let session = handler_ui.session.borrow();
                let idx = match e.key().as_str() {
                    "ArrowRight" | "ArrowDown" => session.nav.next(),
                    "ArrowLeft" | "ArrowUp" => session.nav.prev(),
                    _ => return,
                };
                idx.and_then(|i| session.nav.id(i).map(str::to_owned))
            };
            let Some(id) = target else {
                return;
            };
            e.prevent_default();
            show_section(&handler_ui, &id);
        },
    );
    let _ = ui
        .document
        .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
    cb.forget();
}

/// Mobile navigation tree: the main button toggles the menu, items close it
/// and switch sections. Safe to re-run after a content swap; already-bound
/// nodes are marked and skipped.
pub fn init_mobile(ui: &Ui) {
    for button in elements(&ui.document, ".mobile-nav-main") {
        if button.get_attribute("data-nav-bound").is_some() {
            continue;
        }
        let _ = button.set_attribute("data-nav-bound", "");

        let target = button.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            if let Ok(Some(tree)) = target.closest(".mobile-nav-tree") {
                let _ = tree.class_list().toggle("active");
            } else {
                log::warn!("nav: mobile button outside a nav tree");
            }
        });
        let _ = button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    for item in elements(&ui.document, ".mobile-nav-item") {
        let Some(section) = item.get_attribute("data-section") else {
            continue;
        };
        if item.get_attribute("data-nav-bound").is_some() {
            continue;
        }
        let _ = item.set_attribute("data-nav-bound", "");

        let ui = ui.clone();
        let target = item.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            if let Ok(Some(tree)) = target.closest(".mobile-nav-tree") {
                let _ = tree.class_list().remove_1("active");
            }
            show_section(&ui, &section);
        });
        let _ = item.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

/// Keep the top navigation sticky under the header; content scrolls beneath
/// it. Re-run after swaps and on resize.
pub fn init_header_layout(ui: &Ui) {
    let header = ui.document.query_selector(".header").ok().flatten();
    let top_nav = ui.document.query_selector(".top-nav").ok().flatten();
    let main = ui.document.query_selector(".main-content").ok().flatten();
    let (Some(header), Some(top_nav), Some(main)) = (header, top_nav, main) else {
        log::debug!("nav: header/top-nav/main-content incomplete - layout pass skipped");
        return;
    };

    apply_layout(&header, &top_nav, &main);

    if top_nav.get_attribute("data-layout-bound").is_some() {
        return;
    }
    let _ = top_nav.set_attribute("data-layout-bound", "");

    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_e| {
        apply_layout(&header, &top_nav, &main);
    });
    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
    }
    cb.forget();
}

fn apply_layout(header: &Element, top_nav: &Element, main: &Element) {
    // Header stays in normal flow so it scrolls off; the nav locks to the
    // console inset once scrolled into place.
    set_style(header, "z-index", "1100");
    set_style(top_nav, "position", "sticky");
    set_style(top_nav, "top", "20px");
    set_style(top_nav, "z-index", "1115");
    set_style(main, "z-index", "1");
}
