//! Disclosure entries
//!
//! Collapsible cards with narrated labels. Every entry is classified once at
//! registration; expanding one silences whatever else was narrating, so at
//! most one utterance is ever live.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::app::{Ui, child_elements, elements, set_style};
use crate::session::{Entry, EntryKind, EntryToggle, Speaker};

/// Register all entries under the current markup. Called at boot and again
/// after every content swap; the session list is rebuilt from scratch.
pub fn init(ui: &Ui) {
    ui.session.borrow_mut().entries.clear();
    let found = elements(&ui.document, ".clickable-entry");
    for (idx, el) in found.iter().enumerate() {
        register(ui, idx, el);
    }
    if !found.is_empty() {
        log::info!("registered {} disclosure entries", found.len());
    }
}

fn class_names(el: &Element) -> Vec<String> {
    let list = el.class_list();
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

fn text_of(el: &Element, selector: &str) -> Option<String> {
    el.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|n| n.text_content())
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
}

fn register(ui: &Ui, idx: usize, el: &Element) {
    let names = class_names(el);
    let kind = EntryKind::from_classes(names.iter().map(String::as_str));
    let label = match kind {
        EntryKind::Category => text_of(el, ".category-title"),
        EntryKind::Experience | EntryKind::Project => text_of(el, ".entry-header h4"),
        EntryKind::Mission => Some("Mission Statement".to_owned()),
    }
    .unwrap_or_default();

    ui.session.borrow_mut().entries.push(Entry {
        label,
        kind,
        expanded: false,
    });

    let Some(content) = el.query_selector(".entry-content").ok().flatten() else {
        log::warn!("entry without .entry-content block skipped");
        return;
    };
    set_style(&content, "display", "none");

    // The chevron is the primary control; stop propagation so the header
    // fallback below doesn't double-toggle.
    if let Some(indicator) = el.query_selector(".click-indicator").ok().flatten() {
        let ui = ui.clone();
        let entry_el = el.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            e.stop_propagation();
            toggle(&ui, idx, &entry_el);
        });
        let _ = indicator.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    // Header click as a fallback, ignoring clicks that land on the chevron.
    if let Some(header) = el.query_selector(".entry-header").ok().flatten() {
        let ui = ui.clone();
        let entry_el = el.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            let on_chevron = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(".click-indicator").ok().flatten())
                .is_some();
            if on_chevron {
                return;
            }
            toggle(&ui, idx, &entry_el);
        });
        let _ = header.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

fn toggle(ui: &Ui, idx: usize, el: &Element) {
    // The narration channel is exclusive: silence everything first.
    ui.narrator.stop_all();
    ui.session.borrow_mut().stop_speaking();

    let Some(effect) = ui.session.borrow_mut().toggle_entry(idx) else {
        return;
    };
    let kind = ui.session.borrow().entries[idx].kind;

    match effect {
        EntryToggle::Expanded { narrate } => {
            let _ = el.class_list().add_1("expanded");
            if let Some(content) = el.query_selector(".entry-content").ok().flatten() {
                set_style(&content, "display", "block");
            }
            set_chevron(el, true);
            reveal_content(el, kind);

            let mut spoken = false;
            if ui.settings.speech_enabled && !narrate.is_empty() {
                let session = ui.session.clone();
                spoken = ui.narrator.speak_then(&narrate, move || {
                    session.borrow_mut().finish_speaking(Speaker::Entry(idx));
                });
            }
            if !spoken {
                ui.session.borrow_mut().finish_speaking(Speaker::Entry(idx));
            }
        }
        EntryToggle::Collapsed => {
            let _ = el.class_list().remove_1("expanded");
            if let Some(content) = el.query_selector(".entry-content").ok().flatten() {
                set_style(&content, "display", "none");
            }
            set_chevron(el, false);
            if kind == EntryKind::Mission {
                if let Some(typing) = el.query_selector(".typing-text").ok().flatten() {
                    typing.set_text_content(Some(""));
                }
            }
        }
    }
}

fn reveal_content(el: &Element, kind: EntryKind) {
    match kind {
        EntryKind::Mission => {
            // Full text renders instantly; only the label is narrated.
            if let Some(typing) = el.query_selector(".typing-text").ok().flatten() {
                let body = el.get_attribute("data-content").unwrap_or_default();
                typing.set_text_content(Some(&body));
            }
        }
        EntryKind::Experience | EntryKind::Project => {
            for bullet in child_elements(el, ".experience-bullets li") {
                set_style(&bullet, "opacity", "1");
            }
        }
        EntryKind::Category => {}
    }
}

fn set_chevron(el: &Element, up: bool) {
    if let Some(icon) = el.query_selector(".click-indicator i").ok().flatten() {
        let _ = icon.set_attribute(
            "class",
            if up {
                "fas fa-chevron-up"
            } else {
                "fas fa-chevron-down"
            },
        );
    }
}
