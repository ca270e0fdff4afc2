//! Decorative effects
//!
//! Floating particles, the name typewriter, the scroll-to-top button and
//! card hover lifts. Purely cosmetic; everything here degrades to nothing.

use std::cell::Cell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::app::{self, Ui, elements, set_style};
use crate::consts::{
    PARTICLE_INTERVAL_MS, PARTICLE_LIFETIME_MS, SCROLL_TOP_THRESHOLD, TYPE_DELAY_MS,
    TYPE_START_DELAY_MS,
};

/// One-time decorations that survive content swaps.
pub fn init_decor(ui: &Ui) {
    if ui.session.borrow().decor_installed {
        return;
    }
    ui.session.borrow_mut().decor_installed = true;

    install_scroll_top(ui);
    if ui.settings.effective_particles() {
        install_particles(ui);
    }
}

/// Content-scoped decorations; re-run after every swap.
pub fn init_content(ui: &Ui) {
    if ui.settings.effective_typewriter() {
        typewriter_name(ui);
    }
    card_hover(ui);
}

fn install_particles(ui: &Ui) {
    inject_keyframes(&ui.document);

    let document = ui.document.clone();
    let mut rng = Pcg32::seed_from_u64(js_sys::Date::now() as u64);
    let tick = move || spawn_particle(&document, &mut rng);
    if app::set_interval(tick, PARTICLE_INTERVAL_MS).is_none() {
        log::warn!("could not start particle timer");
    }
}

fn inject_keyframes(document: &Document) {
    if document.get_element_by_id("particle-keyframes").is_some() {
        return;
    }
    let Ok(style) = document.create_element("style") else {
        return;
    };
    let _ = style.set_attribute("id", "particle-keyframes");
    style.set_text_content(Some(
        "@keyframes particleFloat { \
           0% { transform: translateY(0) rotate(0deg); opacity: 1; } \
           100% { transform: translateY(-100vh) rotate(360deg); opacity: 0; } \
         }",
    ));
    if let Some(head) = document.head() {
        let _ = head.append_child(&style);
    }
}

fn spawn_particle(document: &Document, rng: &mut Pcg32) {
    let Some(body) = document.body() else {
        return;
    };
    let Ok(particle) = document.create_element("div") else {
        return;
    };

    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let x = rng.random_range(0.0..width.max(1.0));

    let style = format!(
        "position: fixed; left: {x:.0}px; bottom: -10px; width: 4px; height: 4px; \
         background: rgba(0, 212, 255, 0.6); border-radius: 50%; pointer-events: none; \
         z-index: 1; animation: particleFloat 6s linear infinite;"
    );
    let _ = particle.set_attribute("style", &style);
    let _ = body.append_child(&particle);

    app::set_timeout(move || particle.remove(), PARTICLE_LIFETIME_MS);
}

fn install_scroll_top(ui: &Ui) {
    if ui.document.get_element_by_id("scrollTopBtn").is_some() {
        return;
    }
    let Some(body) = ui.document.body() else {
        return;
    };
    let Ok(btn) = ui.document.create_element("button") else {
        return;
    };
    let _ = btn.set_attribute("id", "scrollTopBtn");
    btn.set_inner_html(r#"<i class="fas fa-arrow-up"></i>"#);
    let _ = btn.set_attribute(
        "style",
        "position: fixed; bottom: 30px; right: 30px; width: 50px; height: 50px; \
         border-radius: 50%; background: rgba(0, 212, 255, 0.2); \
         border: 2px solid rgba(0, 212, 255, 0.5); color: #00d4ff; cursor: pointer; \
         z-index: 1000; opacity: 0; transition: all 0.3s ease;",
    );
    let _ = body.append_child(&btn);

    // Fade in once the page is scrolled past the threshold.
    {
        let btn = btn.clone();
        let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_e| {
            let offset = web_sys::window()
                .and_then(|w| w.page_y_offset().ok())
                .unwrap_or(0.0);
            set_style(&btn, "opacity", if offset > SCROLL_TOP_THRESHOLD { "1" } else { "0" });
        });
        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("scroll", cb.as_ref().unchecked_ref());
        }
        cb.forget();
    }

    {
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_e: web_sys::MouseEvent| {
            app::scroll_to_top();
        });
        let _ = btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

/// Retype the visitor-facing name one character at a time.
fn typewriter_name(ui: &Ui) {
    let Some(name) = ui.document.query_selector(".name").ok().flatten() else {
        return;
    };
    // Animate each node only once, even across re-init passes.
    if name.get_attribute("data-typed").is_some() {
        return;
    }
    let _ = name.set_attribute("data-typed", "");

    let Some(text) = name.text_content().filter(|t| !t.is_empty()) else {
        return;
    };
    name.set_text_content(Some(""));

    let chars: Vec<char> = text.chars().collect();
    let handle = Rc::new(Cell::new(0i32));

    let tick_handle = handle.clone();
    let mut shown = String::with_capacity(text.len());
    let mut i = 0usize;
    let tick = move || {
        if i < chars.len() {
            shown.push(chars[i]);
            i += 1;
            name.set_text_content(Some(&shown));
        } else if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(tick_handle.get());
        }
    };

    app::set_timeout(
        move || {
            if let Some(id) = app::set_interval(tick, TYPE_DELAY_MS) {
                handle.set(id);
            }
        },
        TYPE_START_DELAY_MS,
    );
}

fn card_hover(ui: &Ui) {
    let selector = ".experience-card, .project-card, .education-card, .contact-card";
    for card in elements(&ui.document, selector) {
        if card.get_attribute("data-hover-bound").is_some() {
            continue;
        }
        let _ = card.set_attribute("data-hover-bound", "");

        {
            let target = card.clone();
            let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(
                move |_e: web_sys::MouseEvent| {
                    set_style(&target, "transform", "translateY(-8px) scale(1.02)");
                    set_style(&target, "box-shadow", "0 15px 35px rgba(0, 212, 255, 0.3)");
                },
            );
            let _ = card.add_event_listener_with_callback("mouseenter", cb.as_ref().unchecked_ref());
            cb.forget();
        }
        {
            let target = card.clone();
            let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(
                move |_e: web_sys::MouseEvent| {
                    set_style(&target, "transform", "translateY(0) scale(1)");
                    set_style(&target, "box-shadow", "none");
                },
            );
            let _ = card.add_event_listener_with_callback("mouseleave", cb.as_ref().unchecked_ref());
            cb.forget();
        }
    }
}
