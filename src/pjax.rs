//! Partial page navigation
//!
//! Same-origin `.html` link clicks are intercepted, the target document is
//! fetched and parsed, and only the main content region is swapped in,
//! keeping the header, nav and audio element alive. Any failure falls back
//! to a normal full navigation of the same URL.

/// Modifier/button state of a click, extracted for testability.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickModifiers {
    pub button: i16,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ClickModifiers {
    /// Plain left click, no shortcut modifiers claiming the navigation.
    pub fn is_plain_left(&self) -> bool {
        self.button == 0 && !self.meta && !self.ctrl && !self.shift && !self.alt
    }
}

/// Whether a link click should be intercepted and fetched in place rather
/// than left to the browser.
pub fn should_intercept(href: &str, origin: &str, target: Option<&str>) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    if href.starts_with("mailto:") || href.starts_with("tel:") {
        return false;
    }
    if href.starts_with("http") && !href.starts_with(origin) {
        return false;
    }
    // Only likely HTML documents; everything else downloads or renders natively.
    if !(href.ends_with(".html") || href.ends_with('/') || href.contains(".html#")) {
        return false;
    }
    // Links aimed at another browsing context keep their default behavior.
    matches!(target, None | Some("") | Some("_self"))
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{DomParser, Element, Response, SupportedType};

    use super::{ClickModifiers, should_intercept};
    use crate::app::{self, Ui};
    use crate::consts::PJAX_SETTLE_MS;

    pub fn init(ui: &Ui) {
        wire_click_delegation(ui);
        wire_popstate(ui);
        log::info!("partial navigation enabled");
    }

    fn wire_click_delegation(ui: &Ui) {
        let handler_ui = ui.clone();
        let cb = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            if e.default_prevented() {
                return;
            }
            let mods = ClickModifiers {
                button: e.button(),
                meta: e.meta_key(),
                ctrl: e.ctrl_key(),
                shift: e.shift_key(),
                alt: e.alt_key(),
            };
            if !mods.is_plain_left() {
                return;
            }
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
            let origin = web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default();
            let target = anchor.get_attribute("target");
            if !should_intercept(&href, &origin, target.as_deref()) {
                return;
            }

            e.prevent_default();
            log::info!("pjax: intercepted {href}");
            let ui = handler_ui.clone();
            spawn_local(async move {
                navigate(ui, href, false).await;
            });
        });
        let _ = ui
            .document
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    fn wire_popstate(ui: &Ui) {
        let handler_ui = ui.clone();
        let cb =
            Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |e: web_sys::PopStateEvent| {
                let url = e.state().as_string().unwrap_or_else(app::current_page);
                let ui = handler_ui.clone();
                spawn_local(async move {
                    navigate(ui, url, true).await;
                });
            });
        if let Some(window) = web_sys::window() {
            let _ =
                window.add_event_listener_with_callback("popstate", cb.as_ref().unchecked_ref());
        }
        cb.forget();
    }

    /// Fetch `url` and swap it into the main content region; any failure
    /// degrades to a full navigation of the same URL.
    pub async fn navigate(ui: Ui, url: String, replace: bool) {
        if let Err(err) = fetch_and_swap(&ui, &url, replace).await {
            log::error!("pjax: navigation failed, falling back to full load: {err:?}");
            full_navigation(&url);
        }
    }

    fn full_navigation(url: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(url);
        }
    }

    async fn fetch_and_swap(ui: &Ui, url: &str, replace: bool) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
        }
        let text = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .ok_or_else(|| JsValue::from_str("non-text body"))?;

        let parser = DomParser::new()?;
        let fetched = parser.parse_from_string(&text, SupportedType::TextHtml)?;

        let new_main = fetched
            .query_selector("main.main-content")
            .ok()
            .flatten()
            .or_else(|| fetched.query_selector(".main-content").ok().flatten())
            .ok_or_else(|| JsValue::from_str("fetched document has no main content"))?;
        let cur_main = ui
            .document
            .query_selector("main.main-content")
            .ok()
            .flatten()
            .or_else(|| ui.document.query_selector(".main-content").ok().flatten())
            .ok_or_else(|| JsValue::from_str("current document has no main content"))?;

        // Full-page responses may carry their own shell audio element; never
        // duplicate it into the live document.
        if let Ok(Some(shell_audio)) = new_main.query_selector("#backgroundAudio") {
            shell_audio.remove();
        }

        cur_main.set_inner_html(&new_main.inner_html());

        if let Ok(Some(container)) = ui.document.query_selector(".container") {
            let _ = container.class_list().remove_1("site-hidden");
        }
        ui.document.set_title(&fetched.title());

        // Everything bound inside the old markup is gone now.
        app::reinit_content(ui);

        // Let the new markup settle before the layout passes; the history
        // entry and the scroll reset come strictly after re-initialization
        // so back/forward never lands on half-wired content.
        let ui = ui.clone();
        let url = url.to_owned();
        app::set_timeout(
            move || {
                crate::nav::init_header_layout(&ui);
                crate::nav::init_mobile(&ui);
                if let Some(window) = web_sys::window() {
                    if let Ok(ev) = web_sys::Event::new("resize") {
                        let _ = window.dispatch_event(&ev);
                    }
                }
                if let Ok(ev) = web_sys::CustomEvent::new("pjax:loaded") {
                    let _ = ui.document.dispatch_event(&ev);
                }
                push_history(&url, replace);
                app::scroll_to_top();
            },
            PJAX_SETTLE_MS,
        );
        Ok(())
    }

    fn push_history(url: &str, replace: bool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(history) = window.history() else {
            log::warn!("pjax: history API unavailable");
            return;
        };
        let state = JsValue::from_str(url);
        let result = if replace {
            history.replace_state_with_url(&state, "", Some(url))
        } else {
            history.push_state_with_url(&state, "", Some(url))
        };
        if let Err(err) = result {
            log::warn!("pjax: history update failed: {err:?}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::{init, navigate};

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://example.com";

    #[test]
    fn test_intercepts_internal_html_links() {
        assert!(should_intercept("about.html", ORIGIN, None));
        assert!(should_intercept("projects/", ORIGIN, None));
        assert!(should_intercept("about.html#experience", ORIGIN, None));
        assert!(should_intercept(
            "https://example.com/about.html",
            ORIGIN,
            None
        ));
    }

    #[test]
    fn test_ignores_anchors_and_protocols() {
        assert!(!should_intercept("#contact", ORIGIN, None));
        assert!(!should_intercept("", ORIGIN, None));
        assert!(!should_intercept("mailto:me@example.com", ORIGIN, None));
        assert!(!should_intercept("tel:+15551234", ORIGIN, None));
    }

    #[test]
    fn test_ignores_external_and_non_html() {
        assert!(!should_intercept("https://other.org/about.html", ORIGIN, None));
        assert!(!should_intercept("resume.pdf", ORIGIN, None));
        assert!(!should_intercept("image.png", ORIGIN, None));
    }

    #[test]
    fn test_respects_link_targets() {
        assert!(!should_intercept("about.html", ORIGIN, Some("_blank")));
        assert!(should_intercept("about.html", ORIGIN, Some("_self")));
        assert!(should_intercept("about.html", ORIGIN, Some("")));
    }

    #[test]
    fn test_modified_clicks_pass_through() {
        assert!(ClickModifiers::default().is_plain_left());
        assert!(
            !ClickModifiers {
                button: 1,
                ..Default::default()
            }
            .is_plain_left()
        );
        assert!(
            !ClickModifiers {
                ctrl: true,
                ..Default::default()
            }
            .is_plain_left()
        );
        assert!(
            !ClickModifiers {
                meta: true,
                ..Default::default()
            }
            .is_plain_left()
        );
        assert!(
            !ClickModifiers {
                shift: true,
                ..Default::default()
            }
            .is_plain_left()
        );
    }
}
