use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent};

use crate::config::SiteConfig;
use crate::dom;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MobileNavState {
    #[default]
    Collapsed,
    Expanded,
}

impl MobileNavState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Self::Expanded
    }

    pub fn aria_expanded(self) -> &'static str {
        if self.is_expanded() { "true" } else { "false" }
    }

    pub fn aria_hidden(self) -> &'static str {
        if self.is_expanded() { "false" } else { "true" }
    }

    pub fn display(self) -> &'static str {
        if self.is_expanded() { "block" } else { "none" }
    }
}

/// Keys that activate the toggle from the keyboard.
pub fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

struct MobileNav {
    state: MobileNavState,
    toggle: Element,
    panel: Element,
}

impl MobileNav {
    fn set(&mut self, state: MobileNavState) {
        self.state = state;
        self.render();
    }

    fn render(&self) {
        let _ = self.toggle.set_attribute("aria-expanded", self.state.aria_expanded());
        let _ = self.panel.set_attribute("aria-hidden", self.state.aria_hidden());
        if let Some(panel) = self.panel.dyn_ref::<HtmlElement>() {
            let _ = panel.style().set_property("display", self.state.display());
        }
    }
}

/// Wires the burger toggle and the mobile links. Does nothing when either
/// the toggle or the panel is missing.
pub fn bind(document: &Document, config: &SiteConfig) {
    let (toggle, panel) = match (
        document.get_element_by_id(&config.mobile_toggle_id),
        document.get_element_by_id(&config.mobile_nav_id),
    ) {
        (Some(toggle), Some(panel)) => (toggle, panel),
        _ => {
            debug!("No mobile nav on this page");
            return;
        }
    };

    let nav = Rc::new(RefCell::new(MobileNav {
        state: MobileNavState::Collapsed,
        toggle: toggle.clone(),
        panel,
    }));
    nav.borrow().render();

    {
        let nav = nav.clone();
        dom::listen(&toggle, "click", move |e: Event| {
            e.prevent_default();
            let mut nav = nav.borrow_mut();
            let next = nav.state.toggled();
            debug!("Mobile nav -> {:?}", next);
            nav.set(next);
        });
    }

    {
        let nav = nav.clone();
        dom::listen(&toggle, "keydown", move |e: Event| {
            let Some(key_event) = e.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if is_activation_key(&key_event.key()) {
                // Stops the native button click so the toggle flips once.
                e.prevent_default();
                let mut nav = nav.borrow_mut();
                let next = nav.state.toggled();
                nav.set(next);
            }
        });
    }

    let links = dom::query_all(document, &config.mobile_link_selector);
    info!("Mobile nav bound with {} links", links.len());
    for link in links {
        let nav = nav.clone();
        dom::listen(&link, "click", move |_: Event| {
            nav.borrow_mut().set(MobileNavState::Collapsed);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_from_collapsed_expands() {
        let state = MobileNavState::default();
        assert_eq!(state, MobileNavState::Collapsed);
        let expanded = state.toggled();
        assert_eq!(expanded, MobileNavState::Expanded);
        assert_eq!(expanded.aria_expanded(), "true");
        assert_eq!(expanded.aria_hidden(), "false");
        assert_eq!(expanded.display(), "block");
    }

    #[test]
    fn toggle_from_expanded_collapses() {
        let collapsed = MobileNavState::Expanded.toggled();
        assert_eq!(collapsed, MobileNavState::Collapsed);
        assert_eq!(collapsed.aria_expanded(), "false");
        assert_eq!(collapsed.aria_hidden(), "true");
        assert_eq!(collapsed.display(), "none");
    }

    #[test]
    fn only_enter_and_space_activate() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Escape"));
        assert!(!is_activation_key("Tab"));
    }
}
