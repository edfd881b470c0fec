use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use web_sys::{Document, Element, Event, Window};

use crate::config::SiteConfig;
use crate::dom;

/// Open flags for the FAQ items. At most one item is open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Vec<bool>,
}

impl Accordion {
    /// Builds the model from the flags found in the markup. If more than
    /// one item arrives open, only the first stays open.
    pub fn from_flags(flags: &[bool]) -> Self {
        let first_open = flags.iter().position(|open| *open);
        Self {
            open: (0..flags.len()).map(|i| Some(i) == first_open).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open.iter().position(|open| *open)
    }

    /// Trigger activation: an open item closes, a closed item opens alone.
    pub fn activate(&mut self, index: usize) {
        let was_open = self.is_open(index);
        for open in &mut self.open {
            *open = false;
        }
        if !was_open {
            if let Some(open) = self.open.get_mut(index) {
                *open = true;
            }
        }
    }
}

struct FaqItem {
    container: Element,
    trigger: Option<Element>,
    panel: Option<Element>,
}

struct Faq {
    model: Accordion,
    items: Vec<FaqItem>,
    open_class: String,
}

impl Faq {
    /// Syncs every item to the model. Open panels are sized to their
    /// content, which is only known after layout.
    fn render(&self) {
        for (index, item) in self.items.iter().enumerate() {
            let open = self.model.is_open(index);
            dom::set_class(&item.container, &self.open_class, open);
            if let Some(trigger) = &item.trigger {
                let _ = trigger.set_attribute("aria-expanded", if open { "true" } else { "false" });
            }
            if let Some(panel) = &item.panel {
                dom::set_max_height(panel, open.then(|| panel.scroll_height()));
            }
        }
    }
}

pub fn bind(window: &Window, document: &Document, config: &SiteConfig) {
    let containers = dom::query_all(document, &config.faq_item_selector);
    if containers.is_empty() {
        debug!("No FAQ items on this page");
        return;
    }

    let items: Vec<FaqItem> = containers
        .into_iter()
        .map(|container| FaqItem {
            trigger: dom::query_in(&container, &config.faq_trigger_selector),
            panel: dom::query_in(&container, &config.faq_panel_selector),
            container,
        })
        .collect();
    let flags: Vec<bool> = items
        .iter()
        .map(|item| item.container.class_list().contains(&config.faq_open_class))
        .collect();

    let faq = Rc::new(RefCell::new(Faq {
        model: Accordion::from_flags(&flags),
        items,
        open_class: config.faq_open_class.clone(),
    }));
    info!("FAQ bound with {} items", faq.borrow().model.len());
    faq.borrow().render();

    let triggers: Vec<(usize, Element)> = faq
        .borrow()
        .items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| item.trigger.clone().map(|t| (i, t)))
        .collect();
    for (index, trigger) in triggers {
        let faq = faq.clone();
        dom::listen(&trigger, "click", move |_: Event| {
            let mut faq = faq.borrow_mut();
            faq.model.activate(index);
            debug!("FAQ open item: {:?}", faq.model.open_index());
            faq.render();
        });
    }

    dom::listen(window, "load", move |_: Event| {
        faq.borrow().render();
    });
}
