use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use web_sys::{Document, Element, Event, Window};

use super::active::{ActiveLinks, NavLink, PageIdentity};
use super::spy::{FrameGate, HeaderBounds, ScrollSpy, SpyDecision};
use crate::config::SiteConfig;
use crate::dom;

/// Nav link highlighting for one page load: the active-link model, the
/// scroll spy built on top of it and the anchors they render to.
struct Highlighter {
    window: Window,
    document: Document,
    anchors: Vec<Element>,
    links: ActiveLinks,
    spy: ScrollSpy,
    header_selector: String,
    header_bounds: HeaderBounds,
    active_class: String,
}

impl Highlighter {
    fn render(&self) {
        for (anchor, link) in self.anchors.iter().zip(self.links.links()) {
            dom::set_class(anchor, &self.active_class, link.is_active);
            match link.aria_current() {
                Some(token) => {
                    let _ = anchor.set_attribute("aria-current", token);
                }
                None => {
                    let _ = anchor.remove_attribute("aria-current");
                }
            }
        }
    }

    fn header_offset(&self) -> f64 {
        let height = self
            .document
            .query_selector(&self.header_selector)
            .ok()
            .flatten()
            .map(|header| header.get_bounding_client_rect().height());
        self.header_bounds.offset(height)
    }

    fn rebuild(&mut self) {
        let window = &self.window;
        let document = &self.document;
        self.spy.rebuild(self.links.links(), |id| {
            document
                .get_element_by_id(id)
                .map(|section| dom::document_top(window, &section))
        });
        debug!(
            "Scroll spy tracking {:?}",
            self.spy
                .targets()
                .iter()
                .map(|t| (t.id.as_str(), t.top_offset, t.linked.len()))
                .collect::<Vec<_>>()
        );
    }

    fn evaluate(&mut self) {
        let scroll_y = dom::scroll_y(&self.window);
        match self.spy.evaluate(scroll_y, self.header_offset()) {
            SpyDecision::Section(id) => {
                self.links.activate_by_section_id(&id);
            }
            SpyDecision::Fallback => {
                self.links.activate_by_fallback();
            }
        }
        self.render();
    }

    fn activate_by_fallback(&mut self) {
        let count = self.links.activate_by_fallback();
        debug!("Page fallback activated {} links", count);
        self.render();
    }

    fn activate_clicked(&mut self, index: usize) {
        self.links.activate_index(index);
        self.render();
    }
}

/// Schedules an evaluation on the next frame unless one is already pending.
fn schedule(highlighter: &Rc<RefCell<Highlighter>>, gate: &Rc<FrameGate>) {
    if !gate.request() {
        return;
    }
    let window = highlighter.borrow().window.clone();
    let highlighter = highlighter.clone();
    let gate = gate.clone();
    dom::on_next_frame(&window, move || {
        gate.release();
        highlighter.borrow_mut().evaluate();
    });
}

pub fn bind(window: &Window, document: &Document, config: &SiteConfig) {
    let anchors = dom::query_all(document, &config.nav_link_selector);
    if anchors.is_empty() {
        debug!("No nav links on this page");
        return;
    }

    let location = window.location();
    let href = location.href().unwrap_or_default();
    let path = location.pathname().unwrap_or_default();
    let links: Vec<NavLink> = anchors
        .iter()
        .map(|anchor| NavLink::new(anchor.get_attribute("href"), &href, &config.index_filename))
        .collect();
    let page = PageIdentity::from_path(&path, &config.index_filename);
    let ignored = links.iter().filter(|link| link.target.is_empty()).count();
    info!(
        "Nav highlighting bound with {} links on {} ({} without a target)",
        links.len(),
        page.filename,
        ignored
    );

    let highlighter = Rc::new(RefCell::new(Highlighter {
        window: window.clone(),
        document: document.clone(),
        anchors: anchors.clone(),
        links: ActiveLinks::new(links, page, config.home_hrefs.clone()),
        spy: ScrollSpy::default(),
        header_selector: config.header_selector.clone(),
        header_bounds: HeaderBounds {
            min: config.header_offset_min,
            max: config.header_offset_max,
        },
        active_class: config.active_class.clone(),
    }));
    let gate = Rc::new(FrameGate::default());

    // Page identity first, then the spy takes over.
    highlighter.borrow_mut().activate_by_fallback();
    {
        let mut h = highlighter.borrow_mut();
        h.rebuild();
        h.evaluate();
    }

    for (index, anchor) in anchors.iter().enumerate() {
        let highlighter = highlighter.clone();
        dom::listen(anchor, "click", move |_: Event| {
            highlighter.borrow_mut().activate_clicked(index);
        });
    }

    {
        let highlighter = highlighter.clone();
        let gate = gate.clone();
        dom::listen_passive(window, "scroll", move |_: Event| {
            schedule(&highlighter, &gate);
        });
    }

    for event in ["load", "resize", "hashchange"] {
        let highlighter = highlighter.clone();
        let gate = gate.clone();
        let listener = move |_: Event| {
            highlighter.borrow_mut().rebuild();
            schedule(&highlighter, &gate);
        };
        if event == "resize" {
            dom::listen_passive(window, event, listener);
        } else {
            dom::listen(window, event, listener);
        }
    }
}
