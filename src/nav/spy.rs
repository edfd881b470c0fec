use std::cell::Cell;

use super::active::NavLink;

/// Extra pixels added below the header so a section counts as current
/// slightly before its top edge reaches the viewport top.
const LINE_BIAS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpyTarget {
    pub id: String,
    pub top_offset: f64,
    pub linked: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpyDecision {
    Section(String),
    Fallback,
}

/// Bounds for the sticky-header bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for HeaderBounds {
    fn default() -> Self {
        Self { min: 70.0, max: 160.0 }
    }
}

impl HeaderBounds {
    /// `clamp(height + 10, min, max)`, or `min` when the page has no header.
    pub fn offset(&self, measured_header_height: Option<f64>) -> f64 {
        match measured_header_height {
            Some(height) => (height + 10.0).clamp(self.min, self.max),
            None => self.min,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollSpy {
    targets: Vec<SpyTarget>,
}

impl ScrollSpy {
    pub fn targets(&self) -> &[SpyTarget] {
        &self.targets
    }

    /// Replaces the target list. `measure` returns the document-relative top
    /// of the element with the given id, or `None` when it is not on the page.
    pub fn rebuild<M>(&mut self, links: &[NavLink], mut measure: M)
    where
        M: FnMut(&str) -> Option<f64>,
    {
        let mut targets: Vec<SpyTarget> = Vec::new();

        for (index, link) in links.iter().enumerate() {
            let id = link.target.section_id.as_str();
            if id.is_empty() {
                continue;
            }
            if let Some(existing) = targets.iter_mut().find(|t| t.id == id) {
                existing.linked.push(index);
                continue;
            }
            if let Some(top_offset) = measure(id) {
                targets.push(SpyTarget {
                    id: id.to_string(),
                    top_offset,
                    linked: vec![index],
                });
            }
        }

        targets.sort_by(|a, b| a.top_offset.total_cmp(&b.top_offset));
        self.targets = targets;
    }

    /// Last-crossed rule: the last target whose top is at or above the
    /// activation line wins.
    pub fn evaluate(&self, scroll_y: f64, header_offset: f64) -> SpyDecision {
        let line = scroll_y + header_offset + LINE_BIAS;
        self.targets
            .iter()
            .rev()
            .find(|target| target.top_offset <= line)
            .map(|target| SpyDecision::Section(target.id.clone()))
            .unwrap_or(SpyDecision::Fallback)
    }
}

/// Coalesces evaluation requests to at most one per animation frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: Cell<bool>,
}

impl FrameGate {
    /// Returns true when the caller should schedule a frame callback; false
    /// when one is already pending and this request is dropped.
    pub fn request(&self) -> bool {
        !self.pending.replace(true)
    }

    /// Called from the frame callback before evaluating.
    pub fn release(&self) {
        self.pending.set(false);
    }
}
