use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;
use web_sys::Document;

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

/// Id of the optional `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "siteConfig";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Element hooks, class names and copy the page script binds to.
///
/// Every field has a default matching the production markup, so the
/// override blob only needs the keys a page variant changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub index_filename: String,
    pub home_hrefs: Vec<String>,

    pub nav_link_selector: String,
    pub active_class: String,
    pub header_selector: String,
    pub header_offset_min: f64,
    pub header_offset_max: f64,

    pub mobile_toggle_id: String,
    pub mobile_nav_id: String,
    pub mobile_link_selector: String,

    pub faq_item_selector: String,
    pub faq_trigger_selector: String,
    pub faq_panel_selector: String,
    pub faq_open_class: String,

    pub contact_form_id: String,
    pub name_field_id: String,
    pub email_field_id: String,
    pub message_field_id: String,
    pub feedback_id: String,
    pub toast_root_id: String,
    pub toast_lifetime_ms: u32,
    pub sending_label: String,
    pub sent_message: String,
    pub rejected_message: String,
    pub network_error_message: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            index_filename: "index.html".to_string(),
            home_hrefs: ["/", "./", "index.html", "./index.html", "/index.html", "#", "#home", "#top"]
                .iter()
                .map(|s| s.to_string())
                .collect(),

            nav_link_selector: ".nav-link".to_string(),
            active_class: "active".to_string(),
            header_selector: "header".to_string(),
            header_offset_min: 70.0,
            header_offset_max: 160.0,

            mobile_toggle_id: "mobileToggle".to_string(),
            mobile_nav_id: "mobileNav".to_string(),
            mobile_link_selector: ".mobile-nav".to_string(),

            faq_item_selector: ".faq-item".to_string(),
            faq_trigger_selector: ".faq-btn".to_string(),
            faq_panel_selector: ".faq-panel".to_string(),
            faq_open_class: "faq-open".to_string(),

            contact_form_id: "contactForm".to_string(),
            name_field_id: "name".to_string(),
            email_field_id: "email".to_string(),
            message_field_id: "message".to_string(),
            feedback_id: "formFeedback".to_string(),
            toast_root_id: "toastRoot".to_string(),
            toast_lifetime_ms: 3000,
            sending_label: "Sending...".to_string(),
            sent_message: "Message sent — we will get back to you shortly!".to_string(),
            rejected_message: "Could not send your message. Please try again.".to_string(),
            network_error_message: "Network error. Please check your connection and try again."
                .to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config.with_sane_header_bounds())
    }

    /// The header bias is clamped between these bounds on every scroll
    /// frame, so an inverted or non-finite pair falls back to the defaults.
    fn with_sane_header_bounds(mut self) -> Self {
        let (min, max) = (self.header_offset_min, self.header_offset_max);
        if !(min.is_finite() && max.is_finite() && min <= max) {
            let defaults = Self::default();
            warn!(
                "Ignoring header offset bounds {}..{}, using {}..{}",
                min, max, defaults.header_offset_min, defaults.header_offset_max
            );
            self.header_offset_min = defaults.header_offset_min;
            self.header_offset_max = defaults.header_offset_max;
        }
        self
    }

    /// Reads the override blob from the page, falling back to defaults when
    /// it is absent or malformed.
    pub fn load(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty());

        match raw {
            Some(raw) => match Self::from_json(&raw) {
                Ok(config) => {
                    info!("Loaded site config overrides");
                    config
                }
                Err(e) => {
                    warn!("{}, using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Endpoint used when the contact form carries no `action`.
    pub fn contact_fallback_url(&self) -> String {
        format!("{}/api/contact", get_backend_url())
    }
}
