use gloo_net::http::Request;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use crate::components::toast::Toaster;
use crate::config::SiteConfig;
use crate::dom;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Measured in UTF-16 code units, the way the browser reports a field's length.
const MIN_MESSAGE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter a valid email.")]
    InvalidEmail,
    #[error("Message is too short.")]
    MessageTooShort,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("server rejected the message with status {0}")]
    Rejected(u16),
    #[error("request failed: {0}")]
    Network(String),
}

/// Trimmed contents of the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactInput {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    /// First failing check wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.message.encode_utf16().count() < MIN_MESSAGE_LEN {
            return Err(ValidationError::MessageTooShort);
        }
        Ok(())
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn form_body(&self) -> String {
        [("name", &self.name), ("email", &self.email), ("message", &self.message)]
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Label and enabled state of the submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: Option<String>,
    pub disabled: bool,
}

impl SubmitControl {
    fn read(button: &HtmlButtonElement) -> Self {
        Self {
            label: button.text_content(),
            disabled: button.disabled(),
        }
    }

    fn apply(&self, button: &HtmlButtonElement) {
        button.set_text_content(self.label.as_deref());
        button.set_disabled(self.disabled);
    }

    /// State shown while a request is in flight.
    pub fn sending(sending_label: &str) -> Self {
        Self {
            label: Some(sending_label.to_string()),
            disabled: true,
        }
    }
}

/// What the page does once a submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub reset_form: bool,
    pub toast: String,
    /// Applied to the submit control whatever the outcome.
    pub control: Option<SubmitControl>,
}

/// `before` is the submit control as it was when the request was issued.
pub fn settle(
    result: &Result<(), SubmitError>,
    before: Option<SubmitControl>,
    config: &SiteConfig,
) -> Settlement {
    let (reset_form, toast) = match result {
        Ok(()) => (true, &config.sent_message),
        Err(SubmitError::Rejected(_)) => (false, &config.rejected_message),
        Err(SubmitError::Network(_)) => (false, &config.network_error_message),
    };
    Settlement {
        reset_form,
        toast: toast.clone(),
        control: before,
    }
}

pub async fn submit(endpoint: &str, input: &ContactInput) -> Result<(), SubmitError> {
    let response = Request::post(endpoint)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Accept", "application/json")
        .body(input.form_body())
        .send()
        .await
        .map_err(|e| SubmitError::Network(e.to_string()))?;

    if response.ok() {
        Ok(())
    } else {
        Err(SubmitError::Rejected(response.status()))
    }
}

fn field_value(document: &Document, id: &str) -> String {
    let Some(element) = document.get_element_by_id(id) else {
        return String::new();
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn endpoint_for(form: &HtmlFormElement, config: &SiteConfig) -> String {
    // `action` reflects the page URL when the attribute is missing.
    match form.get_attribute("action") {
        Some(action) if !action.trim().is_empty() => form.action(),
        _ => config.contact_fallback_url(),
    }
}

fn set_feedback(feedback: Option<&Element>, text: &str) {
    if let Some(feedback) = feedback {
        feedback.set_text_content(Some(text));
    }
}

pub fn bind(document: &Document, config: &SiteConfig, toaster: Toaster) {
    let Some(form) = document
        .get_element_by_id(&config.contact_form_id)
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        debug!("No contact form on this page");
        return;
    };
    let feedback = document.get_element_by_id(&config.feedback_id);
    info!("Contact form bound");

    let document = document.clone();
    let config = config.clone();
    let target = form.clone();
    dom::listen(&target, "submit", move |e: Event| {
        e.prevent_default();
        set_feedback(feedback.as_ref(), "");

        let input = ContactInput::new(
            &field_value(&document, &config.name_field_id),
            &field_value(&document, &config.email_field_id),
            &field_value(&document, &config.message_field_id),
        );
        if let Err(e) = input.validate() {
            debug!("Contact form invalid: {:?}", e);
            set_feedback(feedback.as_ref(), &e.to_string());
            return;
        }

        let button = dom::query_in(&form, "button[type=\"submit\"]")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        let before = button.as_ref().map(SubmitControl::read);
        if let Some(button) = &button {
            SubmitControl::sending(&config.sending_label).apply(button);
        }
        let endpoint = endpoint_for(&form, &config);
        let form = form.clone();
        let feedback = feedback.clone();
        let config = config.clone();
        let toaster = toaster.clone();

        spawn_local(async move {
            info!("Submitting contact form to {}", endpoint);

            let result = submit(&endpoint, &input).await;
            if let Err(e) = &result {
                warn!("Contact form submission failed: {}", e);
            }

            let settlement = settle(&result, before, &config);
            if let (Some(button), Some(control)) = (&button, &settlement.control) {
                control.apply(button);
            }
            if settlement.reset_form {
                form.reset();
                set_feedback(feedback.as_ref(), "");
            }
            toaster.show(&settlement.toast);
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, email: &str, message: &str) -> Result<(), ValidationError> {
        ContactInput::new(name, email, message).validate()
    }

    #[test]
    fn missing_name_is_reported_first() {
        let err = check("", "bad", "x").unwrap_err();
        assert_eq!(err.to_string(), "Please enter your name.");
        assert_eq!(check("   ", "a@b.co", "hello there"), Err(ValidationError::MissingName));
    }

    #[test]
    fn invalid_email_is_reported() {
        let err = check("Jo", "bad", "12345678").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email.");
        assert_eq!(check("Jo", "a@b", "12345678"), Err(ValidationError::InvalidEmail));
        assert_eq!(check("Jo", "a b@c.de", "12345678"), Err(ValidationError::InvalidEmail));
        assert_eq!(check("Jo", "a@@b.co", "12345678"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn short_message_is_reported() {
        let err = check("Jo", "a@b.co", "short").unwrap_err();
        assert_eq!(err.to_string(), "Message is too short.");
        assert_eq!(check("Jo", "a@b.co", "  1234567  "), Err(ValidationError::MessageTooShort));
    }

    #[test]
    fn message_length_counts_utf16_units() {
        // Each emoji is two UTF-16 units, so four of them reach the minimum.
        assert_eq!(check("Jo", "a@b.co", "😀😀😀😀"), Ok(()));
        assert_eq!(check("Jo", "a@b.co", "😀😀😀"), Err(ValidationError::MessageTooShort));
        assert_eq!(check("Jo", "a@b.co", "héllo w"), Err(ValidationError::MessageTooShort));
    }

    #[test]
    fn valid_input_passes_with_surrounding_whitespace() {
        assert_eq!(check(" Jo ", " a@b.co ", "hello there"), Ok(()));
        assert_eq!(check("Jo", "a@b.co", "12345678"), Ok(()));
    }

    #[test]
    fn form_body_is_url_encoded() {
        let input = ContactInput::new("Jo Doe", "jo+x@b.co", "hi & bye=ok");
        assert_eq!(
            input.form_body(),
            "name=Jo%20Doe&email=jo%2Bx%40b.co&message=hi%20%26%20bye%3Dok"
        );
    }

    #[test]
    fn success_resets_form_and_confirms() {
        let config = SiteConfig::default();
        let settlement = settle(&Ok(()), None, &config);
        assert!(settlement.reset_form);
        assert_eq!(settlement.toast, config.sent_message);
    }

    #[test]
    fn failures_keep_fields_and_use_distinct_toasts() {
        let config = SiteConfig::default();
        let rejected = settle(&Err(SubmitError::Rejected(500)), None, &config);
        let offline = settle(&Err(SubmitError::Network("offline".into())), None, &config);
        assert!(!rejected.reset_form);
        assert!(!offline.reset_form);
        assert_eq!(rejected.toast, config.rejected_message);
        assert_eq!(offline.toast, config.network_error_message);
        assert_ne!(rejected.toast, offline.toast);
    }

    #[test]
    fn every_outcome_restores_the_submit_control() {
        let config = SiteConfig::default();
        let before = SubmitControl {
            label: Some("Send message".to_string()),
            disabled: false,
        };
        let sending = SubmitControl::sending(&config.sending_label);
        assert_eq!(sending.label.as_deref(), Some("Sending..."));
        assert!(sending.disabled);

        let outcomes = [
            Ok(()),
            Err(SubmitError::Rejected(500)),
            Err(SubmitError::Network("offline".into())),
        ];
        for result in &outcomes {
            let settlement = settle(result, Some(before.clone()), &config);
            assert_eq!(settlement.control.as_ref(), Some(&before), "after {:?}", result);
        }
    }

    #[test]
    fn restore_keeps_a_control_that_was_already_disabled() {
        let before = SubmitControl {
            label: None,
            disabled: true,
        };
        let settlement = settle(&Ok(()), Some(before.clone()), &SiteConfig::default());
        assert_eq!(settlement.control, Some(before));
    }
}
