use log::{info, warn, Level};
use web_sys::window;

mod config;
mod contact;
mod dom;
mod faq;
mod links;
mod nav {
    pub mod active;
    pub mod highlight;
    pub mod mobile;
    pub mod spy;
}
mod components {
    pub mod toast;
}

use components::toast::Toaster;
use config::SiteConfig;

#[cfg(debug_assertions)]
const LOG_LEVEL: Level = Level::Debug;

#[cfg(not(debug_assertions))]
const LOG_LEVEL: Level = Level::Info;

/// Binds every interactive feature present on the current page.
fn start() {
    let Some(window) = window() else {
        warn!("No window, nothing to bind");
        return;
    };
    let Some(document) = window.document() else {
        warn!("No document, nothing to bind");
        return;
    };

    let config = SiteConfig::load(&document);

    nav::highlight::bind(&window, &document, &config);
    nav::mobile::bind(&document, &config);
    faq::bind(&window, &document, &config);

    let toaster = Toaster::mount(&document, &config.toast_root_id, config.toast_lifetime_ms);
    contact::bind(&document, &config, toaster);
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(LOG_LEVEL).expect("error initializing log");

    info!("Starting site interactions");
    start();
}
