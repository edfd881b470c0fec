//! Thin helpers over `web-sys` shared by the page bindings.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, Window};

/// Attaches `handler` for the lifetime of the page.
///
/// Listeners are never removed: the page script lives as long as the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .is_ok()
    {
        callback.forget();
    }
}

/// Same as [`listen`] but marked passive, for scroll and resize.
pub fn listen_passive<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    if target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .is_ok()
    {
        callback.forget();
    }
}

/// Runs `f` on the next animation frame.
pub fn on_next_frame<F>(window: &Window, f: F)
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(f);
    let _ = window.request_animation_frame(callback.unchecked_ref());
}

/// All elements matching `selector`, in document order. Invalid selectors
/// yield nothing.
pub fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Distance from the top of the document to the top edge of `element`.
pub fn document_top(window: &Window, element: &Element) -> f64 {
    element.get_bounding_client_rect().top() + scroll_y(window)
}

pub fn set_max_height(element: &Element, height: Option<i32>) {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = element.style();
    let _ = match height {
        Some(px) => style.set_property("max-height", &format!("{}px", px)),
        None => style.remove_property("max-height").map(|_| ()),
    };
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}
