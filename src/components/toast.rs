use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use web_sys::Document;
use yew::prelude::*;
use yew::AppHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u32,
    pub text: String,
}

/// Live toasts in display order. Toasts are independent: adding one never
/// removes another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u32,
}

impl ToastQueue {
    pub fn push(&mut self, text: impl Into<String>) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.toasts.push(Toast {
            id,
            text: text.into(),
        });
        id
    }

    /// Removes the toast with `id`. Returns false if it was already gone.
    pub fn expire(&mut self, id: u32) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastHostProps {
    pub lifetime_ms: u32,
}

pub enum ToastMsg {
    Show(String),
    Expire(u32),
}

pub struct ToastHost {
    queue: ToastQueue,
}

impl Component for ToastHost {
    type Message = ToastMsg;
    type Properties = ToastHostProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            queue: ToastQueue::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ToastMsg::Show(text) => {
                let id = self.queue.push(text);
                let link = ctx.link().clone();
                // Fire and forget: a toast always lives its full lifetime.
                Timeout::new(ctx.props().lifetime_ms, move || {
                    link.send_message(ToastMsg::Expire(id));
                })
                .forget();
                true
            }
            ToastMsg::Expire(id) => {
                debug!("Toast {} expired", id);
                self.queue.expire(id)
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <>
                { for self.queue.toasts().iter().map(|toast| html! {
                    <div key={toast.id} class="toast" role="status">{ &toast.text }</div>
                }) }
            </>
        }
    }
}

/// Handle used by the page script to raise toasts. Without a toast root on
/// the page every toast is dropped.
#[derive(Clone, Default)]
pub struct Toaster {
    host: Option<Rc<AppHandle<ToastHost>>>,
}

impl Toaster {
    pub fn mount(document: &Document, root_id: &str, lifetime_ms: u32) -> Self {
        let host = document.get_element_by_id(root_id).map(|root| {
            let handle = yew::Renderer::<ToastHost>::with_root_and_props(
                root,
                ToastHostProps { lifetime_ms },
            )
            .render();
            Rc::new(handle)
        });
        if host.is_none() {
            debug!("No toast root on this page");
        }
        Self { host }
    }

    pub fn show(&self, text: &str) {
        match &self.host {
            Some(host) => host.send_message(ToastMsg::Show(text.to_string())),
            None => debug!("Dropping toast: {}", text),
        }
    }
}
