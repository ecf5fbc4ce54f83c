//! [`Host`](crate::host::Host) backed by the real browser (`wasm32` + `web` feature).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlDocument, HtmlElement, HtmlFormElement, HtmlTextAreaElement, Window};

use crate::error::HostError;
use crate::host::{
    Clipboard, Dom, Environment, HostFuture, HostResult, Navigation, NodeId, Scheduler, TimerId,
    WindowHandle,
};
use crate::types::EmbeddingProbe;

fn js_err(operation: &'static str) -> impl Fn(JsValue) -> HostError {
    move |err| HostError::new(operation, format!("{err:?}"))
}

/// Browser host. Keeps the elements and windows it created addressable by
/// handle; everything else is read live from `window`.
#[derive(Default)]
pub struct WebHost {
    next_id: Cell<u32>,
    nodes: RefCell<HashMap<u32, Element>>,
    windows: RefCell<HashMap<u32, Window>>,
}

impl WebHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn window(&self, operation: &'static str) -> HostResult<Window> {
        web_sys::window().ok_or_else(|| HostError::new(operation, "no window"))
    }

    fn document(&self, operation: &'static str) -> HostResult<Document> {
        self.window(operation)?
            .document()
            .ok_or_else(|| HostError::new(operation, "no document"))
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn node(&self, node: NodeId, operation: &'static str) -> HostResult<Element> {
        self.nodes
            .borrow()
            .get(&node.0)
            .cloned()
            .ok_or_else(|| HostError::new(operation, "unknown node"))
    }

    fn node_as<T: JsCast>(&self, node: NodeId, operation: &'static str) -> HostResult<T> {
        self.node(node, operation)?
            .dyn_into::<T>()
            .map_err(|_| HostError::new(operation, "unexpected element type"))
    }

    fn opened(&self, window: WindowHandle) -> Option<Window> {
        self.windows.borrow().get(&window.0).cloned()
    }
}

impl Environment for WebHost {
    fn user_agent(&self) -> String {
        web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default()
    }

    fn current_url(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn embedding_probe(&self) -> Option<EmbeddingProbe> {
        let window = web_sys::window()?;
        let top_level_api = js_sys::Reflect::has(&window, &JsValue::from_str("safari")).unwrap_or(false);
        let engine_bridge = js_sys::Reflect::get(&window, &JsValue::from_str("webkit"))
            .ok()
            .filter(|webkit| webkit.is_object())
            .and_then(|webkit| js_sys::Reflect::get(&webkit, &JsValue::from_str("messageHandlers")).ok())
            .is_some_and(|handlers| !handlers.is_undefined() && !handlers.is_null());
        Some(EmbeddingProbe {
            top_level_api,
            engine_bridge,
        })
    }
}

impl Navigation for WebHost {
    fn navigate(&self, url: &str) -> HostResult<()> {
        self.window("navigate")?
            .location()
            .set_href(url)
            .map_err(js_err("navigate"))
    }

    fn open_window(&self, url: &str, target: &str, features: &str) -> HostResult<Option<WindowHandle>> {
        let opened = self
            .window("open_window")?
            .open_with_url_and_target_and_features(url, target, features)
            .map_err(js_err("open_window"))?;
        let mut windows = self.windows.borrow_mut();
        windows.retain(|_, w| !w.closed().unwrap_or(true));
        Ok(opened.map(|w| {
            let id = self.next_id();
            windows.insert(id, w);
            WindowHandle(id)
        }))
    }

    fn is_window_closed(&self, window: WindowHandle) -> bool {
        self.opened(window)
            .map(|w| w.closed().unwrap_or(true))
            .unwrap_or(true)
    }

    fn focus_window(&self, window: WindowHandle) -> HostResult<()> {
        match self.opened(window) {
            Some(w) => w.focus().map_err(js_err("focus_window")),
            None => Err(HostError::new("focus_window", "unknown window")),
        }
    }

    fn assign_window_location(&self, window: WindowHandle, url: &str) -> HostResult<()> {
        match self.opened(window) {
            Some(w) => w.location().set_href(url).map_err(js_err("assign_window_location")),
            None => Err(HostError::new("assign_window_location", "unknown window")),
        }
    }
}

impl Dom for WebHost {
    fn create_element(&self, tag: &str) -> HostResult<NodeId> {
        let element = self
            .document("create_element")?
            .create_element(tag)
            .map_err(js_err("create_element"))?;
        let id = self.next_id();
        self.nodes.borrow_mut().insert(id, element);
        Ok(NodeId(id))
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> HostResult<()> {
        self.node(node, "set_attribute")?
            .set_attribute(name, value)
            .map_err(js_err("set_attribute"))
    }

    fn set_text(&self, node: NodeId, text: &str) -> HostResult<()> {
        let element = self.node(node, "set_text")?;
        match element.dyn_ref::<HtmlTextAreaElement>() {
            Some(field) => field.set_value(text),
            None => element.set_text_content(Some(text)),
        }
        Ok(())
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> HostResult<()> {
        let parent = self.node(parent, "append_child")?;
        let child = self.node(child, "append_child")?;
        parent
            .append_child(&child)
            .map(|_| ())
            .map_err(js_err("append_child"))
    }

    fn append_to_body(&self, node: NodeId) -> HostResult<()> {
        let body = self
            .document("append_to_body")?
            .body()
            .ok_or_else(|| HostError::new("append_to_body", "no body"))?;
        let element = self.node(node, "append_to_body")?;
        body.append_child(&element)
            .map(|_| ())
            .map_err(js_err("append_to_body"))
    }

    fn remove(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(root) = nodes.remove(&node.0) else {
            return;
        };
        // Handles below the removed node are dead too.
        nodes.retain(|_, element| {
            let descendant: &web_sys::Node = element;
            !root.contains(Some(descendant))
        });
        root.remove();
    }

    fn dispatch_click(&self, node: NodeId) -> HostResult<()> {
        self.node_as::<HtmlElement>(node, "dispatch_click")?.click();
        Ok(())
    }

    fn submit_form(&self, node: NodeId) -> HostResult<()> {
        self.node_as::<HtmlFormElement>(node, "submit_form")?
            .submit()
            .map_err(js_err("submit_form"))
    }

    fn select_contents(&self, node: NodeId) -> HostResult<()> {
        let field = self.node_as::<HtmlTextAreaElement>(node, "select_contents")?;
        field.focus().map_err(js_err("select_contents"))?;
        field.select();
        Ok(())
    }

    fn exec_copy(&self) -> HostResult<bool> {
        self.document("exec_copy")?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| HostError::new("exec_copy", "not an HTML document"))?
            .exec_command("copy")
            .map_err(js_err("exec_copy"))
    }

    fn on_click(&self, node: NodeId, handler: Box<dyn Fn()>) -> HostResult<()> {
        let element = self.node(node, "on_click")?;
        let callback = Closure::wrap(handler);
        element
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
            .map_err(js_err("on_click"))?;
        // Lives as long as the page.
        callback.forget();
        Ok(())
    }
}

impl Scheduler for WebHost {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        let Some(window) = web_sys::window() else {
            return TimerId(0);
        };
        let callback: js_sys::Function = Closure::once_into_js(move || task()).unchecked_into();
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&callback, millis)
            .map(|handle| TimerId(handle as u32))
            .unwrap_or(TimerId(0))
    }

    fn clear_timeout(&self, timer: TimerId) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(timer.0 as i32);
        }
    }

    fn spawn_local(&self, future: HostFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(future);
    }
}

impl Clipboard for WebHost {
    fn write_text<'a>(&'a self, text: &'a str) -> HostFuture<'a, HostResult<()>> {
        Box::pin(async move {
            let window = self.window("clipboard_write")?;
            let promise = window.navigator().clipboard().write_text(text);
            wasm_bindgen_futures::JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(js_err("clipboard_write"))
        })
    }
}
