//! Contracts for the hosting environment.
//!
//! The classifiers and the redirect engine never touch a browser directly;
//! everything goes through these traits so the same logic runs against the
//! real DOM (`WebHost`, `web` feature) and against in-memory test doubles.

use std::{future::Future, pin::Pin, time::Duration};

use crate::error::HostError;
use crate::types::EmbeddingProbe;

/// Object-safe boxed future used by [`Clipboard`] and [`Scheduler`].
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Handle to a DOM node created through [`Dom::create_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Handle to a browsing context opened through [`Navigation::open_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u32);

/// Handle to a pending [`Scheduler::set_timeout`] task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Read-only facts about the current page.
pub trait Environment {
    /// The live User-Agent string.
    fn user_agent(&self) -> String;

    /// URL of the current document.
    fn current_url(&self) -> String;

    /// Top-level API surface of the page; `None` when no live introspection
    /// is possible.
    fn embedding_probe(&self) -> Option<EmbeddingProbe> {
        None
    }
}

/// Moving the user somewhere else.
pub trait Navigation {
    /// Navigate the current browsing context.
    fn navigate(&self, url: &str) -> HostResult<()>;

    /// Open `url` in a browsing context named `target`. `Ok(None)` when the
    /// environment refused (popup blocker, `noopener`).
    fn open_window(&self, url: &str, target: &str, features: &str)
        -> HostResult<Option<WindowHandle>>;

    fn is_window_closed(&self, window: WindowHandle) -> bool;

    fn focus_window(&self, window: WindowHandle) -> HostResult<()>;

    /// Point an already opened context at `url`.
    fn assign_window_location(&self, window: WindowHandle, url: &str) -> HostResult<()>;
}

/// The slice of the DOM the redirect strategies and overlays need.
pub trait Dom {
    fn create_element(&self, tag: &str) -> HostResult<NodeId>;

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> HostResult<()>;

    /// Replace the node's text content (also the value of a fresh `textarea`).
    fn set_text(&self, node: NodeId, text: &str) -> HostResult<()>;

    fn append_child(&self, parent: NodeId, child: NodeId) -> HostResult<()>;

    fn append_to_body(&self, node: NodeId) -> HostResult<()>;

    /// Detach the node (and its subtree). Removing a detached node is a no-op.
    fn remove(&self, node: NodeId);

    /// Dispatch a synthetic user click.
    fn dispatch_click(&self, node: NodeId) -> HostResult<()>;

    fn submit_form(&self, node: NodeId) -> HostResult<()>;

    /// Focus a text field and select its whole content.
    fn select_contents(&self, node: NodeId) -> HostResult<()>;

    /// Legacy synchronous copy of the current selection.
    fn exec_copy(&self) -> HostResult<bool>;

    /// Run `handler` on every click on `node`.
    fn on_click(&self, node: NodeId, handler: Box<dyn Fn()>) -> HostResult<()>;
}

/// Deferred work on the page's event loop.
pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId;

    fn clear_timeout(&self, timer: TimerId);

    /// Drive `future` to completion in the background.
    fn spawn_local(&self, future: HostFuture<'static, ()>);
}

/// The modern asynchronous clipboard API.
pub trait Clipboard {
    fn write_text<'a>(&'a self, text: &'a str) -> HostFuture<'a, HostResult<()>>;
}

/// Everything the escape engine needs from its environment.
pub trait Host: Environment + Navigation + Dom + Scheduler + Clipboard {}

impl<T> Host for T where T: Environment + Navigation + Dom + Scheduler + Clipboard {}
