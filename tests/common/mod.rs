//! In-memory [`Host`] used by the integration tests: an arena DOM, a virtual
//! clock driving `set_timeout`, a scripted clipboard and a navigation log.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use inapp_escape::host::*;
use inapp_escape::{EmbeddingProbe, HostError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    Detached,
    Body,
    Node(NodeId),
}

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub parent: Parent,
}

impl FakeNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedWindow {
    pub url: String,
    pub target: String,
    pub features: String,
    pub location: String,
}

struct Timer {
    due: Duration,
    task: Option<Box<dyn FnOnce()>>,
}

pub struct FakeHost {
    pub user_agent: RefCell<String>,
    pub url: RefCell<String>,
    pub probe: Cell<Option<EmbeddingProbe>>,

    /// Navigations that went through, in order.
    pub navigations: RefCell<Vec<String>>,
    /// Navigations to URLs starting with one of these prefixes fail.
    pub refused_prefixes: RefCell<Vec<String>>,

    /// Whether `window.open` hands back a context.
    pub popups_allowed: Cell<bool>,
    pub opened: RefCell<Vec<OpenedWindow>>,
    pub focused: RefCell<Vec<WindowHandle>>,
    /// Makes `assign_window_location` fail.
    pub assign_fails: Cell<bool>,

    next_node: Cell<u32>,
    pub nodes: RefCell<BTreeMap<NodeId, FakeNode>>,
    handlers: RefCell<HashMap<NodeId, Vec<Rc<dyn Fn()>>>>,
    pub dispatched_clicks: RefCell<Vec<NodeId>>,
    pub submitted_forms: RefCell<Vec<NodeId>>,
    pub selected: RefCell<Vec<NodeId>>,
    /// Text fields that were selected, with their content at selection time.
    pub selected_text: RefCell<Vec<String>>,
    pub exec_copy_result: RefCell<HostResult<bool>>,
    pub exec_copy_calls: Cell<usize>,

    pub clipboard_accepts: Cell<bool>,
    pub clipboard_writes: RefCell<Vec<String>>,

    now: Cell<Duration>,
    timers: RefCell<Vec<Timer>>,
    spawned: RefCell<Vec<HostFuture<'static, ()>>>,
}

impl FakeHost {
    pub fn new(user_agent: &str) -> Rc<Self> {
        Rc::new(Self {
            user_agent: RefCell::new(user_agent.to_string()),
            url: RefCell::new("https://example.com/page?ref=share".to_string()),
            probe: Cell::new(None),
            navigations: RefCell::default(),
            refused_prefixes: RefCell::default(),
            popups_allowed: Cell::new(false),
            opened: RefCell::default(),
            focused: RefCell::default(),
            assign_fails: Cell::new(false),
            next_node: Cell::new(1),
            nodes: RefCell::default(),
            handlers: RefCell::default(),
            dispatched_clicks: RefCell::default(),
            submitted_forms: RefCell::default(),
            selected: RefCell::default(),
            selected_text: RefCell::default(),
            exec_copy_result: RefCell::new(Ok(true)),
            exec_copy_calls: Cell::new(0),
            clipboard_accepts: Cell::new(true),
            clipboard_writes: RefCell::default(),
            now: Cell::new(Duration::ZERO),
            timers: RefCell::default(),
            spawned: RefCell::default(),
        })
    }

    pub fn refuse_navigation_to(&self, prefix: &str) {
        self.refused_prefixes.borrow_mut().push(prefix.to_string());
    }

    // -- clock ---------------------------------------------------------------

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().iter().filter(|t| t.task.is_some()).count()
    }

    /// Fire every timer due within `by`, in due order, moving the clock.
    pub fn advance(&self, by: Duration) {
        let limit = self.now.get() + by;
        while let Some(task) = self.take_next_due(limit) {
            task();
        }
        self.now.set(limit);
    }

    /// Fire timers until none are left.
    pub fn run_until_idle(&self) {
        while let Some(task) = self.take_next_due(Duration::MAX) {
            task();
        }
    }

    fn take_next_due(&self, limit: Duration) -> Option<Box<dyn FnOnce()>> {
        let mut timers = self.timers.borrow_mut();
        let (idx, due) = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.task.is_some() && t.due <= limit)
            .min_by_key(|(i, t)| (t.due, *i))
            .map(|(i, t)| (i, t.due))?;
        self.now.set(due);
        timers[idx].task.take()
    }

    /// Run every spawned future to completion.
    pub fn run_spawned(&self) {
        let futures: Vec<_> = self.spawned.borrow_mut().drain(..).collect();
        for fut in futures {
            futures::executor::block_on(fut);
        }
    }

    // -- DOM queries ---------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<FakeNode> {
        self.nodes.borrow().get(&id).cloned()
    }

    /// Nodes attached directly to `<body>`.
    pub fn body_children(&self) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(_, n)| n.parent == Parent::Body)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(_, n)| n.parent == Parent::Node(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    /// `root` and everything below it, depth first.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = vec![root];
        for child in self.children(root) {
            out.extend(self.subtree(child));
        }
        out
    }

    pub fn subtree_text(&self, root: NodeId) -> String {
        self.subtree(root)
            .into_iter()
            .filter_map(|id| self.node(id))
            .map(|n| n.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn find_in(&self, root: NodeId, attr: &str, value: &str) -> Option<NodeId> {
        self.subtree(root)
            .into_iter()
            .find(|id| self.node(*id).is_some_and(|n| n.attr(attr) == Some(value)))
    }

    pub fn body_children_with(&self, attr: &str, value: &str) -> Vec<NodeId> {
        self.body_children()
            .into_iter()
            .filter(|id| self.node(*id).is_some_and(|n| n.attr(attr) == Some(value)))
            .collect()
    }

    /// Simulate a user click: run the registered handlers.
    pub fn click(&self, node: NodeId) {
        let handlers: Vec<Rc<dyn Fn()>> = self
            .handlers
            .borrow()
            .get(&node)
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler();
        }
    }
}

impl Environment for FakeHost {
    fn user_agent(&self) -> String {
        self.user_agent.borrow().clone()
    }

    fn current_url(&self) -> String {
        self.url.borrow().clone()
    }

    fn embedding_probe(&self) -> Option<EmbeddingProbe> {
        self.probe.get()
    }
}

impl Navigation for FakeHost {
    fn navigate(&self, url: &str) -> HostResult<()> {
        if self
            .refused_prefixes
            .borrow()
            .iter()
            .any(|p| url.starts_with(p.as_str()))
        {
            return Err(HostError::new("navigate", format!("no handler for {url}")));
        }
        self.navigations.borrow_mut().push(url.to_string());
        Ok(())
    }

    fn open_window(&self, url: &str, target: &str, features: &str) -> HostResult<Option<WindowHandle>> {
        if !self.popups_allowed.get() {
            return Ok(None);
        }
        let mut opened = self.opened.borrow_mut();
        opened.push(OpenedWindow {
            url: url.to_string(),
            target: target.to_string(),
            features: features.to_string(),
            location: url.to_string(),
        });
        Ok(Some(WindowHandle(opened.len() as u32 - 1)))
    }

    fn is_window_closed(&self, window: WindowHandle) -> bool {
        self.opened.borrow().get(window.0 as usize).is_none()
    }

    fn focus_window(&self, window: WindowHandle) -> HostResult<()> {
        self.focused.borrow_mut().push(window);
        Ok(())
    }

    fn assign_window_location(&self, window: WindowHandle, url: &str) -> HostResult<()> {
        if self.assign_fails.get() {
            return Err(HostError::new("assign_window_location", "SecurityError"));
        }
        match self.opened.borrow_mut().get_mut(window.0 as usize) {
            Some(w) => {
                w.location = url.to_string();
                Ok(())
            }
            None => Err(HostError::new("assign_window_location", "closed")),
        }
    }
}

impl Dom for FakeHost {
    fn create_element(&self, tag: &str) -> HostResult<NodeId> {
        let id = NodeId(self.next_node.get());
        self.next_node.set(id.0 + 1);
        self.nodes.borrow_mut().insert(
            id,
            FakeNode {
                tag: tag.to_string(),
                attributes: Vec::new(),
                text: String::new(),
                parent: Parent::Detached,
            },
        );
        Ok(id)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> HostResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        let n = nodes
            .get_mut(&node)
            .ok_or_else(|| HostError::new("set_attribute", "unknown node"))?;
        n.attributes.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_text(&self, node: NodeId, text: &str) -> HostResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        let n = nodes
            .get_mut(&node)
            .ok_or_else(|| HostError::new("set_text", "unknown node"))?;
        n.text = text.to_string();
        Ok(())
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> HostResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains_key(&parent) {
            return Err(HostError::new("append_child", "unknown parent"));
        }
        let n = nodes
            .get_mut(&child)
            .ok_or_else(|| HostError::new("append_child", "unknown node"))?;
        n.parent = Parent::Node(parent);
        Ok(())
    }

    fn append_to_body(&self, node: NodeId) -> HostResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        let n = nodes
            .get_mut(&node)
            .ok_or_else(|| HostError::new("append_to_body", "unknown node"))?;
        n.parent = Parent::Body;
        Ok(())
    }

    fn remove(&self, node: NodeId) {
        for id in self.subtree(node) {
            self.nodes.borrow_mut().remove(&id);
            self.handlers.borrow_mut().remove(&id);
        }
    }

    fn dispatch_click(&self, node: NodeId) -> HostResult<()> {
        if !self.nodes.borrow().contains_key(&node) {
            return Err(HostError::new("dispatch_click", "unknown node"));
        }
        self.dispatched_clicks.borrow_mut().push(node);
        Ok(())
    }

    fn submit_form(&self, node: NodeId) -> HostResult<()> {
        match self.node(node) {
            Some(n) if n.tag == "form" => {
                self.submitted_forms.borrow_mut().push(node);
                Ok(())
            }
            _ => Err(HostError::new("submit_form", "not a form")),
        }
    }

    fn select_contents(&self, node: NodeId) -> HostResult<()> {
        let n = self
            .node(node)
            .ok_or_else(|| HostError::new("select_contents", "unknown node"))?;
        self.selected.borrow_mut().push(node);
        self.selected_text.borrow_mut().push(n.text);
        Ok(())
    }

    fn exec_copy(&self) -> HostResult<bool> {
        self.exec_copy_calls.set(self.exec_copy_calls.get() + 1);
        self.exec_copy_result.borrow().clone()
    }

    fn on_click(&self, node: NodeId, handler: Box<dyn Fn()>) -> HostResult<()> {
        self.handlers
            .borrow_mut()
            .entry(node)
            .or_default()
            .push(Rc::from(handler));
        Ok(())
    }
}

impl Scheduler for FakeHost {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        let mut timers = self.timers.borrow_mut();
        timers.push(Timer {
            due: self.now.get() + delay,
            task: Some(task),
        });
        TimerId(timers.len() as u32 - 1)
    }

    fn clear_timeout(&self, timer: TimerId) {
        if let Some(t) = self.timers.borrow_mut().get_mut(timer.0 as usize) {
            t.task = None;
        }
    }

    fn spawn_local(&self, future: HostFuture<'static, ()>) {
        self.spawned.borrow_mut().push(future);
    }
}

impl Clipboard for FakeHost {
    fn write_text<'a>(&'a self, text: &'a str) -> HostFuture<'a, HostResult<()>> {
        Box::pin(async move {
            if self.clipboard_accepts.get() {
                self.clipboard_writes.borrow_mut().push(text.to_string());
                Ok(())
            } else {
                Err(HostError::new("clipboard_write", "NotAllowedError"))
            }
        })
    }
}
