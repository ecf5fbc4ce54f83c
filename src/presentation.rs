//! Minimal DOM rendering for the modal and the quick-instructions overlay.

use std::rc::Rc;
use std::time::Duration;

use crate::host::{Host, HostResult, NodeId};
use crate::types::Platform;

/// Attribute marking the root node of everything this crate renders.
pub const ROOT_ATTRIBUTE: &str = "data-inapp-escape";

/// How long the quick-instructions overlay stays up.
pub const INSTRUCTIONS_TIMEOUT: Duration = Duration::from_secs(4);

const BACKDROP_STYLE: &str = "position:fixed;inset:0;z-index:2147483647;display:flex;\
    align-items:center;justify-content:center;background:rgba(0,0,0,0.6);font-family:sans-serif";
const DIALOG_STYLE: &str = "position:relative;max-width:320px;margin:16px;padding:24px;\
    border-radius:12px;background:#fff;color:#111;text-align:center";
const ACTION_STYLE: &str = "margin-top:16px;padding:12px 20px;border:0;border-radius:8px;\
    background:#0a66ff;color:#fff;font-size:16px";
const CLOSE_STYLE: &str = "position:absolute;top:8px;right:8px;border:0;background:none;font-size:20px";
const INSTRUCTIONS_STYLE: &str = "position:fixed;left:16px;right:16px;bottom:24px;z-index:2147483647;\
    padding:12px 16px;border-radius:8px;background:rgba(0,0,0,0.85);color:#fff;\
    font-family:sans-serif;text-align:center";

/// Hint shown after a programmatic redirect, for when nothing visibly happened.
pub fn instructions_for(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => "If nothing happened, tap the \u{2022}\u{2022}\u{2022} menu and choose \"Open in Safari\".",
        Platform::Android => {
            "If nothing happened, tap the \u{22ee} menu and choose \"Open in browser\"."
        }
        _ => "If nothing happened, use the app's menu to open this page in your browser.",
    }
}

/// Render the modal and wire its buttons. Returns the modal's root node.
///
/// `on_action` runs when the action button is clicked, after which the modal
/// removes itself; the close button only removes the modal.
pub fn show_modal<H: Host + 'static>(
    host: &Rc<H>,
    message: &str,
    button_text: &str,
    on_action: Box<dyn Fn()>,
) -> HostResult<NodeId> {
    let root = host.create_element("div")?;
    host.set_attribute(root, ROOT_ATTRIBUTE, "modal")?;
    host.set_attribute(root, "role", "dialog")?;
    host.set_attribute(root, "aria-modal", "true")?;
    host.set_attribute(root, "style", BACKDROP_STYLE)?;

    let dialog = host.create_element("div")?;
    host.set_attribute(dialog, "style", DIALOG_STYLE)?;
    host.append_child(root, dialog)?;

    let close = host.create_element("button")?;
    host.set_attribute(close, ROOT_ATTRIBUTE, "close")?;
    host.set_attribute(close, "aria-label", "Close")?;
    host.set_attribute(close, "style", CLOSE_STYLE)?;
    host.set_text(close, "\u{d7}")?;
    host.append_child(dialog, close)?;

    let text = host.create_element("p")?;
    host.set_text(text, message)?;
    host.append_child(dialog, text)?;

    let action = host.create_element("button")?;
    host.set_attribute(action, ROOT_ATTRIBUTE, "action")?;
    host.set_attribute(action, "style", ACTION_STYLE)?;
    host.set_text(action, button_text)?;
    host.append_child(dialog, action)?;

    let h = Rc::clone(host);
    host.on_click(
        action,
        Box::new(move || {
            on_action();
            h.remove(root);
        }),
    )?;

    let h = Rc::clone(host);
    host.on_click(close, Box::new(move || h.remove(root)))?;

    host.append_to_body(root)?;
    Ok(root)
}

/// Short-lived overlay telling the user how to leave the app by hand.
pub fn show_quick_instructions<H: Host + 'static>(
    host: &Rc<H>,
    platform: Platform,
) -> HostResult<NodeId> {
    let overlay = host.create_element("div")?;
    host.set_attribute(overlay, ROOT_ATTRIBUTE, "instructions")?;
    host.set_attribute(overlay, "role", "status")?;
    host.set_attribute(overlay, "style", INSTRUCTIONS_STYLE)?;
    host.set_text(overlay, instructions_for(platform))?;
    host.append_to_body(overlay)?;

    let h = Rc::clone(host);
    host.set_timeout(INSTRUCTIONS_TIMEOUT, Box::new(move || h.remove(overlay)));
    Ok(overlay)
}
