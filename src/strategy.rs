use std::rc::Rc;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::host::{Host, HostResult, NodeId};
use crate::types::Platform;

/// How long synthesized anchors and forms stay in the document.
pub const DOM_CLEANUP_DELAY: Duration = Duration::from_millis(100);

/// How long the pre-open strategy waits for its blank context before
/// navigating the current one instead.
pub const PREOPEN_FALLBACK_DELAY: Duration = Duration::from_millis(250);

const IOS_BROWSER_SCHEMES: &[(&str, &str)] = &[
    ("https://", "x-safari-https://"),
    ("http://", "x-safari-http://"),
];

/// One way of handing the page to the standalone browser.
///
/// An attempt returning `Ok(true)` means the hand-off was dispatched; nothing
/// in a browser can confirm it actually landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Rewrite `http(s)://` to the scheme iOS routes to the default browser.
    IosBrowserScheme,
    /// Android intent URI with the page as browser fallback.
    AndroidIntent,
    /// `window.open(url, "_blank", "noopener,noreferrer")`.
    OpenBlank,
    /// `window.open(url, "_top")`.
    OpenTop,
    /// Hidden `<a target="_blank">` and a synthetic click.
    AnchorClick,
    /// Hidden GET form submitted to the URL.
    FormSubmit,
    /// Open a blank context first, then point it at the URL.
    PreopenAssign,
    /// Navigate the current context.
    DirectNavigation,
}

/// Ordered strategy list for `platform`: platform-specific first, then the
/// universal ones.
pub fn build_strategies(platform: Platform) -> Vec<Strategy> {
    let mut strategies = Vec::with_capacity(8);
    match platform {
        Platform::Ios => strategies.push(Strategy::IosBrowserScheme),
        Platform::Android => strategies.push(Strategy::AndroidIntent),
        _ => {}
    }
    strategies.extend([
        Strategy::OpenBlank,
        Strategy::OpenTop,
        Strategy::AnchorClick,
        Strategy::FormSubmit,
        Strategy::PreopenAssign,
        Strategy::DirectNavigation,
    ]);
    strategies
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IosBrowserScheme => "ios_browser_scheme",
            Self::AndroidIntent => "android_intent",
            Self::OpenBlank => "open_blank",
            Self::OpenTop => "open_top",
            Self::AnchorClick => "anchor_click",
            Self::FormSubmit => "form_submit",
            Self::PreopenAssign => "preopen_assign",
            Self::DirectNavigation => "direct_navigation",
        }
    }

    /// Dispatch this strategy. `debug` gates logging from deferred work the
    /// strategy leaves behind.
    pub fn attempt<H: Host + 'static>(
        &self,
        host: &Rc<H>,
        url: &str,
        debug: bool,
    ) -> HostResult<bool> {
        match self {
            Self::IosBrowserScheme => match ios_browser_url(url) {
                Some(target) => host.navigate(&target).map(|_| true),
                None => Ok(false),
            },
            Self::AndroidIntent => match android_intent_url(url) {
                Some(target) => host.navigate(&target).map(|_| true),
                None => Ok(false),
            },
            Self::OpenBlank => {
                let Some(window) = host.open_window(url, "_blank", "noopener,noreferrer")? else {
                    return Ok(false);
                };
                if !host.is_window_closed(window) {
                    host.focus_window(window)?;
                }
                Ok(true)
            }
            Self::OpenTop => Ok(host.open_window(url, "_top", "")?.is_some()),
            Self::AnchorClick => {
                let a = host.create_element("a")?;
                host.set_attribute(a, "href", url)?;
                host.set_attribute(a, "target", "_blank")?;
                host.set_attribute(a, "rel", "noopener noreferrer")?;
                host.set_attribute(a, "style", "display:none")?;
                host.append_to_body(a)?;
                let clicked = host.dispatch_click(a);
                remove_later(host, a);
                clicked.map(|_| true)
            }
            Self::FormSubmit => {
                let form = host.create_element("form")?;
                host.set_attribute(form, "method", "GET")?;
                host.set_attribute(form, "action", url)?;
                host.set_attribute(form, "style", "display:none")?;
                host.append_to_body(form)?;
                let submitted = host.submit_form(form);
                remove_later(host, form);
                submitted.map(|_| true)
            }
            Self::PreopenAssign => {
                let fallback_host = Rc::clone(host);
                let fallback_url = url.to_string();
                let fallback = host.set_timeout(
                    PREOPEN_FALLBACK_DELAY,
                    Box::new(move || {
                        if let Err(err) = fallback_host.navigate(&fallback_url) {
                            if debug {
                                tracing::warn!(error = %err, "pre-open fallback navigation failed");
                            }
                        }
                    }),
                );

                // Only an opened context cancels the fallback. A blocked popup
                // leaves it to navigate the current context, which counts as
                // dispatched. An error leaves it armed as well.
                match host.open_window("", "_blank", "")? {
                    Some(window) => {
                        host.assign_window_location(window, url)?;
                        host.clear_timeout(fallback);
                        Ok(true)
                    }
                    None => Ok(true),
                }
            }
            Self::DirectNavigation => host.navigate(url).map(|_| true),
        }
    }
}

fn remove_later<H: Host + 'static>(host: &Rc<H>, node: NodeId) {
    let h = Rc::clone(host);
    host.set_timeout(DOM_CLEANUP_DELAY, Box::new(move || h.remove(node)));
}

/// `https://x` → `x-safari-https://x`. `None` for non-web URLs.
pub(crate) fn ios_browser_url(url: &str) -> Option<String> {
    IOS_BROWSER_SCHEMES.iter().find_map(|(from, to)| {
        let head = url.get(..from.len())?;
        head.eq_ignore_ascii_case(from)
            .then(|| format!("{}{}", to, &url[from.len()..]))
    })
}

/// Intent URI opening `url` in the default browser, with `url` itself as the
/// `browser_fallback_url`. `None` for non-web URLs.
pub(crate) fn android_intent_url(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return None;
    }
    // The intent fragment starts at '#', so the page's own fragment is dropped.
    let rest = rest.split('#').next().unwrap_or_default();
    Some(format!(
        "intent://{rest}#Intent;scheme={scheme};action=android.intent.action.VIEW;S.browser_fallback_url={};end",
        utf8_percent_encode(url, NON_ALPHANUMERIC)
    ))
}
