use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_MESSAGE: &str = "For the best experience, open this page in your default browser.";
pub const DEFAULT_BUTTON_TEXT: &str = "Open in Browser";

/// Delay between two redirect strategies.
pub const DEFAULT_ATTEMPT_DELAY: Duration = Duration::from_millis(100);

/// Caller-supplied overrides for [`EscapeConfig`]. Every field is optional;
/// unset fields keep their default.
///
/// Deserializes from camelCase keys (`buttonText`, `showModal`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EscapeOptions {
    pub message: Option<String>,
    pub button_text: Option<String>,
    pub show_modal: Option<bool>,
    pub fallback_url: Option<String>,
    pub force: Option<bool>,
    pub show_quick_instructions: Option<bool>,
    pub debug: Option<bool>,
}

impl EscapeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn button_text(mut self, text: impl Into<String>) -> Self {
        self.button_text = Some(text.into());
        self
    }

    pub fn show_modal(mut self, show: bool) -> Self {
        self.show_modal = Some(show);
        self
    }

    pub fn fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = Some(url.into());
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }

    pub fn show_quick_instructions(mut self, show: bool) -> Self {
        self.show_quick_instructions = Some(show);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Fully resolved escape configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeConfig {
    pub message: String,
    pub button_text: String,
    pub show_modal: bool,
    /// Target URL; the current document URL when `None`.
    pub fallback_url: Option<String>,
    pub force: bool,
    pub show_quick_instructions: bool,
    pub debug: bool,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            show_modal: false,
            fallback_url: None,
            force: false,
            show_quick_instructions: false,
            debug: false,
        }
    }
}

impl EscapeConfig {
    /// Merge `options` over the defaults.
    pub fn merged(options: EscapeOptions) -> Self {
        let d = Self::default();
        Self {
            message: options.message.unwrap_or(d.message),
            button_text: options.button_text.unwrap_or(d.button_text),
            show_modal: options.show_modal.unwrap_or(d.show_modal),
            fallback_url: options.fallback_url.filter(|u| !u.is_empty()),
            force: options.force.unwrap_or(d.force),
            show_quick_instructions: options
                .show_quick_instructions
                .unwrap_or(d.show_quick_instructions),
            debug: options.debug.unwrap_or(d.debug),
        }
    }

    pub fn redirect_options(&self) -> RedirectOptions {
        RedirectOptions {
            debug: self.debug,
            ..RedirectOptions::default()
        }
    }
}

/// Per-call settings for the redirect engine. Passed explicitly into every
/// run, so two concurrent escapes never share a debug flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectOptions {
    pub debug: bool,
    pub attempt_delay: Duration,
}

impl Default for RedirectOptions {
    fn default() -> Self {
        Self {
            debug: false,
            attempt_delay: DEFAULT_ATTEMPT_DELAY,
        }
    }
}
