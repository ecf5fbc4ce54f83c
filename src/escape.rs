use std::rc::Rc;

use crate::clipboard::copy_text;
use crate::detector::InAppDetector;
use crate::host::Host;
use crate::presentation;
use crate::redirect::perform_redirect;
use crate::types::{BrowserSnapshot, EscapeConfig, EscapeOptions};

/// Public entry point: classifies the live page and, when it runs inside an
/// in-app browser, moves the user to the standalone one.
pub struct Escaper<'d, H> {
    host: Rc<H>,
    detector: &'d InAppDetector,
}

impl<H: Host + 'static> Escaper<'static, H> {
    /// Escaper using the built-in signature table.
    pub fn new(host: Rc<H>) -> Self {
        Self {
            host,
            detector: InAppDetector::shared(),
        }
    }
}

impl<'d, H: Host + 'static> Escaper<'d, H> {
    pub fn with_detector(host: Rc<H>, detector: &'d InAppDetector) -> Self {
        Self { host, detector }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Classify the current User-Agent. Always recomputed, never cached.
    pub fn analyze(&self) -> BrowserSnapshot {
        self.detector
            .snapshot(&self.host.user_agent(), self.host.embedding_probe())
    }

    pub fn is_in_app_browser(&self) -> bool {
        self.analyze().is_in_app()
    }

    pub fn app_name(&self) -> Option<String> {
        self.analyze().app_name().map(str::to_string)
    }

    /// Try to leave the in-app browser.
    ///
    /// Returns `false` without touching the page when not in an in-app
    /// browser and `force` is unset. Otherwise returns `true` once the escape
    /// has been started: immediately for a redirect, before any user
    /// interaction for the modal.
    pub fn escape(&self, options: EscapeOptions) -> bool {
        let config = EscapeConfig::merged(options);
        let snapshot = self.analyze();
        let debug = config.debug;

        if debug {
            tracing::debug!(
                in_app = snapshot.is_in_app(),
                app = snapshot.app_name().unwrap_or("-"),
                platform = %snapshot.platform(),
                force = config.force,
                "escape requested"
            );
        }

        if !snapshot.is_in_app() && !config.force {
            return false;
        }

        let url = config
            .fallback_url
            .clone()
            .unwrap_or_else(|| self.host.current_url());

        if config.force {
            perform_redirect(&self.host, &url, &snapshot, config.redirect_options());
            self.spawn_copy(url, debug);
            self.quick_instructions(&config, &snapshot);
        } else if config.show_modal {
            if let Err(err) = self.modal(&config, &snapshot, url.clone()) {
                if debug {
                    tracing::warn!(error = %err, "modal unavailable, redirecting directly");
                }
                perform_redirect(&self.host, &url, &snapshot, config.redirect_options());
            }
        } else {
            perform_redirect(&self.host, &url, &snapshot, config.redirect_options());
            self.quick_instructions(&config, &snapshot);
        }
        true
    }

    /// Copy `url` (default: the current document URL) to the clipboard.
    pub async fn copy_url_to_clipboard(&self, url: Option<&str>) -> bool {
        let url = match url {
            Some(url) => url.to_string(),
            None => self.host.current_url(),
        };
        copy_text(&*self.host, &url, false).await
    }

    fn spawn_copy(&self, url: String, debug: bool) {
        let host = Rc::clone(&self.host);
        self.host.spawn_local(Box::pin(async move {
            copy_text(&*host, &url, debug).await;
        }));
    }

    fn quick_instructions(&self, config: &EscapeConfig, snapshot: &BrowserSnapshot) {
        if !config.show_quick_instructions {
            return;
        }
        if let Err(err) = presentation::show_quick_instructions(&self.host, snapshot.platform()) {
            if config.debug {
                tracing::warn!(error = %err, "could not show instructions");
            }
        }
    }

    fn modal(
        &self,
        config: &EscapeConfig,
        snapshot: &BrowserSnapshot,
        url: String,
    ) -> crate::host::HostResult<()> {
        let host = Rc::clone(&self.host);
        let snapshot = snapshot.clone();
        let redirect = config.redirect_options();

        let on_action = Box::new(move || {
            perform_redirect(&host, &url, &snapshot, redirect);
            let copy_host = Rc::clone(&host);
            let copy_url = url.clone();
            host.spawn_local(Box::pin(async move {
                copy_text(&*copy_host, &copy_url, redirect.debug).await;
            }));
        });

        presentation::show_modal(&self.host, &config.message, &config.button_text, on_action)?;
        Ok(())
    }
}
