use std::rc::Rc;

use crate::host::Host;
use crate::strategy::{build_strategies, Strategy};
use crate::types::{BrowserSnapshot, RedirectOptions};

/// Outcome of one [`RedirectSequence::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The strategy dispatched its hand-off; the sequence is finished.
    Dispatched(Strategy),
    /// The strategy declined or failed; try the next one after the delay.
    Retry,
    /// No strategies left.
    Exhausted,
}

/// Sequential executor state: the ordered strategies and the index of the
/// next one to try.
#[derive(Debug, Clone)]
pub struct RedirectSequence {
    url: String,
    strategies: Vec<Strategy>,
    index: usize,
    options: RedirectOptions,
}

impl RedirectSequence {
    pub fn new(url: impl Into<String>, strategies: Vec<Strategy>, options: RedirectOptions) -> Self {
        Self {
            url: url.into(),
            strategies,
            index: 0,
            options,
        }
    }

    /// Sequence for `snapshot`'s platform.
    pub fn for_snapshot(url: impl Into<String>, snapshot: &BrowserSnapshot, options: RedirectOptions) -> Self {
        Self::new(url, build_strategies(snapshot.platform()), options)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Try the strategy at the current index and advance.
    pub fn step<H: Host + 'static>(&mut self, host: &Rc<H>) -> Step {
        let Some(&strategy) = self.strategies.get(self.index) else {
            return Step::Exhausted;
        };
        self.index += 1;

        match strategy.attempt(host, &self.url, self.options.debug) {
            Ok(true) => {
                if self.options.debug {
                    tracing::debug!(strategy = strategy.name(), url = %self.url, "redirect dispatched");
                }
                Step::Dispatched(strategy)
            }
            Ok(false) => {
                if self.options.debug {
                    tracing::debug!(strategy = strategy.name(), "redirect strategy declined");
                }
                Step::Retry
            }
            Err(err) => {
                if self.options.debug {
                    tracing::warn!(strategy = strategy.name(), error = %err, "redirect strategy failed");
                }
                Step::Retry
            }
        }
    }

    /// Unconditional navigation of the current context.
    fn finish<H: Host>(&self, host: &H) {
        if self.options.debug {
            tracing::warn!(url = %self.url, "all redirect strategies exhausted, navigating directly");
        }
        if let Err(err) = host.navigate(&self.url) {
            if self.options.debug {
                tracing::warn!(error = %err, "final navigation failed");
            }
        }
    }
}

/// Hand `url` off to the standalone browser.
///
/// Fire-and-forget: the first strategy runs right away (inside the caller's
/// user gesture), later ones on the host's event loop, `attempt_delay` apart.
/// When every strategy has been tried the current context is navigated
/// directly.
pub fn perform_redirect<H: Host + 'static>(
    host: &Rc<H>,
    url: &str,
    snapshot: &BrowserSnapshot,
    options: RedirectOptions,
) {
    if options.debug {
        tracing::debug!(
            url,
            platform = %snapshot.platform(),
            app = snapshot.app_name().unwrap_or("-"),
            "starting redirect"
        );
    }
    drive_redirect(Rc::clone(host), RedirectSequence::for_snapshot(url, snapshot, options));
}

/// Drive `sequence` until a strategy dispatches or the list runs out.
pub fn drive_redirect<H: Host + 'static>(host: Rc<H>, mut sequence: RedirectSequence) {
    match sequence.step(&host) {
        Step::Dispatched(_) => {}
        Step::Retry => {
            let delay = sequence.options.attempt_delay;
            let next = Rc::clone(&host);
            host.set_timeout(delay, Box::new(move || drive_redirect(next, sequence)));
        }
        Step::Exhausted => sequence.finish(&*host),
    }
}
