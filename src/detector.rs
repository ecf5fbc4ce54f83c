use std::sync::OnceLock;

use super::db;
use super::error::Result;
use super::parser::{RuleCascade, UaContext};
use super::platform::classify_platform;
use super::types::{BrowserSnapshot, EmbeddingProbe};

/// Compiled in-app browser classifier.
///
/// Holds the ordered rule cascade: known app signatures, then the iOS
/// embedded-Safari heuristic, then the generic Android WebView heuristic.
/// Building one compiles every pattern, so share it instead of rebuilding.
pub struct InAppDetector {
    cascade: RuleCascade,
}

impl InAppDetector {
    /// Detector over the signature table shipped with the crate.
    pub fn new() -> Result<Self> {
        Self::from_yaml(db::BUILTIN_SIGNATURES)
    }

    /// Detector over a custom signature table.
    ///
    /// `yaml` is a mapping `app_name: regex`; entries are tried top to bottom.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let signatures = db::parse_signatures(yaml)?;
        Ok(Self {
            cascade: RuleCascade::build(signatures)?,
        })
    }

    /// Built-in table followed by `extra` signatures (tried after the built-in
    /// ones, before the heuristics).
    pub fn with_extra_signatures(
        extra: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut signatures = db::parse_signatures(db::BUILTIN_SIGNATURES)?;
        for (name, pattern) in extra {
            signatures.entry(name).or_insert(pattern);
        }
        Ok(Self {
            cascade: RuleCascade::build(signatures)?,
        })
    }

    /// Process-wide detector over the built-in table.
    pub fn shared() -> &'static InAppDetector {
        static SHARED: OnceLock<InAppDetector> = OnceLock::new();
        SHARED.get_or_init(|| InAppDetector::new().expect("built-in signature table compiles"))
    }

    /// Rule identifiers in evaluation order.
    pub fn rules(&self) -> Vec<&str> {
        self.cascade.names().collect()
    }

    /// Run the cascade and return the detected app name, if any.
    ///
    /// `probe` describes the live environment; pass `None` when classifying a
    /// UA string outside a browser (the iOS embedded-Safari rule is skipped).
    pub fn classify<'a>(&'a self, ua: &str, probe: Option<EmbeddingProbe>) -> Option<&'a str> {
        let cx = UaContext {
            ua,
            platform: classify_platform(ua),
            probe,
        };
        self.cascade.match_first(&cx).map(|rule| rule.name.as_str())
    }

    /// Classify `ua` into a fresh [`BrowserSnapshot`].
    pub fn snapshot(&self, ua: &str, probe: Option<EmbeddingProbe>) -> BrowserSnapshot {
        let app_name = self.classify(ua, probe).map(str::to_string);
        BrowserSnapshot::new(ua, classify_platform(ua), app_name)
    }
}

/// Detected in-app host for `ua` using the built-in signature table.
pub fn classify_in_app(ua: &str, probe: Option<EmbeddingProbe>) -> Option<&'static str> {
    InAppDetector::shared().classify(ua, probe)
}
