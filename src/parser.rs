use crate::error::Result;
use crate::heuristics::{AndroidWebView, EmbeddedSafari};
use crate::types::{EmbeddingProbe, Platform};

/// App name reported by the iOS embedded-Safari heuristic.
pub(crate) const IOS_SAFARI_IN_APP: &str = "ios_safari_in_app";
/// App name reported by the generic Android WebView heuristic.
pub(crate) const ANDROID_WEBVIEW: &str = "android_webview";

/// Build the full case-insensitive regex string for a signature pattern.
pub(crate) fn full_pattern(pattern: &str) -> String {
    format!("(?i)(?:{})", pattern)
}

/// Helper: compile a signature with the case-insensitive flag using
/// fancy_regex (needed for the lookahead bot exclusions).
pub(crate) fn compile_regex(pattern: &str) -> Result<fancy_regex::Regex> {
    Ok(fancy_regex::Regex::new(&full_pattern(pattern))?)
}

/// Everything a rule may look at.
pub(crate) struct UaContext<'a> {
    pub ua: &'a str,
    pub platform: Platform,
    /// `None` outside a live browser.
    pub probe: Option<EmbeddingProbe>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

pub(crate) enum Predicate {
    /// Known app marker in the UA.
    Signature(fancy_regex::Regex),
    EmbeddedSafari(EmbeddedSafari),
    AndroidWebView(AndroidWebView),
}

impl Predicate {
    fn matches(&self, cx: &UaContext<'_>) -> bool {
        match self {
            // A regex that exceeds the backtrack limit counts as no match.
            Self::Signature(re) => re.is_match(cx.ua).unwrap_or(false),
            Self::EmbeddedSafari(h) => h.matches(cx),
            Self::AndroidWebView(h) => h.matches(cx),
        }
    }
}

/// One `(identifier, predicate)` pair of the cascade.
pub(crate) struct Rule {
    pub name: String,
    pub predicate: Predicate,
}

// ---------------------------------------------------------------------------
// RuleCascade: ordered first-match-wins evaluation
// ---------------------------------------------------------------------------

/// Signatures first (high precision), then the two broad heuristics. A known
/// app must never be masked by a generic verdict.
pub(crate) struct RuleCascade {
    rules: Vec<Rule>,
}

impl RuleCascade {
    /// Build a cascade from `(app_name, pattern)` pairs in priority order,
    /// followed by the built-in heuristics.
    pub fn build(signatures: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let mut rules = signatures
            .into_iter()
            .map(|(name, pattern)| {
                Ok(Rule {
                    name,
                    predicate: Predicate::Signature(compile_regex(&pattern)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        rules.push(Rule {
            name: IOS_SAFARI_IN_APP.to_string(),
            predicate: Predicate::EmbeddedSafari(EmbeddedSafari::compile()?),
        });
        rules.push(Rule {
            name: ANDROID_WEBVIEW.to_string(),
            predicate: Predicate::AndroidWebView(AndroidWebView::compile()?),
        });

        tracing::trace!(rules = rules.len(), "compiled in-app rule cascade");

        Ok(Self { rules })
    }

    /// Find the first matching rule (preserving cascade order).
    pub fn match_first(&self, cx: &UaContext<'_>) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.predicate.matches(cx))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }
}
