use aho_corasick::AhoCorasick;
use fancy_regex::Regex;

use super::error::Result;
use super::helpers::{
    chrome_major_version, contains_ignore_ascii_case, device_model_token, ends_with_ignore_ascii_case,
};
use super::parser::UaContext;
use super::types::Platform;

/// Markers of full third-party Android browsers that share the WebView UA
/// shape. Any of them rules the WebView verdict out.
const THIRD_PARTY_BROWSER_MARKERS: &[&str] = &[
    "Edge",
    "EdgA",
    "CriOS",
    "FxiOS",
    "OPiOS",
    "SamsungBrowser",
    "MiuiBrowser",
    "Huawei",
    "Mi Browser",
    "Opera",
    "OPR",
];

/// Vendor browsers on iOS. They all wrap WKWebView and report Safari tokens
/// too, so they have to be excluded explicitly.
const IOS_VENDOR_BROWSER_MARKERS: &[&str] = &[
    "Chrome", "CriOS", "Firefox", "FxiOS", "Opera", "OPiOS", "Edge", "EdgiOS",
];

const SAFARI_FAMILY_MARKERS: &[&str] = &["Safari", "AppleWebKit"];

/// Chrome majors at or above this are counted as a WebView fingerprint.
const RECENT_CHROME_MAJOR: u32 = 120;

/// Longest device-model token still counted as a WebView fingerprint.
const SHORT_MODEL_MAX_LEN: usize = 2;

fn marker_set(markers: &[&str]) -> Result<AhoCorasick> {
    Ok(AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(markers)?)
}

// ---------------------------------------------------------------------------
// iOS: Safari-looking UA inside an app-hosted WKWebView
// ---------------------------------------------------------------------------

pub(crate) struct EmbeddedSafari {
    safari_family: AhoCorasick,
    vendor_browsers: AhoCorasick,
}

impl EmbeddedSafari {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            safari_family: marker_set(SAFARI_FAMILY_MARKERS)?,
            vendor_browsers: marker_set(IOS_VENDOR_BROWSER_MARKERS)?,
        })
    }

    /// Needs a live environment probe; without one this never matches.
    pub fn matches(&self, cx: &UaContext<'_>) -> bool {
        if cx.platform != Platform::Ios {
            return false;
        }
        let Some(probe) = cx.probe else {
            return false;
        };
        self.safari_family.is_match(cx.ua)
            && !self.vendor_browsers.is_match(cx.ua)
            && probe.is_restricted_embedding()
    }
}

// ---------------------------------------------------------------------------
// Android: generic WebView posing as mobile Chrome
// ---------------------------------------------------------------------------

pub(crate) struct AndroidWebView {
    third_party_browsers: AhoCorasick,
    version_token: Regex,
}

impl AndroidWebView {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            third_party_browsers: marker_set(THIRD_PARTY_BROWSER_MARKERS)?,
            version_token: Regex::new(r"(?i)Version/\d")?,
        })
    }

    pub fn matches(&self, cx: &UaContext<'_>) -> bool {
        let ua = cx.ua;

        // Shape of a mobile Chrome UA. All tokens compare ASCII case-insensitively.
        let shaped = contains_ignore_ascii_case(ua, "Android")
            && contains_ignore_ascii_case(ua, "Chrome/")
            && contains_ignore_ascii_case(ua, "Mobile")
            && ends_with_ignore_ascii_case(ua, "Safari/537.36");
        if !shaped {
            return false;
        }

        if self.third_party_browsers.is_match(ua) {
            return false;
        }

        // Real browsers (Samsung, stock OEM) report Version/x; WebViews mostly don't.
        if self.version_token.is_match(ua).unwrap_or(false) {
            return false;
        }

        has_short_model_token(ua)
            || chrome_major_version(ua).is_some_and(|major| major >= RECENT_CHROME_MAJOR)
    }
}

fn has_short_model_token(ua: &str) -> bool {
    device_model_token(ua).is_some_and(|token| {
        token.len() <= SHORT_MODEL_MAX_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
    })
}
