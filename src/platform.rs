use crate::helpers::contains_ignore_ascii_case;
use crate::types::Platform;

/// Map a User-Agent to a coarse [`Platform`].
///
/// Order matters: Android UAs also carry `Linux`, iOS UAs carry `like Mac OS X`.
pub fn classify_platform(ua: &str) -> Platform {
    let any = |needles: &[&str]| needles.iter().any(|n| contains_ignore_ascii_case(ua, n));

    if any(&["Android"]) {
        Platform::Android
    } else if any(&["iPad", "iPhone", "iPod"]) {
        Platform::Ios
    } else if any(&["Windows"]) {
        Platform::Windows
    } else if any(&["Mac"]) {
        Platform::Mac
    } else if any(&["Linux"]) {
        Platform::Linux
    } else {
        Platform::Unknown
    }
}
