use indexmap::IndexMap;

use crate::error::Result;

// ---------------------------------------------------------------------------
// In-app signatures  (regexes/in_app.yml)
//
// Format: top-level mapping  app_name → regex
// ---------------------------------------------------------------------------

/// Raw deserialization target for a signature file.
/// Uses IndexMap to preserve YAML insertion order (first-match-wins).
pub(crate) type SignatureMap = IndexMap<String, String>;

/// The signature table compiled into the crate.
pub(crate) const BUILTIN_SIGNATURES: &str = include_str!("../regexes/in_app.yml");

pub(crate) fn parse_signatures(yaml: &str) -> Result<SignatureMap> {
    Ok(serde_yaml::from_str(yaml)?)
}
