mod clipboard;
mod db;
mod detector;
mod error;
mod escape;
mod helpers;
mod heuristics;
pub mod host;
mod parser;
mod platform;
pub mod presentation;
mod redirect;
mod strategy;
mod types;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

pub use clipboard::copy_text;
pub use detector::{classify_in_app, InAppDetector};
pub use error::{Error, HostError, Result};
pub use escape::Escaper;
pub use host::Host;
pub use platform::classify_platform;
pub use redirect::{drive_redirect, perform_redirect, RedirectSequence, Step};
pub use strategy::{build_strategies, Strategy, DOM_CLEANUP_DELAY, PREOPEN_FALLBACK_DELAY};
pub use types::*;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::WebHost;
