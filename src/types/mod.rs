mod config;
mod platform;
mod probe;
mod snapshot;

pub use config::*;
pub use platform::*;
pub use probe::*;
pub use snapshot::*;
