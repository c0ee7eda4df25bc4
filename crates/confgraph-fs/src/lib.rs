//! Loading and saving confgraph config trees
//!
//! Config and macro trees live on disk as JSON, YAML or TOML. The format
//! is picked from the file extension; saves are atomic.

pub mod error;
pub mod format;
pub mod io;
pub mod store;

pub use error::{Error, Result};
pub use format::Format;
pub use store::ConfigStore;
