//! Data models for the status service.
//!
//! Records are serialized in camelCase; the JSON form is the structured-literal
//! representation of the packaged table.

mod shutdown;
mod status;

pub use shutdown::*;
pub use status::*;
