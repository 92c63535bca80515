//! Service wiring: HTTP surface and alert worker runtime

pub mod http;
pub mod runtime;

pub use http::*;
pub use runtime::*;
