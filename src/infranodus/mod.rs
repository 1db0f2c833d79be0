//! InfraNodus API module
//!
//! Contains request composition, the HTTP client, response types and the
//! projections that turn responses into tool outputs.

pub mod client;
pub mod output;
pub mod params;
pub mod progress;
pub mod projection;
pub mod request;
pub mod types;
pub mod workflows;
