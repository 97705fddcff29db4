//! Transport-agnostic JSON boundary for the trivia API.
//!
//! A transport parses its wire format into an [`ApiRequest`], calls
//! [`handle`] (or [`dispatch`] with its own connection) and writes the
//! returned [`ApiResponse`] back out.

pub mod api;
pub mod config;
pub mod request;
pub mod response;

pub use api::{dispatch, handle};
pub use config::{ConfigError, CorsPolicy, TriviaConfig};
pub use request::{ApiRequest, Method};
pub use response::ApiResponse;
