//! Core types for the punch HTTP convenience client.
//!
//! This crate provides the transport-agnostic pieces used by punch:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`RequestOption`], [`with_headers`], [`with_queries`] - per-call request mutators
//! - [`Context`] - cancellation and deadline carrier
//! - [`Body`] - response body stream
//! - [`RawResponse`] and [`Response`] - received response and its decode/close wrapper
//! - [`Error`], [`ErrorKind`] and [`Result`] - Error handling
//! - [`HttpClient`] - transport trait
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
mod context;
mod error;
mod method;
mod option;
pub mod prelude;
mod request;
mod response;

pub use body::{Body, from_json, to_json};
pub use client::HttpClient;
pub use context::Context;
pub use error::{Error, ErrorKind, Result};
pub use method::Method;
pub use option::{RequestOption, with_headers, with_queries};
pub use request::{Request, RequestBuilder};
pub use response::{RawResponse, Response};

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};
