//! Prelude module for convenient imports.
//!
//! ```ignore
//! use punch_core::prelude::*;
//! ```

pub use crate::{
    Body, Context, Error, ErrorKind, HttpClient, Method, RawResponse, Request, RequestBuilder,
    RequestOption, Response, Result, from_json, to_json, with_headers, with_queries,
};
