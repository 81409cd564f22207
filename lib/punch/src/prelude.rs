//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions for easy
//! glob importing:
//!
//! ```ignore
//! use punch::prelude::*;
//! ```

pub use std::time::Duration;

pub use crate::{
    Client, ClientConfig, Context, Error, ErrorKind, HttpClient, HyperClient, Method, Request,
    RequestOption, Response, Result, StatusCode, header, to_json, with_headers, with_queries,
};
pub use serde::{Deserialize, Serialize};
