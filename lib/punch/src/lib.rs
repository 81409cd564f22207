//! Thin HTTP convenience client for Rust.
//!
//! Bind a base URL once, then issue one request per call with a verb method.
//! Each call returns a [`Response`] that is decoded or closed by the caller,
//! or use the `*_and_decode` variants to get a typed value in one step.
//!
//! # Example
//!
//! ```ignore
//! use punch::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Todo {
//!     id: u64,
//!     title: String,
//!     completed: bool,
//! }
//!
//! let client = Client::with_timeout("https://jsonplaceholder.typicode.com", Duration::from_secs(10));
//! let ctx = Context::background();
//!
//! let todo: Todo = client.get_and_decode(&ctx, "/todos/1", &[]).await?;
//!
//! let mut response = client
//!     .get(&ctx, "/todos", &[with_queries([("userId", "1")])])
//!     .await;
//! let todos: Vec<Todo> = response.decode_json().await?;
//! response.close()?;
//! ```

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;

// Re-export client types
pub use api_client::Client;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use punch_core::{
    Body, Context, Error, ErrorKind, HttpClient, Method, RawResponse, Request, RequestBuilder,
    RequestOption, Response, Result, from_json, to_json, with_headers, with_queries,
};

// Re-export http types for status codes and headers
pub use punch_core::{HeaderMap, StatusCode, header};

pub use url;
