//! HTTP transport trait.
//!
//! [`HttpClient`] is the seam between the verb-level client and the actual
//! HTTP stack. Implement it for a test double or a custom transport.

use std::future::Future;

use crate::{RawResponse, Request, Result};

/// Core HTTP transport trait.
///
/// Implementations send one request and return as soon as the response head
/// is available; the body is handed back as a stream inside [`RawResponse`].
/// Implementations must not retry.
///
/// # Example
///
/// ```
/// use punch_core::{Body, HttpClient, RawResponse, Request, Result};
///
/// struct Echo;
///
/// impl HttpClient for Echo {
///     async fn execute(&self, request: Request) -> Result<RawResponse> {
///         let body = request.body().cloned().unwrap_or_default();
///         Ok(RawResponse::new(200, Default::default(), Some(Body::from(body))))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Invalid header names or values
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(&self, request: Request) -> impl Future<Output = Result<RawResponse>> + Send;
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<RawResponse>> + Send {
        (**self).execute(request)
    }
}
