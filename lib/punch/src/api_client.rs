//! Verb-level API client.
//!
//! [`Client`] pairs a base URL with an [`HttpClient`] transport and exposes one
//! operation per HTTP verb. Every operation takes an execution [`Context`], an
//! endpoint path appended verbatim to the base URL, an optional byte payload
//! and a slice of [`RequestOption`]s, and performs exactly one exchange.

use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    Context, Error, HttpClient, HyperClient, Method, Request, RequestOption, Response, Result,
};

/// HTTP client bound to a base URL.
///
/// The base URL is kept as given and concatenated with each endpoint path, so
/// `Client::new("https://api.example.com")` with path `"/todos/1"` requests
/// `https://api.example.com/todos/1`. No separator is inserted.
///
/// # Example
///
/// ```ignore
/// use punch::{Client, Context};
///
/// #[derive(Debug, serde::Deserialize)]
/// struct Todo {
///     id: u64,
///     title: String,
/// }
///
/// let client = Client::new("https://jsonplaceholder.typicode.com");
/// let ctx = Context::background();
/// let todo: Todo = client.get_and_decode(&ctx, "/todos/1", &[]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client<C = HyperClient> {
    base_url: String,
    transport: C,
}

impl Client<HyperClient> {
    /// Create a client without a timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, HyperClient::new())
    }

    /// Create a client whose every exchange, body reads included, is bounded
    /// by `timeout`.
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let transport = HyperClient::builder().timeout(timeout).build();
        Self::with_transport(base_url, transport)
    }
}

impl<C> Client<C> {
    /// Create a client backed by a custom transport.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use punch::{Client, HyperClient};
    ///
    /// let transport = HyperClient::builder().with_logging().build();
    /// let client = Client::with_transport("https://api.example.com", transport);
    /// ```
    #[must_use]
    pub fn with_transport(base_url: impl Into<String>, transport: C) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// The base URL, as given at construction.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }

    fn build_request(
        &self,
        ctx: Option<&Context>,
        method: Method,
        path: &str,
        payload: Option<Bytes>,
        options: &[RequestOption],
    ) -> Result<Request> {
        let ctx = ctx.ok_or(Error::InvalidContext)?;
        let url = Url::parse(&format!("{}{path}", self.base_url))?;

        let mut builder = Request::builder(method, url).context(ctx.clone());
        if let Some(payload) = payload {
            builder = builder.body(payload);
        }

        let mut request = builder.build();
        for option in options {
            option.apply(&mut request);
        }
        Ok(request)
    }
}

impl<C: HttpClient> Client<C> {
    /// Send a GET request.
    pub async fn get<'c>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        options: &[RequestOption],
    ) -> Response {
        self.call(ctx.into(), Ok(Method::Get), path, None, options)
            .await
    }

    /// Send a POST request with `payload` as the body.
    pub async fn post<'c>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        payload: impl Into<Bytes>,
        options: &[RequestOption],
    ) -> Response {
        self.call(ctx.into(), Ok(Method::Post), path, Some(payload.into()), options)
            .await
    }

    /// Send a PUT request with `payload` as the body.
    pub async fn put<'c>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        payload: impl Into<Bytes>,
        options: &[RequestOption],
    ) -> Response {
        self.call(ctx.into(), Ok(Method::Put), path, Some(payload.into()), options)
            .await
    }

    /// Send a PATCH request with `payload` as the body.
    pub async fn patch<'c>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        payload: impl Into<Bytes>,
        options: &[RequestOption],
    ) -> Response {
        self.call(ctx.into(), Ok(Method::Patch), path, Some(payload.into()), options)
            .await
    }

    /// Send a DELETE request.
    pub async fn delete<'c>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        options: &[RequestOption],
    ) -> Response {
        self.call(ctx.into(), Ok(Method::Delete), path, None, options)
            .await
    }

    /// Send a request with an arbitrary method token.
    ///
    /// An invalid token fails with [`Error::InvalidRequest`] without any
    /// network I/O.
    pub async fn custom<'c>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        method: &str,
        path: &str,
        payload: Option<Bytes>,
        options: &[RequestOption],
    ) -> Response {
        self.call(ctx.into(), Method::parse(method), path, payload, options)
            .await
    }

    /// Send a GET request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the construction, dispatch or decode error, whichever happened
    /// first. The body is closed in every case.
    pub async fn get_and_decode<'c, T: DeserializeOwned>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        options: &[RequestOption],
    ) -> Result<T> {
        decode_and_close(self.get(ctx, path, options).await).await
    }

    /// Send a POST request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Client::get_and_decode`].
    pub async fn post_and_decode<'c, T: DeserializeOwned>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        payload: impl Into<Bytes>,
        options: &[RequestOption],
    ) -> Result<T> {
        decode_and_close(self.post(ctx, path, payload, options).await).await
    }

    /// Send a PUT request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Client::get_and_decode`].
    pub async fn put_and_decode<'c, T: DeserializeOwned>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        payload: impl Into<Bytes>,
        options: &[RequestOption],
    ) -> Result<T> {
        decode_and_close(self.put(ctx, path, payload, options).await).await
    }

    /// Send a PATCH request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Client::get_and_decode`].
    pub async fn patch_and_decode<'c, T: DeserializeOwned>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        payload: impl Into<Bytes>,
        options: &[RequestOption],
    ) -> Result<T> {
        decode_and_close(self.patch(ctx, path, payload, options).await).await
    }

    /// Send a DELETE request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Client::get_and_decode`].
    pub async fn delete_and_decode<'c, T: DeserializeOwned>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        path: &str,
        options: &[RequestOption],
    ) -> Result<T> {
        decode_and_close(self.delete(ctx, path, options).await).await
    }

    /// Send a request with an arbitrary method and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Client::get_and_decode`].
    pub async fn custom_and_decode<'c, T: DeserializeOwned>(
        &self,
        ctx: impl Into<Option<&'c Context>>,
        method: &str,
        path: &str,
        payload: Option<Bytes>,
        options: &[RequestOption],
    ) -> Result<T> {
        decode_and_close(self.custom(ctx, method, path, payload, options).await).await
    }

    async fn call(
        &self,
        ctx: Option<&Context>,
        method: Result<Method>,
        path: &str,
        payload: Option<Bytes>,
        options: &[RequestOption],
    ) -> Response {
        let request = match method
            .and_then(|method| self.build_request(ctx, method, path, payload, options))
        {
            Ok(request) => request,
            Err(err) => return Response::failed(err),
        };

        let context = request.context().clone();
        match context.run(self.transport.execute(request)).await {
            Ok(Ok(raw)) => Response::received(raw.with_context(context)),
            Ok(Err(err)) | Err(err) => Response::failed(err),
        }
    }
}

async fn decode_and_close<T: DeserializeOwned>(mut response: Response) -> Result<T> {
    let decoded = response.decode_json().await;
    let closed = response.close();
    let value = decoded?;
    closed?;
    Ok(value)
}
