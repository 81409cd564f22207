//! HTTP response handling.
//!
//! A verb call always hands back a [`Response`], even when the request could
//! not be built or sent. Decoding and closing check, in order, for a stored
//! error, a missing response and a missing body stream, so one cleanup idiom
//! works on every path:
//!
//! ```ignore
//! let mut response = client.get(&ctx, "/todos/1", &[]).await;
//! let todo: Todo = response.decode_json().await?;
//! response.close()?;
//! ```

use http::HeaderMap;

use crate::{Body, Context, Error, Result};

/// A received HTTP response: status line, headers and body stream.
#[derive(Debug)]
pub struct RawResponse {
    status: u16,
    headers: HeaderMap,
    body: Option<Body>,
}

impl RawResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(status: u16, headers: HeaderMap, body: Option<Body>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Body stream, if the response has one.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Mutable body stream, if the response has one.
    #[must_use]
    pub const fn body_mut(&mut self) -> Option<&mut Body> {
        self.body.as_mut()
    }

    /// Consume into the body stream.
    #[must_use]
    pub fn into_body(self) -> Option<Body> {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Make body reads observe `context`.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.body = self.body.map(|body| body.with_context(context));
        self
    }
}

/// Outcome of a dispatch attempt, with decode and close helpers.
#[derive(Debug)]
pub struct Response {
    outcome: Outcome,
}

#[derive(Debug)]
enum Outcome {
    Received(RawResponse),
    Failed(Error),
    Missing,
}

impl Response {
    /// Bundle a possibly absent response with a possibly present error.
    ///
    /// A present error takes precedence over the response.
    #[must_use]
    pub fn new(raw: Option<RawResponse>, err: Option<Error>) -> Self {
        let outcome = match (raw, err) {
            (_, Some(err)) => Outcome::Failed(err),
            (Some(raw), None) => Outcome::Received(raw),
            (None, None) => Outcome::Missing,
        };
        Self { outcome }
    }

    /// A response that arrived.
    #[must_use]
    pub const fn received(raw: RawResponse) -> Self {
        Self {
            outcome: Outcome::Received(raw),
        }
    }

    /// A dispatch attempt that failed.
    #[must_use]
    pub const fn failed(err: Error) -> Self {
        Self {
            outcome: Outcome::Failed(err),
        }
    }

    /// The received response, if any.
    #[must_use]
    pub const fn raw(&self) -> Option<&RawResponse> {
        match &self.outcome {
            Outcome::Received(raw) => Some(raw),
            Outcome::Failed(_) | Outcome::Missing => None,
        }
    }

    /// The stored error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match &self.outcome {
            Outcome::Failed(err) => Some(err),
            Outcome::Received(_) | Outcome::Missing => None,
        }
    }

    /// HTTP status code of the received response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.raw().map(RawResponse::status)
    }

    /// Headers of the received response.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.raw().map(RawResponse::headers)
    }

    /// A response arrived and its status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.raw().is_some_and(RawResponse::is_success)
    }

    /// Consume into the received response.
    ///
    /// # Errors
    ///
    /// Returns the stored error, or [`Error::NilResponse`].
    pub fn into_result(self) -> Result<RawResponse> {
        match self.outcome {
            Outcome::Received(raw) => Ok(raw),
            Outcome::Failed(err) => Err(err),
            Outcome::Missing => Err(Error::NilResponse),
        }
    }

    fn body_mut(&mut self) -> Result<&mut Body> {
        match &mut self.outcome {
            Outcome::Failed(err) => Err(err.clone()),
            Outcome::Missing => Err(Error::NilResponse),
            Outcome::Received(raw) => raw.body_mut().ok_or(Error::NilBody),
        }
    }

    /// Run a caller-supplied decoder over the body stream.
    ///
    /// The decoder only runs when a response with a body is present.
    ///
    /// # Errors
    ///
    /// Returns the stored error, [`Error::NilResponse`], [`Error::NilBody`],
    /// or whatever the decoder returns.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut file = tokio::fs::File::create("photo.jpg").await?;
    /// response
    ///     .with_decode(async |body| {
    ///         while let Some(chunk) = body.chunk().await? {
    ///             file.write_all(&chunk).await?;
    ///         }
    ///         Ok(())
    ///     })
    ///     .await?;
    /// ```
    pub async fn with_decode<T, F>(&mut self, decode: F) -> Result<T>
    where
        F: AsyncFnOnce(&mut Body) -> Result<T>,
    {
        let body = self.body_mut()?;
        decode(body).await
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the guard errors of [`with_decode`](Self::with_decode), a body
    /// read error, or [`Error::JsonDeserialization`].
    pub async fn decode_json<T: serde::de::DeserializeOwned>(&mut self) -> Result<T> {
        let body = self.body_mut()?;
        let bytes = body.bytes().await?;
        crate::from_json(&bytes)
    }

    /// Read the whole body as text.
    ///
    /// # Errors
    ///
    /// Returns the guard errors of [`with_decode`](Self::with_decode), a body
    /// read error, or [`Error::InvalidUtf8`].
    pub async fn decode_string(&mut self) -> Result<String> {
        let body = self.body_mut()?;
        body.text().await
    }

    /// Close the body stream.
    ///
    /// Safe to call on every path: when the dispatch failed, the stored error
    /// is returned and nothing is touched. Dropping the response also releases
    /// the stream.
    ///
    /// # Errors
    ///
    /// Returns the stored error, [`Error::NilResponse`] or [`Error::NilBody`].
    pub fn close(&mut self) -> Result<()> {
        self.body_mut()?.close();
        Ok(())
    }
}

impl From<Result<RawResponse>> for Response {
    fn from(result: Result<RawResponse>) -> Self {
        match result {
            Ok(raw) => Self::received(raw),
            Err(err) => Self::failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Todo {
        #[serde(rename = "userId")]
        user_id: u64,
        id: u64,
        title: String,
        completed: bool,
    }

    const TODO: &str = r#"{"userId":1,"id":1,"title":"delectus aut autem","completed":false}"#;

    fn ok(body: Option<Body>) -> Response {
        Response::new(Some(RawResponse::new(200, HeaderMap::new(), body)), None)
    }

    #[tokio::test]
    async fn nil_response_and_nil_error() {
        let mut response = Response::new(None, None);

        assert_eq!(
            response.decode_json::<Todo>().await,
            Err(Error::NilResponse)
        );
        assert_eq!(response.close(), Err(Error::NilResponse));
    }

    #[tokio::test]
    async fn stored_error_is_returned_as_is() {
        let err = Error::connection("connection refused");
        let mut response = Response::new(None, Some(err.clone()));

        assert_eq!(response.decode_json::<Todo>().await, Err(err.clone()));
        assert_eq!(response.close(), Err(err.clone()));
        assert_eq!(response.error(), Some(&err));
    }

    #[tokio::test]
    async fn stored_error_wins_over_response() {
        let raw = RawResponse::new(200, HeaderMap::new(), Some(Body::from(TODO)));
        let mut response = Response::new(Some(raw), Some(Error::Canceled));

        assert_eq!(response.decode_string().await, Err(Error::Canceled));
        assert!(response.raw().is_none());
    }

    #[tokio::test]
    async fn response_without_body() {
        let mut response = ok(None);

        assert_eq!(response.decode_json::<Todo>().await, Err(Error::NilBody));
        assert_eq!(response.close(), Err(Error::NilBody));
        assert_eq!(response.status(), Some(200));
    }

    #[tokio::test]
    async fn decode_json_todo() {
        let mut response = ok(Some(Body::from(TODO)));

        let todo: Todo = response.decode_json().await.expect("decode");
        assert_eq!(
            todo,
            Todo {
                user_id: 1,
                id: 1,
                title: "delectus aut autem".to_string(),
                completed: false,
            }
        );
        assert_eq!(response.close(), Ok(()));
    }

    #[tokio::test]
    async fn decode_json_malformed() {
        let mut response = ok(Some(Body::from(r#"{"userId":"one"}"#)));

        let_assert!(
            Err(Error::JsonDeserialization { path, .. }) = response.decode_json::<Todo>().await
        );
        check!(path == "userId");
    }

    #[tokio::test]
    async fn decode_string_reads_everything() {
        let mut response = ok(Some(Body::from("plain text body")));

        assert_eq!(
            response.decode_string().await.as_deref(),
            Ok("plain text body")
        );
    }

    #[tokio::test]
    async fn with_decode_never_runs_on_error() {
        let mut response = Response::failed(Error::Timeout);
        let mut ran = false;

        let result = response
            .with_decode(async |_body| {
                ran = true;
                Ok(())
            })
            .await;

        assert_eq!(result, Err(Error::Timeout));
        assert!(!ran);
    }

    #[tokio::test]
    async fn with_decode_receives_body() {
        let mut response = ok(Some(Body::from("abc")));

        let len = response
            .with_decode(async |body| Ok(body.bytes().await?.len()))
            .await;

        assert_eq!(len, Ok(3));
    }

    #[tokio::test]
    async fn read_after_close_fails() {
        let mut response = ok(Some(Body::from(TODO)));

        response.close().expect("close");
        response.close().expect("close twice");

        let_assert!(Err(err) = response.decode_string().await);
        check!(err.kind() == crate::ErrorKind::Decode);
    }

    #[test]
    fn from_result() {
        let response = Response::from(Err::<RawResponse, _>(Error::InvalidContext));
        assert_eq!(response.error(), Some(&Error::InvalidContext));
        assert!(!response.is_success());

        let raw = RawResponse::new(204, HeaderMap::new(), None);
        let response = Response::from(Ok(raw));
        assert!(response.is_success());
        assert!(response.into_result().is_ok());
    }
}
