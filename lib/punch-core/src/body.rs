//! Response body stream and JSON helpers.

use std::future::pending;

use bytes::{Bytes, BytesMut};
use http_body_util::{BodyExt, Full, combinators::UnsyncBoxBody};
use tokio::time::{Instant, sleep_until};

use crate::{Context, Error, Result};

/// A response body stream.
///
/// Reads observe the context of the request that produced the body and the
/// transport's timeout, if any. Once [`close`](Self::close)d, further reads
/// fail with an I/O error.
pub struct Body {
    state: State,
    deadline: Option<Instant>,
    context: Option<Context>,
}

enum State {
    Open(UnsyncBoxBody<Bytes, Error>),
    Closed,
}

impl Body {
    /// Wrap any `http_body::Body` yielding [`Bytes`].
    pub fn new<B>(body: B) -> Self
    where
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Error>,
    {
        Self {
            state: State::Open(body.map_err(Into::into).boxed_unsync()),
            deadline: None,
            context: None,
        }
    }

    /// An empty, open body.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(Bytes::new())
    }

    /// Fail reads that are still pending at `deadline` with
    /// [`Error::Timeout`]. The earliest deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Fail reads once `context` is cancelled or expired.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Read the next chunk of data, or `None` at the end of the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is closed, the underlying stream fails,
    /// or the context or deadline fire first.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        let State::Open(inner) = &mut self.state else {
            return Err(Error::io("read on closed response body"));
        };
        let deadline = self.deadline;
        let context = self.context.as_ref();

        let next = async {
            while let Some(frame) = inner.frame().await {
                match frame.map(http_body::Frame::into_data) {
                    Ok(Ok(data)) => return Ok(Some(data)),
                    Ok(Err(_trailers)) => {}
                    Err(err) => return Err(err),
                }
            }
            Ok(None)
        };
        let expired = async {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };
        let done = async {
            match context {
                Some(context) => context.done().await,
                None => pending::<Error>().await,
            }
        };

        tokio::select! {
            biased;
            reason = done => Err(reason),
            () = expired => Err(Error::Timeout),
            next = next => next,
        }
    }

    /// Read the rest of the stream into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if any chunk fails to read.
    pub async fn bytes(&mut self) -> Result<Bytes> {
        let mut collected = BytesMut::new();
        while let Some(chunk) = self.chunk().await? {
            collected.extend_from_slice(&chunk);
        }
        Ok(collected.freeze())
    }

    /// Read the rest of the stream as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the bytes are not valid UTF-8.
    pub async fn text(&mut self) -> Result<String> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::InvalidUtf8(e.to_string()))
    }

    /// Release the underlying stream. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.state = State::Closed;
    }

    /// Returns `true` once [`close`](Self::close) was called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("closed", &self.is_closed())
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::new(Full::new(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

/// Serialize a value to JSON bytes.
///
/// Handy for building the pre-serialized payload of POST, PUT and PATCH.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use punch_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Todo { title: String }
///
/// let todo = Todo { title: "Buy milk".to_string() };
/// let bytes = to_json(&todo).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"title":"Buy milk"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the exact field that failed
/// (e.g., "todos[2].title").
///
/// # Errors
///
/// Returns [`Error::JsonDeserialization`] if the bytes do not decode into `T`.
///
/// # Example
///
/// ```
/// use punch_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Todo { title: String }
///
/// let bytes = br#"{"title":"Buy milk"}"#;
/// let todo: Todo = from_json(bytes).expect("deserialize");
/// assert_eq!(todo, Todo { title: "Buy milk".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::Poll;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn body_reads_all_bytes() {
        let mut body = Body::from("hello world");
        assert_eq!(body.bytes().await, Ok(Bytes::from("hello world")));
        assert_eq!(body.chunk().await, Ok(None));
    }

    #[tokio::test]
    async fn body_text_rejects_invalid_utf8() {
        let mut body = Body::from(vec![0xff, 0xfe]);
        let err = body.text().await.expect_err("not UTF-8");
        assert!(matches!(err, Error::InvalidUtf8(_)));
    }

    #[tokio::test]
    async fn closed_body_refuses_reads() {
        let mut body = Body::from("data");
        body.close();
        body.close();

        assert!(body.is_closed());
        assert_eq!(
            body.bytes().await,
            Err(Error::io("read on closed response body"))
        );
    }

    #[tokio::test]
    async fn cancelled_context_stops_reads() {
        let ctx = Context::background().with_cancel();
        let mut body = Body::from("data").with_context(ctx.clone());

        ctx.cancel();
        assert_eq!(body.bytes().await, Err(Error::Canceled));
    }

    // A body that never produces a frame.
    struct Stalled;

    impl http_body::Body for Stalled {
        type Data = Bytes;
        type Error = Error;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> Poll<Option<Result<http_body::Frame<Bytes>>>> {
            Poll::Pending
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_stops_reads() {
        let deadline = Instant::now() + Duration::from_millis(1);
        let mut body = Body::new(Stalled).with_deadline(deadline);

        assert_eq!(body.chunk().await, Err(Error::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn earliest_deadline_wins() {
        let now = Instant::now();
        let body = Body::new(Stalled)
            .with_deadline(now + Duration::from_secs(1))
            .with_deadline(now + Duration::from_secs(60));

        assert_eq!(body.deadline, Some(now + Duration::from_secs(1)));
    }

    #[test]
    fn to_json_serialize() {
        #[derive(serde::Serialize)]
        struct Todo {
            #[serde(rename = "userId")]
            user_id: u64,
            title: String,
            completed: bool,
        }

        let todo = Todo {
            user_id: 1,
            title: "delectus aut autem".to_string(),
            completed: false,
        };

        let bytes = to_json(&todo).expect("serialize");
        assert_eq!(
            bytes.as_ref(),
            br#"{"userId":1,"title":"delectus aut autem","completed":false}"#
        );
    }

    #[test]
    fn from_json_reports_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Todo {
            #[allow(dead_code)]
            completed: bool,
        }

        let err = from_json::<Todo>(br#"{"completed":"nope"}"#).expect_err("wrong type");
        assert!(matches!(
            err,
            Error::JsonDeserialization { ref path, .. } if path == "completed"
        ));
    }
}
