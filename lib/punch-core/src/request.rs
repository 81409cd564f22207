//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers, query
//! parameters, a body and an execution [`Context`].
//!
//! # Example
//!
//! ```
//! use punch_core::{Request, Method};
//!
//! let request = Request::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build();
//!
//! assert_eq!(request.url().query(), Some("page=1"));
//! ```

use bytes::Bytes;

use crate::{Context, Method};

/// An HTTP request with method, URL, headers, optional body and context.
///
/// Headers are kept in insertion order and a name may appear more than once.
/// Name lookups ignore ASCII case.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
    context: Context,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Mutable access to the URL.
    #[must_use]
    pub const fn url_mut(&mut self) -> &mut url::Url {
        &mut self.url
    }

    /// All headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Append a header, keeping any existing values for the same name.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// First header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).next()
    }

    /// Every value recorded for a header name.
    pub fn header_values<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// First query parameter value by name.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Execution context bound to this request.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Consume into (method, url, headers, body, context).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, Vec<(String, String)>, Option<Bytes>, Context) {
        (self.method, self.url, self.headers, self.body, self.context)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
    context: Option<Context>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub const fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            context: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    /// Binds the execution context. Defaults to [`Context::background`].
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            context: self.context.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> url::Url {
        url::Url::parse(s).expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::Get, url("https://api.example.com/todos"))
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/todos");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_none());
        assert!(!request.context().is_done());
    }

    #[test]
    fn header_lookup_outlives_name() {
        let request = Request::builder(Method::Get, url("https://api.example.com/todos"))
            .header("X-Tag", "a")
            .header("x-tag", "b")
            .build();

        let first = {
            let name = String::from("X-TAG");
            request.header(&name)
        };
        let all: Vec<&str> = {
            let name = String::from("x-Tag");
            request.header_values(&name).collect()
        };

        assert_eq!(first, Some("a"));
        assert_eq!(all, ["a", "b"]);
    }

    #[test]
    fn request_builder_with_query() {
        let request = Request::builder(Method::Get, url("https://api.example.com/todos"))
            .query("page", "1")
            .query("limit", "10")
            .build();

        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/todos?page=1&limit=10"
        );
        assert_eq!(request.query("limit").as_deref(), Some("10"));
    }

    #[test]
    fn request_builder_with_body() {
        let body = Bytes::from(r#"{"title":"test"}"#);
        let request = Request::builder(Method::Post, url("https://api.example.com/todos"))
            .body(body.clone())
            .build();

        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.body(), Some(&body));
    }

    #[test]
    fn request_builder_json() {
        #[derive(serde::Serialize)]
        struct Todo {
            title: String,
        }

        let request = Request::builder(Method::Post, url("https://api.example.com/todos"))
            .json(&Todo {
                title: "test".to_string(),
            })
            .expect("json")
            .build();

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.body(), Some(&Bytes::from(r#"{"title":"test"}"#)));
    }

    #[test]
    fn repeated_headers_are_kept() {
        let mut request = Request::builder(Method::Get, url("https://api.example.com"))
            .header("X-Tag", "a")
            .build();
        request.add_header("x-tag", "b");

        let values: Vec<_> = request.header_values("X-TAG").collect();
        assert_eq!(values, ["a", "b"]);
        assert_eq!(request.header("x-tag"), Some("a"));
    }

    #[test]
    fn bound_context_is_kept() {
        let ctx = Context::background().with_cancel();
        let request = Request::builder(Method::Get, url("https://api.example.com"))
            .context(ctx.clone())
            .build();

        ctx.cancel();
        assert!(request.context().is_done());
    }
}
