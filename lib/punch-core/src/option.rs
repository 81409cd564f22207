//! Per-call request options.
//!
//! Options are applied in the order they are passed, after the bare request is
//! built and before it is sent. Applying an option cannot fail.

use crate::Request;

/// A mutation applied to a request before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    /// Add each header. Existing values for the same name are kept.
    Headers(Vec<(String, String)>),
    /// Add each query parameter and re-encode the query string.
    Queries(Vec<(String, String)>),
}

impl RequestOption {
    /// Apply this option to `request`.
    pub fn apply(&self, request: &mut Request) {
        match self {
            Self::Headers(headers) => {
                for (name, value) in headers {
                    request.add_header(name.as_str(), value.as_str());
                }
            }
            Self::Queries(queries) => add_queries(request.url_mut(), queries),
        }
    }
}

/// Add headers to the request.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use punch_core::with_headers;
///
/// let option = with_headers(HashMap::from([("Authorization", "Bearer token")]));
/// ```
#[must_use]
pub fn with_headers<I, K, V>(headers: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    RequestOption::Headers(collect_pairs(headers))
}

/// Add query parameters to the request.
///
/// The resulting query string is sorted by key; values sharing a key keep the
/// order they were added in.
#[must_use]
pub fn with_queries<I, K, V>(queries: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    RequestOption::Queries(collect_pairs(queries))
}

fn collect_pairs<I, K, V>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

fn add_queries(url: &mut url::Url, queries: &[(String, String)]) {
    if queries.is_empty() {
        return;
    }

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    pairs.extend(queries.iter().cloned());
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

    url.query_pairs_mut().clear().extend_pairs(&pairs);
}
