//! Query-string construction for GET requests.
//!
//! Callers build an ordered list of name/value pairs (`QueryParams`) or hand
//! over an already-encoded string (`Query::Literal`). Pairs are
//! percent-encoded here; literals are the caller's responsibility.

/// Ordered `name -> value` pairs appended to a URL as `?n1=v1&n2=v2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `push`.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.pairs.push((name.into(), value.to_string()));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as `?n1=v1&n2=v2`, or an empty string when there are no pairs.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let joined = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// Query attached to a request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Appended verbatim, leading `?` included.
    Literal(String),
    /// Encoded and appended by `QueryParams::to_query_string`.
    Params(QueryParams),
}

impl Query {
    pub fn append_to(&self, url: &str) -> String {
        match self {
            Query::Literal(raw) => format!("{url}{raw}"),
            Query::Params(params) => format!("{url}{}", params.to_query_string()),
        }
    }
}

impl From<QueryParams> for Query {
    fn from(params: QueryParams) -> Self {
        Query::Params(params)
    }
}

/// `url` with `query` appended, or `url` unchanged when there is none.
pub fn apply_query(url: &str, query: Option<&Query>) -> String {
    match query {
        Some(q) => q.append_to(url),
        None => url.to_string(),
    }
}
