//! Query parameters with an explicit "absent" marker.

/// Ordered query parameters.
///
/// A `None` value marks the parameter as absent: it is kept in the list but
/// never written to the URL. Present values are stringified as-is, so `0`,
/// `false` and `""` still appear in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. `None` marks it as absent.
    #[must_use]
    pub fn with<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter in place. `None` marks it as absent.
    pub fn push<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.pairs
            .push((key.into(), value.map(|v| v.to_string())));
    }

    /// Iterate over present parameters in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// Whether no parameter has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, Option<V>)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}
