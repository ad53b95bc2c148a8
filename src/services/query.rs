//! Query parameters for market-data requests
//!
//! Scalar values only. `Null` and empty-text values never reach the query
//! string, and keys are emitted in sorted order.

use reqwest::Url;
use serde_json::Number;
use std::collections::BTreeMap;

/// A single query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl QueryValue {
    /// Whether this value is dropped from the query string
    pub fn is_skipped(&self) -> bool {
        match self {
            QueryValue::Null => true,
            QueryValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Wire representation, `None` for skipped values
    pub fn as_query_value(&self) -> Option<String> {
        match self {
            QueryValue::Null => None,
            QueryValue::Text(s) if s.is_empty() => None,
            QueryValue::Text(s) => Some(s.clone()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Number(n) => Some(n.to_string()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for QueryValue {
                fn from(value: $t) -> Self {
                    QueryValue::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u16, u32, u64, usize);

impl From<f64> for QueryValue {
    /// Non-finite floats have no JSON number form and become `Null`
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(QueryValue::Number)
            .unwrap_or(QueryValue::Null)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

/// Ordered query parameter map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: BTreeMap<String, QueryValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Pairs that survive the null/empty filter, in key order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.params
            .iter()
            .filter_map(|(key, value)| value.as_query_value().map(|v| (key.as_str(), v)))
    }

    /// Append the surviving pairs to `url`
    pub fn apply_to(&self, url: &mut Url) {
        let mut pairs = self.pairs().peekable();
        if pairs.peek().is_none() {
            return;
        }
        let mut serializer = url.query_pairs_mut();
        for (key, value) in pairs {
            serializer.append_pair(key, &value);
        }
    }

    /// Encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        let Ok(mut url) = Url::parse("http://query.invalid/") else {
            return String::new();
        };
        self.apply_to(&mut url);
        url.query().unwrap_or_default().to_string()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_empty_values_skipped() {
        let params = QueryParams::new()
            .with("vs_currency", "usd")
            .with("days", 1)
            .with("precision", "")
            .with("interval", None::<String>);

        let query = params.to_query_string();
        assert_eq!(query, "days=1&vs_currency=usd");
        assert!(!query.contains("precision"));
        assert!(!query.contains("interval"));
    }

    #[test]
    fn test_scalar_rendering() {
        let params = QueryParams::new()
            .with("sparkline", false)
            .with("ratio", 1.5)
            .with("page", 2u32);

        assert_eq!(params.to_query_string(), "page=2&ratio=1.5&sparkline=false");
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(QueryValue::from(f64::NAN), QueryValue::Null);
        assert!(QueryValue::from(f64::INFINITY).is_skipped());
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let params = QueryParams::new().with("query", "a&b=c");
        assert_eq!(params.to_query_string(), "query=a%26b%3Dc");
    }

    #[test]
    fn test_apply_to_leaves_url_untouched_when_all_skipped() {
        let mut url = Url::parse("https://api.test/v3/coins/bitcoin").unwrap();
        QueryParams::new().with("x", "").apply_to(&mut url);
        assert_eq!(url.as_str(), "https://api.test/v3/coins/bitcoin");
    }
}
