use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything outside the RFC 3986 unreserved set gets escaped.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Same set, applied to caller-supplied ids and codes placed in a path.
pub(crate) const SEGMENT_ENCODE_SET: &AsciiSet = QUERY_ENCODE_SET;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    /// Sent as a single comma-joined value.
    List(Vec<String>),
}

impl ParamValue {
    fn render(&self) -> String {
        match self {
            ParamValue::Text(text) => text.clone(),
            ParamValue::Integer(n) => n.to_string(),
            ParamValue::Bool(true) => "1".to_string(),
            ParamValue::Bool(false) => "0".to_string(),
            ParamValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for ParamValue {
    fn from(values: Vec<S>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Query parameters in insertion order. Entries whose value is `None` are
/// kept in the map but never reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: IndexMap<String, Option<ParamValue>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_opt<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.insert_opt(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), Some(value.into()));
    }

    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.entries.insert(key.into(), value.map(Into::into));
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the present entries as `key=value` pairs joined by `&`.
    /// Returns `None` when nothing would be sent.
    pub fn encode(&self) -> Option<String> {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .filter_map(|(key, value)| {
                value.as_ref().map(|value| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(key, QUERY_ENCODE_SET),
                        utf8_percent_encode(&value.render(), QUERY_ENCODE_SET)
                    )
                })
            })
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("&"))
        }
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert_opt(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_are_dropped() {
        let params = Params::new()
            .with("startDateTime", "2024-01-01 00:00:00")
            .with_opt::<u32>("limit", None)
            .with("customer", "C-1");

        assert_eq!(params.len(), 3);
        assert_eq!(
            params.encode().as_deref(),
            Some("startDateTime=2024-01-01%2000%3A00%3A00&customer=C-1")
        );
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let params: Params = vec![("zeta", Some("1")), ("alpha", Some("2")), ("mid", Some("3"))]
            .into_iter()
            .collect();

        assert_eq!(params.encode().as_deref(), Some("zeta=1&alpha=2&mid=3"));
    }

    #[test]
    fn test_all_absent_encodes_to_none() {
        let params: Params = vec![("limit", None::<u32>), ("customer", None)]
            .into_iter()
            .collect();

        assert_eq!(params.encode(), None);
        assert_eq!(Params::new().encode(), None);
    }

    #[test]
    fn test_lists_are_comma_joined() {
        let params = Params::new().with("facility", vec!["AAA", "BBB"]);
        assert_eq!(params.encode().as_deref(), Some("facility=AAA%2CBBB"));
    }

    #[test]
    fn test_bools_and_integers() {
        let params = Params::new()
            .with("includeVoidInvoices", true)
            .with("limit", 25u32)
            .with("offset", -3i64)
            .with("flag", false);

        assert_eq!(
            params.encode().as_deref(),
            Some("includeVoidInvoices=1&limit=25&offset=-3&flag=0")
        );
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let params = Params::new().with("q", "a&b=c/d e+f~g");
        assert_eq!(params.encode().as_deref(), Some("q=a%26b%3Dc%2Fd%20e%2Bf~g"));
    }

    #[test]
    fn test_reinsert_overwrites_in_place() {
        let mut params = Params::new().with("a", "1").with("b", "2");
        params.insert("a", "3");
        assert_eq!(params.get("a"), Some(&ParamValue::Text("3".to_string())));
        assert_eq!(params.encode().as_deref(), Some("a=3&b=2"));
    }
}
