use std::collections::BTreeMap;

/// Fallback values for query keys that are absent from a link.
///
/// `sni` is not listed: its fallback is the link's own server, which is
/// only known per link (see `tls::build_tls`).
pub const QUERY_DEFAULTS: &[(&str, &str)] = &[
    ("security", "none"),
    ("type", "tcp"),
    ("headerType", "none"),
    ("path", "/"),
    ("fp", "chrome"),
];

pub fn default_for(key: &str) -> Option<&'static str> {
    QUERY_DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Multi-valued query string of a share link. Blank values are dropped on
/// insert, so `sni=` reads the same as a missing `sni`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }
        self.values.entry(key.into()).or_default().push(value);
    }

    /// First value wins when a key repeats.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn get_or_default(&self, key: &str) -> &str {
        self.first(key).or_else(|| default_for(key)).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::default();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
