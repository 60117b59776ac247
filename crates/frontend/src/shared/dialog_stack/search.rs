use std::fmt;

/// Ordered URL query parameters.
///
/// Pairs are kept in their raw (percent-encoded) form so that parameters this
/// module never touches are written back byte-for-byte in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, Option<String>)>,
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `?a=1&b=2` or `a=1&b=2`. Empty segments are dropped.
    pub fn parse(search: &str) -> Self {
        let pairs = search
            .trim_start_matches('?')
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (key.to_string(), Some(value.to_string())),
                None => (segment.to_string(), None),
            })
            .collect();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Decoded value of the first parameter named `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(key, _)| decode(key) == name)
            .map(|(_, value)| value.as_deref().map(decode).unwrap_or_default())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| decode(key) == name)
    }

    /// Replaces the first `name` in place (dropping later duplicates) or appends it.
    pub fn set(&mut self, name: &str, value: &str) {
        let encoded = urlencoding::encode(value).into_owned();
        match self.pairs.iter().position(|(key, _)| decode(key) == name) {
            Some(idx) => {
                self.pairs[idx].1 = Some(encoded);
                let mut seen = 0usize;
                self.pairs.retain(|(key, _)| {
                    if decode(key) != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => {
                let key = urlencoding::encode(name).into_owned();
                self.pairs.push((key, Some(encoded)));
            }
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(key, _)| decode(key) != name);
    }

    /// `?a=1&b=2`, or an empty string when there are no parameters.
    pub fn to_search(&self) -> String {
        if self.pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", self)
        }
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.pairs.iter().enumerate() {
            if idx > 0 {
                f.write_str("&")?;
            }
            match value {
                Some(value) => write!(f, "{}={}", key, value)?,
                None => f.write_str(key)?,
            }
        }
        Ok(())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = SearchParams::new();
        for (key, value) in iter {
            params.set(key.as_ref(), value.as_ref());
        }
        params
    }
}
