//! Version tokens carried alongside patches.

/// An opaque version token.
///
/// Applications choose the shape: a string, an integer counter, or any
/// structured JSON value. The stream never interprets it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Version {
    /// String-based version ID.
    String(String),
    /// Integer-based version ID.
    Integer(i64),
    /// Any other JSON value.
    Structured(serde_json::Value),
}

impl Version {
    /// Create a new string-based version.
    #[inline]
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Version::String(s.into())
    }

    /// Create a new integer-based version.
    #[inline]
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Version::Integer(n)
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Version::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Version::String(s),
            serde_json::Value::Number(n) if n.is_i64() => {
                Version::Integer(n.as_i64().unwrap_or_default())
            }
            v => Version::Structured(v),
        }
    }
}

/// Header form: strings verbatim, everything else as compact JSON.
impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::String(s) => write!(f, "{}", s),
            Version::Integer(i) => write!(f, "{}", i),
            Version::Structured(v) => write!(f, "{}", v),
        }
    }
}

impl From<String> for Version {
    #[inline]
    fn from(s: String) -> Self {
        Version::String(s)
    }
}

impl From<&str> for Version {
    #[inline]
    fn from(s: &str) -> Self {
        Version::String(s.to_string())
    }
}

impl From<i64> for Version {
    #[inline]
    fn from(n: i64) -> Self {
        Version::Integer(n)
    }
}

impl From<u64> for Version {
    fn from(n: u64) -> Self {
        i64::try_from(n)
            .map(Version::Integer)
            .unwrap_or_else(|_| Version::Structured(serde_json::json!(n)))
    }
}

impl From<serde_json::Value> for Version {
    #[inline]
    fn from(value: serde_json::Value) -> Self {
        Version::from_json(value)
    }
}
