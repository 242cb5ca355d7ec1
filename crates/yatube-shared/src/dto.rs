//! Data Transfer Objects - query strings and form bodies of the pages.

use serde::{Deserialize, Serialize};

/// `?page=` on the feed pages. Kept raw; the paginator decides what a bad
/// value means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Build from decoded query pairs. A repeated `page` keeps its last value
    /// and other parameters are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let page = pairs
            .into_iter()
            .filter(|(key, _)| key.as_ref() == "page")
            .map(|(_, value)| value.into())
            .last();
        Self { page }
    }
}

/// `?next=` on the login page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Login form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Signup form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
