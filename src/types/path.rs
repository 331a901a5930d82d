//! Data paths identifying the role of a region.

use std::fmt;

use serde::Serialize;

/// An opaque structural identifier such as `header`, `detail` or
/// `group/0/footer`. The layout never interprets it; a layout kind may
/// normalize it through [`crate::LayoutHooks::fix_path_for_region`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct DataPath(String);

impl DataPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DataPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}
