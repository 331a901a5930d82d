//! Cell binding payloads.
//!
//! The layout stores bindings as opaque `Arc<B>` values. What a binding
//! means (field reference, formula, literal) is up to the payload type.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Contract between the layout and the per-cell payload it carries.
pub trait CellBinding: Sized + std::fmt::Debug + Send + Sync + 'static {
    /// Full content equality, presentation included.
    fn same_content(&self, other: &Self) -> bool;

    /// Equality of what the cell is bound to, ignoring presentation.
    fn same_binding(&self, other: &Self) -> bool {
        self.same_content(other)
    }

    /// Independent copy for deep clones. `None` means the payload is
    /// shared by identity between the original and the clone.
    fn deep_copy(&self) -> Option<Self> {
        None
    }

    /// Serialize the payload into the text of a `<cellBinding>` element.
    fn encode(&self) -> Result<String>;

    /// Rebuild a payload from the text of a `<cellBinding>` element.
    fn decode(text: &str) -> Result<Self>;
}

/// Default payload: a field or formula expression with an optional
/// display format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextBinding {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TextBinding {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            format: None,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

impl CellBinding for TextBinding {
    fn same_content(&self, other: &Self) -> bool {
        self == other
    }

    fn same_binding(&self, other: &Self) -> bool {
        self.expression == other.expression
    }

    fn deep_copy(&self) -> Option<Self> {
        Some(self.clone())
    }

    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_same_binding_ignores_format() {
        let a = TextBinding::new("=[Sales]").with_format("#,##0");
        let b = TextBinding::new("=[Sales]");
        assert!(a.same_binding(&b));
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_encode_skips_missing_format() {
        let encoded = TextBinding::new("Region").encode().unwrap();
        assert_eq!(encoded, r#"{"expression":"Region"}"#);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(TextBinding::decode("not json").is_err());
    }
}
