use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

/// An opaque, unforgeable key.
///
/// Tokens identify operators in the process-wide registry and non-enumerable
/// slots on an [`Object`](crate::Object). Two tokens are equal
/// only if one is a clone of the other: every call to [`Token::new`] draws a
/// fresh UUID, so uniqueness holds by construction rather than by naming
/// convention. The label is purely diagnostic and never participates in
/// equality or hashing.
#[derive(Debug, Clone)]
pub struct Token {
    id: Uuid,
    label: String,
}

impl Token {
    /// Creates a fresh token. The label only shows up in logs and errors.
    pub fn new(label: impl Into<String>) -> Self {
        Token {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.simple().to_string();
        write!(f, "{}@{}", self.label, &id[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_tokens_with_same_label_are_distinct() {
        let a = Token::new("bind");
        let b = Token::new("bind");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_token_as_map_key() {
        let token = Token::new("slot");
        let mut map = HashMap::new();
        map.insert(token.clone(), 1);
        assert_eq!(map.get(&token), Some(&1));
        assert_eq!(map.get(&Token::new("slot")), None);
    }

    #[test]
    fn test_token_display_carries_label() {
        let token = Token::new("callback-to-future");
        assert!(token.to_string().starts_with("callback-to-future@"));
    }
}
