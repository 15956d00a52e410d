use serde::{Deserialize, Serialize};

/// Outcome of a rule-based classifier.
///
/// `Unknown` means the rules abstained and the field should go to LLM review.
/// It is never a stand-in for a default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Classification<T> {
    Certain(T),
    Unknown,
}

impl<T> Classification<T> {
    pub fn is_certain(&self) -> bool {
        matches!(self, Classification::Certain(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Classification::Unknown)
    }

    pub fn certain(&self) -> Option<&T> {
        match self {
            Classification::Certain(value) => Some(value),
            Classification::Unknown => None,
        }
    }

    /// Persisted shape: `Unknown` collapses to `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Classification::Certain(value) => Some(value),
            Classification::Unknown => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Classification<U> {
        match self {
            Classification::Certain(value) => Classification::Certain(f(value)),
            Classification::Unknown => Classification::Unknown,
        }
    }

    pub fn or_else<F: FnOnce() -> Classification<T>>(self, f: F) -> Classification<T> {
        match self {
            Classification::Certain(_) => self,
            Classification::Unknown => f(),
        }
    }
}

impl<T> From<Option<T>> for Classification<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Classification::Certain(value),
            None => Classification::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_collapses_to_none() {
        let unknown: Classification<&str> = Classification::Unknown;
        assert!(unknown.is_unknown());
        assert_eq!(unknown.certain(), None);
        assert_eq!(unknown.into_option(), None);

        let certain = Classification::Certain("ICU");
        assert_eq!(certain.certain(), Some(&"ICU"));
        assert_eq!(certain.into_option(), Some("ICU"));
    }

    #[test]
    fn or_else_only_runs_on_unknown() {
        let title = Classification::Certain(1).or_else(|| Classification::Certain(2));
        assert_eq!(title, Classification::Certain(1));

        let description = Classification::Unknown.or_else(|| Classification::Certain(2));
        assert_eq!(description, Classification::Certain(2));
    }

    #[test]
    fn serializes_as_tagged_value() {
        let json = serde_json::to_string(&Classification::Certain("remote")).unwrap();
        assert_eq!(json, r#"{"status":"certain","value":"remote"}"#);

        let json = serde_json::to_string(&Classification::<String>::Unknown).unwrap();
        assert_eq!(json, r#"{"status":"unknown"}"#);
    }
}
