//! Schema-related data models.

use serde::{Deserialize, Serialize};

/// One column as reported by `DESCRIBE`, in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    /// Full column type, e.g. `varchar(255)` or `int unsigned`
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    /// `PRI`, `UNI`, `MUL` or empty
    pub key: String,
    pub default: Option<String>,
    /// e.g. `auto_increment`
    pub extra: String,
}

impl ColumnDescription {
    /// Create a column description with no key, default or extra.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            key: String::new(),
            default: None,
            extra: String::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.key == "PRI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_description_serializes_type_key() {
        let col = ColumnDescription::new("id", "int", false)
            .with_key("PRI")
            .with_extra("auto_increment");
        let value = serde_json::to_value(&col).unwrap();
        assert_eq!(value["type"], "int");
        assert_eq!(value["nullable"], false);
        assert_eq!(value["default"], serde_json::Value::Null);
        assert!(col.is_primary_key());
    }
}
