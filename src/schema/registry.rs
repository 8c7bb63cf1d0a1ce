//! Embedded JSON schemas for the registration payloads

use rust_embed::Embed;
use std::collections::HashMap;

use crate::core::question::FormKind;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Schema source text per form kind
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<FormKind, String>,
}

impl SchemaRegistry {
    /// Load every embedded schema
    pub fn new() -> Self {
        let mut schemas = HashMap::new();
        for kind in [FormKind::Hacker, FormKind::Sponsor] {
            let Some(file) = EmbeddedSchemas::get(&Self::file_name(kind)) else {
                tracing::warn!("No embedded schema for {}", kind);
                continue;
            };
            match String::from_utf8(file.data.into_owned()) {
                Ok(text) => {
                    schemas.insert(kind, text);
                }
                Err(e) => tracing::warn!("Schema for {} is not UTF-8: {}", kind, e),
            }
        }
        Self { schemas }
    }

    pub fn file_name(kind: FormKind) -> String {
        format!("{}.schema.json", kind.as_str())
    }

    pub fn get(&self, kind: FormKind) -> Option<&str> {
        self.schemas.get(&kind).map(String::as_str)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_embedded_and_parse() {
        let registry = SchemaRegistry::new();
        for kind in [FormKind::Hacker, FormKind::Sponsor] {
            let text = registry.get(kind).unwrap();
            let json: serde_json::Value = serde_json::from_str(text).unwrap();
            assert_eq!(json["type"], "object");
        }
    }
}
