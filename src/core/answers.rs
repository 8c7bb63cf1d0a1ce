//! Answer map - values collected by the wizard

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::entity::SelectedEntity;

/// A single answer: free text, or an entity chosen through a searchable select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Entity(Option<SelectedEntity>),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn entity(entity: SelectedEntity) -> Self {
        AnswerValue::Entity(Some(entity))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            AnswerValue::Entity(_) => None,
        }
    }

    pub fn as_entity(&self) -> Option<&SelectedEntity> {
        match self {
            AnswerValue::Entity(e) => e.as_ref(),
            AnswerValue::Text(_) => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<SelectedEntity> for AnswerValue {
    fn from(entity: SelectedEntity) -> Self {
        AnswerValue::entity(entity)
    }
}

/// Question id -> current answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    values: BTreeMap<String, AnswerValue>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or overwrite) an answer
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    /// Text answer, if the question was answered with text
    pub fn text(&self, id: &str) -> Option<&str> {
        self.values.get(id).and_then(AnswerValue::as_text)
    }

    /// Trimmed text answer, treating blank answers as absent
    pub fn non_blank(&self, id: &str) -> Option<&str> {
        self.text(id).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Selected entity, if the question was answered with one
    pub fn entity(&self, id: &str) -> Option<&SelectedEntity> {
        self.values.get(id).and_then(AnswerValue::as_entity)
    }

    pub fn remove(&mut self, id: &str) -> Option<AnswerValue> {
        self.values.remove(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<AnswerValue>> FromIterator<(K, V)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AnswerMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_entity_accessors() {
        let mut answers = AnswerMap::new();
        answers.set("name", "Ada");
        answers.set("university", SelectedEntity::new("u-1", "UNI"));

        assert_eq!(answers.text("name"), Some("Ada"));
        assert_eq!(answers.entity("name"), None);
        assert_eq!(answers.entity("university").unwrap().id, "u-1");
        assert_eq!(answers.text("university"), None);
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn test_non_blank_trims() {
        let answers: AnswerMap = [("a", "  x  "), ("b", "   ")].into_iter().collect();
        assert_eq!(answers.non_blank("a"), Some("x"));
        assert_eq!(answers.non_blank("b"), None);
        assert_eq!(answers.non_blank("c"), None);
    }

    #[test]
    fn test_overwrite_on_revisit() {
        let mut answers = AnswerMap::new();
        answers.set("name", "Ada");
        answers.set("name", "Grace");
        assert_eq!(answers.text("name"), Some("Grace"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = r#"
name: Ada
university:
  id: u-1
  name: UNI
team: ~
"#;
        let answers: AnswerMap = serde_yml::from_str(yaml).unwrap();
        assert_eq!(answers.text("name"), Some("Ada"));
        assert_eq!(answers.entity("university").unwrap().display_name, "UNI");
        assert_eq!(answers.get("team"), Some(&AnswerValue::Entity(None)));
    }
}
