//! Scripted answers - YAML files that answer the wizard non-interactively
//!
//! ```yaml
//! name: Ada
//! email: ada@example.com
//! university: UNI                     # looked up by name
//! expertise: {id: "…", name: Backend} # or given directly
//! teamChoice: Crear nuevo equipo
//! ```

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::answers::{AnswerMap, AnswerValue};
use crate::core::entity::SelectedEntity;

#[derive(Debug, Error, Diagnostic)]
pub enum ScriptError {
    #[error("Cannot read answers file {path}: {message}")]
    #[diagnostic(code(hackreg::script::io))]
    Io { path: String, message: String },

    #[error("Answers file is not valid YAML: {0}")]
    #[diagnostic(
        code(hackreg::script::yaml),
        help("Write one `question_id: value` pair per line")
    )]
    Yaml(String),

    #[error("Answers file must be a mapping of question ids to values")]
    #[diagnostic(code(hackreg::script::not_a_mapping))]
    NotAMapping,

    #[error("Unsupported value for '{id}'")]
    #[diagnostic(
        code(hackreg::script::unsupported_value),
        help("Use text, a number, or {{id, name}} for searchable questions")
    )]
    UnsupportedValue { id: String },
}

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptValue {
    /// Free text, or a name to look up for searchable questions
    Text(String),
    /// An entity given by id
    Entity(SelectedEntity),
}

/// Answers read from a YAML file, keyed by question id
#[derive(Debug, Clone, Default)]
pub struct AnswerScript {
    values: BTreeMap<String, ScriptValue>,
}

impl AnswerScript {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ScriptError> {
        let value: serde_yml::Value =
            serde_yml::from_str(content).map_err(|e| ScriptError::Yaml(e.to_string()))?;

        let mapping = match value {
            serde_yml::Value::Mapping(m) => m,
            serde_yml::Value::Null => return Ok(Self::default()),
            _ => return Err(ScriptError::NotAMapping),
        };

        let mut values = BTreeMap::new();
        for (key, value) in mapping {
            let id = scalar_text(&key).ok_or(ScriptError::NotAMapping)?;
            if let Some(parsed) = parse_value(&id, &value)? {
                values.insert(id, parsed);
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, id: &str) -> Option<&ScriptValue> {
        self.values.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Answers as-is, without looking names up
    pub fn to_answer_map(&self) -> AnswerMap {
        self.values
            .iter()
            .map(|(id, value)| {
                let value = match value {
                    ScriptValue::Text(t) => AnswerValue::text(t.clone()),
                    ScriptValue::Entity(e) => AnswerValue::entity(e.clone()),
                };
                (id.clone(), value)
            })
            .collect()
    }
}

fn scalar_text(value: &serde_yml::Value) -> Option<String> {
    match value {
        serde_yml::Value::String(s) => Some(s.clone()),
        serde_yml::Value::Number(n) => Some(n.to_string()),
        serde_yml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_value(id: &str, value: &serde_yml::Value) -> Result<Option<ScriptValue>, ScriptError> {
    if value.is_null() {
        return Ok(None);
    }
    if let Some(text) = scalar_text(value) {
        return Ok(Some(ScriptValue::Text(text)));
    }

    let unsupported = || ScriptError::UnsupportedValue { id: id.to_string() };
    let serde_yml::Value::Mapping(map) = value else {
        return Err(unsupported());
    };

    let field = |name: &str| map.get(name).and_then(scalar_text);
    match (field("id"), field("name")) {
        (Some(entity_id), name) => {
            let name = name.unwrap_or_else(|| entity_id.clone());
            Ok(Some(ScriptValue::Entity(SelectedEntity::new(entity_id, name))))
        }
        (None, Some(name)) => Ok(Some(ScriptValue::Text(name))),
        (None, None) => Err(unsupported()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_mixed_values() {
        let script = AnswerScript::from_yaml(
            r#"
name: Ada
phone: 51999999999
university: UNI
expertise: {id: exp-1, name: Backend}
team: {name: Byte Me}
github: ~
"#,
        )
        .unwrap();

        assert_eq!(script.get("name"), Some(&ScriptValue::Text("Ada".into())));
        assert_eq!(script.get("phone"), Some(&ScriptValue::Text("51999999999".into())));
        assert_eq!(
            script.get("expertise"),
            Some(&ScriptValue::Entity(SelectedEntity::new("exp-1", "Backend")))
        );
        assert_eq!(script.get("team"), Some(&ScriptValue::Text("Byte Me".into())));
        assert!(script.get("github").is_none());
    }

    #[test]
    fn test_to_answer_map() {
        let script = AnswerScript::from_yaml("name: Ada\nuniversity: {id: u-1}\n").unwrap();
        let answers = script.to_answer_map();
        assert_eq!(answers.text("name"), Some("Ada"));
        assert_eq!(answers.entity("university").unwrap().display_name, "u-1");
    }

    #[test]
    fn test_rejects_non_mapping() {
        assert!(matches!(
            AnswerScript::from_yaml("- a\n- b\n").unwrap_err(),
            ScriptError::NotAMapping
        ));
        assert!(matches!(
            AnswerScript::from_yaml("name: [a, b]\n").unwrap_err(),
            ScriptError::UnsupportedValue { .. }
        ));
    }

    #[test]
    fn test_empty_file_is_empty_script() {
        assert!(AnswerScript::from_yaml("").unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name: Ada").unwrap();
        let script = AnswerScript::load(file.path()).unwrap();
        assert_eq!(script.get("name"), Some(&ScriptValue::Text("Ada".into())));

        let err = AnswerScript::load(Path::new("/nonexistent/answers.yaml")).unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }
}
