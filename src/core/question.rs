//! Question model and form definitions

use clap::ValueEnum;
use miette::Diagnostic;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::core::entity::EntityKind;

/// Input kind of a question, with only the data each kind needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    ShortText,
    Email,
    Phone,
    Url,
    TextArea,
    Select { options: Vec<String> },
    SearchableSelect { source: EntityKind },
}

impl QuestionKind {
    /// Short name used in listings
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::ShortText => "text",
            QuestionKind::Email => "email",
            QuestionKind::Phone => "phone",
            QuestionKind::Url => "url",
            QuestionKind::TextArea => "textarea",
            QuestionKind::Select { .. } => "select",
            QuestionKind::SearchableSelect { .. } => "searchable-select",
        }
    }

    pub fn is_searchable(&self) -> bool {
        matches!(self, QuestionKind::SearchableSelect { .. })
    }
}

/// Visibility rule: show the question only when another answer matches exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub depends_on: String,
    pub equals: String,
}

/// A single step of the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub placeholder: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Question {
    pub fn new(id: &str, prompt: &str, kind: QuestionKind) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            placeholder: String::new(),
            kind,
            required: true,
            condition: None,
        }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn shown_when(mut self, depends_on: &str, equals: &str) -> Self {
        self.condition = Some(Condition {
            depends_on: depends_on.to_string(),
            equals: equals.to_string(),
        });
        self
    }
}

/// Which registration flow a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    /// Participant (hacker) registration
    Hacker,
    /// Sponsor registration
    Sponsor,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Hacker => "hacker",
            FormKind::Sponsor => "sponsor",
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors found while building a form definition
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum FormError {
    #[error("Duplicate question id: {id}")]
    #[diagnostic(code(hackreg::form::duplicate_id))]
    DuplicateId { id: String },

    #[error("Question '{id}' depends on '{depends_on}', which does not appear earlier in the form")]
    #[diagnostic(
        code(hackreg::form::forward_dependency),
        help("A conditional rule may only reference a question defined before it")
    )]
    ForwardDependency { id: String, depends_on: String },

    #[error("Question '{id}' is shown when '{depends_on}' = '{equals}', which is not one of its options")]
    #[diagnostic(code(hackreg::form::unreachable_condition))]
    UnreachableCondition {
        id: String,
        depends_on: String,
        equals: String,
    },

    #[error("Select question '{id}' has no options")]
    #[diagnostic(code(hackreg::form::empty_select))]
    EmptySelect { id: String },

    #[error("Form has no questions")]
    #[diagnostic(code(hackreg::form::empty))]
    Empty,
}

/// An ordered, validated sequence of questions
#[derive(Debug, Clone, Serialize)]
pub struct FormDefinition {
    kind: FormKind,
    questions: Vec<Question>,
}

impl FormDefinition {
    /// Build a form, checking ids and conditional rules
    pub fn new(kind: FormKind, questions: Vec<Question>) -> Result<Self, FormError> {
        if questions.is_empty() {
            return Err(FormError::Empty);
        }

        let mut seen: HashSet<&str> = HashSet::new();

        for (idx, question) in questions.iter().enumerate() {
            if !seen.insert(question.id.as_str()) {
                return Err(FormError::DuplicateId {
                    id: question.id.clone(),
                });
            }

            if let QuestionKind::Select { options } = &question.kind {
                if options.is_empty() {
                    return Err(FormError::EmptySelect {
                        id: question.id.clone(),
                    });
                }
            }

            let Some(cond) = &question.condition else {
                continue;
            };

            // strictly earlier: rules out self, forward and cyclic references
            let Some(target) = questions[..idx].iter().find(|q| q.id == cond.depends_on) else {
                return Err(FormError::ForwardDependency {
                    id: question.id.clone(),
                    depends_on: cond.depends_on.clone(),
                });
            };

            if let QuestionKind::Select { options } = &target.kind {
                if !options.contains(&cond.equals) {
                    return Err(FormError::UnreachableCondition {
                        id: question.id.clone(),
                        depends_on: cond.depends_on.clone(),
                        equals: cond.equals.clone(),
                    });
                }
            }
        }

        Ok(Self { kind, questions })
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Find a question by id
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}
