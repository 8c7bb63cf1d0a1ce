//! Field validation for a single wizard answer

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::core::entity::SelectedEntity;
use crate::core::question::{Question, QuestionKind};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]{9,}$").expect("phone pattern compiles"));

/// Why an answer cannot be accepted
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("selection required")]
    SelectionRequired,

    #[error("field required")]
    FieldRequired,

    #[error("invalid email")]
    InvalidEmail,

    #[error("invalid phone")]
    InvalidPhone,

    #[error("invalid URL")]
    InvalidUrl,

    #[error("invalid option")]
    InvalidOption,
}

/// Validate one answer against its question
///
/// Required-ness is checked first, then the kind-specific format of any
/// non-blank value. Returns the first error found.
pub fn validate(
    question: &Question,
    raw_value: &str,
    selected: Option<&SelectedEntity>,
) -> Result<(), FieldError> {
    let value = raw_value.trim();

    if question.required {
        match &question.kind {
            QuestionKind::SearchableSelect { .. } => {
                if selected.is_none() {
                    return Err(FieldError::SelectionRequired);
                }
            }
            _ => {
                if value.is_empty() {
                    return Err(FieldError::FieldRequired);
                }
            }
        }
    }

    if value.is_empty() {
        return Ok(());
    }

    match &question.kind {
        QuestionKind::Email if !EMAIL_RE.is_match(value) => Err(FieldError::InvalidEmail),
        QuestionKind::Phone if !PHONE_RE.is_match(value) => Err(FieldError::InvalidPhone),
        QuestionKind::Url if !is_http_url(value) => Err(FieldError::InvalidUrl),
        QuestionKind::Select { options } if !options.iter().any(|o| o == value) => {
            Err(FieldError::InvalidOption)
        }
        _ => Ok(()),
    }
}

fn is_http_url(value: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        value
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty())
    })
}
