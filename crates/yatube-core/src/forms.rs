//! Post authoring form: raw input, validation, and field errors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Group;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Form fields as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFormInput {
    #[serde(default)]
    pub text: String,
    /// Group id, or empty for "no group".
    #[serde(default)]
    pub group: Option<String>,
}

impl PostFormInput {
    pub fn new(text: impl Into<String>, group: Option<Uuid>) -> Self {
        Self {
            text: text.into(),
            group: group.map(|id| id.to_string()),
        }
    }
}

/// A validated post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Errors collected while validating a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages attached to one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

/// Validate submitted post fields against the selectable groups.
pub fn validate_post(input: &PostFormInput, groups: &[Group]) -> Result<PostDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let text = input.text.trim();
    if text.is_empty() {
        errors.push("text", REQUIRED_MESSAGE);
    }

    let group_id = match input.group.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let found = Uuid::parse_str(raw)
                .ok()
                .filter(|id| groups.iter().any(|g| g.id == *id));
            if found.is_none() {
                errors.push("group", INVALID_CHOICE_MESSAGE);
            }
            found
        }
    };

    if errors.is_empty() {
        Ok(PostDraft {
            text: text.to_string(),
            group_id,
        })
    } else {
        Err(errors)
    }
}
