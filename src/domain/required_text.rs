use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Free text that must contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredText(String);

impl RequiredText {
    pub fn parse(field: &str, text: &str) -> Result<Self, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::new(format!(
                "{field} cannot be empty"
            )));
        }
        Ok(Self(text.to_owned()))
    }

    /// Absent input is accepted, present input must not be blank.
    pub fn parse_optional(
        field: &str,
        text: Option<&str>,
    ) -> Result<Option<Self>, ValidationError> {
        text.map(|text| Self::parse(field, text)).transpose()
    }
}

impl AsRef<String> for RequiredText {
    fn as_ref(&self) -> &String {
        &self.0
    }
}
