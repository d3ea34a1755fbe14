//! Rules for the fields the update and remove workflows prompt for

use super::ValidationRule;
use crate::core::WingetResult;

const IDENTIFIER_SEGMENT: &str = r#"[^.\s\\/:*?"<>|\x01-\x1f]{1,32}"#;
const VERSION_CHARS: &str = r#"[^\\/:*?"<>|\x01-\x1f]+"#;

/// A prompted field: label shown to the user plus its rule
#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub rule: ValidationRule,
}

impl Field {
    fn new(label: &'static str, rule: ValidationRule) -> Self {
        Self {
            label,
            hint: None,
            rule,
        }
    }

    fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Use `default` when the user submits a blank line
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.rule.default = Some(default.into());
        self
    }
}

pub fn package_identifier() -> WingetResult<Field> {
    let pattern = format!("{seg}(\\.{seg}){{1,7}}", seg = IDENTIFIER_SEGMENT);
    let rule = ValidationRule::required()
        .with_length(1, 128)
        .with_pattern(&pattern)?;
    Ok(Field::new("Package Identifier", rule).hint("Example: Microsoft.Excel"))
}

pub fn package_version() -> WingetResult<Field> {
    let rule = ValidationRule::required()
        .with_length(1, 128)
        .with_pattern(VERSION_CHARS)?;
    Ok(Field::new("Package Version", rule).hint("Example: 1.2.3"))
}

pub fn installer_url() -> WingetResult<Field> {
    let rule = ValidationRule::required()
        .with_length(1, 2048)
        .with_pattern(r"[Hh][Tt][Tt][Pp][Ss]?://.+")?;
    Ok(Field::new("Installer Url", rule))
}

pub fn product_code() -> Field {
    Field::new("Product Code", ValidationRule::optional().with_length(1, 255))
        .hint("Looks like: {CF8E6E00-9C03-4440-81C0-21FACB921A6B}")
}

pub fn deletion_reason() -> Field {
    Field::new(
        "Reason",
        ValidationRule::required().with_length(4, 128),
    )
    .hint("Give a reason for removing this manifest")
}
