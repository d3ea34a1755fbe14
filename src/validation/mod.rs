//! Declarative validation of prompted values
//!
//! A [`ValidationRule`] describes what a field accepts; [`validate`] turns raw
//! user input into a normalized value or a [`Rejection`]. Rejections are
//! ordinary values consumed by the prompt loop, never errors.

pub mod fields;

use crate::core::{WingetError, WingetResult};
use regex::Regex;
use std::fmt;

/// Optional preprocessing applied to the raw input before any checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Split on commas and newlines into trimmed, non-empty, unique items
    DelimitedList,
}

/// Constraints for one prompted field
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub required: bool,
    pub default: Option<String>,
    pub min_items: usize,
    pub max_items: Option<usize>,
    pub min_item_length: usize,
    pub max_item_length: Option<usize>,
    pub transform: Option<Transform>,
    pub pattern: Option<Regex>,
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self {
            required: false,
            default: None,
            min_items: 0,
            max_items: None,
            min_item_length: 0,
            max_item_length: None,
            transform: None,
            pattern: None,
        }
    }
}

impl ValidationRule {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    pub fn optional() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.min_item_length = min;
        self.max_item_length = Some(max);
        self
    }

    pub fn with_items(mut self, min: usize, max: usize) -> Self {
        self.min_items = min;
        self.max_items = Some(max);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Require every value to match `pattern` in full
    pub fn with_pattern(mut self, pattern: &str) -> WingetResult<Self> {
        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|e| {
            WingetError::Validation(format!("Invalid pattern '{}': {}", pattern, e))
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }
}

/// A value that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Optional field left blank
    Empty,
    Scalar(String),
    List(Vec<String>),
}

impl Normalized {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Normalized::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Normalized::Empty => None,
            Normalized::Scalar(s) => Some(s),
            Normalized::List(items) => Some(items.join(", ")),
        }
    }
}

impl fmt::Display for Normalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalized::Empty => Ok(()),
            Normalized::Scalar(s) => f.write_str(s),
            Normalized::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Why an input attempt was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    BlankInput,
    TooManyItems { max: usize },
    TooFewItems { min: usize },
    InvalidLength { value: String, min: usize, max: Option<usize> },
    PatternMismatch { value: String, pattern: String },
    Malformed(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::BlankInput => write!(f, "A value is required"),
            Rejection::TooManyItems { max } => write!(f, "Enter at most {} items", max),
            Rejection::TooFewItems { min } => write!(f, "Enter at least {} items", min),
            Rejection::InvalidLength { value, min, max } => match max {
                Some(max) => write!(
                    f,
                    "'{}' must be between {} and {} characters",
                    value, min, max
                ),
                None => write!(f, "'{}' must be at least {} characters", value, min),
            },
            Rejection::PatternMismatch { value, pattern } => {
                write!(f, "'{}' does not match the pattern {}", value, pattern)
            }
            Rejection::Malformed(reason) => write!(f, "Malformed input: {}", reason),
        }
    }
}

/// Validate one input attempt against a rule
pub fn validate(raw: &str, rule: &ValidationRule) -> Result<Normalized, Rejection> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return match (&rule.default, rule.required) {
            (Some(default), _) => validate_nonblank(default.trim(), rule),
            (None, true) => Err(Rejection::BlankInput),
            (None, false) => Ok(Normalized::Empty),
        };
    }

    validate_nonblank(trimmed, rule)
}

fn validate_nonblank(value: &str, rule: &ValidationRule) -> Result<Normalized, Rejection> {
    match rule.transform {
        Some(Transform::DelimitedList) => {
            let items = split_list(value)?;
            check_list(&items, rule)?;
            Ok(Normalized::List(items))
        }
        None => {
            check_item(value, rule)?;
            Ok(Normalized::Scalar(value.to_string()))
        }
    }
}

fn split_list(value: &str) -> Result<Vec<String>, Rejection> {
    let mut items: Vec<String> = Vec::new();
    for item in value.split([',', '\n']).map(str::trim) {
        if !item.is_empty() && !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    if items.is_empty() {
        return Err(Rejection::Malformed(
            "no items found between delimiters".to_string(),
        ));
    }
    Ok(items)
}

fn check_list(items: &[String], rule: &ValidationRule) -> Result<(), Rejection> {
    if let Some(max) = rule.max_items {
        if items.len() > max {
            return Err(Rejection::TooManyItems { max });
        }
    }
    if items.len() < rule.min_items {
        return Err(Rejection::TooFewItems {
            min: rule.min_items,
        });
    }
    items.iter().try_for_each(|item| check_item(item, rule))
}

fn check_item(value: &str, rule: &ValidationRule) -> Result<(), Rejection> {
    let length = value.chars().count();
    let too_long = rule.max_item_length.is_some_and(|max| length > max);
    if length < rule.min_item_length || too_long {
        return Err(Rejection::InvalidLength {
            value: value.to_string(),
            min: rule.min_item_length,
            max: rule.max_item_length,
        });
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(value) {
            return Err(Rejection::PatternMismatch {
                value: value.to_string(),
                pattern: pattern.as_str().to_string(),
            });
        }
    }
    Ok(())
}
