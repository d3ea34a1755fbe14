//! Interactive input
//!
//! Everything the workflows read from the terminal goes through
//! [`UserInput`] so sessions can be driven by [`MockInput`] in tests.

mod mock;

pub use mock::MockInput;

use crate::core::{WingetError, WingetResult};
use crate::validation::fields::Field;
use crate::validation::{validate, Normalized};
use dialoguer::{Confirm, Input, Password};
use std::io;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;
use tracing::debug;

/// Trait for user input (for dependency injection in tests)
pub trait UserInput {
    /// Read one line of text. Blank input is returned as an empty string.
    fn prompt_text(&self, prompt: &str, default: Option<&str>) -> WingetResult<String>;
    fn prompt_confirm(&self, prompt: &str, default: bool) -> WingetResult<bool>;
    fn prompt_password(&self, prompt: &str) -> WingetResult<String>;
    fn show(&self, message: &str);
    fn show_error(&self, message: &str);
}

/// Real implementation using dialoguer
///
/// Reads block the calling thread. Inside a multi-thread runtime the read is
/// handed to [`tokio::task::block_in_place`] so other tasks keep running on
/// the remaining workers.
pub struct DialoguerInput;

/// Run a blocking terminal read without stalling a runtime worker
fn blocking<T>(read: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            task::block_in_place(read)
        }
        _ => read(),
    }
}

fn input_error(e: dialoguer::Error) -> WingetError {
    match e {
        dialoguer::Error::IO(e)
            if matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
            ) =>
        {
            WingetError::Interrupted
        }
        #[allow(unreachable_patterns)]
        e => WingetError::Config(format!("Failed to read input: {}", e)),
    }
}

impl UserInput for DialoguerInput {
    fn prompt_text(&self, prompt: &str, default: Option<&str>) -> WingetResult<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string()).show_default(true);
        }
        blocking(|| input.interact_text()).map_err(input_error)
    }

    fn prompt_confirm(&self, prompt: &str, default: bool) -> WingetResult<bool> {
        blocking(|| {
            Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact()
        })
        .map_err(input_error)
    }

    fn prompt_password(&self, prompt: &str) -> WingetResult<String> {
        blocking(|| Password::new().with_prompt(prompt).interact()).map_err(input_error)
    }

    fn show(&self, message: &str) {
        println!("{}", message);
    }

    fn show_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}

/// Prompt until the answer satisfies the field's rule.
///
/// Rejections are shown and the prompt repeats; only I/O failures and
/// interruption end the loop early.
pub fn ask(input: &dyn UserInput, field: &Field) -> WingetResult<Normalized> {
    if let Some(hint) = field.hint {
        input.show(hint);
    }
    loop {
        let raw = input.prompt_text(field.label, field.rule.default.as_deref())?;
        match validate(&raw, &field.rule) {
            Ok(value) => return Ok(value),
            Err(rejection) => {
                debug!(field = field.label, %rejection, "Input rejected");
                input.show_error(&rejection.to_string());
            }
        }
    }
}

/// Use a value supplied on the command line when it is valid, otherwise
/// report why and fall back to prompting.
pub fn ask_or_use(
    input: &dyn UserInput,
    field: &Field,
    preset: Option<&str>,
) -> WingetResult<Normalized> {
    if let Some(preset) = preset {
        match validate(preset, &field.rule) {
            Ok(value) => return Ok(value),
            Err(rejection) => input.show_error(&format!("{}: {}", field.label, rejection)),
        }
    }
    ask(input, field)
}

/// Prompt for a required scalar field
pub fn ask_scalar(
    input: &dyn UserInput,
    field: &Field,
    preset: Option<&str>,
) -> WingetResult<String> {
    ask_or_use(input, field, preset)?
        .into_option()
        .ok_or_else(|| WingetError::Validation(format!("{} is required", field.label)))
}
