use super::UserInput;
use crate::core::{WingetError, WingetResult};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Scripted [`UserInput`] for tests.
///
/// Answers are queued per prompt label and consumed in order. A prompt with
/// no queued answer is an error, and prompts registered with
/// [`MockInput::interrupt_at`] behave like the user pressing Ctrl-C.
#[derive(Default)]
pub struct MockInput {
    texts: Mutex<HashMap<String, VecDeque<String>>>,
    confirms: Mutex<HashMap<String, VecDeque<bool>>>,
    interrupts: HashSet<String>,
    messages: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    asked: Mutex<Vec<String>>,
}

impl MockInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, prompt: &str, value: &str) -> Self {
        if let Ok(mut texts) = self.texts.lock() {
            texts
                .entry(prompt.to_string())
                .or_default()
                .push_back(value.to_string());
        }
        self
    }

    pub fn with_confirm(self, prompt: &str, value: bool) -> Self {
        if let Ok(mut confirms) = self.confirms.lock() {
            confirms
                .entry(prompt.to_string())
                .or_default()
                .push_back(value);
        }
        self
    }

    pub fn interrupt_at(mut self, prompt: &str) -> Self {
        self.interrupts.insert(prompt.to_string());
        self
    }

    /// Messages passed to `show`, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Messages passed to `show_error`, in order
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Every prompt label asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn record(&self, prompt: &str) -> WingetResult<()> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(prompt.to_string());
        }
        if self.interrupts.contains(prompt) {
            return Err(WingetError::Interrupted);
        }
        Ok(())
    }

    fn next_text(&self, prompt: &str) -> WingetResult<String> {
        self.texts
            .lock()
            .ok()
            .and_then(|mut texts| texts.get_mut(prompt).and_then(VecDeque::pop_front))
            .ok_or_else(|| WingetError::Config(format!("Unexpected prompt: {}", prompt)))
    }
}

impl UserInput for MockInput {
    fn prompt_text(&self, prompt: &str, _default: Option<&str>) -> WingetResult<String> {
        self.record(prompt)?;
        self.next_text(prompt)
    }

    fn prompt_confirm(&self, prompt: &str, _default: bool) -> WingetResult<bool> {
        self.record(prompt)?;
        self.confirms
            .lock()
            .ok()
            .and_then(|mut confirms| confirms.get_mut(prompt).and_then(VecDeque::pop_front))
            .ok_or_else(|| WingetError::Config(format!("Unexpected prompt: {}", prompt)))
    }

    fn prompt_password(&self, prompt: &str) -> WingetResult<String> {
        self.record(prompt)?;
        self.next_text(prompt)
    }

    fn show(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }

    fn show_error(&self, message: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_are_consumed_in_order() {
        let input = MockInput::new()
            .with_text("Name", "first")
            .with_text("Name", "second")
            .with_confirm("Ok?", false);

        assert_eq!(input.prompt_text("Name", None).unwrap(), "first");
        assert_eq!(input.prompt_text("Name", None).unwrap(), "second");
        assert!(!input.prompt_confirm("Ok?", true).unwrap());
        assert!(matches!(
            input.prompt_text("Name", None),
            Err(WingetError::Config(_))
        ));
        assert_eq!(input.asked(), vec!["Name", "Name", "Ok?", "Name"]);
    }
}
