//! Interactive prompts behind a trait so handlers can be driven from tests.
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

use crate::{launcher::ProfileSelector, lib::errors::LauncherError, store::Profile};

/// Validation hook for free-text answers; `Err` carries the message shown to the user.
pub type AnswerValidator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Terminal interactions used by the setup and delete flows.
pub trait Prompter {
    /// Pick one of `items`, returning its index.
    fn select(&self, prompt: &str, items: &[String], default: usize)
        -> Result<usize, LauncherError>;
    /// Read a line of text. Empty answers are only accepted when `allow_empty` is set.
    fn input(
        &self,
        prompt: &str,
        allow_empty: bool,
        validate: AnswerValidator<'_>,
    ) -> Result<String, LauncherError>;
    /// Read a masked, non-empty secret.
    fn password(&self, prompt: &str) -> Result<String, LauncherError>;
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, LauncherError>;
}

/// `dialoguer`-backed prompter for an attached terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn select(
        &self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize, LauncherError> {
        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?;
        Ok(index)
    }

    fn input(
        &self,
        prompt: &str,
        allow_empty: bool,
        validate: AnswerValidator<'_>,
    ) -> Result<String, LauncherError> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .validate_with(|input: &String| validate(input.trim()))
            .interact_text()?;
        Ok(answer.trim().to_string())
    }

    fn password(&self, prompt: &str) -> Result<String, LauncherError> {
        loop {
            let secret = Password::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()?;
            let secret = secret.trim();
            if !secret.is_empty() {
                return Ok(secret.to_string());
            }
            eprintln!("API key cannot be empty");
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, LauncherError> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }
}

impl ProfileSelector for TerminalPrompter {
    fn select_profile(
        &self,
        profiles: &[Profile],
        default: Option<&str>,
    ) -> Result<String, LauncherError> {
        let (items, default_index) = selection_items(profiles, default);
        let index = self.select("Select a profile to use", &items, default_index)?;
        profiles
            .get(index)
            .map(|profile| profile.name.clone())
            .ok_or_else(|| LauncherError::Prompt {
                message: format!("selection {index} is out of range"),
            })
    }
}

/// Menu labels for profile selection and the index of the default entry.
pub fn selection_items(profiles: &[Profile], default: Option<&str>) -> (Vec<String>, usize) {
    let items = profiles
        .iter()
        .map(|profile| {
            if Some(profile.name.as_str()) == default {
                format!("{} (default)", profile.name)
            } else {
                profile.name.clone()
            }
        })
        .collect();
    let default_index = default
        .and_then(|name| profiles.iter().position(|profile| profile.name == name))
        .unwrap_or(0);
    (items, default_index)
}
