//! Terminal prompts behind a small trait so the menu can be scripted.

use dialoguer::{Confirm, Input, Select};
use std::fmt::Debug;
use std::io;
use std::str::FromStr;

const INVALID_VALUE: &str = "Invalid value, please try again.";

/// Questions the console asks. Every method re-asks until the answer fits.
pub trait Prompter {
    /// Index of the chosen entry in `items`
    fn select(&mut self, prompt: &str, items: &[&str]) -> io::Result<usize>;

    /// Trimmed, non-blank text
    fn text(&mut self, prompt: &str, empty_message: &str) -> io::Result<String>;

    fn number<T>(&mut self, prompt: &str) -> io::Result<T>
    where
        T: FromStr + Clone + ToString,
        T::Err: Debug + ToString;

    /// Blank input means `None`; anything else must parse as `T`
    fn optional<T: FromStr>(&mut self, prompt: &str) -> io::Result<Option<T>>;

    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

impl<P: Prompter> Prompter for &mut P {
    fn select(&mut self, prompt: &str, items: &[&str]) -> io::Result<usize> {
        (**self).select(prompt, items)
    }

    fn text(&mut self, prompt: &str, empty_message: &str) -> io::Result<String> {
        (**self).text(prompt, empty_message)
    }

    fn number<T>(&mut self, prompt: &str) -> io::Result<T>
    where
        T: FromStr + Clone + ToString,
        T::Err: Debug + ToString,
    {
        (**self).number(prompt)
    }

    fn optional<T: FromStr>(&mut self, prompt: &str) -> io::Result<Option<T>> {
        (**self).optional(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        (**self).confirm(prompt)
    }
}

/// Interactive prompts on the controlling terminal (stderr).
#[derive(Debug, Default)]
pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> io::Result<usize> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact().map_err(term_err)?)
    }

    fn text(&mut self, prompt: &str, empty_message: &str) -> io::Result<String> {
        let empty_message = empty_message.to_string();
        let value: String = Input::new()
            .with_prompt(prompt)
            .validate_with(move |input: &String| -> Result<(), String> {
                if input.trim().is_empty() {
                    Err(empty_message.clone())
                } else {
                    Ok(())
                }
            })
            .interact_text().map_err(term_err)?;
        Ok(value.trim().to_string())
    }

    fn number<T>(&mut self, prompt: &str) -> io::Result<T>
    where
        T: FromStr + Clone + ToString,
        T::Err: Debug + ToString,
    {
        Ok(Input::<T>::new().with_prompt(prompt).interact_text().map_err(term_err)?)
    }

    fn optional<T: FromStr>(&mut self, prompt: &str) -> io::Result<Option<T>> {
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), &'static str> {
                let input = input.trim();
                if input.is_empty() || input.parse::<T>().is_ok() {
                    Ok(())
                } else {
                    Err(INVALID_VALUE)
                }
            })
            .interact_text().map_err(term_err)?;

        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        Ok(value.parse().ok())
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact().map_err(term_err)?)
    }
}

/// dialoguer 0.11 wraps terminal I/O failures in its own single-variant error.
fn term_err(e: dialoguer::Error) -> io::Error {
    match e {
        dialoguer::Error::IO(e) => e,
    }
}
