//! Line-oriented prompting.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password};
use std::io::{BufRead, Write};

/// Asks the operator questions, one line at a time.
///
/// `input` returns the raw response; an empty string means "accept the
/// default". Defaulting itself is the caller's business.
pub trait Prompter {
    fn input(&mut self, label: &str, default: &str) -> Result<String>;

    /// Like `input`, without echoing the response or revealing the default.
    fn secret(&mut self, label: &str, has_default: bool) -> Result<String>;

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool>;
}

/// Prompts on the controlling terminal with `dialoguer`.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, label: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string()).show_default(true);
        }
        let response = input.interact_text().context("Failed to read input")?;
        // dialoguer substitutes the default itself; report it as "accepted".
        Ok(if response == default {
            String::new()
        } else {
            response
        })
    }

    fn secret(&mut self, label: &str, has_default: bool) -> Result<String> {
        let label = if has_default {
            format!("{label} [keep current]")
        } else {
            label.to_string()
        };
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .context("Failed to read input")
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(label)
            .default(default)
            .interact()
            .context("Failed to read input")
    }
}

/// Plain prompt/response over any reader and writer.
///
/// End of input counts as an empty response everywhere.
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.writer, "{question}: ")?;
        self.writer.flush()?;
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .context("Failed to read input")?;
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn input(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            self.ask(label)
        } else {
            self.ask(&format!("{label} [{default}]"))
        }
    }

    fn secret(&mut self, label: &str, has_default: bool) -> Result<String> {
        if has_default {
            self.ask(&format!("{label} [keep current]"))
        } else {
            self.ask(label)
        }
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        let answer = self.ask(&format!("{label} [{hint}]"))?;
        Ok(match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> LinePrompter<&[u8], Vec<u8>> {
        LinePrompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn input_shows_bracketed_default() {
        let mut p = prompter("\n");
        assert_eq!(p.input("Port", "5173").unwrap(), "");
        assert_eq!(String::from_utf8(p.into_writer()).unwrap(), "Port [5173]: ");
    }

    #[test]
    fn input_without_default_has_no_brackets() {
        let mut p = prompter("abc\n");
        assert_eq!(p.input("Gateway token (optional)", "").unwrap(), "abc");
        assert_eq!(
            String::from_utf8(p.into_writer()).unwrap(),
            "Gateway token (optional): "
        );
    }

    #[test]
    fn responses_are_trimmed() {
        let mut p = prompter("  my-app  \r\n");
        assert_eq!(p.input("Project name", "x").unwrap(), "my-app");
    }

    #[test]
    fn end_of_input_is_empty() {
        let mut p = prompter("");
        assert_eq!(p.input("Project name", "x").unwrap(), "");
        assert!(!p.confirm("Overwrite?", false).unwrap());
    }

    #[test]
    fn confirm_parses_yes_and_no() {
        let mut p = prompter("y\nNO\nmaybe\n");
        assert!(p.confirm("a", false).unwrap());
        assert!(!p.confirm("b", true).unwrap());
        assert!(p.confirm("c", true).unwrap());
    }
}
