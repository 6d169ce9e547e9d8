//! Command-line tokenizer.
//!
//! A single left-to-right pass that sorts every token into exactly one of
//! flags, key/value options, or positionals. Unknown options are kept and
//! left for the command that runs to interpret (or ignore).

use std::collections::{BTreeMap, BTreeSet};

/// Options that take a value in `--name <value>` form.
pub const VALUE_OPTIONS: &[&str] = &[
    "project-name",
    "gateway-url",
    "gateway-token",
    "gateway-password",
    "port",
];

/// Tokenized process arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    pub flags: BTreeSet<String>,
    pub values: BTreeMap<String, String>,
    pub positionals: Vec<String>,
}

impl ParsedArguments {
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The subcommand, if any: the first positional.
    pub fn command(&self) -> Option<&str> {
        self.positionals.first().map(String::as_str)
    }

    pub fn wants_help(&self) -> bool {
        self.has_flag("help")
    }
}

/// Tokenize `tokens` (without the program name).
pub fn parse<I, S>(tokens: I) -> ParsedArguments
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
    let mut parsed = ParsedArguments::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if !token.starts_with('-') {
            parsed.positionals.push(token.clone());
        } else if token == "-h" || token == "--help" {
            parsed.flags.insert("help".to_string());
        } else if !token.starts_with("--") {
            parsed.flags.insert(flag_name(token, "-"));
        } else if let Some((name, value)) = token[2..].split_once('=') {
            parsed.values.insert(name.to_string(), value.to_string());
        } else {
            let name = flag_name(token, "--");
            match tokens.get(i + 1) {
                Some(next) if VALUE_OPTIONS.contains(&name.as_str()) && !next.starts_with('-') => {
                    parsed.values.insert(name, next.clone());
                    i += 2;
                    continue;
                }
                _ => {
                    parsed.flags.insert(name);
                }
            }
        }

        i += 1;
    }

    parsed
}

/// Strip the dash prefix; degenerate tokens (`-`, `--`) keep their spelling.
fn flag_name(token: &str, prefix: &str) -> String {
    match token.strip_prefix(prefix) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => token.to_string(),
    }
}
