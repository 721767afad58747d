//! Serialization of converted categories into RiveScript source.

use std::fmt::Write;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::category::{Category, ParsedAiml};
use crate::config::DEFAULT_TOPIC;
use crate::error::Warning;

/// Anything outside the characters a RiveScript trigger may contain.
static TRIGGER_SYNTAX_ERROR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9<>{}= *_#()\[\]]").unwrap());

/// `<br>`, `<br/>` and `<br></br>` as reproduced from the AIML.
static HTML_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\b[^>]*>(?:\s*</br>)?").unwrap());

const HEADER: &str = "// Converted using aiml2rs\n! version = 2.0\n\n";

/// Render a whole file. Categories with invalid triggers are left out and
/// reported as warnings.
pub fn render(parsed: &ParsedAiml) -> (String, Vec<Warning>) {
    let mut out = String::from(HEADER);
    let mut warnings = Vec::new();

    for (topic, categories) in parsed.topics() {
        if topic != DEFAULT_TOPIC {
            let _ = write!(out, "> topic {}\n\n", topic);
        }

        for category in categories {
            match render_category(category) {
                Ok(text) => out.push_str(&text),
                Err(warning) => warnings.push(warning),
            }
        }

        if topic != DEFAULT_TOPIC {
            out.push_str("< topic\n\n");
        }
    }

    (out, warnings)
}

pub fn render_category(category: &Category) -> Result<String, Warning> {
    let trigger = category.pattern.to_lowercase();
    if TRIGGER_SYNTAX_ERROR.is_match(&trigger) {
        return Err(Warning::InvalidTrigger { trigger });
    }

    let mut out = format!("+ {}\n", trigger);

    if !category.that.is_empty() {
        let that = category.that.to_lowercase();
        let that = TRIGGER_SYNTAX_ERROR.replace_all(&that, "");
        let _ = writeln!(out, "% {}", that);
    }

    for condition in &category.conditions {
        let _ = writeln!(out, "* {}", reply_text(condition));
    }

    let _ = write!(out, "- {}\n\n", reply_text(&category.template));
    Ok(out)
}

/// Newlines already in the text become the `\n` escape; `<br/>` markup
/// becomes a real line break.
fn reply_text(text: &str) -> String {
    let text = text.replace('\n', "\\n");
    HTML_BREAK.replace_all(&text, "\n").trim().to_string()
}
