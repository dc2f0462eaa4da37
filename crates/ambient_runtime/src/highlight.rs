//! Syntax highlighting for REPL input.

use std::borrow::Cow;

/// Highlighter for commands and reference expressions.
pub struct AmbientHighlighter {}

impl AmbientHighlighter {
    /// Creates a new highlighter.
    pub const fn new() -> Self {
        Self {}
    }

    /// Highlight a line of input.
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }
        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                // Commands
                ':' => {
                    result.push_str("\x1b[36m"); // cyan
                    result.push(c);
                    while let Some(next) = chars.next_if(|n| n.is_alphanumeric()) {
                        result.push(next);
                    }
                    result.push_str("\x1b[0m");
                }

                // Positional parameters
                c if c.is_ascii_digit() => {
                    result.push_str("\x1b[35m"); // magenta
                    result.push(c);
                    while let Some(next) = chars.next_if(char::is_ascii_digit) {
                        result.push(next);
                    }
                    result.push_str("\x1b[0m");
                }

                // Call suffix
                '(' | ')' => {
                    result.push_str("\x1b[1m"); // bold
                    result.push(c);
                    result.push_str("\x1b[0m");
                }

                // Name segments; `prototype` is dimmed
                c if c.is_alphabetic() || c == '_' || c == '$' => {
                    let mut word = String::from(c);
                    while let Some(next) =
                        chars.next_if(|n| n.is_alphanumeric() || *n == '_' || *n == '$')
                    {
                        word.push(next);
                    }
                    if word == "prototype" {
                        result.push_str("\x1b[2m");
                        result.push_str(&word);
                        result.push_str("\x1b[0m");
                    } else {
                        result.push_str(&word);
                    }
                }

                _ => result.push(c),
            }
        }

        Cow::Owned(result)
    }
}

impl Default for AmbientHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
