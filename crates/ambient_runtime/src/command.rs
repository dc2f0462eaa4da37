//! REPL command parsing.

use ambient_foundation::{Error, ErrorKind, Result};

/// Names of the REPL commands, for completion and help.
pub const COMMAND_NAMES: &[&str] = &[
    ":resolve",
    ":type",
    ":members",
    ":list",
    ":load",
    ":save",
    ":sources",
    ":unresolved",
    ":help",
    ":quit",
];

/// A parsed REPL command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `:resolve NAME`
    Resolve(String),
    /// `:type EXPR`, or a bare expression.
    Type(String),
    /// `:members CLASS`
    Members(String),
    /// `:list [PREFIX]`
    List(Option<String>),
    /// `:load FILE...`
    Load(Vec<String>),
    /// `:save PATH`
    Save(String),
    /// `:sources`
    Sources,
    /// `:unresolved`
    Unresolved,
    /// `:help`
    Help,
    /// `:quit` or `:q`
    Quit,
}

fn usage(column: usize, message: String) -> Error {
    Error::new(ErrorKind::ParseError {
        message,
        line: 1,
        column: u32::try_from(column).unwrap_or(u32::MAX),
    })
}

impl Command {
    /// Parses one line of REPL input.
    ///
    /// Input not starting with `:` is a `typeOf` expression.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for an unknown command or missing argument.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Self::Type(line.to_string()));
        };
        let (name, args) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(n, a)| (n, a.trim()));

        let one = |what: &str| {
            if args.is_empty() {
                Err(usage(line.len() + 1, format!(":{name} needs {what}")))
            } else {
                Ok(args.to_string())
            }
        };

        match name {
            "resolve" | "r" => one("a name").map(Self::Resolve),
            "type" | "t" => one("an expression").map(Self::Type),
            "members" | "m" => one("a class name").map(Self::Members),
            "list" | "ls" => Ok(Self::List((!args.is_empty()).then(|| args.to_string()))),
            "load" => {
                let files: Vec<String> = args.split_whitespace().map(str::to_string).collect();
                if files.is_empty() {
                    Err(usage(line.len() + 1, ":load needs at least one file".into()))
                } else {
                    Ok(Self::Load(files))
                }
            }
            "save" => one("a path").map(Self::Save),
            "sources" => Ok(Self::Sources),
            "unresolved" => Ok(Self::Unresolved),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(usage(2, format!("unknown command :{other}"))),
        }
    }
}
