//! The interactive REPL.

use std::io::{self, Write};

use crate::command::Command;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::render;
use crate::session::Session;
use ambient_foundation::{Error, Result};

/// What the REPL should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text and keep going.
    Output(String),
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Session state (sources and catalog).
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
            show_banner: true,
            prompt: "ambient> ".to_string(),
        }
    }

    /// Sets the session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        let names = self.session.declared_names();
        self.editor.set_names(names);
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            self.editor.add_history(&line);

            match self.eval(&line) {
                Ok(Outcome::Output(text)) => {
                    if !text.is_empty() {
                        println!("{}", text.trim_end());
                    }
                }
                Ok(Outcome::Quit) => break,
                Err(e) => Self::print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Evaluates one line of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is malformed or the query fails.
    pub fn eval(&mut self, line: &str) -> Result<Outcome> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or nothing is loaded.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let text = match command {
            Command::Quit => return Ok(Outcome::Quit),
            Command::Help => HELP.to_string(),
            Command::Resolve(name) => {
                let catalog = self.session.catalog()?;
                catalog
                    .resolve(&name)
                    .map(render::describe)
                    .ok_or_else(|| Error::not_found(name))?
            }
            Command::Type(expr) => self.session.catalog()?.type_of(&expr)?.to_string(),
            Command::Members(class) => {
                let catalog = self.session.catalog()?;
                let members = catalog
                    .members(&class)
                    .ok_or_else(|| Error::not_found(format!("class {class}")))?;
                members
                    .iter()
                    .map(|m| render::describe_member(&class, m))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::List(prefix) => {
                let catalog = self.session.catalog()?;
                catalog
                    .names_with_prefix(prefix.as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::Load(files) => {
                let catalog = self.session.load_files(&files)?;
                let names = self.session.declared_names();
                self.editor.set_names(names);
                format!(
                    "loaded {} declarations from {} sources",
                    catalog.len(),
                    self.session.source_names().count()
                )
            }
            Command::Save(path) => {
                let resolved = self.session.resolve_path(&path);
                self.session.save_snapshot(&resolved)?;
                format!("saved snapshot to {}", resolved.display())
            }
            Command::Sources => {
                let catalog = self.session.catalog()?;
                catalog
                    .sources()
                    .map(|s| match &s.overview {
                        Some(overview) => format!("{} ({} statements): {overview}", s.name, s.statements),
                        None => format!("{} ({} statements)", s.name, s.statements),
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::Unresolved => {
                render::unresolved(&self.session.catalog()?.unresolved_references())
            }
        };
        Ok(Outcome::Output(text))
    }

    /// Prints an error to stderr.
    fn print_error(error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mambient\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for commands, Ctrl+D to exit.\n");
        let _ = io::stdout().flush();
    }
}

const HELP: &str = "\
:resolve NAME      Show the declaration NAME resolves to
:type EXPR         Show the type of a reference expression
                   (path, path(), path(param), path(N))
:members CLASS     List members of a class, inherited ones included
:list [PREFIX]     List top-level names
:load FILE...      Add declaration sources and rebuild
:save PATH         Write a catalog snapshot
:sources           List loaded sources
:unresolved        List names referenced but not declared
:help              Show this help
:quit              Exit
EXPR               Same as :type EXPR";
