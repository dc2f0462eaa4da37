//! The REPL driven by scripted input

use std::collections::VecDeque;

use ambient_foundation::{ErrorKind, Result};
use ambient_runtime::{Command, LineEditor, Outcome, ReadResult, Repl, Session};

use crate::fixtures_dir;

#[derive(Default)]
struct Scripted {
    lines: VecDeque<String>,
    names: Vec<String>,
}

impl LineEditor for Scripted {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self
            .lines
            .pop_front()
            .map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
    }
}

fn repl() -> Repl<Scripted> {
    let mut session = Session::new();
    session.set_load_path(fixtures_dir());
    Repl::with_editor(Scripted::default())
        .with_session(session)
        .without_banner()
}

fn output(repl: &mut Repl<Scripted>, line: &str) -> String {
    match repl.eval(line).unwrap() {
        Outcome::Output(text) => text,
        Outcome::Quit => panic!("unexpected quit"),
    }
}

#[test]
fn load_then_query() {
    let mut repl = repl();
    assert_eq!(
        output(&mut repl, ":load tls.js http.js https.js"),
        format!(
            "loaded {} declarations from 3 sources",
            repl.session().catalog().unwrap().len()
        )
    );

    assert_eq!(
        output(&mut repl, ":resolve https.Server"),
        "class https.Server() extends tls.Server"
    );
    assert_eq!(
        output(&mut repl, ":r tls.Server"),
        "class tls.Server() extends net.Server (external)"
    );
    assert_eq!(
        output(&mut repl, "https.request(options)"),
        "https.ConnectOptions|string"
    );
    assert_eq!(output(&mut repl, ":t https.request()"), "http.ClientRequest");
    assert_eq!(output(&mut repl, ":list https.g"), "https.get\nhttps.globalAgent");
}

#[test]
fn members_show_where_they_come_from() {
    let mut repl = repl();
    output(&mut repl, ":load tls.js https.js");
    assert_eq!(
        output(&mut repl, ":members https.Server"),
        "function https.Server.prototype.listen(...var_args: *)\n\
         function https.Server.prototype.close(callback: function()=)\n\
         function tls.Server.prototype.addContext(hostname: string, credentials: {key: string, cert: string, ca: string})  [from tls.Server]\n\
         var tls.Server.prototype.maxConnections: number  [from tls.Server]"
    );
}

#[test]
fn sources_and_unresolved() {
    let mut repl = repl();
    output(&mut repl, ":load https.js");
    assert_eq!(
        output(&mut repl, ":sources"),
        "https.js (10 statements): Definitions for node's https module. Depends on the tls module."
    );
    let unresolved = output(&mut repl, ":unresolved");
    assert!(unresolved.contains("tls.Server  (from https.Server)\n"));
    assert!(unresolved.contains("http.ClientRequest  (from https.request)\n"));
}

#[test]
fn errors_do_not_end_the_session() {
    let mut repl = repl();
    let err = repl.eval(":resolve https.Server").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidState { .. }));

    output(&mut repl, ":load https.js");
    let err = repl.eval(":resolve https.nope").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotFound(_)));
    let err = repl.eval(":bogus").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { .. }));
    let err = repl.eval(":load nope.js").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IoError(_)));

    assert!(output(&mut repl, ":resolve https.Agent").starts_with("class https.Agent"));
}

#[test]
fn execute_takes_parsed_commands() {
    let mut repl = repl();
    assert_eq!(repl.execute(Command::Quit).unwrap(), Outcome::Quit);
    let Outcome::Output(help) = repl.execute(Command::Help).unwrap() else {
        panic!("expected help text");
    };
    assert!(help.contains(":members CLASS"));
}

#[test]
fn run_consumes_script_until_quit() {
    let mut session = Session::new();
    session.set_load_path(fixtures_dir());
    let editor = Scripted {
        lines: [":load https.js", ":bogus", "https.globalAgent", ":quit", ":load tls.js"]
            .into_iter()
            .map(String::from)
            .collect(),
        names: Vec::new(),
    };
    let mut repl = Repl::with_editor(editor)
        .with_session(session)
        .without_banner();
    repl.run().unwrap();

    let names: Vec<&str> = repl.session().source_names().collect();
    assert_eq!(names, ["https.js"]);
}
