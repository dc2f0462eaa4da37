//! Ambient CLI entry point.

use ambient_catalog::LoadOptions;
use ambient_runtime::{Repl, Session, logging, render};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    dump: bool,
    unresolved: bool,
    lenient_params: bool,
    strict_tags: bool,
    resolve: Vec<String>,
    types: Vec<String>,
    snapshot_out: Option<PathBuf>,
    snapshot_in: Option<PathBuf>,
}

impl CliConfig {
    /// Whether the run ends after the one-shot actions.
    fn exits_after_actions(&self) -> bool {
        self.batch_mode
            || self.dump
            || self.unresolved
            || !self.resolve.is_empty()
            || !self.types.is_empty()
            || self.snapshot_out.is_some()
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions::new()
            .strict_params(!self.lenient_params)
            .allow_unknown_tags(!self.strict_tags)
    }
}

fn main() -> ExitCode {
    logging::init();
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--dump" => config.dump = true,
            "--unresolved" => config.unresolved = true,
            "--lenient-params" => config.lenient_params = true,
            "--strict-tags" => config.strict_tags = true,
            "-r" | "--resolve" => config.resolve.push(value("--resolve")?),
            "-t" | "--type" => config.types.push(value("--type")?),
            "--snapshot" => config.snapshot_out = Some(PathBuf::from(value("--snapshot")?)),
            "--from-snapshot" => {
                config.snapshot_in = Some(PathBuf::from(value("--from-snapshot")?));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}").into());
            }
            path => config.files.push(PathBuf::from(path)),
        }
    }

    if config.snapshot_in.is_some() && !config.files.is_empty() {
        return Err("--from-snapshot cannot be combined with source files".into());
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("ambient {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut session = Session::with_options(config.load_options());
    if let Some(path) = &config.snapshot_in {
        session.load_snapshot(path)?;
    } else if !config.files.is_empty() {
        session.load_files(&config.files)?;
    }
    debug!(files = config.files.len(), "session ready");

    if config.exits_after_actions() {
        let catalog = session.catalog()?;
        for name in &config.resolve {
            match catalog.resolve(name) {
                Some(decl) => println!("{}", render::describe(decl)),
                None => return Err(format!("not found: {name}").into()),
            }
        }
        for expr in &config.types {
            println!("{}", catalog.type_of(expr)?);
        }
        if config.dump {
            print!("{}", render::dump(catalog));
        }
        if config.unresolved {
            print!("{}", render::unresolved(&catalog.unresolved_references()));
        }
        if let Some(path) = &config.snapshot_out {
            session.save_snapshot(path)?;
            eprintln!("wrote snapshot {}", path.display());
        }
        return Ok(());
    }

    // Files establish context, so skip the banner
    let mut repl = Repl::new()?.with_session(session);
    if !config.files.is_empty() || config.snapshot_in.is_some() {
        repl = repl.without_banner();
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mambient\x1b[0m - Ambient declaration catalog for externs files

\x1b[1mUSAGE:\x1b[0m
    ambient [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Externs files to load, sharing one namespace

\x1b[1mOPTIONS:\x1b[0m
    -h, --help               Print help information
    -V, --version            Print version information
    -b, --batch              Load files and exit (no REPL)
    -r, --resolve NAME       Print the declaration NAME resolves to
    -t, --type EXPR          Print the type of a reference expression
    --dump                   Print every declaration
    --unresolved             Print names referenced but not declared
    --snapshot PATH          Write a catalog snapshot to PATH
    --from-snapshot PATH     Load a snapshot instead of source files
    --lenient-params         Ignore @param names missing from the stub
    --strict-tags            Reject unknown doc tags

\x1b[1mENVIRONMENT:\x1b[0m
    AMBIENT_LOG              Log filter (falls back to RUST_LOG)

\x1b[1mEXAMPLES:\x1b[0m
    ambient tls.js https.js                        Load, then start REPL
    ambient -b https.js                            Check that a file loads
    ambient https.js -t 'https.request(options)'   Query a parameter type
    ambient tls.js https.js --snapshot node.msgpack"
    );
}
