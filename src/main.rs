use std::fs;

use clap::Parser;
use moonpad::{
    get_result,
    interpreter::evaluator::core::{Session, SessionConfig},
};
use rustyline::{DefaultEditor, error::ReadlineError};

const PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = "... ";

const HELP: &str = "\
Commands:
  :help   show this message
  :test   run every registered test block
  :quit   leave the REPL (also `exit` or Ctrl-D)

An unclosed `{` keeps the input open; finish it on the following lines.
Ctrl-C discards the pending input.";

/// moonpad evaluates a small MoonBit-flavored expression language, either from
/// a script or interactively.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells moonpad to treat the contents as a path to a script file.
    #[arg(short, long)]
    file: bool,

    /// Rejects assignments to names that were never declared with `let`.
    #[arg(short, long)]
    strict: bool,

    /// Source text or, with `--file`, a script path. Starts the REPL when
    /// omitted.
    contents: Option<String>,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let Some(contents) = args.contents else {
        repl(SessionConfig { strict_mode: args.strict });
        return;
    };

    let script = if args.file {
        fs::read_to_string(&contents).unwrap_or_else(|_| {
                                         eprintln!("Failed to read the input file '{contents}'. Perhaps this file does not exist?");
                                         std::process::exit(1);
                                     })
    } else {
        contents
    };

    match get_result(&script, args.strict) {
        Ok(value) if !value.is_unit() => println!("{value}"),
        Ok(_) => {},
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, only when that variable
/// is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry().with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                                      .with(EnvFilter::from_default_env())
                                      .init();
    }
}

fn repl(config: SessionConfig) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to start the line editor: {e}");
            std::process::exit(1);
        },
    };
    let mut session = Session::with_config(config);
    let mut buffer = String::new();
    let mut interrupted = false;

    println!("Welcome to MoonREPL! Type :help for commands.");

    loop {
        let prompt = if buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT };

        match editor.readline(prompt) {
            Ok(line) => {
                interrupted = false;

                if buffer.is_empty() {
                    match line.trim() {
                        "" => continue,
                        ":quit" | "exit" => break,
                        ":help" => {
                            println!("{HELP}");
                            continue;
                        },
                        ":test" => {
                            run_tests(&mut session);
                            continue;
                        },
                        _ => {},
                    }
                } else {
                    buffer.push('\n');
                }
                buffer.push_str(&line);

                match session.eval(&buffer) {
                    Ok(value) => {
                        if !value.is_unit() {
                            println!("{value}");
                        }
                    },
                    Err(e) if e.is_incomplete() => continue,
                    Err(e) => eprintln!("{e}"),
                }

                let _ = editor.add_history_entry(buffer.as_str());
                buffer.clear();
            },
            Err(ReadlineError::Interrupted) => {
                if !buffer.is_empty() {
                    buffer.clear();
                    interrupted = false;
                } else if interrupted {
                    break;
                } else {
                    interrupted = true;
                    println!("(To exit, press Ctrl+C again or type :quit)");
                }
            },
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Couldn't read input: {e}");
                break;
            },
        }
    }

    println!("Byebye~ MoonREPL!");
}

fn run_tests(session: &mut Session) {
    let outcomes = session.run_tests();
    if outcomes.is_empty() {
        println!("No tests registered.");
        return;
    }

    let passed = outcomes.iter().filter(|outcome| outcome.passed()).count();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("test {} ... ok", outcome.name),
            Err(e) => println!("test {} ... FAILED\n  {e}", outcome.name),
        }
    }
    println!("{passed} passed; {} failed", outcomes.len() - passed);
}
