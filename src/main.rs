use std::{
    fs,
    io::{self, BufRead, Write},
    process,
};

use clap::Parser;
use ecmalite::{global_environment, interpret};
use tracing_subscriber::EnvFilter;

/// ecmalite runs programs written in a small JavaScript-like scripting
/// language. Without a script it starts an interactive prompt.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells ecmalite to treat the contents as a path to a script file.
    #[arg(short, long)]
    file: bool,

    /// The script to run, or its path with `--file`.
    contents: Option<String>,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();

    let Some(contents) = args.contents else {
        repl();
        return;
    };

    let script = if args.file {
        fs::read_to_string(&contents).unwrap_or_else(|_| {
                                         eprintln!("Failed to read the input file '{contents}'. Perhaps this file does not exist?");
                                         process::exit(1);
                                     })
    } else {
        contents
    };

    match interpret(&script, &global_environment()) {
        Ok(value) => println!("{value}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        },
    }
}

/// Reads programs line by line from standard input, all sharing one
/// environment. Errors are printed and the prompt continues.
fn repl() {
    let environment = global_environment();
    let stdin = io::stdin();

    prompt();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };

        if !line.trim().is_empty() {
            match interpret(&line, &environment) {
                Ok(value) => println!("{value}"),
                Err(e) => eprintln!("{e}"),
            }
        }
        prompt();
    }
}

fn prompt() {
    print!("> ");
    // A closed stdout only loses the prompt.
    let _ = io::stdout().flush();
}
