use std::io;
use std::process::ExitCode;
use std::{env, fs};

use anyhow::Result;
use nabla_source::{Console, Source};
use nabla_vm::StdoutRuntime;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut console = Console::new(io::stdout());
    if let Some(arg0) = env::args().next() {
        console.set_program_name(arg0);
    }

    match run(&mut console) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let _ = console.print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Compiles and runs every `.nabla` file in the current directory, in
/// directory-iteration order. Stops at the first file that fails.
fn run(console: &mut Console<io::Stdout>) -> Result<bool> {
    let mut runtime = StdoutRuntime;

    for entry in fs::read_dir(".")? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "nabla") {
            continue;
        }

        let content = fs::read_to_string(&path)?;
        let source = Source::new(path.display().to_string(), content);
        if !nabla::interpret_source(&source, &mut runtime, console)? {
            return Ok(false);
        }
    }

    Ok(true)
}
