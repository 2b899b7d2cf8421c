use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{env, fs};

use anyhow::Result;
use clap::Parser;
use nabla_source::{Console, Source};
use tracing_subscriber::EnvFilter;

/// Compiles every `.nabla` file found under `src/` and `deps/` and
/// prints the emitted source to standard output.
#[derive(Parser)]
#[command(name = "nablac")]
struct Cli {
    /// Target language to emit.
    #[arg(long, default_value = "c++")]
    emit: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut console = Console::new(io::stdout());
    if let Some(arg0) = env::args().next() {
        console.set_program_name(arg0);
    }

    match run(&cli, &mut console) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let _ = console.print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, console: &mut Console<io::Stdout>) -> Result<bool> {
    if !Path::new("src").exists() {
        console.print_error("no src/ directory exists in the current directory")?;
        return Ok(false);
    }

    let mut directory_queue: Vec<PathBuf> = vec![PathBuf::from("src"), PathBuf::from("deps")];

    while !directory_queue.is_empty() {
        let current = directory_queue.remove(0);
        if !current.exists() {
            continue;
        }

        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type()?.is_file() {
                if path.extension().map_or(true, |ext| ext != "nabla") {
                    continue;
                }

                let content = fs::read_to_string(&path)?;
                let source = Source::new(path.display().to_string(), content);
                match nabla::emit_source(&source, &cli.emit, console)? {
                    Some(emitted) => print!("{}", emitted),
                    None => return Ok(false),
                }
            } else if entry.file_type()?.is_dir() {
                directory_queue.push(path);
            }
        }
    }

    Ok(true)
}
