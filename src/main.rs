use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    thread,
};

use clap::Parser;
use peridot::{
    interpreter::{
        config::{Config, DEFAULT_MAX_CALL_DEPTH},
        evaluator::core::Interpreter,
    },
    logging, run_file,
};
use supports_color::Stream;

/// Stack size of the thread running the interpreter.
const INTERPRETER_STACK: usize = 512 * 1024 * 1024;

/// Runs a Peri.dot script.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The script to run.
    file: PathBuf,

    /// Additional directories searched for included modules.
    #[arg(short = 'I', long = "include", env = "PERIDOT_PATH", value_delimiter = ':')]
    include: Vec<PathBuf>,

    /// Maximum depth of nested function calls.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Enables debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Disables coloured diagnostics.
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.debug) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let worker = thread::Builder::new().name("interpreter".to_owned())
                                       .stack_size(INTERPRETER_STACK)
                                       .spawn(move || execute(&args));
    match worker.map(thread::JoinHandle::join) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Failed to start the interpreter: {e}");
            ExitCode::FAILURE
        },
    }
}

fn execute(args: &Args) -> ExitCode {
    let mut interpreter = Interpreter::new(config(args));
    let colored = !args.no_color && logging::detect_ansi(Stream::Stderr);

    match run_file(&mut interpreter, &args.file) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.render(colored));
            ExitCode::FAILURE
        },
    }
}

/// Search order: the script's directory, `--include` directories, then the
/// working directory.
fn config(args: &Args) -> Config {
    let script_dir = args.file
                         .parent()
                         .filter(|dir| !dir.as_os_str().is_empty())
                         .unwrap_or_else(|| Path::new("."));

    let mut search_paths = vec![script_dir.to_path_buf()];
    search_paths.extend(args.include.iter().cloned());
    search_paths.push(PathBuf::from("."));

    Config { search_paths,
             max_call_depth: args.max_depth }
}
