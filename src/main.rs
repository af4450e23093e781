use anyhow::Result;

use chess_band_performance::cli::Command;
use chess_band_performance::{
    handle_analyze, handle_build_reference, handle_completions, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Analyze(args) => handle_analyze(args),
        Command::BuildReference {
            input,
            output,
            min_rating,
            column,
        } => handle_build_reference(input, output, *min_rating, *column),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
