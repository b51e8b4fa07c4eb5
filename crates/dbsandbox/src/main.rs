use std::process::ExitCode;

use clap::Parser;
use dbsandbox::cli::{self, App};
use dbsandbox::logging;

fn main() -> ExitCode {
    let app = App::parse();
    logging::init(app.verbosity());

    match app.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", cli::render_error(&err));
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
