/* 3rd party libraries */
use env_logger::Env;

/* Custom libraries */
use saga_controller::extract::{copy_solution, report, CopyError, Report, SystemClipboard, SOLUTION_PATH};

/* Main */
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut clipboard = SystemClipboard::new();
    let result = copy_solution(SOLUTION_PATH, &mut clipboard);
    if let Err(CopyError::NotFound(path)) = &result {
        log::debug!("No solution literal in {}", path.display());
    }

    let outcome = report(&result);
    match &outcome {
        Report::Copied(message) => println!("{}", message),
        Report::NothingToCopy(message) => eprintln!("{}", message),
        Report::Failed(e) => log::error!("ERROR: {}", e),
    }
    if outcome.exit_code() != 0 {
        std::process::exit(outcome.exit_code());
    }
}
