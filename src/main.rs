// src/main.rs

use ftrap::errors::EXIT_INTERNAL_ERROR;
use ftrap::exec::exit_with;
use ftrap::{Outcome, cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("ftrap: failed to initialise logging: {err}");
    }

    match run(args).await {
        Ok(Outcome::DryRun) => {}
        Ok(Outcome::Finished(disposition)) => exit_with(disposition),
        Err(err) => {
            eprintln!("ftrap: {err}");
            std::process::exit(EXIT_INTERNAL_ERROR);
        }
    }
}
