use clap::Parser;
use labelsmith::cli::{self, output, Cli};
use labelsmith::config::Config;
use tracing::debug;

fn main() {
    let args = Cli::parse();

    let config = match Config::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    debug!(config = %args.config.display(), "labelsmith starting");

    if let Err(e) = cli::dispatch(&args, &config) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
