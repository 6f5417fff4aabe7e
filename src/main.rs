mod cli;

use std::io;
use std::process;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sous::config::Config;
use sous::storage::Storage;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    init_logging(cli.verbose, config.log_level.as_deref());

    let Some(path) = config.database_path() else {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    };

    let storage = match Storage::open(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open {}: {e}", path.display());
            process::exit(1);
        }
    };

    let knowledge = config.knowledge().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Err(e) = cli::run(cli, &config, &storage, &knowledge) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// `-v` flags win over the configured `log-level`; the default is warn.
fn init_logging(verbose: u8, configured: Option<&str>) {
    let level = match verbose {
        0 => configured
            .and_then(|name| {
                name.parse::<Level>()
                    .inspect_err(|_| eprintln!("warning: unknown log-level '{name}'"))
                    .ok()
            })
            .unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging unavailable: {e}");
    }
}
