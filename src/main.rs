use std::path::PathBuf;

use clap::Parser;

mod app;
mod config;
mod core;
mod utils;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sort movie files into 'Title (Year)' folders")]
struct Args {
    /// Movie folder to organize. Prompted for when omitted.
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Only print what would be moved
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,

    /// Config file (default: $MOVIEREORG_CONFIG_PATH or ./config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load ./.env (optional) before anything reads the environment.
    if let Err(e) = dotenvy::from_path("./.env") {
        if !e.not_found() {
            panic!("{e}");
        }
    }

    let args = Args::parse();

    let mut config = match config::Config::init(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {e}");
            std::process::exit(2);
        }
    };
    config.library.dry_run |= args.dry_run;
    config.library.fail_fast |= args.fail_fast;
    app::common::init_logging(&config);

    let directory = match args.path {
        Some(p) => p,
        None => match app::common::prompt_directory() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to read directory from stdin: {e}");
                std::process::exit(2);
            }
        },
    };

    match app::common::check_directory(&directory, &mut std::io::stdout()) {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            tracing::error!("Failed to write to stdout: {e}");
            std::process::exit(2);
        }
    }

    let provider = match core::metadata::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Metadata provider configuration error: {e}");
            std::process::exit(2);
        }
    };

    let options = core::organizer::OrganizeOptions::from_config(&config.library);
    let report = match core::organizer::organize(&directory, provider.as_ref(), &options).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to organize '{}': {e}", directory.display());
            std::process::exit(1);
        }
    };

    for outcome in &report.outcomes {
        println!("{outcome}");
    }
    tracing::info!(
        "Done: {} moved, {} skipped, {} failed{}",
        report.moved(),
        report.skipped(),
        report.failed(),
        if report.halted { " (stopped early)" } else { "" }
    );

    if report.failed() > 0 {
        std::process::exit(1);
    }
}
