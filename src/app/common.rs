use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub fn init_logging(config: &crate::config::Config) {
    let level = Level::from_str(&config.logs.level).unwrap_or(Level::INFO);
    let http_level = if config.logs.enable_reqwest_logging {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::new(format!(
        "{level},reqwest={http_level},hyper={http_level},hyper_util={http_level}"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Ask the operator for the movie folder on stdin.
pub fn prompt_directory() -> io::Result<PathBuf> {
    let stdin = io::stdin();
    read_directory(&mut stdin.lock(), &mut io::stdout())
}

fn read_directory<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<PathBuf> {
    write!(output, "Enter the path to your movie folder: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

/// `false` (after telling the operator) when `dir` is not a directory.
pub fn check_directory<W: Write>(dir: &Path, output: &mut W) -> io::Result<bool> {
    if dir.is_dir() {
        return Ok(true);
    }
    writeln!(output, "Invalid directory.")?;
    Ok(false)
}
