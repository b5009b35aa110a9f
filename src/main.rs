use aocfetch::{AocError, Downloader, client::BASE_URL, storage::DOWNLOAD_FOLDER};
use clap::Parser;
use env_logger::{Env, Target};
use log::{debug, error};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Value that asks for the current puzzle day instead of an explicit one.
const UNSET: i32 = -1;

#[derive(Debug, Parser)]
#[command(
    name = "aocfetch",
    version,
    about = "Download an Advent of Code puzzle input",
    allow_negative_numbers = true
)]
struct Cli {
    /// Which AOC year to download; defaults to today (UTC-5)
    #[arg(short, long)]
    year: Option<i32>,

    /// Which AOC day to download; defaults to today (UTC-5)
    #[arg(short, long)]
    day: Option<i32>,

    /// Output file; defaults to <folder>/<year>__<day>.txt
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Folder for inputs saved under their default name
    #[arg(long, default_value = DOWNLOAD_FOLDER)]
    folder: PathBuf,

    #[arg(long, env = "AOC_BASE_URL", default_value = BASE_URL, hide = true)]
    base_url: String,

    /// Log debug details, including the start of the downloaded input
    #[arg(short, long)]
    verbose: bool,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn selector(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != UNSET)
}

/// Open `path` for appending, creating its parent directory first.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
    let default_filter = if verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(open_log_file(path)?)));
    }
    builder.init();
    Ok(())
}

/// Year and day selectors with the unset sentinel removed.
fn date_selectors(cli: &Cli) -> Result<(Option<i32>, Option<u32>), AocError> {
    let year = selector(cli.year);
    let day = selector(cli.day)
        .map(|d| {
            u32::try_from(d).map_err(|_| AocError::InvalidDateRange {
                year,
                day: Some(d.into()),
            })
        })
        .transpose()?;
    Ok((year, day))
}

async fn run(cli: Cli) -> Result<PathBuf, AocError> {
    let (year, day) = date_selectors(&cli)?;

    Downloader::new()
        .with_base_url(cli.base_url)
        .with_download_folder(cli.folder)
        .download_input(year, day, cli.output)
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("could not open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if let Some(hint) = e.hint() {
                debug!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn legacy_sentinel_means_unset() {
        let cli = Cli::parse_from(["aocfetch", "-y", "-1", "-d", "-1"]);
        assert_eq!(selector(cli.year), None);
        assert_eq!(selector(cli.day), None);

        let cli = Cli::parse_from(["aocfetch", "--year", "2023", "--day", "5"]);
        assert_eq!(selector(cli.year), Some(2023));
        assert_eq!(selector(cli.day), Some(5));
        assert_eq!(cli.folder, PathBuf::from(DOWNLOAD_FOLDER));
    }

    #[test]
    fn negative_day_keeps_the_typed_value() {
        let cli = Cli::parse_from(["aocfetch", "--year", "2023", "--day", "-7"]);
        let err = date_selectors(&cli).unwrap_err();
        assert!(matches!(
            err,
            AocError::InvalidDateRange {
                year: Some(2023),
                day: Some(-7)
            }
        ));
        assert!(err.to_string().contains("day=Some(-7)"));
    }

    #[test]
    fn log_file_parent_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs/nested/aocfetch.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn log_file_is_appended_across_runs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("aocfetch.log");
        writeln!(open_log_file(&path).unwrap(), "first run").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second run").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first run\nsecond run\n");
    }

    #[test]
    fn log_file_under_a_regular_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("logs");
        fs::write(&blocker, b"").unwrap();
        assert!(open_log_file(&blocker.join("aocfetch.log")).is_err());
    }
}
