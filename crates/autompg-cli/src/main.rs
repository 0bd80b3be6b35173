mod config;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use autompg_core::Dataset;
use autompg_store::{LoadOptions, LoadReport};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "autompg", version, about = "Analyze the Auto MPG data set")]
struct Cli {
    /// Path to the raw data file (auto-mpg.data.txt)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Never download the raw file, even if it is missing
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record
    Print {
        /// Sorting order for the data
        #[arg(short, long, default_value = "default")]
        sort: SortKey,

        /// Output file name (stdout if omitted)
        #[arg(short, long)]
        ofile: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Average mpg for each model year
    MpgByYear {
        /// Output file name (stdout if omitted)
        #[arg(short, long)]
        ofile: Option<PathBuf>,
    },

    /// Average mpg for each manufacturer
    MpgByMake {
        /// Output file name (stdout if omitted)
        #[arg(short, long)]
        ofile: Option<PathBuf>,
    },

    /// Create the cleaned copy of the raw file and print its path
    Clean,

    /// Show current configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    /// mpg, year, make, model
    Default,
    /// make, model, year, mpg
    Name,
    /// year, make, model, mpg
    Year,
    /// mpg, make, model, year
    Mpg,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn default_data_path() -> PathBuf {
    directories::ProjectDirs::from("org", "autompg", "autompg")
        .map(|dirs| dirs.data_dir().join("auto-mpg.data.txt"))
        .unwrap_or_else(|| PathBuf::from("auto-mpg.data.txt"))
}

fn resolve_data_path(cli_path: Option<PathBuf>, config: &Config) -> PathBuf {
    cli_path
        .or_else(|| config.source.path.as_ref().map(PathBuf::from))
        .unwrap_or_else(default_data_path)
}

fn open_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let (dataset, report) = autompg_store::load(path, options)
        .with_context(|| format!("failed to load {}", path.display()))?;
    log_report(&report);
    Ok(dataset)
}

fn log_report(report: &LoadReport) {
    if report.skipped > 0 {
        tracing::warn!(
            skipped = report.skipped,
            parsed = report.parsed,
            "some lines could not be parsed"
        );
    }
}

/// `RUST_LOG` directives when set and valid, `warn` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let cli = Cli::parse();
    let config = config::load_config()?;
    let options = config.load_options(cli.offline);
    let path = resolve_data_path(cli.data, &config);

    match cli.command {
        Commands::Print {
            sort,
            ofile,
            format,
        } => cmd_print(&path, &options, sort, ofile.as_deref(), format),
        Commands::MpgByYear { ofile } => cmd_mpg_by_year(&path, &options, ofile.as_deref()),
        Commands::MpgByMake { ofile } => cmd_mpg_by_make(&path, &options, ofile.as_deref()),
        Commands::Clean => cmd_clean(&path, &options),
        Commands::Config => cmd_config(&config, &path),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn sort_dataset(dataset: &mut Dataset, sort: SortKey) {
    match sort {
        SortKey::Default => dataset.sort_default(),
        SortKey::Name => dataset.sort_by_name(),
        SortKey::Year => dataset.sort_by_year(),
        SortKey::Mpg => dataset.sort_by_measurement(),
    }
}

fn cmd_print(
    path: &Path,
    options: &LoadOptions,
    sort: SortKey,
    ofile: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut dataset = open_dataset(path, options)?;
    sort_dataset(&mut dataset, sort);

    let out = report::open_output(ofile)?;
    match format {
        OutputFormat::Csv => report::write_records_csv(out, &dataset),
        OutputFormat::Json => report::write_records_json(out, dataset.records()),
    }
}

fn cmd_mpg_by_year(path: &Path, options: &LoadOptions, ofile: Option<&Path>) -> Result<()> {
    let dataset = open_dataset(path, options)?;
    let out = report::open_output(ofile)?;
    report::write_averages_csv(out, ["Year", "Average MPG"], &dataset.average_by_year())
}

fn cmd_mpg_by_make(path: &Path, options: &LoadOptions, ofile: Option<&Path>) -> Result<()> {
    let dataset = open_dataset(path, options)?;
    let out = report::open_output(ofile)?;
    report::write_averages_csv(
        out,
        ["Make", "Average MPG"],
        &dataset.average_by_manufacturer(),
    )
}

fn cmd_clean(path: &Path, options: &LoadOptions) -> Result<()> {
    let clean = autompg_store::ensure_cleaned(path, options.download, &options.url)
        .with_context(|| format!("failed to clean {}", path.display()))?;
    println!("{}", clean.display());
    Ok(())
}

fn cmd_config(config: &Config, path: &Path) -> Result<()> {
    println!("Config:      {}", config::show_config_path());
    println!("Data file:   {}", path.display());
    println!("Clean copy:  {}", autompg_store::cleaned_path(path).display());
    println!("Source URL:  {}", config.source.url);
    println!("Download:    {}", config.source.download);
    println!("Year offset: {}", config.dataset.year_offset);
    println!("Title case:  {}", config.dataset.title_case);
    if !config.dataset.corrections.is_empty() {
        println!("Extra corrections:");
        for (typo, canonical) in &config.dataset.corrections {
            println!("  {typo:<20} -> {canonical}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> LoadOptions {
        LoadOptions {
            download: false,
            ..LoadOptions::default()
        }
    }

    fn write_fixture(dir: &Path) -> PathBuf {
        let raw = dir.join("auto-mpg.data.txt");
        std::fs::write(
            &raw,
            "18.0   8   307.0      130.0      3504.      12.0   70  1\t\"chevrolet chevelle malibu\"\n\
             26.0   4   97.00      46.00      1835.      20.5   70  2\t\"vw 1131 deluxe sedan\"\n\
             25.0   4   98.00      ?          2046.      19.0   71  1\t\"ford pinto\"\n",
        )
        .unwrap();
        raw
    }

    #[test]
    fn test_cli_parses_print() {
        let cli = Cli::try_parse_from(["autompg", "--offline", "print", "-s", "year", "-f", "json"])
            .unwrap();
        assert!(cli.offline);
        assert!(matches!(
            cli.command,
            Commands::Print {
                sort: SortKey::Year,
                format: OutputFormat::Json,
                ofile: None,
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["autompg", "print", "--sort", "weight"]).is_err());
    }

    #[test]
    fn test_log_filter_keeps_rust_log_level() {
        assert_eq!(log_filter(Some("info")).to_string(), "info");
        assert_eq!(
            log_filter(Some("autompg_store=debug")).to_string(),
            "autompg_store=debug"
        );
        assert_eq!(log_filter(None).to_string(), "warn");
        assert_eq!(log_filter(Some("autompg_store=loud")).to_string(), "warn");
    }

    #[test]
    fn test_resolve_data_path() {
        let mut config = Config::default();
        config.source.path = Some("/from/config.data.txt".into());
        assert_eq!(
            resolve_data_path(Some(PathBuf::from("/from/cli")), &config),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            resolve_data_path(None, &config),
            PathBuf::from("/from/config.data.txt")
        );
        assert!(resolve_data_path(None, &Config::default()).ends_with("auto-mpg.data.txt"));
    }

    #[test]
    fn test_sort_dataset_by_year() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_fixture(dir.path());
        let mut dataset = open_dataset(&raw, &offline()).unwrap();

        sort_dataset(&mut dataset, SortKey::Year);
        let makes: Vec<&str> = dataset.iter().map(|r| r.manufacturer()).collect();
        assert_eq!(makes, ["chevrolet", "volkswagen", "ford"]);

        sort_dataset(&mut dataset, SortKey::Default);
        let mpgs: Vec<f64> = dataset.iter().map(|r| r.mpg()).collect();
        assert_eq!(mpgs, [18.0, 25.0, 26.0]);
    }

    #[test]
    fn test_print_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_fixture(dir.path());
        let out = dir.path().join("out.csv");

        cmd_print(&raw, &offline(), SortKey::Mpg, Some(&out), OutputFormat::Csv).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "chevrolet,chevelle malibu,1970,18.0\n\
             ford,pinto,1971,25.0\n\
             volkswagen,1131 deluxe sedan,1970,26.0\n"
        );
    }

    #[test]
    fn test_mpg_by_year_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_fixture(dir.path());
        let out = dir.path().join("years.csv");

        cmd_mpg_by_year(&raw, &offline(), Some(&out)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "Year,Average MPG\n1970,22.0\n1971,25.0\n"
        );
    }

    #[test]
    fn test_mpg_by_make_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_fixture(dir.path());
        let out = dir.path().join("makes.csv");

        cmd_mpg_by_make(&raw, &offline(), Some(&out)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "Make,Average MPG\nchevrolet,18.0\nford,25.0\nvolkswagen,26.0\n"
        );
    }

    #[test]
    fn test_missing_data_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("auto-mpg.data.txt");
        let err = open_dataset(&raw, &offline()).unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }
}
