// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

use bikeshare_explorer::{
    load_region, report, DayFilter, FilterSpec, MonthFilter, Region, Session, StatsSummary,
};

#[derive(Parser)]
#[command(name = "bikeshare", version, about = "Explore US bikeshare trip data")]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, default_value = ".", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive prompts (default)
    Explore,
    /// Print statistics for one filter and exit
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Full-screen viewer over the filtered trips
    Browse {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// chicago, "new york city" or washington
    #[arg(long)]
    city: Region,

    /// january .. june, or all
    #[arg(long, default_value = "all")]
    month: MonthFilter,

    /// monday .. sunday, or all
    #[arg(long, default_value = "all")]
    day: DayFilter,
}

impl FilterArgs {
    fn spec(&self) -> FilterSpec {
        FilterSpec::new(self.city, self.month, self.day)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Explore) {
        Command::Explore => run_explore(&cli.data_dir),
        Command::Summary { filter, json } => run_summary(&cli.data_dir, &filter.spec(), json),
        Command::Browse { filter } => run_browse(&cli.data_dir, &filter.spec()),
    };

    if let Err(err) = result {
        eprintln!("❌ {err:#}");
        std::process::exit(1);
    }
}

fn run_explore(data_dir: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), data_dir);
    session.run()
}

fn run_summary(data_dir: &Path, spec: &FilterSpec, json: bool) -> Result<()> {
    let dataset = load_region(data_dir, spec.region)
        .with_context(|| format!("Failed to load data for {}", spec.region))?;
    let records = dataset.filtered(spec);
    let summary = StatsSummary::compute(&records, dataset.schema);

    if json {
        let body = report::summary_json(spec, &summary)?;
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("📊 {spec}");
        print!("{}", report::format_summary(&summary));
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_browse(data_dir: &Path, spec: &FilterSpec) -> Result<()> {
    let dataset = load_region(data_dir, spec.region)
        .with_context(|| format!("Failed to load data for {}", spec.region))?;
    let records = dataset.filtered(spec);
    let summary = StatsSummary::compute(&records, dataset.schema);

    let mut app = ui::App::new(*spec, &records, summary);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_browse(_data_dir: &Path, _spec: &FilterSpec) -> Result<()> {
    anyhow::bail!("browse mode not available, rebuild with: cargo build --features tui")
}
