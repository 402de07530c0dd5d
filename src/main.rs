//! Spendline CLI
//!
//! Command-line front end for the record manager and the chart renderer:
//! - List, add, edit and delete consumption records
//! - Render the line chart to SVG
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use spendline::chart::{render_chart_svg, series_from_json, write_chart_svg, Curve};
use spendline::config::{generate_default_config, Config};
use spendline::logging::init_logging;
use spendline::records::{
    parse_date, ConsoleNotifier, Confirmer, ConsumptionRecord, ConsumptionService, Field,
    FixedAnswer, HttpConsumptionService, InMemoryConsumptionService, LoadState, Outcome,
    RecordManager, StdinConfirmer,
};

#[derive(Parser)]
#[command(name = "spendline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track consumption records and chart them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: searched in the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Record server URL (overrides the config file)
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// Use a process-local record store instead of the server
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage consumption records
    Records {
        #[command(subcommand)]
        action: RecordsCommand,
    },

    /// Render the line chart as SVG
    Chart {
        /// JSON file with a list of {"name", "points": [[x, y], ...]} series
        #[arg(short, long)]
        series: Option<PathBuf>,
        /// Curve between points (linear, basis)
        #[arg(long)]
        curve: Option<Curve>,
        /// Output file, or "-" for stdout
        #[arg(short, long, default_value = "chart.svg")]
        out: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum RecordsCommand {
    /// List all records
    List,

    /// Add a record
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        category: String,
        /// Amount spent
        #[arg(long)]
        value: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        remark: Option<String>,
        /// Date (default: now). RFC 3339, YYYY-MM-DD, "YYYY-MM-DD HH:MM" or "05-Mar-2024 07:30 PM"
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit fields of an existing record
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        value: Option<f64>,
        #[arg(long)]
        source: Option<String>,
        /// New remark; an empty string clears it
        #[arg(long)]
        remark: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a record
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.service_url {
        config.service.base_url = url.clone();
    }

    init_logging(&config.logging)?;

    let opts = CliOpts {
        offline: cli.offline,
        format: cli.format,
    };

    match cli.command {
        Commands::Records { action } => run_records(action, &opts, &config).await,
        Commands::Chart { series, curve, out } => run_chart(&config, series, curve, out),
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

struct CliOpts {
    offline: bool,
    format: OutputFormat,
}

async fn run_records(action: RecordsCommand, opts: &CliOpts, config: &Config) -> anyhow::Result<()> {
    let service: Arc<dyn ConsumptionService> = if opts.offline {
        tracing::info!("Offline mode: records live only for this run");
        Arc::new(InMemoryConsumptionService::new())
    } else {
        Arc::new(HttpConsumptionService::new((&config.service).into())?)
    };

    let confirmer: Arc<dyn Confirmer> = match &action {
        RecordsCommand::Delete { yes: true, .. } => Arc::new(FixedAnswer(true)),
        _ => Arc::new(StdinConfirmer),
    };

    let mut manager = RecordManager::init(service, Arc::new(ConsoleNotifier), confirmer).await;
    if let LoadState::Failed(e) = manager.load_state() {
        bail!(
            "Cannot load records from {}: {}\n\nMake sure the record server is running:\n  spendline-api",
            config.service.base_url,
            e
        );
    }

    match action {
        RecordsCommand::List => print_records(manager.records(), opts.format)?,

        RecordsCommand::Add {
            name,
            kind,
            category,
            value,
            source,
            remark,
            date,
        } => {
            let form = manager.form_mut();
            form.set(Field::Name, name);
            form.set(Field::Type, kind);
            form.set(Field::Category, category);
            form.set(Field::Value, value);
            form.set(Field::Source, source);
            if let Some(remark) = remark {
                form.set(Field::Remark, remark);
            }
            if let Some(date) = date {
                form.set(Field::Date, date);
            }

            finish(manager.create().await)?;
            if let Some(added) = manager.records().last() {
                print_records(std::slice::from_ref(added), opts.format)?;
            }
        }

        RecordsCommand::Edit {
            id,
            name,
            kind,
            category,
            value,
            source,
            remark,
            date,
        } => {
            let record = find_record(&manager, &id)?;
            let date = date
                .map(|d| parse_date(&d).with_context(|| format!("Invalid date: {}", d)))
                .transpose()?;

            manager.begin_edit(&record);
            if let Some(subject) = manager.edit_subject_mut() {
                if let Some(v) = name {
                    subject.name = v;
                }
                if let Some(v) = kind {
                    subject.kind = v;
                }
                if let Some(v) = category {
                    subject.category = v;
                }
                if let Some(v) = value {
                    subject.value = v;
                }
                if let Some(v) = source {
                    subject.source = v;
                }
                if let Some(v) = remark {
                    subject.remark = Some(v).filter(|r| !r.is_empty());
                }
                if let Some(v) = date {
                    subject.date = v;
                }
            }

            match manager.commit_current_edit().await {
                Some(outcome) => finish(outcome)?,
                None => bail!("No record is being edited"),
            }
            if let Some(edited) = manager.find(&id) {
                print_records(std::slice::from_ref(edited), opts.format)?;
            }
        }

        RecordsCommand::Delete { id, .. } => {
            let record = find_record(&manager, &id)?;
            match manager.delete(&record).await {
                Outcome::Declined => println!("Deletion cancelled."),
                outcome => finish(outcome)?,
            }
        }
    }

    Ok(())
}

fn find_record(manager: &RecordManager, id: &str) -> anyhow::Result<ConsumptionRecord> {
    manager
        .find(id)
        .cloned()
        .with_context(|| format!("No record with id {}", id))
}

fn finish(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Completed | Outcome::Declined => Ok(()),
        Outcome::Failed(e) => bail!("Request failed: {}", e),
        Outcome::Rejected(report) => bail!("Invalid record: {}", report),
    }
}

fn print_records(records: &[ConsumptionRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No records yet.");
                println!();
                println!("Add one with:");
                println!("  spendline records add --name Lunch --type food --category daily --value 12.5 --source cash");
                return Ok(());
            }

            println!(
                "{:<38} {:<20} {:<12} {:<12} {:>10} {:<12} {:<20} {}",
                "ID", "Name", "Type", "Category", "Value", "Source", "Date", "Remark"
            );
            println!("{}", "-".repeat(140));
            for r in records {
                println!(
                    "{:<38} {:<20} {:<12} {:<12} {:>10.2} {:<12} {:<20} {}",
                    r.id.as_deref().unwrap_or("-"),
                    r.name,
                    r.kind,
                    r.category,
                    r.value,
                    r.source,
                    r.display_date(),
                    r.remark.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}

fn run_chart(
    config: &Config,
    series: Option<PathBuf>,
    curve: Option<Curve>,
    out: PathBuf,
) -> anyhow::Result<()> {
    let mut opts = config.chart.to_chart_options();

    if let Some(path) = series {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read series file {:?}", path))?;
        opts.series = series_from_json(&json)?;
    }
    if let Some(curve) = curve {
        opts.curve = curve;
    }

    if out.as_os_str() == "-" {
        print!("{}", render_chart_svg(&opts)?);
    } else {
        write_chart_svg(&opts, &out)?;
        println!("Chart written to {:?}", out);
    }
    Ok(())
}
