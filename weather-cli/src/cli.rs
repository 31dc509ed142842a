use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Select, Text, validator::Validation};
use tracing::info;
use weather_core::{
    Config, ForecastMode, HistoryStore, ReportBuilder, ReportRecord, ReportRequest,
    ReportSettings, ReportStore, UnitSystem, WeatherReport,
    report::normalize_location,
    store::reset_file,
    units::format_temperature,
};

use crate::{
    logging,
    output::{
        self, BRIGHT, GREEN, MAGENTA, RESET, print_on_success, print_on_warning, print_table,
    },
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Increase output verbosity.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the log file.
    Log(LogArgs),

    /// Configure default application settings.
    Config(ConfigArgs),

    /// Generate a new weather report.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Print the log file path.
    #[arg(long)]
    pub path: bool,

    /// Purge the log file.
    #[arg(long)]
    pub reset: bool,

    /// Read the log file.
    #[arg(long)]
    pub read: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Set the OpenWeather API key.
    #[arg(long, value_parser = parse_token, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Set a default location.
    #[arg(long)]
    pub location: Option<String>,

    /// Set a default unit system (imperial, metric).
    #[arg(long)]
    pub unit_system: Option<UnitSystem>,

    /// Prompt for every setting.
    #[arg(long, short)]
    pub interactive: bool,

    /// Print the config file path.
    #[arg(long)]
    pub path: bool,

    /// Purge the config file.
    #[arg(long, conflicts_with_all = ["token", "location", "unit_system", "interactive"])]
    pub reset: bool,

    /// List all user configuration.
    #[arg(long)]
    pub list: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// OpenWeather API key; overrides the configured one.
    #[arg(long, value_parser = parse_token, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Location; overrides the configured one.
    #[arg(long)]
    pub location: Option<String>,

    /// Unit system (imperial, metric); overrides the configured one.
    #[arg(long)]
    pub unit_system: Option<UnitSystem>,

    /// Type of weather report (today, tomorrow).
    #[arg(long, default_value = "today")]
    pub mode: ForecastMode,

    /// Hour of tomorrow's forecast, a multiple of 3.
    #[arg(long, default_value_t = 15, value_name = "HOUR")]
    pub hour: u32,

    /// Save the weather report.
    #[arg(long, overrides_with = "no_save")]
    pub save: bool,

    /// Don't save the weather report (default).
    #[arg(long, overrides_with = "save")]
    pub no_save: bool,

    /// Print the save file path.
    #[arg(long)]
    pub path: bool,

    /// Purge saved reports.
    #[arg(long)]
    pub reset: bool,

    /// Read saved reports.
    #[arg(long)]
    pub read: bool,

    /// Show saved reports for the location, or list saved locations.
    #[arg(long)]
    pub history: bool,
}

fn is_valid_token(token: &str) -> bool {
    token.len() == 32 && token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

fn parse_token(token: &str) -> Result<String, String> {
    if is_valid_token(token) {
        Ok(token.to_string())
    } else {
        Err("expected a 32 character lowercase hexadecimal OpenWeather API key".to_string())
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let verbose = self.verbose;
        match self.command {
            Command::Log(args) => run_log(args),
            Command::Config(args) => run_config(args),
            Command::Report(args) => run_report(args, verbose).await,
        }
    }
}

fn run_log(args: LogArgs) -> Result<()> {
    let path = logging::log_file_path()?;

    if args.path {
        println!("{}", path.display());
        return Ok(());
    }
    if args.reset {
        reset_file(&path)?;
        print_on_success("Log file purged.");
        return Ok(());
    }
    if args.read {
        let entries = logging::read_entries(&path)?;
        if entries.is_empty() {
            print_on_warning("Nothing to read because the log file is empty");
            return Ok(());
        }

        println!();
        println!("{GREEN}{:<20} {:<6} {:<24} Message{RESET}", "Timestamp", "Level", "Target");
        for entry in &entries {
            println!(
                "{:<20} {:<6} {:<24} {}",
                entry.short_timestamp(),
                entry.level,
                entry.target,
                entry.message()
            );
        }
        println!();
    }

    Ok(())
}

fn prompt_config() -> Result<Config> {
    let token = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_validator(|input: &str| {
            Ok::<_, inquire::CustomUserError>(if is_valid_token(input) {
                Validation::Valid
            } else {
                Validation::Invalid("Expected 32 lowercase hexadecimal characters.".into())
            })
        })
        .prompt()
        .context("Failed to read API key")?;

    let location = Text::new("Default location:").prompt().context("Failed to read location")?;

    let unit_system = Select::new("Default unit system:", UnitSystem::all().to_vec())
        .prompt()
        .context("Failed to read unit system")?;

    Ok(Config {
        token: Some(token),
        location: Some(location).filter(|l| !l.trim().is_empty()),
        unit_system: Some(unit_system),
    })
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let path = Config::config_file_path()?;

    let mut changes = if args.interactive { prompt_config()? } else { Config::default() };
    changes.merge(&Config {
        token: args.token,
        location: args.location,
        unit_system: args.unit_system,
    });

    if !changes.is_empty() {
        Config::update(&path, &changes)?;
        info!(path = %path.display(), "configuration updated");
        print_on_success("Configuration saved.");
    }

    if args.path {
        println!("{}", path.display());
        return Ok(());
    }
    if args.reset {
        Config::reset(&path)?;
        info!(path = %path.display(), "configuration reset");
        print_on_success("Configuration purged.");
        return Ok(());
    }
    if args.list {
        let cfg = Config::load_from(&path);
        if cfg.is_empty() {
            print_on_warning("Nothing to list because the configuration is empty");
        } else {
            print_table("Name", "Value", &cfg.entries());
        }
    }

    Ok(())
}

async fn run_report(args: ReportArgs, verbose: bool) -> Result<()> {
    let reports = ReportStore::open_default()?;
    let history = HistoryStore::open_default()?;

    if args.path {
        println!("{}", reports.path().display());
        return Ok(());
    }
    if args.reset {
        reports.reset()?;
        history.reset()?;
        print_on_success("Saved reports purged.");
        return Ok(());
    }
    if args.read {
        print_records(&reports.read_all()?);
        return Ok(());
    }
    if args.history {
        let location = args
            .location
            .or_else(|| Config::load_from(&Config::config_file_path().ok()?).location);
        print_history(&history, location.as_deref());
        return Ok(());
    }

    let overrides = Config {
        token: args.token,
        location: args.location,
        unit_system: args.unit_system,
    };
    let settings = ReportSettings::resolve(&overrides, &Config::load()?)?;
    let save = args.save && !args.no_save;

    let request = ReportRequest {
        location: settings.location,
        unit_system: settings.unit_system,
        mode: args.mode,
        hour: args.hour,
        persist: save,
    };

    let report = ReportBuilder::for_token(&settings.token).build(&request).await?;
    print_report(&report, args.mode, verbose);

    if let Some(record) = &report.record {
        reports.append(record)?;
        history.record(record)?;
        info!(location = %record.location, "report saved");
    }

    Ok(())
}

fn print_report(report: &WeatherReport, mode: ForecastMode, verbose: bool) {
    let display = &report.display;

    if verbose {
        println!(
            "\n{BRIGHT}{MAGENTA}[ {RESET}Weather Report for {}{BRIGHT}{MAGENTA} ]{RESET}",
            mode.title()
        );

        let mut rows = vec![("Date", display.date.format("%B %d, %Y (%I:%M %p)").to_string())];
        rows.extend(display.fields());
        print_table("Name", "Value", &rows);
    } else {
        println!(
            "{BRIGHT}{MAGENTA}[ {RESET}{}{BRIGHT}{MAGENTA} ]{RESET} {} in {}",
            display.date.format("%B %d @ %I:%M %p"),
            display.temperature_now,
            display.location
        );
    }
}

fn record_row(record: &ReportRecord) -> String {
    let unit_system = record.unit_system;
    let temperature = |kelvin: f64| {
        format_temperature(unit_system.temperature_from_kelvin(kelvin), unit_system)
    };

    format!(
        "{:<18} {:<16} {:<9} {:>9} {:>9} {:>9} {:>8.2} {:>9} {:>7}",
        record.timestamp.format("%Y-%m-%d %H:%M"),
        record.location,
        unit_system.as_str(),
        temperature(record.temperature_min_k),
        temperature(record.temperature_now_k),
        temperature(record.temperature_max_k),
        unit_system.speed_from_mps(record.wind_speed_mps),
        format!("{}%", record.humidity_pct),
        format!("{}%", record.cloud_coverage_pct),
    )
}

fn print_records(records: &[ReportRecord]) {
    if records.is_empty() {
        print_on_warning("Nothing to read because no reports were saved");
        return;
    }

    println!();
    println!(
        "{BRIGHT}{GREEN}{:<18} {:<16} {:<9} {:>9} {:>9} {:>9} {:>8} {:>9} {:>7}{RESET}",
        "Date", "Location", "Units", "Min", "Now", "Max", "Wind", "Humidity", "Clouds"
    );
    for record in records {
        println!("{}", record_row(record));
    }
    println!();
}

fn print_history(history: &HistoryStore, location: Option<&str>) {
    match location.map(normalize_location) {
        Some(location) => {
            let records = history.for_location(&location);
            if records.is_empty() {
                print_on_warning(&format!("No saved reports for {location}"));
            } else {
                print_records(&records);
            }
        }
        None => {
            let locations = history.locations();
            if locations.is_empty() {
                print_on_warning("Nothing to read because no reports were saved");
                return;
            }
            let rows: Vec<(&str, String)> = locations
                .iter()
                .map(|l| (l.as_str(), history.for_location(l).len().to_string()))
                .collect();
            print_table("Location", "Reports", &rows);
        }
    }
}

/// Report a failed command on stderr.
pub fn report_error(err: &anyhow::Error) {
    output::print_on_error(&output::describe(err));
}
