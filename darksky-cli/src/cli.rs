use std::{io::IsTerminal, time::Duration};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use darksky_core::{
    Config, DarkSkyProvider, ForecastProvider, Geocoder, GoogleGeocoder, Palette, ReportOptions,
    Style, Units,
    config::{EnvLookup, FORECAST_KEY_ENV, process_env},
    format_report,
};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use log::{debug, info};

use crate::error::AppError;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "darksky",
    version,
    about = "Current conditions and temperature sparklines for any place",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub show: ShowArgs,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys and default units in the config file.
    Configure,
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Place to look up, e.g. `darksky brooklyn ny`.
    pub query: Vec<String>,

    /// Unit system: auto, ca, uk2, us or si.
    #[arg(short, long, value_parser = parse_units)]
    pub units: Option<Units>,

    /// Shorthand for `--units us`.
    #[arg(short, long, conflicts_with = "units")]
    pub imperial: bool,

    /// When to color the sparklines.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Draw sparklines with ASCII characters instead of block glyphs.
    #[arg(long)]
    pub ascii: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn parse_units(value: &str) -> Result<Units, String> {
    Units::try_from(value).map_err(|e| e.to_string())
}

impl ShowArgs {
    /// All positional words joined with single spaces.
    pub fn query(&self) -> String {
        self.query
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Command line first, then the config file, then `auto`.
    pub fn units(&self, config: &Config) -> Units {
        if self.imperial {
            return Units::Us;
        }
        self.units.or(config.units).unwrap_or_default()
    }

    pub fn style(&self) -> Style {
        resolve_style(
            self.color,
            std::io::stdout().is_terminal(),
            std::env::var_os("NO_COLOR").is_some(),
        )
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            palette: if self.ascii { Palette::ascii() } else { Palette::blocks() },
            style: self.style(),
        }
    }
}

fn resolve_style(choice: ColorChoice, is_terminal: bool, no_color: bool) -> Style {
    match choice {
        ColorChoice::Always => Style::Ansi,
        ColorChoice::Never => Style::Plain,
        ColorChoice::Auto if is_terminal && !no_color => Style::Ansi,
        ColorChoice::Auto => Style::Plain,
    }
}

impl Cli {
    pub async fn run(self) -> Result<(), AppError> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => {
                let text = execute(&self.show, Config::load, process_env).await?;
                print!("{text}");
                Ok(())
            }
        }
    }
}

/// Validate the query before touching the config file, then [`show`].
pub async fn execute(
    args: &ShowArgs,
    load: impl FnOnce() -> anyhow::Result<Config>,
    env: EnvLookup,
) -> Result<String, AppError> {
    if args.query().is_empty() {
        return Err(missing_query());
    }
    let config = load().map_err(AppError::Config)?;
    show(args, &config, env).await
}

fn missing_query() -> AppError {
    AppError::Usage("usage: darksky [OPTIONS] <QUERY>...\nA place to look up is required.".into())
}

/// Look up the place, fetch its forecast and render the report.
pub async fn show(args: &ShowArgs, config: &Config, env: EnvLookup) -> Result<String, AppError> {
    let query = args.query();
    if query.is_empty() {
        return Err(missing_query());
    }

    let timeout = Duration::from_secs(args.timeout);
    let forecast_settings = config.forecast_settings(timeout, env).ok_or_else(|| {
        AppError::Usage(format!(
            "No Dark Sky API key found.\n\
             Hint: export {FORECAST_KEY_ENV}=<key> or run `darksky configure`."
        ))
    })?;
    let units = args.units(config);
    let opts = args.report_options();

    let geocoder = GoogleGeocoder::new(config.geocode_settings(timeout, env)).map_err(AppError::Upstream)?;
    let provider = DarkSkyProvider::new(forecast_settings).map_err(AppError::Upstream)?;

    let progress = spinner(format!("Looking up {query}"));
    let location = geocoder.find(&query).await.map_err(AppError::Upstream);
    let location = match location {
        Ok(loc) => loc,
        Err(err) => {
            progress.finish_and_clear();
            return Err(err);
        }
    };
    info!("Resolved \"{query}\" to {} ({}, {})", location, location.lat, location.lng);

    progress.set_message(format!("Fetching forecast for {location}"));
    let report = provider.forecast(&location, units).await;
    progress.finish_and_clear();
    let report = report.map_err(AppError::Upstream)?;
    debug!(
        "Forecast has {} hourly and {} daily points",
        report.hourly.data.len(),
        report.daily.data.len()
    );

    Ok(format_report(&report, &opts)?)
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Interactive setup of credentials and default units.
fn configure() -> Result<(), AppError> {
    let mut config = Config::load().map_err(AppError::Config)?;

    let key = Password::new("Dark Sky API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .map_err(prompt_error)?;
    let key = key.trim();
    if !key.is_empty() {
        config.forecast.api_key = Some(key.to_string());
    } else if config.forecast.api_key.is_none() {
        return Err(AppError::Usage("A Dark Sky API key is required.".into()));
    }

    let geocode_key = Text::new("Google Maps API key (optional):")
        .with_help_message("Leave empty to keep the current value")
        .prompt()
        .map_err(prompt_error)?;
    let geocode_key = geocode_key.trim();
    if !geocode_key.is_empty() {
        config.geocode.api_key = Some(geocode_key.to_string());
    }

    let current = config.units.unwrap_or_default();
    let cursor = Units::all().iter().position(|u| *u == current).unwrap_or(0);
    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .map_err(prompt_error)?;
    config.units = Some(units);

    let path = config.save().map_err(AppError::Config)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn prompt_error(err: inquire::InquireError) -> AppError {
    AppError::Usage(format!("Configuration aborted: {err}"))
}
