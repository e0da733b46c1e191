use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use std::path::{Path, PathBuf};
use tracing::debug;
use weather_core::{
    Config, IconLoader, UnitSystem, WeatherReport, WeatherRequest,
    icon::{CURRENT_ICON_SIZE, FORECAST_ICON_SIZE, save_png},
    provider_from_config,
};

use crate::render::{self, Renderer, Theme};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and a 3-day forecast from wttr.in")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively choose default units and the weather endpoint.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "Paris" or "New York".
        city: String,

        /// "metric" (°C, km/h) or "imperial" (°F, mph); defaults to the configured units.
        #[arg(long, short)]
        units: Option<UnitSystem>,

        /// Write the condition icons as PNG files into this directory.
        #[arg(long, value_name = "DIR")]
        icons: Option<PathBuf>,

        /// Skip the trailing status line.
        #[arg(long)]
        no_status: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units, icons, no_status } => {
                let city = city.trim();
                if city.is_empty() {
                    bail!("Please enter a city name");
                }

                let config = Config::load()?;
                let units = units.unwrap_or(config.default_units);
                let theme = Theme { show_status: !no_status, ..Theme::default() };
                show(&config, city, units, icons.as_deref(), theme).await
            }
        }
    }
}

async fn show(
    config: &Config,
    city: &str,
    units: UnitSystem,
    icons: Option<&Path>,
    theme: Theme,
) -> anyhow::Result<()> {
    let show_status = theme.show_status;
    if show_status {
        println!("{}", render::status_fetching());
    }

    debug!(%city, %units, base_url = %config.base_url, "fetching weather");
    let provider = provider_from_config(config)?;
    let report = match provider.fetch_weather(&WeatherRequest::new(city, units)).await {
        Ok(report) => report,
        Err(e) => {
            if show_status {
                println!("{}", render::status_failed());
            }
            return Err(anyhow::Error::new(e).context("Failed to get weather data"));
        }
    };

    println!();
    print!("{}", Renderer::new(theme).report(&report, Local::now().time()));

    if let Some(dir) = icons {
        write_icons(config, &report, dir).await?;
        println!("Icons written to {}", dir.display());
    }

    Ok(())
}

async fn write_icons(config: &Config, report: &WeatherReport, dir: &Path) -> anyhow::Result<()> {
    let loader = IconLoader::new(config).context("Failed to initialise icon loader")?;

    let current = loader.load_icon(&report.current.icon_url, CURRENT_ICON_SIZE).await;
    save_png(&current, &dir.join("current.png"))?;

    for (n, day) in report.forecast.iter().enumerate() {
        let icon = loader.load_icon(&day.icon_url, FORECAST_ICON_SIZE).await;
        save_png(&icon, &dir.join(format!("forecast-{}-{}.png", n + 1, day.date)))?;
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let options: Vec<UnitSystem> = UnitSystem::all().to_vec();
    let start = options.iter().position(|u| *u == config.default_units).unwrap_or(0);
    config.default_units = Select::new("Default units:", options)
        .with_starting_cursor(start)
        .prompt()
        .context("Unit selection aborted")?;

    config.base_url = Text::new("Weather endpoint:")
        .with_default(&config.base_url)
        .prompt()
        .context("Endpoint prompt aborted")?;

    config.user_agent = Text::new("User-Agent header:")
        .with_default(&config.user_agent)
        .with_help_message("wttr.in only returns JSON to curl-like clients")
        .prompt()
        .context("User-Agent prompt aborted")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
