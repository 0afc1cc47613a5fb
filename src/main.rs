//! AirHealth CLI
//!
//! Terminal dashboard for the AirHealth risk service:
//! - Sign in and edit the cached profile
//! - Calculate risk, optionally with wearable readings
//! - Sync estimated wearable readings and re-score
//! - Sign out

use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use airhealth::config::{generate_default_config, Config};
use airhealth::session::is_logged_in;
use airhealth::value::{number_value, parse_number};
use airhealth::{
    ClientStore, DashboardController, DashboardSnapshot, DashboardView, Element, FileStore,
    FlowOutcome, HttpRiskClient, MemoryView, Navigator, UserProfile,
};

#[derive(Parser)]
#[command(name = "airhealth")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Air quality health-risk dashboard")]
#[command(long_about = "AirHealth scores your health risk from local air quality and your profile.\nSign in, fill in your profile, then calculate your risk.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/airhealth/config.toml, then ./airhealth.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Scoring service URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in as a user
    Login {
        /// User name or email
        user: String,
    },

    /// Show or edit the cached profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Calculate health risk
    Calculate {
        /// Heart rate (bpm)
        #[arg(long)]
        heart_rate: Option<String>,
        /// Blood-oxygen saturation (%)
        #[arg(long)]
        spo2: Option<String>,
        /// Cough count
        #[arg(long)]
        cough_count: Option<String>,
    },

    /// Fetch estimated wearable readings and calculate risk with them
    Sync,

    /// Sign out
    Logout,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Update profile fields; unspecified fields keep their value
    Set {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        age: Option<String>,
        /// Chronic respiratory condition (e.g. asthma, copd, none)
        #[arg(long)]
        chronic_respiratory: Option<String>,
        /// Heart disease (e.g. hypertension, none)
        #[arg(long)]
        heart_disease: Option<String>,
        /// Smoking status (e.g. never, former, current)
        #[arg(long)]
        smoking: Option<String>,
    },

    /// Print the cached profile
    Show,
}

/// Records where the dashboard asked to navigate
#[derive(Default)]
struct TerminalNavigator {
    redirect: RefCell<Option<String>>,
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, page: &str) {
        *self.redirect.borrow_mut() = Some(page.to_string());
    }
}

type Dashboard<'a> = DashboardController<FileStore, MemoryView, HttpRiskClient, &'a TerminalNavigator>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, skipped) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, Vec::new()),
        None => Config::load_first(&Config::default_paths()),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);
    for e in skipped {
        tracing::warn!("Skipping config file, using defaults: {}", e);
    }

    let store = FileStore::new(config.storage.data_path());
    tracing::debug!("Client storage: {:?}", store.path());

    match cli.command {
        Commands::Login { user } => {
            store
                .set_item(&config.session.user_key, &user)
                .context("Failed to save session")?;
            println!("Signed in as {}", user);
        }

        Commands::Profile { action } => match action {
            ProfileAction::Set {
                location,
                age,
                chronic_respiratory,
                heart_disease,
                smoking,
            } => {
                let raw = store.get_item(&config.session.profile_key)?;
                let mut profile = UserProfile::from_storage(raw.as_deref());

                if location.is_some() {
                    profile.location = location;
                }
                if let Some(age) = age {
                    profile.age = Some(age_value(&age));
                }
                if chronic_respiratory.is_some() {
                    profile.chronic_respiratory = chronic_respiratory;
                }
                if heart_disease.is_some() {
                    profile.heart_disease = heart_disease;
                }
                if smoking.is_some() {
                    profile.smoking = smoking;
                }

                let json = serde_json::to_string(&profile)?;
                store
                    .set_item(&config.session.profile_key, &json)
                    .context("Failed to save profile")?;
                print_profile(&profile, cli.format)?;
            }
            ProfileAction::Show => {
                let raw = store.get_item(&config.session.profile_key)?;
                print_profile(&UserProfile::from_storage(raw.as_deref()), cli.format)?;
            }
        },

        Commands::Calculate {
            heart_rate,
            spo2,
            cough_count,
        } => {
            let navigator = TerminalNavigator::default();
            let dashboard = open_dashboard(&config, store, &navigator)?;

            let inputs = [heart_rate, spo2, cough_count];
            for (element, value) in Element::WEARABLE_INPUTS.into_iter().zip(inputs) {
                if let Some(value) = value {
                    dashboard.view().set_input_value(element, &value);
                }
            }

            let outcome = dashboard.calculate_risk().await;
            finish(&dashboard, outcome, cli.format)?;
        }

        Commands::Sync => {
            let navigator = TerminalNavigator::default();
            let dashboard = open_dashboard(&config, store, &navigator)?;

            let outcome = dashboard.sync_wearable().await;
            finish(&dashboard, outcome, cli.format)?;
        }

        Commands::Logout => {
            if is_logged_in(&store, &config.session).context("Failed to read client storage")? {
                store
                    .remove_item(&config.session.user_key)
                    .context("Failed to clear session")?;
                tracing::info!("Logged out");
                println!("Signed out");
            } else {
                println!("Not signed in");
            }
        }

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
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("airhealth={}", config.logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn open_dashboard<'a>(
    config: &Config,
    store: FileStore,
    navigator: &'a TerminalNavigator,
) -> Result<Dashboard<'a>> {
    let client = HttpRiskClient::new(
        &config.api.base_url,
        &config.api.endpoint,
        config.api.request_timeout(),
    )?;

    let dashboard = DashboardController::load(
        store,
        config.session.clone(),
        MemoryView::new(),
        client,
        navigator,
    )
    .context("Failed to read client storage")?;

    match dashboard {
        Some(dashboard) => Ok(dashboard),
        None => {
            let page = navigator.redirect.borrow().clone().unwrap_or_default();
            bail!(
                "Not signed in (redirected to {}). Run `airhealth login <user>` first.",
                page
            )
        }
    }
}

fn age_value(text: &str) -> Value {
    let age = parse_number(text);
    if age.is_nan() {
        Value::String(text.to_string())
    } else {
        number_value(age)
    }
}

fn finish(dashboard: &Dashboard<'_>, outcome: FlowOutcome, format: OutputFormat) -> Result<()> {
    let snapshot = dashboard.view().snapshot();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Table => print_dashboard(&snapshot),
    }

    match outcome {
        FlowOutcome::Rendered(_) | FlowOutcome::Superseded => Ok(()),
        FlowOutcome::ProfileIncomplete => {
            eprintln!("Complete your profile with `airhealth profile set`.");
            std::process::exit(1);
        }
        FlowOutcome::Failed(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn print_profile(profile: &UserProfile, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profile)?),
        OutputFormat::Table => {
            let text = |field: &Option<String>| field.clone().unwrap_or_else(|| "-".to_string());
            println!("{:<22} {}", "Location", text(&profile.location));
            println!("{:<22} {}", "Age", profile.effective_age());
            println!("{:<22} {}", "Chronic respiratory", text(&profile.chronic_respiratory));
            println!("{:<22} {}", "Heart disease", text(&profile.heart_disease));
            println!("{:<22} {}", "Smoking", text(&profile.smoking));
        }
    }
    Ok(())
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    let badge = &snapshot.badge;
    match badge.class {
        Some(class) => println!("{} [{}]", badge.text, class.css_class()),
        None => println!("{}", badge.text),
    }
    if let Some(probability) = snapshot.probability.as_deref().filter(|p| !p.is_empty()) {
        println!("{}", probability);
    }
    if let Some(summary) = &snapshot.summary {
        println!("{}", summary);
    }

    if let Some(aqi) = &snapshot.aqi {
        println!();
        println!("Air quality");
        println!("  {:<8} {}", "AQI", aqi);
        println!("  {:<8} {}", "PM2.5", snapshot.pm25.as_deref().unwrap_or_default());
        println!("  {:<8} {}", "PM10", snapshot.pm10.as_deref().unwrap_or_default());
        if let Some(advice) = snapshot.aqi_advice.as_deref().filter(|a| !a.is_empty()) {
            println!("  {}", advice);
        }
    }

    if !snapshot.advice.is_empty() {
        println!();
        println!("Advice");
        for line in &snapshot.advice {
            println!("  \u{2022} {}", line);
        }
    }

    if !snapshot.data_used.is_empty() {
        println!();
        println!("Data used");
        let width = snapshot
            .data_used
            .iter()
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0);
        for (key, value) in &snapshot.data_used {
            println!("  {:<width$}  {}", key, value, width = width);
        }
    }

    let wearable = &snapshot.wearable;
    if !(wearable.heart_rate.is_empty() && wearable.spo2.is_empty() && wearable.cough_count.is_empty()) {
        println!();
        println!("Wearable");
        println!("  {:<12} {}", "Heart rate", wearable.heart_rate);
        println!("  {:<12} {}", "SpO2", wearable.spo2);
        println!("  {:<12} {}", "Cough count", wearable.cough_count);
    }
}
