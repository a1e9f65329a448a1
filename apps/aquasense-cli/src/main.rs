//! AquaSense CLI - household water-usage questionnaire
//!
//! Command-line frontend for AquaSense: answer the usage questionnaire,
//! request a prediction, and view the dashboard widgets in the terminal.

use anyhow::{Context, Result};
use aquasense_core::{AquaConfig, AquaRuntime, FormField, Route, SubmissionOutcome};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info};

mod tui;

/// AquaSense - household water-usage questionnaire
///
/// Collects usage answers, asks the prediction service for a daily estimate
/// and shows the dashboard widgets.
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Directory holding client storage and config.toml
    #[arg(long, global = true, default_value = ".aquasense")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available AquaSense commands
#[derive(Subcommand)]
enum Commands {
    /// Fill in and submit the water usage questionnaire
    ///
    /// Answers given as flags are validated, stored, and sent to the
    /// prediction service. Invalid answers are listed and nothing is sent.
    Questionnaire(QuestionnaireArgs),

    /// Show the daily usage alert
    Alerts {
        /// Litres used today (defaults to the configured reading)
        #[arg(long, allow_negative_numbers = true)]
        used: Option<f64>,

        /// Daily quota in litres (defaults to the configured quota)
        #[arg(long, allow_negative_numbers = true)]
        quota: Option<f64>,
    },

    /// Show the sidebar navigation
    Nav {
        /// Path of the view currently shown
        #[arg(long, default_value = "/Dashboard1")]
        active: String,
    },

    /// Show the dashboard summary
    Dashboard,

    /// Manage the stored user session
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
}

/// Session subcommands
#[derive(Subcommand)]
enum SessionCommand {
    /// Store a user id and authorization token
    Login {
        /// User identifier sent with predictions
        #[arg(long)]
        user_id: String,

        /// Authorization token for the backend
        #[arg(long)]
        token: String,
    },

    /// Remove the stored user and token
    Logout,

    /// Print the stored user
    Show,
}

/// Questionnaire answers; every flag is optional and left empty when absent.
#[derive(Args)]
struct QuestionnaireArgs {
    /// Edit the answers in an interactive form
    #[arg(short, long)]
    interactive: bool,

    #[arg(long, allow_hyphen_values = true)]
    people: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    children: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    temperature: Option<String>,

    /// yes or no
    #[arg(long)]
    water_saving_devices: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    showers_per_day: Option<String>,

    /// Minutes
    #[arg(long, allow_hyphen_values = true)]
    time_per_shower: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    washing_per_week: Option<String>,

    /// yes or no
    #[arg(long)]
    rainwater_harvesting: Option<String>,

    /// yes or no
    #[arg(long)]
    taps_running: Option<String>,

    /// Litres per day
    #[arg(long, allow_hyphen_values = true)]
    estimated_usage: Option<String>,
}

impl QuestionnaireArgs {
    fn answers(&self) -> Vec<(FormField, &str)> {
        [
            (FormField::People, &self.people),
            (FormField::Children, &self.children),
            (FormField::Temperature, &self.temperature),
            (FormField::WaterSavingDevices, &self.water_saving_devices),
            (FormField::ShowersPerDay, &self.showers_per_day),
            (FormField::TimePerShower, &self.time_per_shower),
            (FormField::WashingPerWeek, &self.washing_per_week),
            (FormField::RainwaterHarvesting, &self.rainwater_harvesting),
            (FormField::TapsRunning, &self.taps_running),
            (FormField::EstimatedUsage, &self.estimated_usage),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing subscriber
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = run_command(cli.command, cli.data_dir).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing subscriber for structured logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("aquasense=debug,aquasense_core=debug,aquasense_views=debug")
    } else {
        EnvFilter::new("aquasense=info,aquasense_core=info,aquasense_views=info")
    };

    // Logs go to stderr so rendered views can be piped
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Execute the specified command
async fn run_command(command: Commands, data_dir: PathBuf) -> Result<()> {
    let runtime = load_runtime(data_dir)?;

    match command {
        Commands::Questionnaire(args) => run_questionnaire(&runtime, &args).await,
        Commands::Alerts { used, quota } => run_alerts(&runtime, used, quota),
        Commands::Nav { active } => {
            println!("{}", runtime.render_sidebar(&active)?);
            Ok(())
        }
        Commands::Dashboard => {
            println!("{}", runtime.render_dashboard()?);
            Ok(())
        }
        Commands::Session { action } => run_session(&runtime, action),
    }
}

/// Load configuration and build the runtime
fn load_runtime(data_dir: PathBuf) -> Result<AquaRuntime> {
    let config = AquaConfig::load(data_dir)
        .context("Failed to load AquaSense configuration")?
        .with_env_overrides(|key| std::env::var(key).ok());

    debug!(
        prediction = %config.endpoints.prediction_url,
        backend = %config.endpoints.backend_url,
        "using endpoints"
    );

    AquaRuntime::new(config).context("Failed to create AquaSense runtime")
}

/// Run the questionnaire command
async fn run_questionnaire(runtime: &AquaRuntime, args: &QuestionnaireArgs) -> Result<()> {
    let workflow = runtime.questionnaire();
    for (field, value) in args.answers() {
        workflow.set(field, value);
    }

    let outcome = if args.interactive {
        info!("Starting interactive questionnaire...");
        match tui::run_questionnaire_tui(&workflow)
            .await
            .context("Interactive questionnaire failed")?
        {
            Some(outcome) => outcome,
            None => {
                println!("Questionnaire cancelled.");
                return Ok(());
            }
        }
    } else {
        workflow
            .submit()
            .await
            .context("Questionnaire submission failed")?
    };

    println!("{}", runtime.render_outcome(&outcome)?);

    match &outcome {
        SubmissionOutcome::ValidationFailed(errors) => {
            anyhow::bail!("{} answer(s) need correcting", errors.len())
        }
        _ if outcome.route() == Some(Route::Dashboard) => {
            println!();
            println!("{}", runtime.render_dashboard()?);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Run the alerts command
fn run_alerts(runtime: &AquaRuntime, used: Option<f64>, quota: Option<f64>) -> Result<()> {
    let alert = runtime
        .usage_alert(used, quota)
        .context("Failed to evaluate usage alert")?;
    println!("{}", runtime.render_alert(&alert)?);
    Ok(())
}

/// Run a session subcommand
fn run_session(runtime: &AquaRuntime, action: SessionCommand) -> Result<()> {
    match action {
        SessionCommand::Login { user_id, token } => {
            runtime
                .login(&user_id, &token)
                .context("Failed to store session")?;
            println!("✔ Signed in as {}", user_id);
        }
        SessionCommand::Logout => {
            runtime.logout().context("Failed to clear session")?;
            println!("✔ Signed out");
        }
        SessionCommand::Show => match runtime.session()? {
            Some(user_id) => println!("Signed in as {}", user_id),
            None => println!("Not signed in"),
        },
    }
    Ok(())
}
