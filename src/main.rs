use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

mod actions;
mod config;
mod setup;
#[cfg(test)]
mod test_support;
mod tui;
mod ui;

use actions::Action;
use config::Config;
use tui::app::App;
use tui::tasks::CancelPolicy;
use tui::theme::Theme;
use tui::TuiOptions;

#[derive(Parser)]
#[command(name = "ehrplus", version, about = "EHRPlus command line tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive TUI demo: pick an action from a menu and watch it run
    #[command(long_about = "An interactive demonstration of the terminal UI:\n\
        - a short setup form (name, environment, confirmation)\n\
        - a menu of demo actions (database, SSH simulation, form, styling)\n\
        - each action runs in the background behind a spinner")]
    Demo(DemoArgs),
    /// Write the default config file and print its location
    InitConfig,
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Go straight to the menu without the setup form
    #[arg(long)]
    skip_form: bool,

    /// Minimum time a running action stays on screen
    #[arg(long, value_name = "MS")]
    min_duration_ms: Option<u64>,

    /// Spinner cadence
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Abort a running action when quitting
    #[arg(long)]
    cancel_on_quit: bool,

    /// Log file (the terminal belongs to the menu)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Only list actions whose label contains TEXT (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,
}

impl DemoArgs {
    /// Command-line flags win over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(ms) = self.min_duration_ms {
            config.min_visible_ms = ms;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_ms = ms;
        }
        if self.cancel_on_quit {
            config.cancel_on_quit = true;
        }
        if let Some(path) = &self.log_file {
            config.log_file = path.clone();
        }
    }
}

fn tui_options(config: &Config) -> TuiOptions {
    TuiOptions {
        // A zero cadence would spin the event loop.
        tick_rate: Duration::from_millis(config.tick_ms.max(10)),
        min_visible: Duration::from_millis(config.min_visible_ms),
        cancel_policy: if config.cancel_on_quit {
            CancelPolicy::Abort
        } else {
            CancelPolicy::Detach
        },
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))
}

fn init_logging(config: &Config) -> Result<()> {
    let level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    let log_file = open_log_file(&config.log_file)?;
    let _ = WriteLogger::init(level, log_config, log_file);
    Ok(())
}

fn run_demo(args: &DemoArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config);
    if let Err(e) = init_logging(&config) {
        // Keep going without a log; the menu still works.
        ui::print_error(&format!("{:#}", e));
    }
    log::info!("Starting demo with {:?}", config);

    let registry = actions::default_registry(config.store_file.clone(), &config.accent_color)
        .context("Failed to register actions")?;
    if registry.is_empty() {
        log::warn!("No actions registered");
    }
    log::debug!(
        "Registered actions: {:?}",
        registry.list().iter().map(|a| a.name()).collect::<Vec<_>>()
    );

    if !args.skip_form {
        ui::print_banner();
        match setup::run_setup_form()? {
            Some(answers) => {
                log::info!("Form completed for environment {}", answers.environment);
                ui::print_success(&answers.greeting());
            }
            None => {
                log::info!("Form cancelled");
                ui::print_cancelled("Demo cancelled.");
                return Ok(());
            }
        }
    }

    let mut app = App::new(registry, Theme::with_accent(&config.accent_color));
    if let Some(text) = &args.filter {
        let needle = text.to_lowercase();
        app.list.set_filter(Some(Box::new(move |a: &Action| {
            a.label().to_lowercase().contains(&needle)
        })));
    }
    tui::run_tui(app, &tui_options(&config)).context("Error running program")?;

    ui::print_outro("Goodbye!");
    Ok(())
}

fn init_config() -> Result<()> {
    let path = Config::get_path()?;
    if path.exists() {
        ui::print_info(&format!("Config already exists at {}", path.display()));
        return Ok(());
    }
    let path = Config::default().save()?;
    ui::print_success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}

fn main() {
    // Ensure terminal colors are enabled on Windows (useful for the form and messages)
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Demo(args) => run_demo(args),
        Command::InitConfig => init_config(),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        ui::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
