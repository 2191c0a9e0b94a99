//! foa-bepinex - run the Fall of Avalon BepInEx checks from a terminal

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use foa_bepinex::config::AppConfig;
use foa_bepinex::detect::{classify_game_build, classify_installed_loader_build, BuildVariant};
use foa_bepinex::game::{mod_path, GameRegistration, GameSupport};
use foa_bepinex::host::ExtensionApi;
use foa_bepinex::loader::select_package;
use foa_bepinex::local_host::LocalHost;
use foa_bepinex::logging::{init_logger, log_error, log_info, set_console_echo};
use foa_bepinex::orchestrator::{run, RunOutcome};
use foa_bepinex::state::DISMISSED_FOREVER;

#[derive(Parser)]
#[command(name = "foa-bepinex", version, about = "BepInEx setup for Tainted Grail: The Fall of Avalon")]
struct Cli {
    /// Only write log lines to the log file
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the game registration and BepInEx packages
    Info,
    /// Detect the game build and the installed BepInEx build
    Detect {
        /// Game folder (defaults to config or store lookup)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Run the startup flow: detect, pick BepInEx, remind, check for mismatch
    Run {
        #[arg(long)]
        path: Option<PathBuf>,
        /// Print dialogs without waiting for an answer
        #[arg(long)]
        no_input: bool,
    },
    /// Inspect or reset the Mono migration reminder
    Reminder {
        #[command(subcommand)]
        action: ReminderCommand,
    },
}

#[derive(Subcommand)]
enum ReminderCommand {
    Status,
    Reset,
}

fn load_config(path: Option<PathBuf>) -> AppConfig {
    let mut config = AppConfig::load();
    if path.is_some() {
        config.game_path = path;
    }
    config
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    if cli.quiet {
        set_console_echo(false);
    }
    init_logger();
    log_info("foa-bepinex starting up...");

    let result = match cli.command {
        Commands::Info => {
            let reg = GameRegistration::fall_of_avalon();
            println!("{} ({})", reg.name, reg.short_name);
            println!("  id:          {}", reg.id);
            println!("  executable:  {}", reg.executable);
            println!("  mod path:    {}", mod_path().display());
            for (key, value) in &reg.details {
                println!("  {:<12} {}", format!("{}:", key), value);
            }
            for build in [BuildVariant::Mono, BuildVariant::Il2Cpp] {
                let package = select_package(build);
                println!("  {:<12} BepInEx {} - {}", build.display_name(), package.version, package.nexus_url());
            }
            Ok(())
        }
        Commands::Detect { path } => {
            let host = LocalHost::new(&load_config(path), false);
            detect(&host)
        }
        Commands::Run { path, no_input } => {
            let host = LocalHost::new(&load_config(path), !no_input);
            let now_ms = chrono::Utc::now().timestamp_millis();
            match run(&host, now_ms) {
                Ok(RunOutcome::Skipped) => Ok(()),
                Ok(RunOutcome::Completed { game_build, loader_build, mismatch, .. }) => {
                    println!("Game build:       {}", game_build);
                    match loader_build {
                        Some(b) => println!("Installed BepInEx: {}", b),
                        None => println!("Installed BepInEx: none"),
                    }
                    if mismatch {
                        println!("BepInEx does not match the game build.");
                    }
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Reminder { action } => {
            let host = LocalHost::new(&AppConfig::load(), false);
            match action {
                ReminderCommand::Status => {
                    match host.store().settings().mono_migration_next_reminder_time {
                        None => println!("Mono migration reminder: not answered yet"),
                        Some(DISMISSED_FOREVER) => println!("Mono migration reminder: dismissed"),
                        Some(t) => println!("Mono migration reminder: snoozed until {} (epoch ms)", t),
                    }
                    Ok(())
                }
                ReminderCommand::Reset => host.state().clear_settings().map_err(Into::into),
            }
        }
    };

    if let Err(ref e) = result {
        log_error(&e.to_string());
    }
    result
}

fn detect(host: &LocalHost) -> Result<(), Box<dyn Error>> {
    let game_path = host.game().query_path()?;
    println!("Game folder:       {}", game_path.display());

    let game_build = classify_game_build(host.probe(), &game_path)?;
    println!("Game build:        {}", game_build);

    match classify_installed_loader_build(host.probe(), &game_path)? {
        Some(b) => println!("Installed BepInEx: {}", b),
        None => println!("Installed BepInEx: none"),
    }
    Ok(())
}
