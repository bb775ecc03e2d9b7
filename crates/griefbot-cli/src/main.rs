//! griefbot CLI - Persona-driven bot sessions
//!
//! Runs LLM bots with grief personas on experiment server sessions and
//! inspects the profile catalog and game definitions.

mod api;
mod bot;
mod config;
mod console;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use api::OtreeClient;
use bot::CommandBotRunner;
use config::{Config, Secrets};
use console::{print_profile, ConsoleObserver};
use griefbot::domain::catalog::{self, TaxonomyCategory};
use griefbot::domain::entities::build_persona_prompts;
use griefbot::experiments;
use griefbot::{RunReport, SessionOrchestrator};

#[derive(Parser)]
#[command(name = "griefbot")]
#[command(about = "griefbot CLI - Persona-driven bot sessions", long_about = None)]
#[command(version)]
struct Cli {
    /// Run configuration file (defaults to ./griefbot.toml, then the user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for profile draws and prompt sampling
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run sessions as configured
    Run,

    /// Print the persona prompts of a predefined profile without starting a session
    Prompts {
        /// Predefined profile index
        #[arg(short, long, default_value = "0")]
        index: usize,
    },

    /// Inspect grief profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// List taxonomy keys
    Taxonomy {
        /// Category (loss_type, loss_circumstances, time_since_loss, support_preference, personality_trait)
        category: Option<String>,
    },

    /// Inspect game definitions
    Games {
        #[command(subcommand)]
        action: GameAction,
    },

    /// Start a session of any configured game and run all bots with default behavior
    Play {
        /// Session config name (mftrust, grief_support, stakeholder)
        config_name: String,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List predefined profiles
    List,
    /// Show a predefined profile with its background narrative
    Show {
        /// Predefined profile index
        index: usize,
    },
    /// Draw a random profile
    Random,
}

#[derive(Subcommand)]
enum GameAction {
    /// List session configs
    List,
    /// Print a game definition as JSON
    Show {
        /// Game name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed;
    let config_path = cli.config;

    match cli.command {
        Commands::Run => cmd_run(config_path, seed).await,
        Commands::Prompts { index } => cmd_prompts(index, seed),
        Commands::Profiles { action } => cmd_profiles(action, seed),
        Commands::Taxonomy { category } => cmd_taxonomy(category),
        Commands::Games { action } => cmd_games(action),
        Commands::Play { config_name } => cmd_play(config_path, config_name, seed).await,
        Commands::Config => cmd_config(config_path),
    }
}

const DEFAULT_LOG_FILTER: &str = "griefbot=info,griefbot_cli=info";

/// `RUST_LOG` directives when set and valid, else the default filter
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

// ============================================
// Command Implementations
// ============================================

fn rng(seed: Option<u64>) -> rand::rngs::StdRng {
    use rand::SeedableRng;
    match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    }
}

/// Adapters for the experiment server and the bot program
fn connect(config: &Config) -> Result<(Arc<OtreeClient>, Arc<CommandBotRunner>)> {
    let secrets = Secrets::load(&config.secrets_file)?;
    let client = OtreeClient::new(&secrets.server_url, secrets.rest_key.as_deref());

    let mut bots = CommandBotRunner::new(&config.bot.program, &config.bot.args)
        .with_env("OTREE_SERVER_URL", &secrets.server_url);
    if let Some(key) = &secrets.rest_key {
        bots = bots.with_env("OTREE_REST_KEY", key);
    }
    if let Some(password) = &secrets.admin_password {
        bots = bots.with_env("OTREE_ADMIN_PASSWORD", password);
    }

    tracing::info!(server = %client.base_url(), bot = %config.bot.program, "Adapters ready");
    Ok((Arc::new(client), Arc::new(bots)))
}

fn orchestrator(
    config: &Config,
    client: Arc<OtreeClient>,
    bots: Arc<CommandBotRunner>,
    seed: Option<u64>,
) -> SessionOrchestrator<OtreeClient, CommandBotRunner> {
    let mut orchestrator = SessionOrchestrator::new(client, bots, config.run_settings())
        .with_observer(Arc::new(ConsoleObserver));
    if let Some(seed) = seed {
        orchestrator = orchestrator.with_seed(seed);
    }
    if let Some(writer) = config.log_writer() {
        orchestrator = orchestrator.with_log_writer(writer);
    }
    orchestrator
}

async fn cmd_run(config_path: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let (config, _) = Config::load(config_path.as_deref())?;

    if config.demonstrate_prompts_only {
        return cmd_prompts(0, seed);
    }

    let (client, bots) = connect(&config)?;
    let mut orchestrator = orchestrator(&config, client, bots.clone(), seed);

    let report = orchestrator
        .run_configured()
        .await
        .context("Invalid run configuration")?;
    bots.wait_detached().await;

    match report {
        RunReport::Demonstration { .. } => Ok(()),
        RunReport::Batch(batch) => {
            println!(
                "\n{} {} succeeded, {} failed",
                "Summary:".bold(),
                batch.succeeded().to_string().green(),
                batch.failed().to_string().red()
            );
            if batch.outcomes.is_empty() {
                println!("{}", "No sessions were run (num_sessions = 0).".yellow());
            }
            if batch.failed() > 0 && batch.succeeded() == 0 {
                bail!("All {} session(s) failed", batch.failed());
            }
            Ok(())
        }
    }
}

fn cmd_prompts(index: usize, seed: Option<u64>) -> Result<()> {
    let profile = catalog::get_predefined_profile(index)?;
    let prompts = build_persona_prompts(&profile, &mut rng(seed));

    print_profile(&profile);
    for slot in prompts.slots() {
        println!("\n{}", format!("--- {} ---", slot).cyan().bold());
        println!("{}", prompts.get(slot).unwrap_or_default());
    }
    Ok(())
}

fn cmd_profiles(action: ProfileAction, seed: Option<u64>) -> Result<()> {
    match action {
        ProfileAction::List => {
            println!("{}", "Predefined profiles:".bold());
            for (index, profile) in catalog::get_all_predefined_profiles().iter().enumerate() {
                println!(
                    "  {} {} ({}) lost {} [{}]",
                    index.to_string().dimmed(),
                    profile.name.cyan().bold(),
                    profile.age,
                    profile.loss_type.info().relationship,
                    profile.time_since_loss
                );
            }
        }

        ProfileAction::Show { index } => {
            let profile = catalog::get_predefined_profile(index)?;
            print_profile(&profile);
            println!("\n{}", profile.background_prompt(&mut rng(seed)));
        }

        ProfileAction::Random => {
            let mut rng = rng(seed);
            let profile = catalog::get_random_profile(&mut rng);
            print_profile(&profile);
            println!("\n{}", profile.background_prompt(&mut rng));
        }
    }

    Ok(())
}

fn cmd_taxonomy(category: Option<String>) -> Result<()> {
    let categories = match category {
        Some(name) => vec![name.parse::<TaxonomyCategory>()?],
        None => TaxonomyCategory::ALL.to_vec(),
    };

    for category in categories {
        println!("{}", category.to_string().bold());
        for key in category.keys() {
            let fragment = catalog::lookup(category, &key)?;
            println!("  {} {}", key.cyan(), fragment.text.dimmed());
        }
    }
    Ok(())
}

fn cmd_games(action: GameAction) -> Result<()> {
    match action {
        GameAction::List => {
            println!("{}", "Session configs:".bold());
            for config in experiments::session_configs() {
                println!(
                    "  {} {} [{} participant(s)]",
                    config.name.cyan(),
                    config.display_name.dimmed(),
                    config.num_demo_participants
                );
            }
        }

        GameAction::Show { name } => {
            let game = experiments::game_definition(&name)?;
            let json =
                serde_json::to_string_pretty(&game).context("Failed to serialize game definition")?;
            println!("{}", json);
        }
    }

    Ok(())
}

async fn cmd_play(config_path: Option<PathBuf>, config_name: String, seed: Option<u64>) -> Result<()> {
    let (config, _) = Config::load(config_path.as_deref())?;
    experiments::session_config(&config_name)?;

    let (client, bots) = connect(&config)?;
    let orchestrator = orchestrator(&config, client, bots.clone(), seed);

    let outcome = orchestrator.run_game(&config_name).await;
    bots.wait_detached().await;

    if let Some(error) = outcome.error {
        bail!("Game session failed: {}", error);
    }
    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>) -> Result<()> {
    let (config, loaded) = Config::load(config_path.as_deref())?;

    println!("{}", "Configuration:".bold());
    match loaded {
        Some(path) => println!("  Path: {:?}", path),
        None => println!("  Path: {}", "defaults (no config file found)".dimmed()),
    }
    println!("  Game: {}", config.config_name.cyan());
    println!("  Profile type: {}", config.profile_type);
    println!("  Predefined index: {}", config.predefined_profile_index);
    println!("  Sessions: {}", config.num_sessions);
    println!("  Strategy: {}", config.strategy);
    println!(
        "  Export: {}",
        if config.export_data {
            format!("{}/{}_*.json", config.export_dir.display(), config.export_prefix).green()
        } else {
            "Disabled".red()
        }
    );
    println!(
        "  Bot: {} {}",
        config.bot.program,
        config.bot.args.join(" ").dimmed()
    );
    println!(
        "  Secrets file: {:?} ({})",
        config.secrets_file,
        if config.secrets_file.exists() { "found".green() } else { "missing".red() }
    );

    Ok(())
}
