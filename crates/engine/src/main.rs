//! Ascendant - command line entry point.

use std::path::Path;

use anyhow::Context;
use ascendant_domain::AdvancementOption;
use ascendant_engine::infrastructure::config::AppConfig;
use ascendant_engine::use_cases::progression::AdvanceLevelInput;
use ascendant_engine::App;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "ascendant", version, about = "Character advancement and domain card tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a level 1 character
    Create {
        name: String,
        #[arg(long)]
        class: String,
        /// Starting experience (at most two)
        #[arg(long = "experience")]
        experiences: Vec<String>,
    },
    /// Record the two advancement choices for the next eligible level
    Advance {
        character: Uuid,
        /// Choice such as HIT_POINT_SLOT (give exactly two)
        #[arg(long = "choice", required = true)]
        choices: Vec<AdvancementOption>,
        /// Level the advancement is meant for
        #[arg(long)]
        level: Option<u8>,
        /// New experience, needed at levels 2, 5 and 8
        #[arg(long)]
        experience: Option<String>,
    },
    /// Set the character's level directly
    SetLevel { character: Uuid, level: u8 },
    /// Return the character to level 1
    Reset { character: Uuid },
    /// Add a domain card to the character's selection
    SelectCard { character: Uuid, card: String },
    /// Remove a domain card from the character's selection
    DeselectCard { character: Uuid, card: String },
    /// Show completed levels and bracket usage
    Progression { character: Uuid },
    /// Show domain card slots
    Slots { character: Uuid },
    /// List catalog cards
    Cards {
        #[arg(long)]
        max_level: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root so the binary works from any crate directory.
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ascendant_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = App::from_config(&config)
        .await
        .context("failed to start application")?;

    run(&app, cli.command).await
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    let use_cases = &app.use_cases;
    match command {
        Command::Create {
            name,
            class,
            experiences,
        } => print_json(
            &use_cases
                .management
                .character
                .create(&name, &class, &experiences)
                .await?,
        ),
        Command::Advance {
            character,
            choices,
            level,
            experience,
        } => {
            let input = AdvanceLevelInput {
                choices,
                requested_level: level,
                new_experience: experience,
            };
            print_json(&use_cases.progression.advance.execute(character.into(), input).await?)
        }
        Command::SetLevel { character, level } => print_json(
            &use_cases
                .progression
                .set_level
                .execute(character.into(), level)
                .await?,
        ),
        Command::Reset { character } => {
            print_json(&use_cases.progression.reset.execute(character.into()).await?)
        }
        Command::SelectCard { character, card } => print_json(
            &use_cases
                .cards
                .select
                .execute(character.into(), &card)
                .await?,
        ),
        Command::DeselectCard { character, card } => print_json(
            &use_cases
                .cards
                .deselect
                .execute(character.into(), &card)
                .await?,
        ),
        Command::Progression { character } => {
            print_json(&use_cases.progression.view.execute(character.into()).await?)
        }
        Command::Slots { character } => {
            print_json(&use_cases.cards.slots.execute(character.into()).await?)
        }
        Command::Cards { max_level } => print_json(&use_cases.cards.list.execute(max_level).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
