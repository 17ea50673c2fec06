mod api;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{FixtureStore, GameRecord, PreferenceDocument};
use questionnaire::{
    partition_image_pool, Progress, Question, Questionnaire, QuestionnaireError, TAG_QUESTIONS,
    TOTAL_STEPS,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

use api::StorefrontApi;

/// Storefront - game store fixtures and preference questionnaire
#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Query the storefront fixtures and run the preference questionnaire", long_about = None)]
struct Cli {
    /// Directory holding games.json and user.json
    #[arg(short, long, env = "STOREFRONT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a user's library
    User {
        #[arg(long)]
        username: String,
    },

    /// Look up games by id (unknown ids show as placeholders)
    Games {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print the questionnaire
    Questions {
        /// Seed for the image question partition (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Answer the questionnaire and get cold-start recommendations
    Questionnaire {
        #[arg(long)]
        username: String,

        /// Seed for the image question partition (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Base URL of a running storefront server
        #[arg(long, env = "STOREFRONT_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::User { username } => handle_user(&load_store(&cli.data_dir)?, &username)?,
        Commands::Games { ids } => handle_games(&load_store(&cli.data_dir)?, &ids),
        Commands::Questions { seed } => handle_questions(seed.unwrap_or_else(rand::random)),
        Commands::Questionnaire {
            username,
            seed,
            server,
        } => handle_questionnaire(&username, seed.unwrap_or_else(rand::random), &server).await?,
    }

    Ok(())
}

fn load_store(data_dir: &Path) -> Result<FixtureStore> {
    let start = Instant::now();
    let store = FixtureStore::load_from_dir(data_dir)
        .with_context(|| format!("Failed to load fixtures from {}", data_dir.display()))?;
    let (users, games) = store.counts();
    println!(
        "{} Loaded {} users and {} games in {:?}",
        "✓".green(),
        users,
        games,
        start.elapsed()
    );
    Ok(store)
}

/// Handle the 'user' command
fn handle_user(store: &FixtureStore, username: &str) -> Result<()> {
    let user = store
        .get_user(username)
        .ok_or_else(|| anyhow!("User {} not found", username))?;

    println!("{}", format!("User: {}", user.username).bold().blue());
    println!("{}Games owned: {}", "• ".green(), user.num_games_owned);
    print_games("Library:", &store.resolve_games(&user.games));
    Ok(())
}

/// Handle the 'games' command
fn handle_games(store: &FixtureStore, ids: &[String]) {
    print_games("Games:", &store.resolve_games(ids));
}

/// Handle the 'questions' command
fn handle_questions(seed: u64) {
    println!("{}", format!("Questionnaire (seed {})", seed).bold().blue());
    for line in question_listing(seed) {
        println!("{}", line);
    }
}

/// Every question numbered 1..=8 in step order, each followed by its options
fn question_listing(seed: u64) -> Vec<String> {
    let mut lines = Vec::with_capacity(TOTAL_STEPS * 2);
    for (index, question) in TAG_QUESTIONS.iter().enumerate() {
        lines.push(format!("{}. {}", index + 1, question.title));
        lines.push(format!("   {}", question.options.join(", ")));
    }
    for (index, question) in partition_image_pool(seed).into_iter().enumerate() {
        lines.push(format!("{}. {}", TAG_QUESTIONS.len() + index + 1, question.title));
        lines.push(format!("   {}", question.images.join(", ")));
    }
    lines
}

/// Handle the 'questionnaire' command
async fn handle_questionnaire(username: &str, seed: u64, server: &str) -> Result<()> {
    let api = StorefrontApi::new(server);
    let mut wizard = Questionnaire::new(username, seed);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{}",
        "Pick a number to answer, 'b' to go back, 'q' to quit.".dimmed()
    );

    let preferences: PreferenceDocument = loop {
        print_question(&wizard);

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            wizard.cancel();
            return Ok(());
        };

        let outcome = match line.trim() {
            "q" => {
                wizard.cancel();
                println!("Questionnaire cancelled, nothing was saved.");
                return Ok(());
            }
            "b" => {
                if !wizard.back() {
                    println!("{}", "Already at the first question.".yellow());
                }
                continue;
            }
            "r" if wizard.is_last_question() => wizard.resubmit(&api).await,
            input => match parse_choice(input, wizard.current_question().options()) {
                Some(option) => wizard.select(option, &api).await,
                None => {
                    println!("{}", format!("'{}' is not one of the options.", input).yellow());
                    continue;
                }
            },
        };

        match outcome {
            Ok(Progress::Next { .. }) => {}
            Ok(Progress::Submitted(document)) => break document,
            Err(e @ QuestionnaireError::Submission(_)) => {
                println!("{} {}", "✗".red(), e);
                println!("{}", "Press 'r' to try again.".dimmed());
            }
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    };

    println!(
        "{} Preferences saved: {}",
        "✓".green(),
        preferences.all_selected_tags.join(", ")
    );

    let view = api.cold_start(username, &preferences).await?;
    println!("{}", format!("Welcome, {}!", view.username).bold().blue());
    print_games("Your library:", &view.owned_games);
    print_games("Recommended for you:", &view.recommended_games);
    Ok(())
}

/// Map a 1-based menu number onto the option it names
fn parse_choice(input: &str, options: &[&'static str]) -> Option<&'static str> {
    let index: usize = input.parse().ok()?;
    options.get(index.checked_sub(1)?).copied()
}

fn print_question(wizard: &Questionnaire) {
    let question = wizard.current_question();
    let kind = match question {
        Question::Tag(_) => "",
        Question::Image(_) => " (visual)",
    };

    println!();
    println!(
        "{} {}{}",
        format!("[{}/{} {:.0}%]", wizard.step() + 1, TOTAL_STEPS, wizard.progress()).cyan(),
        question.title().bold(),
        kind.dimmed()
    );
    for (i, option) in question.options().iter().enumerate() {
        let marker = if wizard.current_answer() == Some(*option) {
            "*".green()
        } else {
            " ".normal()
        };
        println!("  {}{}. {}", marker, i + 1, option);
    }
    if wizard.is_last_question() {
        println!("{}", "Answering this question submits your preferences.".dimmed());
    }
}

fn print_games(header: &str, games: &[GameRecord]) {
    println!("{}", header.bold());
    if games.is_empty() {
        println!("  (none)");
        return;
    }
    for game in games {
        let price = match &game.discount {
            Some(discount) => format!(
                "{} {} {}",
                game.original_price.strikethrough(),
                game.price,
                discount.green()
            ),
            None => game.price.clone(),
        };
        println!("  {} {} - {}", game.id.dimmed(), game.name, price);
    }
}
