use chrono::Utc;
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

mod cli;
mod config;
mod tui;

use cli::Cli;
use cli::commands::{CardCommands, Commands, DeckCommands};
use config::Config;
use kartei::domain::{Card, Deck};
use kartei::fsrs::{Rating, Scheduler};
use kartei::git::GitRepo;
use kartei::id::short_id;
use kartei::storage::{DeckStore, ReviewHistory};
use kartei::study::{StudySession, due_count};
use tui::StudyRunner;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn setup_logging(level: &str) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kartei")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("kartei.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Everything a command needs, built once from the configuration.
struct Workspace {
    store: DeckStore,
    history: ReviewHistory,
    scheduler: Scheduler,
    config: Config,
}

impl Workspace {
    fn new(config: Config) -> Result<Self> {
        let params = config
            .scheduler
            .parameters()
            .context("Invalid scheduler configuration")?;
        let data_dir = &config.storage.data_dir;
        let store = DeckStore::open(data_dir)
            .context(format!("Failed to open data directory {}", data_dir.display()))?
            .with_git(Box::new(GitRepo::new(data_dir.clone())), config.storage.auto_commit)
            .with_commit_message(config.storage.commit_message.clone());
        let history = ReviewHistory::new(store.history_dir())?;

        Ok(Self {
            store,
            history,
            scheduler: Scheduler::new(params),
            config,
        })
    }
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    // Cloning replaces the data directory, so it runs before anything opens it
    if let Some(Commands::Clone { url }) = &cli.command {
        return handle_clone_command(url, &config);
    }

    let ws = Workspace::new(config)?;
    match &cli.command {
        None | Some(Commands::Decks) => handle_decks_command(&ws),
        Some(Commands::Deck { command }) => handle_deck_command(command, &ws),
        Some(Commands::Card { command }) => handle_card_command(command, &ws),
        Some(Commands::Study { deck }) => handle_study_command(deck, &ws).await,
        Some(Commands::Preview { deck, card }) => handle_preview_command(deck, card, &ws),
        Some(Commands::History { deck }) => handle_history_command(deck, &ws),
        Some(Commands::Sync) => handle_sync_command(&ws),
        Some(Commands::Clone { .. }) => Ok(()),
    }
}

fn handle_decks_command(ws: &Workspace) -> Result<()> {
    let decks = ws.store.all()?;
    if decks.is_empty() {
        println!("{}", "No decks yet. Create one with `kartei deck add <name>`.".dimmed());
        return Ok(());
    }

    let now = Utc::now();
    for deck in &decks {
        let stats = deck.stats();
        let due = due_count(deck, now);
        let due = if due > 0 {
            format!("{} due", due).green().bold()
        } else {
            "0 due".dimmed()
        };
        println!(
            "{}  {:<24} {:>4} cards  {:>3} new  {:>3} learning  {:>3} review  {}",
            short_id(&deck.id).cyan(),
            deck.name,
            stats.total,
            stats.new,
            stats.learning,
            stats.review,
            due
        );
    }
    Ok(())
}

fn handle_deck_command(command: &DeckCommands, ws: &Workspace) -> Result<()> {
    info!("Handling deck command: {:?}", command);
    match command {
        DeckCommands::Add { name } => {
            let deck = Deck::new(name.clone(), Utc::now());
            ws.store.add(&deck)?;
            println!("{} {} ({})", "Created deck:".green(), deck.name, short_id(&deck.id));
        }
        DeckCommands::Rename { deck, name } => {
            let mut deck = ws.store.find(deck)?;
            let old = std::mem::replace(&mut deck.name, name.clone());
            ws.store.update(&deck)?;
            println!("{} {} -> {}", "Renamed deck:".green(), old, deck.name);
        }
        DeckCommands::Remove { deck } => {
            let deck = ws.store.find(deck)?;
            ws.store.delete(&deck.id)?;
            ws.history.remove(&deck.id)?;
            println!("{} {} ({} cards)", "Removed deck:".red(), deck.name, deck.cards.len());
        }
        DeckCommands::Show { deck } => {
            let deck = ws.store.find(deck)?;
            let stats = deck.stats();
            println!("{} {}", deck.name.bold(), format!("({})", deck.id).dimmed());
            println!(
                "  created {}  {} cards, {} due",
                deck.created_at.format(TIME_FORMAT),
                stats.total,
                due_count(&deck, Utc::now())
            );
            print_cards(&deck);
        }
    }
    Ok(())
}

fn handle_card_command(command: &CardCommands, ws: &Workspace) -> Result<()> {
    info!("Handling card command: {:?}", command);
    match command {
        CardCommands::Add { deck, question, answer } => {
            let mut deck = ws.store.find(deck)?;
            let card = Card::new(question.clone(), answer.clone(), Utc::now());
            let id = card.id.clone();
            deck.add_card(card);
            ws.store.update(&deck)?;
            println!("{} {} to {}", "Added card:".green(), short_id(&id), deck.name);
        }
        CardCommands::List { deck } => {
            let deck = ws.store.find(deck)?;
            print_cards(&deck);
        }
        CardCommands::Edit {
            deck,
            card,
            question,
            answer,
        } => {
            if question.is_none() && answer.is_none() {
                bail!("Nothing to change: pass --question and/or --answer");
            }
            let mut deck = ws.store.find(deck)?;
            let card = deck.card_mut(card)?;
            if let Some(q) = question {
                card.question = q.clone();
            }
            if let Some(a) = answer {
                card.answer = a.clone();
            }
            let id = card.id.clone();
            ws.store.update(&deck)?;
            println!("{} {}", "Updated card:".green(), short_id(&id));
        }
        CardCommands::Remove { deck, card } => {
            let mut deck = ws.store.find(deck)?;
            let removed = deck.remove_card(card)?;
            ws.store.update(&deck)?;
            println!("{} {} ({})", "Removed card:".red(), short_id(&removed.id), removed.question);
        }
    }
    Ok(())
}

fn print_cards(deck: &Deck) {
    if deck.cards.is_empty() {
        println!("{}", "  no cards".dimmed());
        return;
    }
    let now = Utc::now();
    for card in &deck.cards {
        let due = card.due_at.format(TIME_FORMAT).to_string();
        let due = if card.is_due(now) { due.green() } else { due.normal() };
        println!(
            "  {}  {:<10} due {}  {}  {}",
            short_id(&card.id).cyan(),
            card.state.to_string(),
            due,
            card.question,
            format!("→ {}", card.answer).dimmed()
        );
    }
}

async fn handle_study_command(deck: &str, ws: &Workspace) -> Result<()> {
    sync_quietly(&ws.store);

    let deck = ws.store.find(deck)?;
    if due_count(&deck, Utc::now()) == 0 {
        println!("{} {}", "No cards due in".green(), deck.name);
        return Ok(());
    }

    info!("Studying deck {} ({})", deck.name, deck.id);
    let mut session = StudySession::new(&ws.store, &ws.scheduler, deck);
    if ws.config.storage.history {
        session = session.with_history(&ws.history);
    }

    let terminal = tui::init_terminal()?;
    let result = StudyRunner::new(terminal, session, ws.config.tui.tick_rate_ms)
        .run()
        .await;
    tui::restore_terminal()?;
    let reviewed = result?;

    println!("{} {} cards", "Reviewed".green(), reviewed);
    if reviewed > 0 {
        sync_quietly(&ws.store);
    }
    Ok(())
}

fn handle_preview_command(deck: &str, card: &str, ws: &Workspace) -> Result<()> {
    let deck = ws.store.find(deck)?;
    let card = deck.card(card)?;
    let now = Utc::now();
    let outcomes = ws.scheduler.repeat(card, now);

    println!("{} {}", card.question.bold(), format!("({}, {})", short_id(&card.id), card.state).dimmed());
    for rating in Rating::ALL {
        let next = &outcomes[&rating].card;
        println!(
            "  {} {:<5}  {:<10} due {}  {:>5} days  stability {:>8.2}  difficulty {:>5.2}",
            format!("[{}]", rating as u8).cyan(),
            rating.name(),
            next.state.to_string(),
            next.due_at.format(TIME_FORMAT),
            next.scheduled_days,
            next.stability,
            next.difficulty
        );
    }
    Ok(())
}

fn handle_history_command(deck: &str, ws: &Workspace) -> Result<()> {
    let deck = ws.store.find(deck)?;
    let entries = ws.history.load(&deck.id)?;
    if entries.is_empty() {
        println!("{} {}", "No reviews recorded for".dimmed(), deck.name);
        return Ok(());
    }

    for entry in &entries {
        let question = deck
            .cards
            .iter()
            .find(|c| c.id == entry.card_id)
            .map(|c| c.question.as_str())
            .unwrap_or("(removed)");
        println!(
            "  {}  {}  {:<5} {:<10} elapsed {:>4}d  scheduled {:>5}d  {}",
            entry.log.review.format(TIME_FORMAT),
            short_id(&entry.card_id).cyan(),
            entry.log.rating.name(),
            entry.log.state.to_string(),
            entry.log.elapsed_days,
            entry.log.scheduled_days,
            question
        );
    }
    Ok(())
}

fn handle_sync_command(ws: &Workspace) -> Result<()> {
    if ws.store.sync().context("Sync failed")? {
        println!("{} {}", "Synced".green(), ws.store.root().display());
    } else {
        println!(
            "{} {} is not a git repository",
            "Skipped:".yellow(),
            ws.store.root().display()
        );
    }
    Ok(())
}

fn handle_clone_command(url: &str, config: &Config) -> Result<()> {
    info!("Cloning {} into {}", url, config.storage.data_dir.display());
    GitRepo::new(config.storage.data_dir.clone())
        .clone_from(url)
        .context(format!("Failed to clone {}", url))?;
    println!("{} {} into {}", "Cloned".green(), url, config.storage.data_dir.display());
    Ok(())
}

/// Sync around a study session; an unreachable remote must not block studying.
fn sync_quietly(store: &DeckStore) {
    if let Err(e) = store.sync() {
        warn!("Sync failed: {}", e);
        println!("{} {}", "Sync failed:".yellow(), e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let level = if cli.is_verbose() {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };
    setup_logging(level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
