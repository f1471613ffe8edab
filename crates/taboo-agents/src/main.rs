use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use taboo_agents::cards::Card;
use taboo_agents::config::LlmConfig;
use taboo_agents::human::{HumanCluer, Submit};
use taboo_agents::llm::{ChatClient, LlmBuzzer, LlmCluer, LlmGuesser, LlmJudge};
use taboo_agents::render::render_stream;
use taboo_engine::strategy::{ExactMatch, TabooList};
use taboo_engine::{Buzzer, Cluer, Game, Guesser, Judge, Player};

const PERSONALITIES: [&str; 5] = [
    "friendly",
    "sarcastic",
    "enthusiastic",
    "thoughtful",
    "mischievous",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CluerMode {
    /// Model-generated clues.
    Llm,
    /// Clues typed on stdin, one per line.
    Human,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BuzzerMode {
    /// Model judgment of taboo violations.
    Llm,
    /// Deterministic word-boundary matching.
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum JudgeMode {
    /// Model judgment of guesses, tolerating minor variations.
    Llm,
    /// Case-insensitive exact comparison.
    Exact,
}

/// Play an AI-driven Taboo round and print the transcript.
#[derive(Parser, Debug)]
#[command(name = "taboo", version, about, long_about = None)]
struct Args {
    /// Target word. If omitted, a full card is auto-generated.
    #[arg(long)]
    target: Option<String>,

    /// Explicit taboo words (requires --target, skips card generation).
    #[arg(long, value_delimiter = ',', value_name = "WORD,WORD,...")]
    taboo_words: Vec<String>,

    /// Number of guessers.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    guessers: u32,

    /// Round duration in seconds.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(5..))]
    duration: u64,

    /// Override the creative-roles model.
    #[arg(long)]
    model: Option<String>,

    /// Override the buzzer/judge model.
    #[arg(long)]
    fast_model: Option<String>,

    /// Explicit guesser ids; the count must match --guessers.
    #[arg(long = "id", value_name = "ID")]
    ids: Vec<String>,

    #[arg(long, value_enum, default_value_t = CluerMode::Llm)]
    cluer: CluerMode,

    #[arg(long, value_enum, default_value_t = BuzzerMode::Llm)]
    buzzer: BuzzerMode,

    #[arg(long, value_enum, default_value_t = JudgeMode::Llm)]
    judge: JudgeMode,
}

/// Forward stdin lines to a human cluer until EOF or round end.
fn pump_stdin(submit: Submit<String>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !submit.submit(line.to_string()) {
                return;
            }
        }
    });
}

async fn resolve_card(args: &Args, client: &ChatClient) -> Result<Card> {
    match (&args.target, args.taboo_words.is_empty()) {
        (Some(target), false) => Ok(Card::new(target, args.taboo_words.clone())),
        (Some(target), true) => Card::for_target(client, target).await,
        (None, false) => bail!("--taboo-words requires --target"),
        (None, true) => Card::generate(client).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    if !args.ids.is_empty() && args.ids.len() != args.guessers as usize {
        bail!(
            "got {} ids for {} guessers",
            args.ids.len(),
            args.guessers
        );
    }

    let mut config = LlmConfig::default();
    if let Some(model) = args.model.clone() {
        config.model = model;
    }
    if let Some(fast_model) = args.fast_model.clone() {
        config.fast_model = fast_model;
    }
    let client = Arc::new(ChatClient::new(config)?);

    let card = resolve_card(&args, &client).await?;
    println!(
        "Card: target={}, taboo_words={:?}",
        card.target, card.taboo_words
    );

    let cluer: Arc<dyn Player> = match args.cluer {
        CluerMode::Llm => Arc::new(Cluer::new(Arc::new(LlmCluer::new(Arc::clone(&client))))),
        CluerMode::Human => {
            let (source, submit) = HumanCluer::new();
            pump_stdin(submit);
            println!("You are the cluer. Type clues, one per line.");
            Arc::new(Cluer::new(Arc::new(source)))
        }
    };
    let buzzer: Arc<dyn Player> = match args.buzzer {
        BuzzerMode::Llm => Arc::new(Buzzer::new(Arc::new(LlmBuzzer::new(Arc::clone(&client))))),
        BuzzerMode::Strict => Arc::new(Buzzer::new(Arc::new(TabooList))),
    };
    let judge: Arc<dyn Player> = match args.judge {
        JudgeMode::Llm => Arc::new(Judge::new(Arc::new(LlmJudge::new(Arc::clone(&client))))),
        JudgeMode::Exact => Arc::new(Judge::new(Arc::new(ExactMatch))),
    };

    let mut players = vec![cluer, buzzer, judge];
    for i in 0..args.guessers as usize {
        let personality = PERSONALITIES[i % PERSONALITIES.len()];
        let id = match args.ids.get(i) {
            Some(id) => id.clone(),
            None => format!("p{}-{personality}", i + 1),
        };
        let source = LlmGuesser::new(Arc::clone(&client), Some(personality.to_string()));
        players.push(Arc::new(Guesser::new(id, Arc::new(source))) as Arc<dyn Player>);
    }

    let game = Game::new(
        &card.target,
        &card.taboo_words,
        players,
        Duration::from_secs(args.duration),
    )?;
    info!(target = %card.target, duration = args.duration, "starting round");

    let render = tokio::spawn(render_stream(Arc::clone(game.session().log())));
    game.run().await;
    let winner = render.await?;

    println!(
        "\nRound finished. Winner: {}",
        winner.as_deref().unwrap_or("none")
    );
    Ok(())
}
