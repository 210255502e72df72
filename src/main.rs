use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck::{store, CardId, Deck, DeckError, QuizSession};

/// deck - flashcard collection and quiz CLI
#[derive(Parser)]
#[command(name = "deck")]
#[command(about = "Manage a personal flashcard collection and quiz yourself on it")]
#[command(version)]
struct Cli {
    /// Path to the deck snapshot file (defaults to the platform data dir)
    #[arg(long, value_name = "FILE", global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Add a short-answer flashcard
    Add {
        /// The question text
        question: String,
        /// The answer text
        answer: String,
    },
    /// Add a multiple-choice flashcard
    AddMcq {
        /// The question text
        question: String,
        /// The answer: option text or a letter (A = first option)
        answer: String,
        /// Comma-separated options (at least two, distinct)
        #[arg(short, long, value_name = "OPTIONS")]
        options: String,
    },
    /// List all flashcards in insertion order
    List,
    /// Show one flashcard, answer included
    Get {
        /// The flashcard id
        id: i64,
    },
    /// Search id, question, and answer for a keyword
    Find {
        /// Case-insensitive keyword
        keyword: String,
    },
    /// Replace the question on a flashcard
    EditQuestion { id: i64, question: String },
    /// Replace the answer on a flashcard
    EditAnswer { id: i64, answer: String },
    /// Replace the options on a multiple-choice flashcard
    EditOptions {
        id: i64,
        /// Comma-separated options
        options: String,
    },
    /// Tag a flashcard, creating the tag if needed
    Tag { id: i64, name: String },
    /// Remove a tag from a flashcard
    Untag { id: i64, name: String },
    /// List all tags with their member counts
    Tags,
    /// Delete a flashcard and drop it from every tag
    Delete { id: i64 },
    /// Quiz yourself: answers stay hidden until you reveal them
    Quiz {
        /// Ids to quiz on (defaults to the whole deck)
        ids: Vec<i64>,
        /// Restrict the quiz to cards carrying this tag
        #[arg(short, long, value_name = "TAG")]
        tag: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are the typed deck failures (unknown id, duplicate
/// question, bad options, ...). Internal errors are I/O and snapshot
/// corruption.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<DeckError>().is_some()
}

fn run(cli: &Cli) -> Result<()> {
    let path = match &cli.file {
        Some(path) => path.clone(),
        None => store::default_store_path()?,
    };
    let mut deck = store::load(&path)?;

    let mutated = dispatch(&cli.command, &mut deck)?;
    if mutated {
        store::save(&deck, &path)?;
    }
    Ok(())
}

/// Executes one command against the loaded deck. Returns true when the
/// deck changed and the snapshot needs rewriting.
fn dispatch(command: &Commands, deck: &mut Deck) -> Result<bool> {
    match command {
        Commands::Add { question, answer } => {
            let id = deck.add_short_answer(question, answer)?;
            println!("Added flashcard {id}");
            Ok(true)
        }
        Commands::AddMcq {
            question,
            answer,
            options,
        } => {
            let id = deck.add_multiple_choice(question, parse_options(options), answer)?;
            println!("Added flashcard {id}");
            Ok(true)
        }
        Commands::List => {
            if deck.is_empty() {
                println!("The deck is empty.");
            }
            for card in deck.cards() {
                println!("{card}\n");
            }
            Ok(false)
        }
        Commands::Get { id } => {
            let card = deck.get(CardId::new(*id))?;
            println!("{card}");
            Ok(false)
        }
        Commands::Find { keyword } => {
            let matches = deck.find(keyword)?;
            println!("{} flashcard(s) match:", matches.len());
            for card in matches {
                println!("{card}\n");
            }
            Ok(false)
        }
        Commands::EditQuestion { id, question } => {
            deck.edit_question(CardId::new(*id), question)?;
            println!("Updated question on flashcard {id}");
            Ok(true)
        }
        Commands::EditAnswer { id, answer } => {
            deck.edit_answer(CardId::new(*id), answer)?;
            println!("Updated answer on flashcard {id}");
            Ok(true)
        }
        Commands::EditOptions { id, options } => {
            deck.edit_options(CardId::new(*id), parse_options(options))?;
            println!("Updated options on flashcard {id}");
            Ok(true)
        }
        Commands::Tag { id, name } => {
            deck.tag(CardId::new(*id), name)?;
            println!("Tagged flashcard {id} with \"{}\"", name.trim().to_lowercase());
            Ok(true)
        }
        Commands::Untag { id, name } => {
            deck.untag(CardId::new(*id), name)?;
            println!("Removed tag \"{}\" from flashcard {id}", name.trim().to_lowercase());
            Ok(true)
        }
        Commands::Tags => {
            if deck.tag_index().is_empty() {
                println!("No tags yet.");
            }
            for tag in deck.tag_index().tags() {
                println!("{} ({} card(s))", tag.name(), tag.members().len());
            }
            Ok(false)
        }
        Commands::Delete { id } => {
            deck.delete(CardId::new(*id))?;
            println!("Deleted flashcard {id}");
            Ok(true)
        }
        Commands::Quiz { ids, tag } => {
            let ids = select_quiz_ids(deck, ids, tag.as_deref())?;
            let stdin = io::stdin();
            let graded = run_quiz(deck, ids, &mut stdin.lock(), &mut io::stdout())?;
            Ok(graded)
        }
    }
}

/// Picks the card ids for a quiz: explicit ids win, then a tag filter,
/// otherwise the whole deck in insertion order.
fn select_quiz_ids(deck: &Deck, ids: &[i64], tag: Option<&str>) -> Result<Vec<CardId>> {
    if !ids.is_empty() {
        return Ok(ids.iter().map(|&id| CardId::new(id)).collect());
    }
    if let Some(name) = tag {
        let members = deck.tag_index().members_of(name)?;
        return Ok(members.iter().copied().collect());
    }
    Ok(deck.cards().map(|card| card.id()).collect())
}

/// Interactive quiz loop: show the card with the answer hidden, reveal on
/// Enter, then grade from a y/n prompt. Returns true if anything was
/// graded (and scores therefore changed).
fn run_quiz(
    deck: &mut Deck,
    ids: Vec<CardId>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<bool> {
    if ids.is_empty() {
        writeln!(output, "Nothing to quiz on.")?;
        return Ok(false);
    }
    let mut session = QuizSession::new(deck, ids)?;
    let order: Vec<CardId> = session.card_ids().to_vec();
    let total = order.len();

    for (number, id) in order.into_iter().enumerate() {
        let hidden = session.render(deck, id)?;
        writeln!(output, "--- Card {}/{} ---", number + 1, total)?;
        writeln!(output, "{}", hidden.question)?;
        for (index, option) in hidden.options.iter().enumerate() {
            writeln!(output, "  {}. {}", (b'A' + index as u8) as char, option)?;
        }

        write!(output, "Press Enter to reveal (q to quit): ")?;
        output.flush()?;
        let line = read_line(input)?;
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        session.reveal(id)?;
        let revealed = session.render(deck, id)?;
        writeln!(
            output,
            "Answer: {}",
            revealed.answer.as_deref().unwrap_or_default()
        )?;

        write!(output, "Did you get it right? [y/n/s(skip)/q]: ")?;
        output.flush()?;
        match read_line(input)?.trim().to_lowercase().as_str() {
            "y" | "yes" => session.grade(deck, id, true)?,
            "n" | "no" => session.grade(deck, id, false)?,
            "q" => break,
            _ => {} // skip: revealed but ungraded, score untouched
        }
    }

    let summary = session.summary();
    writeln!(
        output,
        "Done: {} correct, {} incorrect, {} skipped.",
        summary.correct,
        summary.incorrect,
        summary.hidden + summary.revealed
    )?;
    Ok(summary.correct + summary.incorrect > 0)
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line)
}

/// Parses comma-separated options from a string.
///
/// Splits on commas, trims whitespace from each entry, and filters out
/// empty strings. Validation of count and distinctness happens in the deck.
fn parse_options(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
