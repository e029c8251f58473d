use std::env;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use lurnix::quiz::{ApiClient, Question, QuizSession};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DEFAULT_API_URL: &str = "http://localhost:8080";

pub struct Config {
    pub session_id: String,
    pub take: bool,
}

impl Config {
    pub fn new(session_id: String, take: bool) -> Self {
        Self { session_id, take }
    }
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let session_id = args
        .next()
        .context("session_id is required, it is the id shown on the upload result page")?;
    let take = args.any(|arg| arg == "--take");

    Ok(Config::new(session_id, take))
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = env::args().skip(1);

    let config = match parse_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: cargo run --bin fetch_quiz <session_id> [--take]");
            return Err(e);
        }
    };

    let base_url = env::var("LURNIX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let token = env::var("LURNIX_API_TOKEN").ok();

    let client = ApiClient::new(base_url, token);
    let raw = client
        .generate_quiz(&config.session_id)
        .context(format!(
            "could not fetch quiz for session {}",
            config.session_id
        ))?;

    let questions = lurnix::quiz::parse(&raw);
    if questions.is_empty() {
        println!("No quiz could be generated for this document.");
        return Ok(());
    }

    if config.take {
        return take_quiz(questions);
    }

    for (idx, question) in questions.iter().enumerate() {
        print_question(question, idx, questions.len());
        println!("   Correct answer: {}", display_text(question.correct_text()));
        println!();
    }

    println!(
        "fetched {BOLD}{}{RESET} questions for session {BOLD}{}{RESET}",
        questions.len(),
        config.session_id
    );

    Ok(())
}

fn print_question(question: &Question, idx: usize, total: usize) {
    println!("{BOLD}Question {} of {}{RESET}", idx + 1, total);
    println!("{}", question.question);
    match &question.options {
        Some(options) => {
            for (i, option) in options.iter().enumerate() {
                println!("  {}) {}", letter(i), option);
            }
        }
        None => println!("  (Open/True-False question)"),
    }
}

fn take_quiz(questions: Vec<Question>) -> anyhow::Result<()> {
    let mut session = match QuizSession::new(questions) {
        Some(session) => session,
        None => {
            println!("No quiz could be generated for this document.");
            return Ok(());
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        while !session.is_completed() {
            let idx = session.current_index();
            let has_options = {
                let question = match session.current_question() {
                    Some(question) => question,
                    None => break,
                };
                println!();
                print_question(question, idx, session.question_count());
                if let Some(choice) = session.selection(idx) {
                    println!("  selected: {})", letter(choice));
                }
                !question.is_open_ended()
            };

            print!("[a-d] select, [n]ext, [p]rev, [q]uit > ");
            io::stdout().flush()?;
            let line = match lines.next() {
                Some(line) => line?,
                None => return Ok(()),
            };

            match line.trim() {
                "q" => return Ok(()),
                "p" => session.retreat(),
                // open questions have nothing to select, let them pass
                "n" if session.current_answered() || !has_options => session.advance(),
                "n" => println!("choose an option first"),
                choice => {
                    let bytes = choice.as_bytes();
                    if bytes.len() == 1 && bytes[0].is_ascii_lowercase() && has_options {
                        session.select_option((bytes[0] - b'a') as usize);
                    } else {
                        println!("unrecognized input: {}", choice);
                    }
                }
            }
        }

        println!();
        println!(
            "{BOLD}Your Score: {} / {}{RESET}",
            session.score(),
            session.question_count()
        );
        println!("Analysis:");
        for entry in session.review() {
            let marker = if entry.is_correct { "correct" } else { "incorrect" };
            println!("- {}", entry.question);
            println!("    your answer: {}", display_text(entry.chosen.unwrap_or("")));
            println!("    correct answer: {}", display_text(entry.correct));
            println!("    {marker}");
        }

        print!("[r]estart, anything else to exit > ");
        io::stdout().flush()?;
        match lines.next() {
            Some(line) => {
                if line?.trim() == "r" {
                    session.restart();
                } else {
                    return Ok(());
                }
            }
            None => return Ok(()),
        }
    }
}

fn letter(idx: usize) -> char {
    (b'a' + (idx as u8).min(25)) as char
}

fn display_text(text: &str) -> &str {
    if text.is_empty() {
        "No answer"
    } else {
        text
    }
}
