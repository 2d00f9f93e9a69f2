//! The `grepractice practice` command: an interactive timed quiz on stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use grepractice_client::HttpQuestionSource;
use grepractice_core::loader::{spawn_load, QuestionOrigin};
use grepractice_core::model::CanonicalQuestion;
use grepractice_core::session::{format_clock, PracticeSession};
use grepractice_core::traits::{QuestionQuery, QuestionSource};

pub async fn execute(
    limit: Option<u32>,
    endpoint: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::resolve_config(config_path, endpoint)?;
    let source: Arc<dyn QuestionSource> = Arc::new(HttpQuestionSource::new(&config)?);

    let mut session = PracticeSession::new(config.time_limit_secs);
    eprintln!("Loading questions from {}...", config.base_url());
    let pending = spawn_load(
        source,
        QuestionQuery::with_limit(limit.unwrap_or(config.default_limit)),
    );
    session.finish_loading(pending.wait().await);

    if let Some(banner) = session.banner() {
        eprintln!("WARNING: {banner}");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut clock = Instant::now();
    let total = session.questions().len();

    while let Some(question) = session.current_question().cloned() {
        println!();
        println!(
            "Question {}/{} [{}]  time left {}",
            session.current_index() + 1,
            total,
            question.difficulty,
            format_clock(session.time_left_secs())
        );
        print_question(&question);

        let index = loop {
            print!("Your answer: ");
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                println!();
                println!("Input closed, ending the session.");
                return finish(&session);
            };
            match parse_choice(&question, &line) {
                Some(index) => break index,
                None => println!("Choose one of: {}", option_ids(&question)),
            }
        };

        let elapsed = clock.elapsed().as_secs();
        if elapsed > 0 {
            session.tick(elapsed);
            clock = Instant::now();
        }

        session.select_option(index);
        if let Some(feedback) = session.submit() {
            if feedback.answer_unverified {
                println!("Answer key unavailable for this question, not scored.");
            } else if feedback.is_correct {
                println!("Correct!");
            } else {
                println!("Incorrect. The answer is {}.", feedback.correct_option_id);
            }
            println!("Explanation: {}", feedback.explanation);
        }
        session.next();

        if session.time_up() {
            println!("Time is up.");
            break;
        }
    }

    finish(&session)
}

fn finish(session: &PracticeSession) -> Result<()> {
    let summary = session.summary();
    println!();
    println!("Score: {}/{}", summary.score, summary.total);
    if summary.unscored > 0 {
        println!("Unscored: {}", summary.unscored);
    }
    if summary.origin == Some(QuestionOrigin::Fallback) {
        println!("(built-in practice set)");
    }
    tracing::info!(
        session_id = %summary.session_id,
        score = summary.score,
        total = summary.total,
        "practice session ended"
    );
    Ok(())
}

fn print_question(question: &CanonicalQuestion) {
    if question.prompt_text.is_empty() {
        println!("(no question text)");
    } else {
        println!("{}", question.prompt_text);
    }
    for option in &question.options {
        println!("  {}. {}", option.option_id, option.text);
    }
}

fn option_ids(question: &CanonicalQuestion) -> String {
    question
        .options
        .iter()
        .map(|o| o.option_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accept an option id (case-insensitive) or a 1-based position.
fn parse_choice(question: &CanonicalQuestion, input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(index) = question
        .options
        .iter()
        .position(|o| o.option_id.eq_ignore_ascii_case(input))
    {
        return Some(index);
    }
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=question.options.len()).contains(n))
        .map(|n| n - 1)
}
