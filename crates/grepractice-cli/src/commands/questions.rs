//! The `grepractice questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use grepractice_client::HttpQuestionSource;
use grepractice_core::loader::load_questions;
use grepractice_core::model::CanonicalQuestion;
use grepractice_core::traits::QuestionQuery;

/// JSON form of a listed question: the service record plus whether its
/// answer key was substituted.
#[derive(Serialize)]
struct ListedQuestion<'a> {
    #[serde(flatten)]
    question: &'a CanonicalQuestion,
    answer_unverified: bool,
}

impl<'a> From<&'a CanonicalQuestion> for ListedQuestion<'a> {
    fn from(question: &'a CanonicalQuestion) -> Self {
        Self {
            question,
            answer_unverified: question.is_answer_fallback(),
        }
    }
}

pub async fn execute(
    limit: Option<u32>,
    skip: Option<u32>,
    format: String,
    endpoint: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "json"),
        "unknown format '{format}' (expected table or json)"
    );

    let config = super::resolve_config(config_path, endpoint)?;
    let source = HttpQuestionSource::new(&config)?;
    let query = QuestionQuery {
        limit: Some(limit.unwrap_or(config.default_limit)),
        skip,
    };

    let outcome = load_questions(&source, &query).await;
    if let Some(banner) = outcome.banner() {
        eprintln!("WARNING: {banner}");
    }

    if format == "json" {
        let listed: Vec<ListedQuestion> = outcome.questions.iter().map(Into::into).collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
    } else {
        let mut table = Table::new();
        table.set_header(vec!["#", "ID", "Difficulty", "Question", "Options", "Answer"]);
        for (i, q) in outcome.questions.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&q.id),
                Cell::new(&q.difficulty),
                Cell::new(truncate(&q.prompt_text, 60)),
                Cell::new(q.options.len()),
                Cell::new(answer_label(q)),
            ]);
        }
        println!("{table}");
    }

    if !outcome.warnings.is_empty() {
        eprintln!(
            "{} data-quality warning(s) in {} question(s)",
            outcome.warnings.len(),
            outcome.questions.iter().filter(|q| !q.is_clean()).count()
        );
    }

    Ok(())
}

fn answer_label(question: &CanonicalQuestion) -> String {
    if question.is_answer_fallback() {
        format!("{} (unverified)", question.correct_option_id)
    } else {
        question.correct_option_id.clone()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
