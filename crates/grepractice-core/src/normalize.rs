//! Remote question record normalizer.
//!
//! The question service has shipped several record shapes over time:
//! `content` or `question` or `title` for the stem, options as bare strings
//! or as `{id, text}` / `{id, content}` objects, and `correct_answer` as an
//! option id or as the option's value. Records are decoded through explicit
//! lenient shapes and folded into a single [`CanonicalQuestion`]. Every
//! substitution is reported as a [`DataQualityWarning`]; nothing here fails.

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{
    CanonicalQuestion, DataQualityWarning, QuestionKind, QuestionOption, WarningKind,
    DEFAULT_DIFFICULTY, NO_EXPLANATION,
};

/// Number of placeholder options substituted for an empty option list.
pub const PLACEHOLDER_OPTION_COUNT: usize = 4;

/// A scalar field that may arrive as any JSON type.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Unsupported(IgnoredAny),
}

impl RawField {
    fn text(&self) -> Option<String> {
        match self {
            RawField::Text(s) => Some(s.clone()),
            RawField::Integer(n) => Some(n.to_string()),
            RawField::Float(f) => Some(f.to_string()),
            RawField::Flag(b) => Some(b.to_string()),
            RawField::Unsupported(_) => None,
        }
    }
}

/// A list field that may arrive as something other than a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawList<T> {
    List(Vec<T>),
    Unsupported(IgnoredAny),
}

impl<T> RawList<T> {
    fn items(&self) -> &[T] {
        match self {
            RawList::List(items) => items,
            RawList::Unsupported(_) => &[],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Object {
        #[serde(default)]
        id: Option<RawField>,
        #[serde(default)]
        text: Option<RawField>,
        #[serde(default)]
        content: Option<RawField>,
    },
    Bare(RawField),
}

/// Every field name any known record shape uses.
#[derive(Debug, Default, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<RawField>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<RawField>,
    #[serde(default)]
    content: Option<RawField>,
    #[serde(default)]
    question: Option<RawField>,
    #[serde(default)]
    title: Option<RawField>,
    #[serde(default, rename = "type")]
    kind: Option<RawField>,
    #[serde(default)]
    difficulty: Option<RawField>,
    #[serde(default)]
    tags: Option<RawList<RawField>>,
    #[serde(default)]
    options: Option<RawList<RawOption>>,
    #[serde(default)]
    correct_answer: Option<RawField>,
    #[serde(default)]
    analysis: Option<RawField>,
    #[serde(default)]
    explanation: Option<RawField>,
}

/// First field holding non-blank text.
fn first_text<'a, I>(fields: I) -> Option<String>
where
    I: IntoIterator<Item = &'a Option<RawField>>,
{
    fields
        .into_iter()
        .flatten()
        .filter_map(RawField::text)
        .find(|s| !s.trim().is_empty())
}

/// Letter label for an option position: A, B, ... Z, then 27, 28, ...
fn positional_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

/// The four placeholder options used when a record has none.
pub fn placeholder_options() -> Vec<QuestionOption> {
    (0..PLACEHOLDER_OPTION_COUNT)
        .map(|i| {
            let label = positional_label(i);
            QuestionOption::new(label.clone(), format!("Option {label}"))
        })
        .collect()
}

fn resolve_option(index: usize, raw: &RawOption) -> QuestionOption {
    match raw {
        RawOption::Object { id, text, content } => QuestionOption {
            option_id: first_text([id]).unwrap_or_else(|| positional_label(index)),
            text: first_text([text, content]).unwrap_or_default(),
        },
        RawOption::Bare(field) => QuestionOption {
            option_id: positional_label(index),
            text: field.text().unwrap_or_default(),
        },
    }
}

/// Match the raw answer against option ids first, then option texts.
fn resolve_answer(raw: Option<&RawField>, options: &[QuestionOption]) -> Option<String> {
    let answer = raw.and_then(RawField::text)?;
    let answer = answer.trim();
    options
        .iter()
        .find(|o| o.option_id.trim() == answer)
        .or_else(|| options.iter().find(|o| o.text.trim() == answer))
        .map(|o| o.option_id.clone())
}

/// Normalize a single record at position `index` of its batch.
pub fn normalize_record(index: usize, record: &Value) -> CanonicalQuestion {
    let mut quality = Vec::new();

    let raw = if record.is_object() {
        RawQuestion::deserialize(record).unwrap_or_else(|e| {
            tracing::debug!(index, error = %e, "record did not decode");
            quality.push(WarningKind::UndecodableRecord);
            RawQuestion::default()
        })
    } else {
        quality.push(WarningKind::UndecodableRecord);
        RawQuestion::default()
    };

    let id = first_text([&raw.id, &raw.mongo_id]).unwrap_or_else(|| {
        quality.push(WarningKind::MissingId);
        format!("q{}", index + 1)
    });

    let prompt_text = first_text([&raw.content, &raw.question, &raw.title]).unwrap_or_else(|| {
        quality.push(WarningKind::EmptyPrompt);
        String::new()
    });

    let mut options: Vec<QuestionOption> = raw
        .options
        .as_ref()
        .map(RawList::items)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, o)| resolve_option(i, o))
        .collect();
    if options.is_empty() {
        quality.push(WarningKind::PlaceholderOptions);
        options = placeholder_options();
    }

    let correct_option_id = resolve_answer(raw.correct_answer.as_ref(), &options)
        .unwrap_or_else(|| {
            quality.push(WarningKind::UnmatchedCorrectAnswer);
            options[0].option_id.clone()
        });

    let kind_text = raw.kind.as_ref().and_then(RawField::text);
    let tags = raw
        .tags
        .as_ref()
        .map(RawList::items)
        .unwrap_or_default()
        .iter()
        .filter_map(RawField::text)
        .collect();

    CanonicalQuestion {
        id,
        kind: QuestionKind::from_upstream(kind_text.as_deref()),
        prompt_text,
        options,
        correct_option_id,
        explanation: first_text([&raw.analysis, &raw.explanation])
            .unwrap_or_else(|| NO_EXPLANATION.to_string()),
        difficulty: first_text([&raw.difficulty]).unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        tags,
        quality,
    }
}

/// Result of normalizing a batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// One question per input record, in input order.
    pub questions: Vec<CanonicalQuestion>,
    /// Every substitution made, in input order.
    pub warnings: Vec<DataQualityWarning>,
}

/// Normalize a batch of raw records.
///
/// Output order matches input order. Warnings are logged and returned;
/// callers render the questions regardless.
pub fn normalize(records: &[Value]) -> Normalized {
    let mut out = Normalized::default();

    for (index, record) in records.iter().enumerate() {
        let question = normalize_record(index, record);
        for kind in &question.quality {
            tracing::warn!(index, question_id = %question.id, "data quality: {kind}");
            out.warnings.push(DataQualityWarning {
                index,
                question_id: question.id.clone(),
                kind: *kind,
            });
        }
        out.questions.push(question);
    }

    tracing::debug!(
        questions = out.questions.len(),
        warnings = out.warnings.len(),
        "normalized question batch"
    );
    out
}
