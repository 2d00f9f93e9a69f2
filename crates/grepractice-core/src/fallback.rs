//! Built-in question set shown when the question service cannot be used.

use crate::model::{CanonicalQuestion, QuestionKind, QuestionOption};

fn question(
    id: &str,
    prompt: &str,
    options: [&str; 5],
    correct: &str,
    explanation: &str,
    difficulty: &str,
    tags: &[&str],
) -> CanonicalQuestion {
    CanonicalQuestion {
        id: id.to_string(),
        kind: QuestionKind::SingleChoice,
        prompt_text: prompt.to_string(),
        options: ["A", "B", "C", "D", "E"]
            .iter()
            .zip(options)
            .map(|(id, text)| QuestionOption::new(*id, text))
            .collect(),
        correct_option_id: correct.to_string(),
        explanation: explanation.to_string(),
        difficulty: difficulty.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        quality: Vec::new(),
    }
}

/// The local fallback question set. Always non-empty, every answer key valid.
pub fn fallback_questions() -> Vec<CanonicalQuestion> {
    vec![
        question(
            "local-1",
            "If 3x + 7 = 25, what is the value of x?",
            ["4", "5", "6", "7", "8"],
            "C",
            "Subtract 7 from both sides to get 3x = 18, then divide by 3.",
            "easy",
            &["algebra"],
        ),
        question(
            "local-2",
            "A circle has area 16π. What is its circumference?",
            ["4π", "8π", "16π", "32π", "64π"],
            "B",
            "πr² = 16π gives r = 4, so the circumference is 2πr = 8π.",
            "medium",
            &["geometry"],
        ),
        question(
            "local-3",
            "The average of five numbers is 12. If one number is removed, the average of the remaining four is 10. What number was removed?",
            ["10", "12", "14", "18", "20"],
            "E",
            "The five numbers sum to 60 and the remaining four sum to 40, so the removed number is 20.",
            "medium",
            &["data analysis", "statistics"],
        ),
        question(
            "local-4",
            "What is 15% of 240?",
            ["24", "30", "36", "40", "48"],
            "C",
            "0.15 × 240 = 36.",
            "easy",
            &["arithmetic", "percent"],
        ),
        question(
            "local-5",
            "How many ways can 3 books be chosen from 7 distinct books, ignoring order?",
            ["21", "35", "42", "210", "343"],
            "B",
            "C(7, 3) = 7 × 6 × 5 / (3 × 2 × 1) = 35.",
            "hard",
            &["data analysis", "combinatorics"],
        ),
    ]
}
