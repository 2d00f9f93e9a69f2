//! The `grepractice calc` command.

use anyhow::{anyhow, Result};

use grepractice_core::calculator::{CalculatorState, Key};

pub fn execute(keys: Vec<String>, trace: bool) -> Result<()> {
    let mut calc = CalculatorState::new();

    for label in expand_labels(&keys) {
        let key: Key = label.parse().map_err(|e: String| anyhow!(e))?;
        calc.press(key);
        if trace {
            println!("{label:>5}  {:<16} {}", calc.pending_expression, calc.display);
        }
    }

    if !calc.pending_expression.is_empty() {
        println!("pending: {}", calc.pending_expression);
    }
    println!("display: {}", calc.display);
    if let Some(cause) = &calc.last_error {
        println!("cause: {cause}");
    }
    if calc.memory != 0.0 {
        println!("memory: {}", grepractice_core::eval::format_number(calc.memory));
    }

    Ok(())
}

/// Split arguments into key labels. A run of digits such as `12` is typed
/// one digit at a time.
fn expand_labels(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split_whitespace())
        .flat_map(|word| {
            if word.len() > 1 && word.bytes().all(|b| b.is_ascii_digit()) {
                word.chars().map(String::from).collect::<Vec<_>>()
            } else {
                vec![word.to_string()]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_runs_are_split() {
        let args = vec!["12 +".to_string(), "30".to_string(), "=".to_string()];
        assert_eq!(expand_labels(&args), ["1", "2", "+", "3", "0", "="]);
    }

    #[test]
    fn multi_character_keys_are_kept() {
        let args = vec!["9".to_string(), "+/-".to_string(), "M+".to_string()];
        assert_eq!(expand_labels(&args), ["9", "+/-", "M+"]);
    }
}
