//! The `grepractice eval` command.

use anyhow::{Context, Result};

use grepractice_core::eval::{evaluate, format_number};

pub fn execute(expression: Vec<String>) -> Result<()> {
    let expression = expression.join(" ");
    let value =
        evaluate(&expression).with_context(|| format!("could not evaluate '{expression}'"))?;
    println!("{}", format_number(value));
    Ok(())
}
