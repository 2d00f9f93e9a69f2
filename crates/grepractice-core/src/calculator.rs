//! Keypad state machine for the on-screen calculator.
//!
//! The keypad keeps a single pending operator: pressing an operator stores
//! `"<display> <op>"` and a later operator replaces it without evaluating.
//! Only `=` sends the pending expression through [`crate::eval::evaluate`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::eval::{self, format_number};

/// Text shown in the display after a failed operation.
pub const ERROR_MARKER: &str = "Error";

/// Binary arithmetic operator on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol used when building the pending expression.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    ToggleSign,
    Sqrt,
    MemoryRecall,
    MemoryClear,
    MemoryAdd,
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim() {
            "." => Key::Decimal,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "*" | "×" | "x" => Key::Operator(Operator::Multiply),
            "/" | "÷" => Key::Operator(Operator::Divide),
            "=" => Key::Equals,
            "+/-" | "±" => Key::ToggleSign,
            "√" => Key::Sqrt,
            d if d.len() == 1 && d.as_bytes()[0].is_ascii_digit() => {
                Key::Digit(d.as_bytes()[0] - b'0')
            }
            other => match other.to_lowercase().as_str() {
                "c" | "clear" => Key::Clear,
                "sqrt" => Key::Sqrt,
                "mr" => Key::MemoryRecall,
                "mc" => Key::MemoryClear,
                "m+" => Key::MemoryAdd,
                _ => return Err(format!("unknown key: {other}")),
            },
        };
        Ok(key)
    }
}

/// State behind the calculator's two display lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    /// Current operand or result, or [`ERROR_MARKER`].
    pub display: String,
    /// Left operand and operator awaiting the right operand, e.g. `"12 +"`.
    pub pending_expression: String,
    /// Value stored with M+.
    pub memory: f64,
    /// The next digit replaces the display instead of appending to it.
    pub reset_on_next_digit: bool,
    /// Cause of the error marker currently shown, if any.
    #[serde(skip)]
    pub last_error: Option<EvalError>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            pending_expression: String::new(),
            memory: 0.0,
            reset_on_next_digit: false,
            last_error: None,
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the display currently shows the error marker.
    pub fn is_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// Numeric value of the display, `None` while it shows an error or the
    /// typed numeral is too large for an `f64`.
    pub fn value(&self) -> Option<f64> {
        if self.is_error() {
            return None;
        }
        self.display.parse().ok().filter(|v: &f64| v.is_finite())
    }

    /// Apply one key press.
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => self.enter_digit(d),
            Key::Decimal => self.enter_decimal(),
            Key::Operator(op) => self.choose_operator(op),
            Key::Equals => self.equals(),
            Key::Clear => self.clear(),
            Key::ToggleSign => {
                if let Some(v) = self.operand() {
                    self.display = format_number(-v);
                }
            }
            Key::Sqrt => {
                if let Some(v) = self.operand() {
                    let result = eval::sqrt(v);
                    self.show(result);
                }
            }
            Key::MemoryRecall => {
                self.display = format_number(self.memory);
                self.last_error = None;
                self.reset_on_next_digit = true;
            }
            Key::MemoryClear => self.memory = 0.0,
            Key::MemoryAdd => {
                if let Some(v) = self.operand() {
                    match eval::finish(self.memory + v) {
                        Ok(sum) => self.memory = sum,
                        Err(e) => self.show(Err(e)),
                    }
                }
            }
        }
    }

    /// Parse and apply a sequence of keypad labels.
    pub fn press_all<'a, I>(&mut self, labels: I) -> Result<(), String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for label in labels {
            self.press(label.parse()?);
        }
        Ok(())
    }

    fn enter_digit(&mut self, digit: u8) {
        let digit = char::from(b'0' + digit.min(9));
        if self.reset_on_next_digit || self.is_error() || self.display == "0" {
            self.display = digit.to_string();
            self.last_error = None;
            self.reset_on_next_digit = false;
        } else {
            self.display.push(digit);
        }
    }

    fn enter_decimal(&mut self) {
        if self.reset_on_next_digit || self.is_error() {
            self.display = "0.".to_string();
            self.last_error = None;
            self.reset_on_next_digit = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Rounded display value for an operation. A numeral that does not fit
    /// an `f64` once rounded turns the display into the error marker and
    /// drops the pending expression.
    fn operand(&mut self) -> Option<f64> {
        if self.is_error() {
            return None;
        }
        let parsed = self.display.parse::<f64>().ok()?;
        match eval::finish(parsed) {
            Ok(v) => Some(v),
            Err(e) => {
                self.pending_expression.clear();
                self.show(Err(e));
                None
            }
        }
    }

    fn choose_operator(&mut self, op: Operator) {
        let Some(v) = self.operand() else {
            return;
        };
        self.pending_expression = format!("{} {op}", format_number(v));
        self.reset_on_next_digit = true;
    }

    fn equals(&mut self) {
        if self.pending_expression.is_empty() || self.operand().is_none() {
            return;
        }
        let expression = format!("{} {}", self.pending_expression, self.display);
        let result = eval::evaluate(&expression);
        tracing::debug!(%expression, ?result, "calculator equals");
        self.pending_expression.clear();
        self.show(result);
    }

    fn clear(&mut self) {
        self.display = "0".to_string();
        self.pending_expression.clear();
        self.reset_on_next_digit = false;
        self.last_error = None;
    }

    fn show(&mut self, result: Result<f64, EvalError>) {
        match result {
            Ok(v) => {
                self.display = format_number(v);
                self.last_error = None;
            }
            Err(e) => {
                self.display = ERROR_MARKER.to_string();
                self.last_error = Some(e);
            }
        }
        self.reset_on_next_digit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(keys: &str) -> CalculatorState {
        let mut calc = CalculatorState::new();
        calc.press_all(keys.split_whitespace()).unwrap();
        calc
    }

    #[test]
    fn digits_and_equals() {
        let calc = run("1 2 + 3 0 =");
        assert_eq!(calc.display, "42");
        assert!(calc.pending_expression.is_empty());
        assert!(calc.reset_on_next_digit);
    }

    #[test]
    fn operator_sets_pending_expression() {
        let calc = run("1 2 +");
        assert_eq!(calc.pending_expression, "12 +");
        assert_eq!(calc.display, "12");
        assert!(calc.reset_on_next_digit);
    }

    #[test]
    fn second_operator_replaces_the_pending_one() {
        let calc = run("7 + *");
        assert_eq!(calc.pending_expression, "7 *");

        // 2 + 3 * 4 on the keypad keeps only "3 *" pending.
        let calc = run("2 + 3 * 4 =");
        assert_eq!(calc.display, "12");
    }

    #[test]
    fn decimal_entry() {
        assert_eq!(run(". 5").display, "0.5");
        assert_eq!(run("1 . . 5").display, "1.5");
        assert_eq!(run("0 . 1 + 0 . 2 =").display, "0.3");
    }

    #[test]
    fn leading_zero_is_replaced() {
        assert_eq!(run("0 0 7").display, "7");
    }

    #[test]
    fn divide_by_zero_shows_marker() {
        let calc = run("1 0 / 0 =");
        assert_eq!(calc.display, ERROR_MARKER);
        assert_eq!(calc.last_error, Some(EvalError::DivideByZero));
        assert_eq!(calc.value(), None);

        // Operators are ignored while the marker is up; a digit starts over.
        let mut calc = calc;
        calc.press(Key::Operator(Operator::Add));
        assert!(calc.pending_expression.is_empty());
        calc.press(Key::Digit(4));
        assert_eq!(calc.display, "4");
        assert!(!calc.is_error());
    }

    #[test]
    fn sqrt_and_domain_error() {
        assert_eq!(run("8 1 sqrt").display, "9");
        let calc = run("1 +/- sqrt");
        assert_eq!(calc.display, ERROR_MARKER);
        assert_eq!(calc.last_error, Some(EvalError::DomainError));
    }

    #[test]
    fn toggle_sign() {
        assert_eq!(run("5 +/-").display, "-5");
        assert_eq!(run("5 +/- +/-").display, "5");
        assert_eq!(run("+/-").display, "0");
        assert_eq!(run("9 - 3 +/- =").display, "12");
    }

    #[test]
    fn clear_keeps_memory() {
        let calc = run("6 M+ 2 + 3 C");
        assert_eq!(calc.display, "0");
        assert!(calc.pending_expression.is_empty());
        assert!(!calc.reset_on_next_digit);
        assert_eq!(calc.memory, 6.0);
    }

    #[test]
    fn memory_operations() {
        // M+ leaves the display editable, so clear before the next operand.
        let mut calc = run("4 M+ C 5 M+");
        assert_eq!(calc.memory, 9.0);

        calc.press(Key::Clear);
        calc.press(Key::MemoryRecall);
        assert_eq!(calc.display, "9");
        assert!(calc.reset_on_next_digit);

        calc.press(Key::Digit(1));
        assert_eq!(calc.display, "1");

        calc.press(Key::MemoryClear);
        assert_eq!(calc.memory, 0.0);
        assert_eq!(calc.display, "1");
    }

    #[test]
    fn memory_keys_leave_pending_expression_alone() {
        let calc = run("3 + MR M+ MC");
        assert_eq!(calc.pending_expression, "3 +");
    }

    #[test]
    fn key_labels() {
        assert_eq!("7".parse::<Key>().unwrap(), Key::Digit(7));
        assert_eq!("×".parse::<Key>().unwrap(), Key::Operator(Operator::Multiply));
        assert_eq!("√".parse::<Key>().unwrap(), Key::Sqrt);
        assert_eq!("m+".parse::<Key>().unwrap(), Key::MemoryAdd);
        assert_eq!("C".parse::<Key>().unwrap(), Key::Clear);
        assert!("12".parse::<Key>().is_err());
        assert!("%".parse::<Key>().is_err());
    }

    #[test]
    fn display_is_never_empty() {
        let keys = [
            "C", "=", "+", "MR", "MC", "+/-", "sqrt", ".", "M+", "0", "/", "0", "=",
        ];
        let mut calc = CalculatorState::new();
        for k in keys {
            calc.press(k.parse().unwrap());
            assert!(!calc.display.is_empty());
            assert!(calc.is_error() || calc.display.parse::<f64>().is_ok());
        }
    }

    fn type_numeral(calc: &mut CalculatorState, numeral: &str) {
        for label in numeral.chars() {
            calc.press(label.to_string().parse().unwrap());
        }
    }

    fn is_numeral_or_marker(calc: &CalculatorState) -> bool {
        calc.display == ERROR_MARKER
            || calc.display.parse::<f64>().map_or(false, f64::is_finite)
    }

    #[test]
    fn memory_overflow_shows_domain_error() {
        let mut calc = CalculatorState::new();
        type_numeral(&mut calc, &format!("1{}", "0".repeat(308)));
        calc.press(Key::MemoryAdd);
        calc.press(Key::MemoryAdd);
        assert_eq!(calc.display, ERROR_MARKER);
        assert_eq!(calc.last_error, Some(EvalError::DomainError));
        assert_eq!(calc.memory, 1e308);

        calc.press(Key::MemoryRecall);
        assert!(!calc.is_error());
        assert!(is_numeral_or_marker(&calc));
        calc.press(Key::ToggleSign);
        assert!(calc.display.starts_with("-1000"));
        assert!(is_numeral_or_marker(&calc));
    }

    #[test]
    fn oversized_display_is_a_domain_error() {
        let huge = format!("1{}", "0".repeat(309));

        let mut calc = CalculatorState::new();
        type_numeral(&mut calc, &huge);
        assert_eq!(calc.value(), None);
        calc.press(Key::ToggleSign);
        assert_eq!(calc.last_error, Some(EvalError::DomainError));
        assert_eq!(calc.display, ERROR_MARKER);

        let mut calc = run("1 +");
        type_numeral(&mut calc, &huge);
        calc.press(Key::Equals);
        assert_eq!(calc.last_error, Some(EvalError::DomainError));
        assert!(calc.pending_expression.is_empty());

        let mut calc = CalculatorState::new();
        type_numeral(&mut calc, &huge);
        calc.press(Key::MemoryAdd);
        assert_eq!(calc.last_error, Some(EvalError::DomainError));
        assert_eq!(calc.memory, 0.0);
    }

    #[test]
    fn operand_rounding_past_max_is_a_domain_error() {
        let mut calc = CalculatorState::new();
        type_numeral(&mut calc, &format!("17976931348623157{}", "0".repeat(292)));
        calc.press(Key::Operator(Operator::Multiply));
        assert_eq!(calc.display, ERROR_MARKER);
        assert_eq!(calc.last_error, Some(EvalError::DomainError));
        assert!(calc.pending_expression.is_empty());
    }
}
