//! Arithmetic expression evaluator behind the on-screen calculator.
//!
//! Input is restricted to decimal numbers, `+ - * /`, parentheses and
//! whitespace. The text is gated character by character, tokenized, and
//! evaluated by recursive precedence climbing. Nothing outside that closed
//! grammar is ever interpreted.

use std::fmt;

use crate::error::EvalError;

/// Significant decimal digits kept in every result, like a pocket calculator.
pub const SIGNIFICANT_DIGITS: usize = 10;

/// Maximum nesting of parentheses and unary signs.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{n}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.') || c.is_whitespace()
}

/// Reject any character outside the arithmetic alphabet.
///
/// `position` in the error is the character index, not the byte offset.
pub fn check_characters(text: &str) -> Result<(), EvalError> {
    match text.chars().enumerate().find(|(_, c)| !is_allowed(*c)) {
        Some((position, ch)) => Err(EvalError::InvalidCharacter { ch, position }),
        None => Ok(()),
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let tok = match c {
            _ if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                if literal.matches('.').count() > 1 || literal == "." {
                    return Err(EvalError::MalformedExpression(format!(
                        "invalid number '{literal}'"
                    )));
                }
                let value = literal.parse::<f64>().map_err(|_| {
                    EvalError::MalformedExpression(format!("invalid number '{literal}'"))
                })?;
                if !value.is_finite() {
                    return Err(EvalError::DomainError);
                }
                out.push(Token::Num(value));
                continue;
            }
            other => {
                return Err(EvalError::InvalidCharacter {
                    ch: other,
                    position: i,
                })
            }
        };
        out.push(tok);
        i += 1;
    }

    Ok(out)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::MalformedExpression(
                "expression nested too deeply".into(),
            ));
        }
        Ok(())
    }

    /// expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc -= self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    /// term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivideByZero);
                    }
                    acc /= rhs;
                }
                _ => return Ok(acc),
            }
        }
    }

    /// factor := ('+' | '-') factor | number | '(' expr ')'
    fn factor(&mut self) -> Result<f64, EvalError> {
        match self.advance() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Plus) => {
                self.descend()?;
                let v = self.factor();
                self.depth -= 1;
                v
            }
            Some(Token::Minus) => {
                self.descend()?;
                let v = self.factor().map(|v| -v);
                self.depth -= 1;
                v
            }
            Some(Token::LParen) => {
                self.descend()?;
                let v = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(v),
                    Some(tok) => Err(EvalError::MalformedExpression(format!(
                        "expected ')' but found '{tok}'"
                    ))),
                    None => Err(EvalError::MalformedExpression(
                        "missing closing parenthesis".into(),
                    )),
                }
            }
            Some(tok) => Err(EvalError::MalformedExpression(format!(
                "unexpected '{tok}'"
            ))),
            None => Err(EvalError::MalformedExpression(
                "unexpected end of expression".into(),
            )),
        }
    }
}

/// Evaluate an arithmetic expression.
///
/// Standard precedence applies (`*` and `/` bind tighter than `+` and `-`),
/// equal-precedence operators associate left, and the result is rounded to
/// [`SIGNIFICANT_DIGITS`] significant digits.
pub fn evaluate(text: &str) -> Result<f64, EvalError> {
    check_characters(text)?;
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(EvalError::MalformedExpression("empty expression".into()));
    }

    let mut parser = Parser::new(&tokens);
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(EvalError::MalformedExpression(format!(
            "unexpected '{tok}'"
        )));
    }

    finish(value)
}

/// Square root, defined for non-negative operands only.
pub fn sqrt(value: f64) -> Result<f64, EvalError> {
    if value < 0.0 {
        return Err(EvalError::DomainError);
    }
    finish(value.sqrt())
}

/// Round a computed value, rejecting anything that is not a finite number.
///
/// Rounding can push a value just below `f64::MAX` over the edge, so the
/// check runs on the rounded result.
pub fn finish(value: f64) -> Result<f64, EvalError> {
    let rounded = round_significant(value);
    if !rounded.is_finite() {
        return Err(EvalError::DomainError);
    }
    Ok(rounded)
}

/// Round to [`SIGNIFICANT_DIGITS`] significant decimal digits.
pub fn round_significant(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Canonical display text for a number: rounded, no float noise, no `-0`.
pub fn format_number(value: f64) -> String {
    let rounded = round_significant(value);
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(s: &str) -> String {
        format_number(evaluate(s).unwrap())
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("64 / 4 / 2").unwrap(), 8.0);
        assert_eq!(evaluate("2 * (3 + (4 - 1)) / 3").unwrap(), 4.0);
    }

    #[test]
    fn unary_signs() {
        assert_eq!(evaluate("-1").unwrap(), -1.0);
        assert_eq!(evaluate("3 - -2").unwrap(), 5.0);
        assert_eq!(evaluate("-(2 + 3)").unwrap(), -5.0);
        assert_eq!(evaluate("+4").unwrap(), 4.0);
    }

    #[test]
    fn float_noise_is_rounded_away() {
        assert_eq!(eval_str("0.1 + 0.2"), "0.3");
        assert_eq!(eval_str("1.1 * 3"), "3.3");
        assert_eq!(eval_str("10 / 3"), "3.333333333");
        assert_eq!(eval_str("2 / 3"), "0.6666666667");
    }

    #[test]
    fn decimal_literal_forms() {
        assert_eq!(evaluate(".5 + 5.").unwrap(), 5.5);
        assert!(matches!(
            evaluate("1.2.3"),
            Err(EvalError::MalformedExpression(_))
        ));
        assert!(matches!(
            evaluate(". + 1"),
            Err(EvalError::MalformedExpression(_))
        ));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(evaluate("10 / 0"), Err(EvalError::DivideByZero));
        assert_eq!(evaluate("1 / (2 - 2)"), Err(EvalError::DivideByZero));
        assert_eq!(evaluate("0 / 5").unwrap(), 0.0);
    }

    #[test]
    fn injected_content_is_rejected() {
        assert_eq!(
            evaluate("1+1;process.exit()"),
            Err(EvalError::InvalidCharacter {
                ch: ';',
                position: 3
            })
        );
        assert!(matches!(
            evaluate("2 ** 3 ^ 1"),
            Err(EvalError::InvalidCharacter { ch: '^', .. })
        ));
        assert!(matches!(
            evaluate("alert(1)"),
            Err(EvalError::InvalidCharacter { ch: 'a', position: 0 })
        ));
    }

    #[test]
    fn malformed_expressions() {
        for input in ["", "   ", "1 +", "* 2", "(1 + 2", "1 + 2)", "()", "2 3"] {
            assert!(
                matches!(evaluate(input), Err(EvalError::MalformedExpression(_))),
                "expected malformed for {input:?}"
            );
        }
    }

    #[test]
    fn deep_nesting_terminates() {
        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            evaluate(&deep),
            Err(EvalError::MalformedExpression(_))
        ));
        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(evaluate(&shallow).unwrap(), 1.0);
    }

    #[test]
    fn overflow_is_a_domain_error() {
        let huge = format!("1{}", "0".repeat(308));
        assert_eq!(
            evaluate(&format!("{huge} * {huge}")),
            Err(EvalError::DomainError)
        );
    }

    #[test]
    fn rounding_near_max_is_a_domain_error() {
        // f64::MAX itself; ten significant digits round it past the largest finite value.
        let max = format!("17976931348623157{}", "0".repeat(292));
        assert_eq!(evaluate(&max), Err(EvalError::DomainError));
        assert_eq!(finish(f64::MAX), Err(EvalError::DomainError));
        assert_eq!(finish(f64::NAN), Err(EvalError::DomainError));
    }

    #[test]
    fn literal_too_large_for_f64_is_a_domain_error() {
        let literal = format!("1{}", "0".repeat(309));
        assert_eq!(evaluate(&literal), Err(EvalError::DomainError));
        assert_eq!(evaluate(&format!("1 / {literal}")), Err(EvalError::DomainError));
    }

    #[test]
    fn square_root() {
        assert_eq!(sqrt(16.0).unwrap(), 4.0);
        assert_eq!(format_number(sqrt(2.0).unwrap()), "1.414213562");
        assert_eq!(sqrt(0.0).unwrap(), 0.0);
        assert_eq!(sqrt(-1.0), Err(EvalError::DomainError));
    }

    #[test]
    fn format_number_canonical() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.30000000000000004), "0.3");
        assert_eq!(format_number(1234567890123.0), "1234567890000");
    }
}
