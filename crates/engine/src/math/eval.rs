//! Arithmetic evaluation over decimal literals.
//!
//! Only numbers, `+ - * /`, unary minus and parentheses are understood.
//! There is no name lookup of any kind, so nothing in the input can do
//! more than compute a number.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

lazy_static! {
    static ref MILLION_SUFFIX: Regex =
        Regex::new(r"([0-9]+)[kк]{2}").expect("Invalid regex pattern");
    static ref THOUSAND_SUFFIX: Regex =
        Regex::new(r"([0-9]+)[kк]").expect("Invalid regex pattern");
    static ref DOUBLE_OPERATOR: Regex =
        Regex::new(r"[+\-*/]{2,}").expect("Invalid regex pattern");
}

/// Map unicode operators to ASCII, drop whitespace and trim stray outer
/// parentheses.
///
/// Outer parentheses are kept when the counts balance, since
/// `(20+5)*(4)` must not lose its first and last character.
fn clean(expression: &str) -> String {
    let mapped: String = expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' | '⋅' => '*',
            '÷' => '/',
            '—' | '–' => '-',
            other => other,
        })
        .collect();

    let open = mapped.matches('(').count();
    let close = mapped.matches(')').count();
    if open == close && open > 0 {
        mapped
    } else {
        mapped.trim_matches(|c| c == '(' || c == ')').to_string()
    }
}

/// Rewrite `3к` as `3*1000` and `2kk` as `2*1000000`.
fn expand_suffixes(expression: &str) -> String {
    let expanded = MILLION_SUFFIX.replace_all(expression, "${1}*1000000");
    THOUSAND_SUFFIX
        .replace_all(&expanded, "${1}*1000")
        .into_owned()
}

fn is_safe(expression: &str) -> bool {
    if !expression
        .chars()
        .all(|c| c.is_ascii_digit() || "+-*/(). ".contains(c))
    {
        return false;
    }

    let mut depth: usize = 0;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    if depth != 0 {
        return false;
    }

    if DOUBLE_OPERATOR.is_match(expression) {
        return false;
    }

    !matches!(expression.chars().next(), Some('+' | '*' | '/'))
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Option<Decimal> {
        let mut value = self.term()?;
        loop {
            if self.eat(b'+') {
                value = value.checked_add(self.term()?)?;
            } else if self.eat(b'-') {
                value = value.checked_sub(self.term()?)?;
            } else {
                return Some(value);
            }
        }
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Option<Decimal> {
        let mut value = self.factor()?;
        loop {
            if self.eat(b'*') {
                value = value.checked_mul(self.factor()?)?;
            } else if self.eat(b'/') {
                value = value.checked_div(self.factor()?)?;
            } else {
                return Some(value);
            }
        }
    }

    // factor := '-' factor | '(' expr ')' | number
    fn factor(&mut self) -> Option<Decimal> {
        if self.eat(b'-') {
            return self.factor().map(|value| -value);
        }
        if self.eat(b'(') {
            let value = self.expr()?;
            return self.eat(b')').then_some(value);
        }
        self.number()
    }

    fn number(&mut self) -> Option<Decimal> {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let literal = std::str::from_utf8(&self.input[start..self.pos]).ok()?;
        if !literal.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        Decimal::from_str(literal.trim_end_matches('.')).ok()
    }
}

/// Evaluate an arithmetic expression.
///
/// Returns `None` for anything outside `0-9 + - * / ( ) .`, unbalanced
/// parentheses, doubled operators, a leading `+ * /`, division by zero,
/// overflow and every other malformed input.
pub fn evaluate(expression: &str) -> Option<Decimal> {
    let expression = expand_suffixes(&clean(expression));
    if expression.is_empty() || !is_safe(&expression) {
        return None;
    }

    let mut parser = Parser {
        input: expression.as_bytes(),
        pos: 0,
    };
    let value = parser.expr()?;
    (parser.pos == parser.input.len()).then_some(value)
}
