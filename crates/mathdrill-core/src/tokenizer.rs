//! Answer tokenizer.
//!
//! Splits a typed answer such as `"1,5 * 10<sup>3</sup> m/s"` into the
//! numeric/operator stream fed to the evaluator and the unit words joined
//! into the unit string.

use crate::display::js_number_string;
use crate::model::ExponentStyle;

/// The two token streams of one answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokens {
    /// Numbers and single-character operators, in input order.
    pub numeric: Vec<String>,
    /// Non-numeric words, in input order.
    pub units: Vec<String>,
}

impl Tokens {
    /// The unit words concatenated without whitespace, with one leading
    /// operator removed.
    pub fn unit_string(&self) -> String {
        let joined: String = self
            .units
            .concat()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        match joined.strip_prefix(['+', '-', '*', '/']) {
            Some(rest) => rest.to_string(),
            None => joined,
        }
    }
}

/// Tokenizer configured with an exponent reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    exponent_style: ExponentStyle,
}

impl Tokenizer {
    pub fn new(exponent_style: ExponentStyle) -> Self {
        Self { exponent_style }
    }

    pub fn tokenize(&self, answer: &str) -> Tokens {
        let words = split_words(&normalize(answer));
        let mut tokens = Tokens::default();

        for word in &words {
            if is_numeric_word(word) {
                tokens.numeric.push(self.numeric_token(word));
            } else if is_operator(word) {
                tokens.numeric.push(word.clone());
            } else {
                break;
            }
        }

        let mut seen_unit = false;
        for word in &words {
            if is_numeric_word(word) {
                continue;
            }
            if !seen_unit && is_operator(word) {
                continue;
            }
            seen_unit = true;
            tokens.units.push(word.clone());
        }

        tokens
    }

    /// Reduce a numeric word to its mantissa, folding a trailing markup
    /// exponent into the value.
    fn numeric_token(&self, word: &str) -> String {
        let mut mantissa = String::new();
        let mut exponent = String::new();
        let mut in_exponent = false;

        for c in word.chars() {
            if !in_exponent && !c.is_ascii_digit() && c != '.' && c != '-' {
                if c == '<' {
                    in_exponent = true;
                    continue;
                }
                break;
            }

            if in_exponent {
                if c.is_ascii_digit() || c == '-' {
                    exponent.push(c);
                } else if c == '>' && !exponent.is_empty() {
                    break;
                }
            } else {
                mantissa.push(c);
            }
        }

        if exponent.is_empty() {
            return mantissa;
        }

        let base = parse_float_prefix(&mantissa).unwrap_or(f64::NAN);
        let power = parse_float_prefix(&exponent).unwrap_or(f64::NAN);
        let value = match self.exponent_style {
            ExponentStyle::Power => base.powf(power),
            ExponentStyle::Scientific if power.fract() == 0.0 && base.is_finite() => {
                // Exact decimal shift instead of multiplying by a rounded 10^n.
                format!("{base}e{}", power as i64)
                    .parse()
                    .unwrap_or(f64::NAN)
            }
            ExponentStyle::Scientific => base * 10f64.powf(power),
        };
        js_number_string(value)
    }
}

/// Tokenize with the default exponent reading.
pub fn tokenize(answer: &str) -> Tokens {
    Tokenizer::default().tokenize(answer)
}

fn normalize(answer: &str) -> String {
    answer.replace("&nbsp;", " ").replace(',', ".")
}

/// Split on whitespace, except whitespace inside a `<...>` tag.
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_tag = false;

    for c in s.chars() {
        if c.is_whitespace() && !in_tag {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            continue;
        }
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ => {}
        }
        word.push(c);
    }
    if !word.is_empty() {
        words.push(word);
    }

    words
}

fn is_operator(word: &str) -> bool {
    matches!(word, "+" | "-" | "*" | "/")
}

/// A word counts as numeric when its leading number is non-zero, or when it
/// is exactly `"0"`. `"0.0"` and `"00"` are therefore unit words.
pub fn is_numeric_word(word: &str) -> bool {
    word == "0" || parse_float_prefix(word).is_some_and(|v| v != 0.0)
}

/// Parse the longest leading decimal number of `s`, ignoring the rest, the
/// way a browser's `parseFloat` does. Returns `None` when `s` does not start
/// with a number.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
