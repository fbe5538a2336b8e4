//! Arithmetic evaluator for the numeric token stream.
//!
//! Supports:
//! - Numbers (integers, decimals, `e` exponents)
//! - Binary `+ - * /` with the usual precedence, left associative
//! - Unary sign
//!
//! Anything else is an error. There is no grouping, no identifiers, and no
//! function calls.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Eof,
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn next_token(&mut self) -> Result<(usize, Token), EvalError> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some(&(pos, c)) = self.chars.peek() else {
            return Ok((self.input.len(), Token::Eof));
        };

        let token = match c {
            '+' | '-' => {
                self.chars.next();
                // `--` and `++` are not two signs
                if self.chars.next_if(|&(_, next)| next == c).is_some() {
                    return Err(EvalError::Unexpected {
                        found: format!("{c}{c}"),
                        position: pos,
                    });
                }
                let token = if c == '+' { Token::Plus } else { Token::Minus };
                return Ok((pos, token));
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            c if c.is_ascii_digit() || c == '.' => return self.read_number(pos),
            _ => {
                let found: String = self.input[pos..]
                    .chars()
                    .take_while(|c| !c.is_whitespace())
                    .collect();
                return Err(EvalError::Unexpected {
                    found,
                    position: pos,
                });
            }
        };
        self.chars.next();
        Ok((pos, token))
    }

    fn read_number(&mut self, start: usize) -> Result<(usize, Token), EvalError> {
        let mut end = start;
        let mut seen_dot = false;

        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() || (c == '.' && !seen_dot) {
                seen_dot |= c == '.';
                end = i + 1;
                self.chars.next();
            } else {
                break;
            }
        }

        // Exponent part, as produced by number formatting (1.5e+21, 1e-7).
        if let Some(&(i, 'e' | 'E')) = self.chars.peek() {
            let rest = &self.input[i + 1..];
            let sign_len = usize::from(rest.starts_with(['+', '-']));
            let digits = rest[sign_len..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .count();
            if digits > 0 {
                let exp_end = i + 1 + sign_len + digits;
                while self.chars.next_if(|&(j, _)| j < exp_end).is_some() {}
                end = exp_end;
            }
        }

        let literal = &self.input[start..end];
        literal
            .parse::<f64>()
            .map(|n| (start, Token::Number(n)))
            .map_err(|_| EvalError::Unexpected {
                found: literal.to_string(),
                position: start,
            })
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, EvalError> {
        let mut lexer = Lexer::new(input);
        let (position, current) = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            position,
        })
    }

    fn advance(&mut self) -> Result<(), EvalError> {
        let (position, current) = self.lexer.next_token()?;
        self.position = position;
        self.current = current;
        Ok(())
    }

    fn parse(&mut self) -> Result<f64, EvalError> {
        let value = self.parse_additive()?;
        if self.current != Token::Eof {
            return Err(self.unexpected());
        }
        Ok(value)
    }

    // Additive: term (('+' | '-') term)*
    fn parse_additive(&mut self) -> Result<f64, EvalError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            match self.current {
                Token::Plus => {
                    self.advance()?;
                    left += self.parse_multiplicative()?;
                }
                Token::Minus => {
                    self.advance()?;
                    left -= self.parse_multiplicative()?;
                }
                _ => return Ok(left),
            }
        }
    }

    // Multiplicative: unary (('*' | '/') unary)*
    fn parse_multiplicative(&mut self) -> Result<f64, EvalError> {
        let mut left = self.parse_unary()?;
        loop {
            match self.current {
                Token::Star => {
                    self.advance()?;
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.advance()?;
                    left /= self.parse_unary()?;
                }
                _ => return Ok(left),
            }
        }
    }

    // Unary: ('-' | '+') unary | number
    fn parse_unary(&mut self) -> Result<f64, EvalError> {
        match self.current {
            Token::Minus => {
                self.advance()?;
                Ok(-self.parse_unary()?)
            }
            Token::Plus => {
                self.advance()?;
                self.parse_unary()
            }
            Token::Number(n) => {
                self.advance()?;
                Ok(n)
            }
            Token::Eof => Err(EvalError::UnexpectedEnd),
            _ => Err(self.unexpected()),
        }
    }

    fn unexpected(&self) -> EvalError {
        let found = match self.current {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Eof => return EvalError::UnexpectedEnd,
        };
        EvalError::Unexpected {
            found,
            position: self.position,
        }
    }
}

/// Join numeric tokens with single spaces and drop one trailing operator.
pub fn join_expression(tokens: &[String]) -> String {
    let mut expr = tokens.join(" ");
    if expr.ends_with(['+', '-', '*', '/']) {
        expr.pop();
    }
    expr
}

/// Evaluate an arithmetic expression string.
pub fn evaluate_expression(expr: &str) -> Result<f64, EvalError> {
    if expr.trim().is_empty() {
        return Err(EvalError::Empty);
    }
    let value = Parser::new(expr)?.parse()?;
    if !value.is_finite() {
        return Err(EvalError::NonFinite(expr.to_string()));
    }
    Ok(value)
}

/// Evaluate the numeric token stream of an answer.
pub fn evaluate(tokens: &[String]) -> Result<f64, EvalError> {
    evaluate_expression(&join_expression(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn adds() {
        assert_eq!(evaluate(&toks(&["3", "+", "4"])), Ok(7.0));
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(evaluate_expression("2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate_expression("10 - 4 - 3"), Ok(3.0));
        assert_eq!(evaluate_expression("64 / 4 / 2"), Ok(8.0));
        assert_eq!(evaluate_expression("1 - 2 * 3 + 8 / 4"), Ok(-3.0));
    }

    #[test]
    fn unary_sign() {
        assert_eq!(evaluate_expression("-5 * 2"), Ok(-10.0));
        assert_eq!(evaluate_expression("3 * - 2"), Ok(-6.0));
        assert_eq!(evaluate_expression("+4"), Ok(4.0));
        assert_eq!(evaluate_expression("5 - -3"), Ok(8.0));
        assert_eq!(evaluate_expression("- - 5"), Ok(5.0));
    }

    #[test]
    fn doubled_sign_is_rejected() {
        assert_eq!(
            evaluate_expression("5--3"),
            Err(EvalError::Unexpected {
                found: "--".into(),
                position: 1,
            })
        );
        assert!(evaluate_expression("--5").is_err());
        assert!(evaluate(&toks(&["5++3"])).is_err());
        assert_eq!(evaluate_expression("5-+3"), Ok(2.0));
    }

    #[test]
    fn operators_inside_a_token() {
        assert_eq!(evaluate(&toks(&["5-3"])), Ok(2.0));
    }

    #[test]
    fn exponent_literals() {
        assert_eq!(evaluate_expression("1.5e+3"), Ok(1500.0));
        assert_eq!(evaluate_expression("2 * 1e-7"), Ok(2e-7));
        assert_eq!(evaluate(&toks(&["1.5", "*", "1e+21"])), Ok(1.5e21));
    }

    #[test]
    fn trailing_operator_is_dropped() {
        assert_eq!(join_expression(&toks(&["5", "*"])), "5 ");
        assert_eq!(evaluate(&toks(&["5", "*"])), Ok(5.0));
        assert_eq!(evaluate(&toks(&["5-"])), Ok(5.0));
    }

    #[test]
    fn zero_is_a_value() {
        assert_eq!(evaluate(&toks(&["0"])), Ok(0.0));
        assert_eq!(evaluate(&toks(&["3", "-", "3"])), Ok(0.0));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = evaluate(&toks(&["10", "/", "0"])).unwrap_err();
        assert!(matches!(err, EvalError::NonFinite(_)));
    }

    #[test]
    fn empty_input() {
        assert_eq!(evaluate(&[]), Err(EvalError::Empty));
        assert_eq!(evaluate(&toks(&["+"])), Err(EvalError::Empty));
    }

    #[test]
    fn malformed_expressions() {
        assert!(matches!(
            evaluate_expression("3 4"),
            Err(EvalError::Unexpected { .. })
        ));
        assert_eq!(evaluate_expression("3 * * 4").ok(), None);
        assert_eq!(evaluate_expression("2 *"), Err(EvalError::UnexpectedEnd));
        assert!(matches!(
            evaluate_expression("NaN"),
            Err(EvalError::Unexpected { .. })
        ));
        assert!(matches!(
            evaluate_expression("alert(1)"),
            Err(EvalError::Unexpected { position: 0, .. })
        ));
        assert!(evaluate_expression("1.2.3").is_err());
    }
}
