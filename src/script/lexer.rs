//! Tokenizer for transaction scripts

use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Lexing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
}

/// A script token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Assign,
    /// Statement separator: a line break or `;`
    Newline,
}

/// Split a script into tokens
///
/// Whitespace separates tokens, `#` comments run to the end of the line,
/// and both `\n` and `;` terminate statements.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '\n' | ';' => {
                chars.next();
                tokens.push(Token::Newline);
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Assign);
            }
            '"' | '\'' => tokens.push(lex_string(&mut chars, c)?),
            c if c.is_ascii_digit() => tokens.push(lex_number(&mut chars)?),
            c if c.is_ascii_alphabetic() || c == '_' => tokens.push(lex_ident(&mut chars)),
            other => return Err(LexError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

fn lex_string(chars: &mut Peekable<Chars>, quote: char) -> Result<Token, LexError> {
    chars.next();
    let mut text = String::new();

    loop {
        match chars.next() {
            None | Some('\n') => return Err(LexError::UnterminatedString),
            Some(c) if c == quote => return Ok(Token::Str(text)),
            Some('\\') => match chars.next() {
                None => return Err(LexError::UnterminatedString),
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                Some(escaped) => text.push(escaped),
            },
            Some(c) => text.push(c),
        }
    }
}

fn lex_number(chars: &mut Peekable<Chars>) -> Result<Token, LexError> {
    let mut text = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }

    if text.contains('.') {
        text.parse::<f64>()
            .map(Token::Float)
            .map_err(|_| LexError::MalformedNumber(text))
    } else {
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| LexError::MalformedNumber(text))
    }
}

fn lex_ident(chars: &mut Peekable<Chars>) -> Token {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    Token::Ident(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_assignment() {
        let tokens = tokenize("a = 1\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("a".to_string()),
                Token::Assign,
                Token::Int(1),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_tokenize_operators_and_parens() {
        let tokens = tokenize("(1 + 2) * 3 - 4 / 5 % 6").unwrap();
        assert!(tokens.contains(&Token::LParen));
        assert!(tokens.contains(&Token::Star));
        assert!(tokens.contains(&Token::Percent));
        assert_eq!(tokens.len(), 13);
    }

    #[test]
    fn test_tokenize_floats_and_ints() {
        assert_eq!(tokenize("1.5").unwrap(), vec![Token::Float(1.5)]);
        assert_eq!(tokenize("42").unwrap(), vec![Token::Int(42)]);
    }

    #[test]
    fn test_malformed_number() {
        assert_eq!(
            tokenize("1.2.3"),
            Err(LexError::MalformedNumber("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_tokenize_strings_with_either_quote() {
        assert_eq!(
            tokenize(r#""double""#).unwrap(),
            vec![Token::Str("double".to_string())]
        );
        assert_eq!(
            tokenize("'single'").unwrap(),
            vec![Token::Str("single".to_string())]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokenize(r#""a\"b\nc""#).unwrap(),
            vec![Token::Str("a\"b\nc".to_string())]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(tokenize("'open"), Err(LexError::UnterminatedString));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("a = 1 # trailing note\nb = 2").unwrap();
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_semicolon_separates_statements() {
        let tokens = tokenize("a = 1; b = 2").unwrap();
        assert_eq!(
            tokens.iter().filter(|t| **t == Token::Newline).count(),
            1
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(tokenize("a = @"), Err(LexError::UnexpectedChar('@')));
    }
}
