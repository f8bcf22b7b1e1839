//! Tokenizer for the `.x` text grammar.

use super::error::{ParseError, ParseResult};
use super::stream::CharacterStream;

/// Token classes of the text grammar.
///
/// A leading `-` is its own token; the parser combines it with the
/// following number. UUID brackets are observed but their contents are
/// discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    StringLit,
    Ident,
    Comma,
    Semicolon,
    LBrace,
    RBrace,
    Minus,
    Uuid,
    Eof,
}

impl TokenKind {
    /// Human-readable name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::StringLit => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Minus => "'-'",
            TokenKind::Uuid => "UUID",
            TokenKind::Eof => "end of file",
        }
    }
}

/// A token with its source text (empty for punctuation).
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            value: String::new(),
        }
    }

    fn with_value(kind: TokenKind, value: String) -> Self {
        Self { kind, value }
    }
}

/// Converts a character stream into tokens, tracking the current line for
/// diagnostics and skipping whitespace and line comments (`#`, `//`).
pub struct Tokenizer {
    stream: CharacterStream,
    line: usize,
}

impl Tokenizer {
    pub fn new(stream: CharacterStream) -> Self {
        Self { stream, line: 1 }
    }

    /// Current line number, 1-based.
    pub fn line(&self) -> usize {
        self.line
    }

    fn skip_to_eol(&mut self) -> ParseResult<()> {
        while let Some(c) = self.stream.get_char()? {
            if c == '\n' {
                self.line += 1;
                break;
            }
        }
        Ok(())
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        loop {
            let c = match self.stream.get_char()? {
                Some(c) => c,
                None => return Ok(Token::new(TokenKind::Eof)),
            };
            match c {
                ' ' | '\t' => {}
                '\n' => self.line += 1,
                '#' => self.skip_to_eol()?,
                '/' => match self.stream.get_char()? {
                    Some('/') => self.skip_to_eol()?,
                    other => {
                        if let Some(ch) = other {
                            self.stream.unget_char(ch);
                        }
                        return Err(ParseError::StraySlash { line: self.line });
                    }
                },
                '<' => loop {
                    match self.stream.get_char()? {
                        Some('>') => return Ok(Token::new(TokenKind::Uuid)),
                        Some(_) => {}
                        None => {
                            return Err(ParseError::Unterminated {
                                what: "UUID",
                                line: self.line,
                            })
                        }
                    }
                },
                '"' => {
                    let mut value = String::new();
                    loop {
                        match self.stream.get_char()? {
                            Some('"') => {
                                return Ok(Token::with_value(TokenKind::StringLit, value))
                            }
                            Some(ch) => value.push(ch),
                            None => {
                                return Err(ParseError::Unterminated {
                                    what: "string",
                                    line: self.line,
                                })
                            }
                        }
                    }
                }
                c if c.is_ascii_digit() || c == '.' => return self.scan_number(c),
                c if c.is_alphabetic() || c == '_' => return self.scan_ident(c),
                '{' => return Ok(Token::new(TokenKind::LBrace)),
                '}' => return Ok(Token::new(TokenKind::RBrace)),
                '-' => return Ok(Token::new(TokenKind::Minus)),
                ';' => return Ok(Token::new(TokenKind::Semicolon)),
                ',' => return Ok(Token::new(TokenKind::Comma)),
                // Anything else (including '\r') is silently skipped.
                _ => {}
            }
        }
    }

    /// Unsigned numeric literal: digits, optional `.` followed by digits.
    /// No sign, no exponent.
    fn scan_number(&mut self, first: char) -> ParseResult<Token> {
        let mut value = String::new();
        let mut next = Some(first);
        if first.is_ascii_digit() {
            value.push(first);
            loop {
                next = self.stream.get_char()?;
                match next {
                    Some(d) if d.is_ascii_digit() => value.push(d),
                    _ => break,
                }
            }
        }
        if next == Some('.') {
            value.push('.');
            loop {
                next = self.stream.get_char()?;
                match next {
                    Some(d) if d.is_ascii_digit() => value.push(d),
                    _ => break,
                }
            }
        }
        if let Some(ch) = next {
            self.stream.unget_char(ch);
        }
        Ok(Token::with_value(TokenKind::Number, value))
    }

    /// Identifier: letter or `_`, then alphanumerics, `_`, or `-`.
    fn scan_ident(&mut self, first: char) -> ParseResult<Token> {
        let mut value = String::from(first);
        loop {
            match self.stream.get_char()? {
                Some(ch) if ch.is_alphanumeric() || ch == '_' || ch == '-' => value.push(ch),
                Some(ch) => {
                    self.stream.unget_char(ch);
                    break;
                }
                None => break,
            }
        }
        Ok(Token::with_value(TokenKind::Ident, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<(TokenKind, String)> {
        let mut tokenizer = Tokenizer::new(CharacterStream::from_string(input));
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token().unwrap();
            let done = token.kind == TokenKind::Eof;
            tokens.push((token.kind, token.value));
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = tokenize("xof 303;{},-1.5");
        let kinds: Vec<TokenKind> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].1, "xof");
        assert_eq!(tokens[1].1, "303");
        assert_eq!(tokens[7].1, "1.5");
    }

    #[test]
    fn test_tokenizing_is_deterministic() {
        let input = "Frame Root {\n  # comment\n  Mesh { 3; 1.0;-2.0;0.5;, }\n}";
        assert_eq!(tokenize(input), tokenize(input));
    }

    #[test]
    fn test_comments_and_lines() {
        let mut tokenizer = Tokenizer::new(CharacterStream::from_string(
            "# header comment\n// another\nMesh",
        ));
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Ident);
        assert_eq!(token.value, "Mesh");
        assert_eq!(tokenizer.line(), 3);
    }

    #[test]
    fn test_uuid_contents_discarded() {
        let tokens = tokenize("<3D82AB5E-62DA-11cf-AB39-0020AF71E433> Mesh");
        assert_eq!(tokens[0].0, TokenKind::Uuid);
        assert_eq!(tokens[1].1, "Mesh");
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize("\"textures/wood.png\"");
        assert_eq!(tokens[0].0, TokenKind::StringLit);
        assert_eq!(tokens[0].1, "textures/wood.png");
    }

    #[test]
    fn test_identifier_with_dash_and_underscore() {
        let tokens = tokenize("_my-name2");
        assert_eq!(tokens[0].0, TokenKind::Ident);
        assert_eq!(tokens[0].1, "_my-name2");
    }

    #[test]
    fn test_number_without_integer_part() {
        let tokens = tokenize(".25");
        assert_eq!(tokens[0].0, TokenKind::Number);
        assert_eq!(tokens[0].1, ".25");
    }

    #[test]
    fn test_stray_slash_is_fatal() {
        let mut tokenizer = Tokenizer::new(CharacterStream::from_string("/ 1"));
        assert!(matches!(
            tokenizer.next_token(),
            Err(ParseError::StraySlash { line: 1 })
        ));
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let mut tokenizer = Tokenizer::new(CharacterStream::from_string("\"oops"));
        assert!(matches!(
            tokenizer.next_token(),
            Err(ParseError::Unterminated { what: "string", .. })
        ));
    }

    #[test]
    fn test_unterminated_uuid_is_fatal() {
        let mut tokenizer = Tokenizer::new(CharacterStream::from_string("<1234"));
        assert!(matches!(
            tokenizer.next_token(),
            Err(ParseError::Unterminated { what: "UUID", .. })
        ));
    }
}
