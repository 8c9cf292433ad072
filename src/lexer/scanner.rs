//! Scanner for Lox source code.
//!
//! Tokens are produced on demand, one per call to [`Scanner::scan_token`].
//! Lexical errors do not abort scanning: they come back as `TokenKind::Error`
//! tokens and the caller decides what to do with them.

use crate::lexer::token::{Token, TokenKind};

/// The lexer transforms source code into a stream of tokens.
pub struct Scanner<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: u32,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// The line the scanner cursor is currently on.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Scan every token up to and including the end-of-input token.
    pub fn scan_tokens(&mut self) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Scan the next token. Once the input is exhausted every call returns
    /// an `Eof` token.
    pub fn scan_token(&mut self) -> Token<'src> {
        self.skip_whitespace();
        self.start = self.current;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        if is_alpha(c) {
            return self.identifier();
        }
        if c.is_ascii_digit() {
            return self.number();
        }

        match c {
            b'(' => self.make_token(TokenKind::LeftParen),
            b')' => self.make_token(TokenKind::RightParen),
            b'{' => self.make_token(TokenKind::LeftBrace),
            b'}' => self.make_token(TokenKind::RightBrace),
            b';' => self.make_token(TokenKind::Semicolon),
            b',' => self.make_token(TokenKind::Comma),
            b'.' => self.make_token(TokenKind::Dot),
            b'-' => self.make_token(TokenKind::Minus),
            b'+' => self.make_token(TokenKind::Plus),
            b'/' => self.make_token(TokenKind::Slash),
            b'*' => self.make_token(TokenKind::Star),

            // Two-character tokens
            b'!' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.make_token(kind)
            }
            b'=' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.make_token(kind)
            }
            b'<' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.make_token(kind)
            }
            b'>' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.make_token(kind)
            }

            b'"' => self.string(),

            _ => {
                // Swallow the rest of a multi-byte character so the cursor
                // stays on a char boundary.
                while self.peek().is_some_and(is_continuation_byte) {
                    self.current += 1;
                }
                Token::error("Unexpected character.", self.line)
            }
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\r' | b'\t') => {
                    self.advance();
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some(b'/') if self.peek_next() == Some(b'/') => {
                    while self.peek().is_some_and(|c| c != b'\n') {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn string(&mut self) -> Token<'src> {
        while let Some(c) = self.peek() {
            if c == b'"' {
                break;
            }
            if c == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return Token::error("Unterminated string.", self.line);
        }

        // The closing quote.
        self.advance();
        self.make_token(TokenKind::String)
    }

    fn number(&mut self) -> Token<'src> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // A fractional part needs at least one digit after the dot.
        if self.peek() == Some(b'.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        self.make_token(TokenKind::Number)
    }

    fn identifier(&mut self) -> Token<'src> {
        while self.peek().is_some_and(|c| is_alpha(c) || c.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(self.identifier_kind())
    }

    /// Classify the current lexeme, dispatching on its first (and for `f`
    /// and `t`, second) byte instead of hashing the whole word.
    fn identifier_kind(&self) -> TokenKind {
        let lexeme = &self.source.as_bytes()[self.start..self.current];
        match lexeme[0] {
            b'a' => check_keyword(lexeme, 1, b"nd", TokenKind::And),
            b'c' => check_keyword(lexeme, 1, b"lass", TokenKind::Class),
            b'e' => check_keyword(lexeme, 1, b"lse", TokenKind::Else),
            b'f' if lexeme.len() > 1 => match lexeme[1] {
                b'a' => check_keyword(lexeme, 2, b"lse", TokenKind::False),
                b'o' => check_keyword(lexeme, 2, b"r", TokenKind::For),
                b'u' => check_keyword(lexeme, 2, b"n", TokenKind::Fun),
                _ => TokenKind::Identifier,
            },
            b'i' => check_keyword(lexeme, 1, b"f", TokenKind::If),
            b'n' => check_keyword(lexeme, 1, b"il", TokenKind::Nil),
            b'o' => check_keyword(lexeme, 1, b"r", TokenKind::Or),
            b'p' => check_keyword(lexeme, 1, b"rint", TokenKind::Print),
            b'r' => check_keyword(lexeme, 1, b"eturn", TokenKind::Return),
            b's' => check_keyword(lexeme, 1, b"uper", TokenKind::Super),
            b't' if lexeme.len() > 1 => match lexeme[1] {
                b'h' => check_keyword(lexeme, 2, b"is", TokenKind::This),
                b'r' => check_keyword(lexeme, 2, b"ue", TokenKind::True),
                _ => TokenKind::Identifier,
            },
            b'v' => check_keyword(lexeme, 1, b"ar", TokenKind::Var),
            b'w' => check_keyword(lexeme, 1, b"hile", TokenKind::While),
            _ => TokenKind::Identifier,
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.current += 1;
        Some(c)
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current + 1).copied()
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token::new(kind, &self.source[self.start..self.current], self.line)
    }
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_continuation_byte(c: u8) -> bool {
    c & 0xC0 == 0x80
}

fn check_keyword(lexeme: &[u8], start: usize, rest: &[u8], kind: TokenKind) -> TokenKind {
    if lexeme.len() == start + rest.len() && &lexeme[start..] == rest {
        kind
    } else {
        TokenKind::Identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_tokens()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            scan("(){};,."),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            scan("+ - * / ! != = == < <= > >="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_spans_whole_lexeme() {
        let tokens = Scanner::new("123.45").scan_tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "123.45");
        assert_eq!(tokens[0].len(), 6);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_trailing_dot_is_not_part_of_number() {
        let tokens = Scanner::new("1.").scan_tokens();
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn test_leading_dot_is_not_a_number() {
        assert_eq!(
            scan(".5"),
            vec![TokenKind::Dot, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = Scanner::new("\"abc").scan_tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "Unterminated string.");
    }

    #[test]
    fn test_string_spans_lines() {
        let mut scanner = Scanner::new("\"a\nb\" x");
        let string = scanner.scan_token();
        assert_eq!(string.kind, TokenKind::String);
        assert_eq!(string.lexeme, "\"a\nb\"");
        assert_eq!(string.line, 2);
        assert_eq!(scanner.scan_token().kind, TokenKind::Identifier);
    }

    #[test]
    fn test_comment_skips_to_next_line() {
        let mut scanner = Scanner::new("// c\n1");
        let tokens = scanner.scan_tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[0].line, 2);
        assert_eq!(scanner.line(), 2);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            scan("and class else false for fun if nil or print return super this true var while"),
            vec![
                TokenKind::And,
                TokenKind::Class,
                TokenKind::Else,
                TokenKind::False,
                TokenKind::For,
                TokenKind::Fun,
                TokenKind::If,
                TokenKind::Nil,
                TokenKind::Or,
                TokenKind::Print,
                TokenKind::Return,
                TokenKind::Super,
                TokenKind::This,
                TokenKind::True,
                TokenKind::Var,
                TokenKind::While,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_prefixes_are_identifiers() {
        assert_eq!(
            scan("f t an classy nil_ _true truth fo"),
            vec![TokenKind::Identifier; 8]
                .into_iter()
                .chain([TokenKind::Eof])
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unexpected_character() {
        let tokens = Scanner::new("1 @ 2").scan_tokens();
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].lexeme, "Unexpected character.");
        assert_eq!(tokens[2].lexeme, "2");
    }

    #[test]
    fn test_multibyte_character_is_one_error() {
        assert_eq!(
            scan("é1"),
            vec![TokenKind::Error, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_eof_repeats() {
        let mut scanner = Scanner::new("  ");
        for _ in 0..3 {
            assert_eq!(scanner.scan_token().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_line_numbers() {
        let tokens = Scanner::new("1\n\n2\r\n3").scan_tokens();
        let lines: Vec<u32> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 3, 4, 4]);
    }
}
