//! Operator precedence and the parse rule table for Pratt parsing.

use crate::lexer::TokenKind;

/// Operator precedence levels (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None = 0,
    Assignment = 1, // =
    Or = 2,         // or
    And = 3,        // and
    Equality = 4,   // == !=
    Comparison = 5, // < > <= >=
    Term = 6,       // + -
    Factor = 7,     // * /
    Unary = 8,      // ! -
    Call = 9,       // . ()
    Primary = 10,
}

impl Precedence {
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call => Precedence::Primary,
            Precedence::Primary => Precedence::Primary,
        }
    }
}

/// The parse handlers a rule can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFn {
    Grouping,
    Unary,
    Binary,
    Number,
    Literal,
}

/// How a token behaves in prefix and infix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRule {
    pub prefix: Option<ParseFn>,
    pub infix: Option<ParseFn>,
    pub precedence: Precedence,
}

const fn rule(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> ParseRule {
    ParseRule {
        prefix,
        infix,
        precedence,
    }
}

const NONE: ParseRule = rule(None, None, Precedence::None);

/// Look up the rule for a token kind. The match has no wildcard arm, so a
/// new token kind will not compile until it is given a rule here.
pub fn get_rule(kind: TokenKind) -> ParseRule {
    use ParseFn::*;

    match kind {
        TokenKind::LeftParen => rule(Some(Grouping), None, Precedence::None),
        TokenKind::Minus => rule(Some(Unary), Some(Binary), Precedence::Term),
        TokenKind::Plus => rule(None, Some(Binary), Precedence::Term),
        TokenKind::Slash => rule(None, Some(Binary), Precedence::Factor),
        TokenKind::Star => rule(None, Some(Binary), Precedence::Factor),
        TokenKind::Bang => rule(Some(Unary), None, Precedence::None),
        TokenKind::BangEqual => rule(None, Some(Binary), Precedence::Equality),
        TokenKind::EqualEqual => rule(None, Some(Binary), Precedence::Equality),
        TokenKind::Greater => rule(None, Some(Binary), Precedence::Comparison),
        TokenKind::GreaterEqual => rule(None, Some(Binary), Precedence::Comparison),
        TokenKind::Less => rule(None, Some(Binary), Precedence::Comparison),
        TokenKind::LessEqual => rule(None, Some(Binary), Precedence::Comparison),
        TokenKind::Number => rule(Some(Number), None, Precedence::None),
        TokenKind::False => rule(Some(Literal), None, Precedence::None),
        TokenKind::Nil => rule(Some(Literal), None, Precedence::None),
        TokenKind::True => rule(Some(Literal), None, Precedence::None),

        TokenKind::RightParen
        | TokenKind::LeftBrace
        | TokenKind::RightBrace
        | TokenKind::Comma
        | TokenKind::Dot
        | TokenKind::Semicolon
        | TokenKind::Equal
        | TokenKind::Identifier
        | TokenKind::String
        | TokenKind::And
        | TokenKind::Class
        | TokenKind::Else
        | TokenKind::For
        | TokenKind::Fun
        | TokenKind::If
        | TokenKind::Or
        | TokenKind::Print
        | TokenKind::Return
        | TokenKind::Super
        | TokenKind::This
        | TokenKind::Var
        | TokenKind::While
        | TokenKind::Error
        | TokenKind::Eof => NONE,
    }
}
