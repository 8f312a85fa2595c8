use crate::lex::{Token, TokenKind};

/// Forward-only view over the token sequence. The parser threads exactly one
/// of these through the whole descent, so there is a single place the index
/// can move.
#[derive(Debug)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    index: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Cursor<'t> {
        Cursor { tokens, index: 0 }
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    pub fn peek_second(&self) -> Option<&'t Token> {
        self.tokens.get(self.index + 1)
    }

    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.index);
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    /// True at the end-of-input sentinel, or past the last token entirely.
    pub fn at_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => token.kind == TokenKind::EndOfInput,
        }
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |token| token.kind == kind)
    }

    /// Consume the next token only if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }
}
