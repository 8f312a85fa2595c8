//! Tokenizer.
//!
//! Scans raw bytes into a flat token list. The tokenizer never fails: bytes
//! it cannot place are skipped and reported through the diagnostics list,
//! and unterminated strings run to the end of input. The returned list
//! always ends with a single [`TokenKind::EndOfInput`] token.

use crate::diag::Diagnostic;

/// Half-open byte range into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    DotDot,
    DotDotDot,
    Semicolon,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Hash,
    Equal,
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Break,
    Do,
    Else,
    ElseIf,
    End,
    False,
    For,
    Function,
    Goto,
    If,
    In,
    Local,
    Nil,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    True,
    Until,
    While,
    Identifier,
    Number,
    String,
    EndOfInput,
}

/// `line` is the 1-based line the token starts on; multi-line strings keep
/// their opening line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
}

/// Tokenize `source` in full. Anomalies are reported, never fatal.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    lexer.run();
    (lexer.tokens, lexer.diagnostics)
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: u32) {
        self.tokens.push(Token {
            kind,
            span: Span {
                start,
                end: self.pos,
            },
            line,
        });
    }

    fn push_single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        self.push(kind, start, self.line);
    }

    /// Emit `two` if the next byte is `second`, otherwise `one`.
    fn push_pair(&mut self, second: u8, two: TokenKind, one: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        if self.byte(0) == Some(second) {
            self.pos += 1;
            self.push(two, start, self.line);
        } else {
            self.push(one, start, self.line);
        }
    }

    fn run(&mut self) {
        while let Some(b) = self.byte(0) {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ if b <= 0x20 => self.pos += 1,
                b'(' => self.push_single(TokenKind::LeftParen),
                b')' => self.push_single(TokenKind::RightParen),
                b'{' => self.push_single(TokenKind::LeftBrace),
                b'}' => self.push_single(TokenKind::RightBrace),
                b']' => self.push_single(TokenKind::RightBracket),
                b',' => self.push_single(TokenKind::Comma),
                b';' => self.push_single(TokenKind::Semicolon),
                b':' => self.push_single(TokenKind::Colon),
                b'+' => self.push_single(TokenKind::Plus),
                b'*' => self.push_single(TokenKind::Star),
                b'/' => self.push_single(TokenKind::Slash),
                b'%' => self.push_single(TokenKind::Percent),
                b'^' => self.push_single(TokenKind::Caret),
                b'#' => self.push_single(TokenKind::Hash),
                b'=' => self.push_pair(b'=', TokenKind::EqualEqual, TokenKind::Equal),
                b'<' => self.push_pair(b'=', TokenKind::LessEqual, TokenKind::Less),
                b'>' => self.push_pair(b'=', TokenKind::GreaterEqual, TokenKind::Greater),
                b'~' => {
                    if self.byte(1) == Some(b'=') {
                        let start = self.pos;
                        self.pos += 2;
                        self.push(TokenKind::NotEqual, start, self.line);
                    } else {
                        self.diagnostics
                            .push(Diagnostic::lexical(self.line, "stray `~`"));
                        self.pos += 1;
                    }
                }
                b'[' => {
                    if !self.long_bracket() {
                        self.push_single(TokenKind::LeftBracket);
                    }
                }
                b'.' => self.dots(),
                b'-' => self.minus(),
                b'"' | b'\'' => self.quoted_string(b),
                b'0'..=b'9' => self.number(),
                b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.word(),
                _ => {
                    self.diagnostics.push(Diagnostic::lexical(
                        self.line,
                        format!("unexpected byte 0x{:02x}", b),
                    ));
                    self.pos += 1;
                }
            }
        }
        let end = self.bytes.len();
        self.tokens.push(Token {
            kind: TokenKind::EndOfInput,
            span: Span { start: end, end },
            line: self.line,
        });
    }

    fn dots(&mut self) {
        let start = self.pos;
        self.pos += 1;
        if self.byte(0) == Some(b'.') {
            self.pos += 1;
            if self.byte(0) == Some(b'.') {
                self.pos += 1;
                self.push(TokenKind::DotDotDot, start, self.line);
            } else {
                self.push(TokenKind::DotDot, start, self.line);
            }
        } else {
            self.push(TokenKind::Dot, start, self.line);
        }
    }

    fn minus(&mut self) {
        if self.byte(1) != Some(b'-') {
            self.push_single(TokenKind::Minus);
            return;
        }
        // comment
        self.pos += 2;
        if self.byte(0) == Some(b'[') {
            // the main loop re-dispatches the bracket; long_bracket sees the
            // `--` behind it and suppresses the string token
            return;
        }
        while let Some(b) = self.byte(0) {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Try to scan a long bracket `[=*[ ... ]=*]` starting at the current
    /// `[`. Returns false without moving if the opener is not a long
    /// bracket. A `--` immediately before the opener marks a comment body,
    /// which scans identically but emits no token.
    fn long_bracket(&mut self) -> bool {
        let mut level = 0;
        while self.byte(1 + level) == Some(b'=') {
            level += 1;
        }
        if self.byte(1 + level) != Some(b'[') {
            return false;
        }
        let is_comment = self.pos >= 2 && &self.bytes[self.pos - 2..self.pos] == b"--";
        let start_line = self.line;
        self.pos += 2 + level;
        let content_start = self.pos;
        loop {
            match self.byte(0) {
                None => {
                    let what = if is_comment { "comment" } else { "string" };
                    self.diagnostics.push(Diagnostic::lexical(
                        start_line,
                        format!("unterminated long {}", what),
                    ));
                    if !is_comment {
                        self.push(TokenKind::String, content_start, start_line);
                    }
                    return true;
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(b']') => {
                    let mut close = 0;
                    while self.byte(1 + close) == Some(b'=') {
                        close += 1;
                    }
                    if close == level && self.byte(1 + close) == Some(b']') {
                        let content_end = self.pos;
                        self.pos += 2 + level;
                        if !is_comment {
                            self.tokens.push(Token {
                                kind: TokenKind::String,
                                span: Span {
                                    start: content_start,
                                    end: content_end,
                                },
                                line: start_line,
                            });
                        }
                        return true;
                    }
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Quoted string body; escapes are kept raw, `\\` only shields the next
    /// byte from terminating the scan.
    fn quoted_string(&mut self, quote: u8) {
        let start_line = self.line;
        self.pos += 1;
        let content_start = self.pos;
        loop {
            match self.byte(0) {
                None => {
                    self.diagnostics
                        .push(Diagnostic::lexical(start_line, "unterminated string"));
                    self.push(TokenKind::String, content_start, start_line);
                    return;
                }
                Some(b'\\') if self.byte(1).is_some() => {
                    if self.byte(1) == Some(b'\n') {
                        self.line += 1;
                    }
                    self.pos += 2;
                }
                Some(b) if b == quote => {
                    self.push(TokenKind::String, content_start, start_line);
                    self.pos += 1;
                    return;
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn number(&mut self) {
        let start = self.pos;
        if self.byte(0) == Some(b'0') && matches!(self.byte(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            while matches!(self.byte(0), Some(b) if b.is_ascii_hexdigit() || b == b'.') {
                self.pos += 1;
            }
            if matches!(self.byte(0), Some(b'p') | Some(b'P')) {
                self.pos += 1;
                if matches!(self.byte(0), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
                while matches!(self.byte(0), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        } else {
            while matches!(self.byte(0), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.byte(0) == Some(b'.') {
                self.pos += 1;
                while matches!(self.byte(0), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.byte(0), Some(b'e') | Some(b'E')) {
                self.pos += 1;
                if matches!(self.byte(0), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
                while matches!(self.byte(0), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        self.push(TokenKind::Number, start, self.line);
    }

    fn word(&mut self) {
        let start = self.pos;
        while matches!(self.byte(0), Some(b) if b == b'_' || b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        let kind = keyword_kind(text).unwrap_or(TokenKind::Identifier);
        self.push(kind, start, self.line);
    }
}

/// Keyword lookup, dispatching on the first byte before comparing the rest.
fn keyword_kind(word: &str) -> Option<TokenKind> {
    let kind = match word.as_bytes().first()? {
        b'a' => match word {
            "and" => TokenKind::And,
            _ => return None,
        },
        b'b' => match word {
            "break" => TokenKind::Break,
            _ => return None,
        },
        b'd' => match word {
            "do" => TokenKind::Do,
            _ => return None,
        },
        b'e' => match word {
            "else" => TokenKind::Else,
            "elseif" => TokenKind::ElseIf,
            "end" => TokenKind::End,
            _ => return None,
        },
        b'f' => match word {
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            _ => return None,
        },
        b'g' => match word {
            "goto" => TokenKind::Goto,
            _ => return None,
        },
        b'i' => match word {
            "if" => TokenKind::If,
            "in" => TokenKind::In,
            _ => return None,
        },
        b'l' => match word {
            "local" => TokenKind::Local,
            _ => return None,
        },
        b'n' => match word {
            "nil" => TokenKind::Nil,
            "not" => TokenKind::Not,
            _ => return None,
        },
        b'o' => match word {
            "or" => TokenKind::Or,
            _ => return None,
        },
        b'r' => match word {
            "repeat" => TokenKind::Repeat,
            "return" => TokenKind::Return,
            _ => return None,
        },
        b't' => match word {
            "then" => TokenKind::Then,
            "true" => TokenKind::True,
            _ => return None,
        },
        b'u' => match word {
            "until" => TokenKind::Until,
            _ => return None,
        },
        b'w' => match word {
            "while" => TokenKind::While,
            _ => return None,
        },
        _ => return None,
    };
    Some(kind)
}
