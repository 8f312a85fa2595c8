use std::fmt;

/// Which layer noticed the anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntactic,
}

/// A recorded anomaly. Tokenizing and parsing always carry on past these;
/// the list only makes the leniency observable to callers that care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn lexical(line: u32, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            kind: DiagnosticKind::Lexical,
            line,
            message: message.into(),
        }
    }

    pub fn syntactic(line: u32, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            kind: DiagnosticKind::Syntactic,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntactic => "syntax",
        };
        write!(f, "{} (line {}): {}", kind, self.line, self.message)
    }
}
