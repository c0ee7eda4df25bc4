//! Non-fatal findings reported while parsing.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// A macro parameter was evaluated but never referenced.
    UnusedMacroParam { macro_name: String, param: String },
}

impl Diagnostic {
    pub fn unused_macro_param(macro_name: impl Into<String>, param: impl Into<String>) -> Self {
        Self::UnusedMacroParam {
            macro_name: macro_name.into(),
            param: param.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnusedMacroParam { macro_name, param } => {
                write!(f, "macro param not used: macro={macro_name}, param={param}")
            }
        }
    }
}

/// Append-only channel receiving diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
