//! Error types for confgraph-core

use crate::path::NodePath;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Macro reference not resolvable: macro={macro_name}, param={param}")]
    MacroResolution { macro_name: String, param: String },

    #[error("Type not resolvable: {identifier}")]
    TypeResolution { identifier: String },

    #[error("Invalid object spec at {path}: {reason}")]
    SpecValidation { path: NodePath, reason: String },

    #[error("Invalid definition for macro {macro_name}: {reason}")]
    InvalidMacro { macro_name: String, reason: String },

    #[error("Failed to evaluate macro {macro_name}: {source}")]
    MacroEvaluation {
        macro_name: String,
        #[source]
        source: Box<Error>,
    },

    /// Failure raised by a constructor, passed through as-is.
    #[error(transparent)]
    Construction(BoxError),
}

impl Error {
    pub fn spec(path: &NodePath, reason: impl Into<String>) -> Self {
        Self::SpecValidation {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub fn invalid_macro(macro_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMacro {
            macro_name: macro_name.into(),
            reason: reason.into(),
        }
    }

    /// Downcast a construction error to the constructor's own error type.
    pub fn construction_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Construction(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Argument access failures inside constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    #[error("Missing argument: {name}")]
    Missing { name: String },

    #[error("Argument {name} has the wrong type: expected {expected}")]
    WrongType { name: String, expected: &'static str },

    #[error("Invalid argument {name}: {reason}")]
    Invalid { name: String, reason: String },

    #[error("Expected no positional arguments, got {count}")]
    UnexpectedPositional { count: usize },
}

impl ArgError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }

    pub fn wrong_type(name: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            name: name.into(),
            expected,
        }
    }

    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
