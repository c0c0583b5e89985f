// vim: tw=80
//! Error definitions

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested type is not defined in the package
    #[error("not found type: {0}, skipped")]
    NotFound(String),

    /// The type has no public methods
    #[error("no methods in type: {0}")]
    NoMockableMethods(String),

    #[error("unknown mock revision: {0}")]
    UnknownStrategy(u32),

    /// A name that can't be used as a Rust identifier
    #[error("invalid identifier {ident:?}: {source}")]
    InvalidIdent {
        ident: String,
        #[source]
        source: syn::Error
    },

    /// A type that doesn't parse, or that no pack can store
    #[error("invalid type {ty:?} in {method}: {message}")]
    InvalidType {
        method: String,
        ty: String,
        message: String
    },

    #[error("failed to parse source: {0}")]
    Parse(#[from] syn::Error),

    /// The generated tokens are not a valid file, so can't be formatted
    #[error("can't format generated code: {0}")]
    Format(#[source] syn::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generating or emitting the mock for one type failed
    #[error("failed to generate mock for {name}: {source}")]
    Failed {
        name: String,
        #[source]
        source: Box<Error>
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// All failures of a batch, in the order they happened.
#[derive(Debug, Default, Error)]
#[error("{}", listing(.0))]
pub struct BatchError(pub Vec<Error>);

fn listing(errs: &[Error]) -> String {
    if errs.is_empty() {
        return "no errors".to_owned();
    }
    let mut s = "found some errors:\n".to_owned();
    for (i, err) in errs.iter().enumerate() {
        s.push_str(&format!("#{} - {}\n", i + 1, err));
    }
    s
}

impl BatchError {
    pub fn push(&mut self, err: Error) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[Error] {
        &self.0
    }
}
