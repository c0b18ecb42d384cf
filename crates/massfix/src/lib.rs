pub mod delta;
pub mod mass;
pub mod peptide;
pub mod search;
pub mod solution;
pub mod tables;
pub mod truncation;

use std::path::Path;

#[derive(Debug)]
pub enum Error {
    /// A residue code that is not present in the residue table
    UnknownResidue(char),
    /// A terminal species that is not present in the terminus table
    UnknownTerminus(String),
    /// Residue table keys must be exactly one character
    InvalidSymbol(String),
    /// Masses must be finite, and residue/event masses non-negative
    InvalidMass(String, f32),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownResidue(c) => write!(f, "unknown residue `{}`", c),
            Self::UnknownTerminus(s) => write!(f, "unknown terminal species `{}`", s),
            Self::InvalidSymbol(s) => {
                write!(f, "invalid residue symbol `{}`: expected a single character", s)
            }
            Self::InvalidMass(s, m) => write!(f, "invalid mass for `{}`: {}", s, m),
            Self::Json(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub fn read_json<P, T>(path: P) -> Result<T, Error>
where
    P: AsRef<Path>,
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
