use std::fmt;
use std::io;

#[derive(Debug)]
pub enum RepositoryError {
    LockPoisoned(&'static str),
    Storage(io::Error),
    ZeroPerPage,
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::LockPoisoned(operation) => {
                write!(f, "repository lock poisoned during {}", operation)
            }
            RepositoryError::Storage(e) => write!(f, "storage error: {}", e),
            RepositoryError::ZeroPerPage => write!(f, "per_page must be at least 1"),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RepositoryError {
    fn from(err: io::Error) -> Self {
        RepositoryError::Storage(err)
    }
}
