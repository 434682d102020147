use std::fmt;

use crate::save::PersistenceError;

/// Why a board operation left the roster untouched.
///
/// None of these are fatal: every variant means "state unchanged" and the
/// boundary decides whether to surface it.
#[derive(Debug)]
pub enum BoardError {
    /// A coordinate computation produced NaN or infinity.
    InvalidComputation { x: f64, y: f64 },
    /// Mutation attempted on a read-only board or against a locked entry.
    PermissionDenied(String),
    /// The presentation layer did not supply the field rectangle.
    MissingFieldSurface,
    NotFound(String),
    /// A second gesture tried to start while one is still in flight.
    GestureInProgress,
    /// No gesture is in flight.
    NoActiveGesture,
    Persistence(PersistenceError),
    InvalidConfig(String),
    /// The roster already holds as many entries as a stored document may carry.
    RosterFull { limit: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoardError::InvalidComputation { x, y } => {
                write!(f, "Invalid computation: non-finite coordinate ({}, {})", x, y)
            }
            BoardError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BoardError::MissingFieldSurface => write!(f, "Field surface unavailable"),
            BoardError::NotFound(id) => write!(f, "Entry not found: {}", id),
            BoardError::GestureInProgress => write!(f, "Another gesture is already in progress"),
            BoardError::NoActiveGesture => write!(f, "No gesture in progress"),
            BoardError::Persistence(err) => write!(f, "Persistence error: {}", err),
            BoardError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            BoardError::RosterFull { limit } => write!(f, "Roster is full ({} entries)", limit),
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoardError::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersistenceError> for BoardError {
    fn from(err: PersistenceError) -> Self {
        BoardError::Persistence(err)
    }
}

impl BoardError {
    /// Errors the user caused by interacting with a protected entry or a
    /// shared roster, as opposed to plumbing failures.
    pub fn is_permission(&self) -> bool {
        matches!(self, BoardError::PermissionDenied(_))
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
