//! The module contains the errors the engine can throw.
//!
//! Every variant carries a short human-readable payload naming the entity or
//! the rejected value. `NotFound` is deliberately used both for rows that do
//! not exist and for rows owned by another user, so the API never reveals
//! whether somebody else's data exists.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Already settled: {0}")]
    AlreadySettled(String),
    #[error("No envelopes configured for {0}")]
    NoEnvelopesConfigured(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::AlreadySettled(a), Self::AlreadySettled(b)) => a == b,
            (Self::NoEnvelopesConfigured(a), Self::NoEnvelopesConfigured(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
