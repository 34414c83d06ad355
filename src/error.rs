//! Centralized error types for the game.
//!
//! This module defines all error types used throughout the application,
//! providing a consistent error handling approach.

use crate::ecs::Entity;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur during game operation.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Entity error: {0}")]
    Ecs(#[from] EcsError),

    #[error("Board parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("SDL error: {0}")]
    Sdl(String),
}

/// Errors raised by the entity/component store.
///
/// Both variants indicate a lifecycle-ordering bug in the caller, so they
/// are propagated rather than recovered from.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EcsError {
    #[error("Entity {0} is destroyed or was never created")]
    InvalidEntity(Entity),

    #[error("Entity {entity} has no {component} component")]
    MissingComponent { entity: Entity, component: &'static str },
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),

    #[error("Row {row} is {found} cells wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("Board has no player spawn marker")]
    MissingPlayerSpawn,

    #[error("Board must have exactly 4 ghost spawn markers, found {0}")]
    InvalidGhostSpawnCount(usize),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
