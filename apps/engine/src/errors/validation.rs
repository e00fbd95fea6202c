//! Policy-level validation errors.
//!
//! These are produced before any mutation is attempted and are never
//! retried automatically. Services should return
//! `Result<T, crate::error::EngineError>` and convert using the provided
//! `From<ValidationError> for EngineError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::game::GameStatus;
use crate::domain::resources::ResourceKind;
use crate::domain::{GameId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The game is not accepting actions in its current status.
    GameNotActive { status: GameStatus },
    /// The current-turn slot belongs to someone else (or nobody).
    NotPlayersTurn { current: Option<PlayerId> },
    /// The player's action budget for this turn is exhausted.
    NoActionsRemaining,
    /// First resource dimension that cannot cover the requested cost.
    InsufficientResources {
        kind: ResourceKind,
        required: i32,
        available: i32,
    },
    /// First production dimension that cannot cover the requested amount.
    InsufficientProduction {
        kind: ResourceKind,
        required: i32,
        available: i32,
    },
    /// An on-activate effect was already used this generation.
    EffectAlreadyActivated { effect_id: String },
    CardNotInHand { card: String },
    CardNotPlayed { card: String },
    GameFull { capacity: usize },
    /// Joining or starting is only legal while the game is in the lobby.
    GameAlreadyStarted,
    /// Starting requires at least one joined player.
    NoPlayers,
    UnknownGame { game_id: GameId },
    UnknownPlayer { player_id: PlayerId },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ValidationError::GameNotActive { status } => {
                write!(f, "game is not active, current status: {status}")
            }
            ValidationError::NotPlayersTurn { current } => {
                let current = current.as_deref().unwrap_or("none");
                write!(f, "not player's turn, current turn: {current}")
            }
            ValidationError::NoActionsRemaining => write!(f, "no remaining actions"),
            ValidationError::InsufficientResources {
                kind,
                required,
                available,
            } => write!(f, "need {required} {kind}, have {available}"),
            ValidationError::InsufficientProduction {
                kind,
                required,
                available,
            } => write!(
                f,
                "need {required} {kind} production, have {available}"
            ),
            ValidationError::EffectAlreadyActivated { effect_id } => {
                write!(f, "effect {effect_id} already activated this generation")
            }
            ValidationError::CardNotInHand { card } => write!(f, "card not in hand: {card}"),
            ValidationError::CardNotPlayed { card } => write!(f, "card not in play: {card}"),
            ValidationError::GameFull { capacity } => {
                write!(f, "game is full, capacity {capacity}")
            }
            ValidationError::GameAlreadyStarted => write!(f, "game already started"),
            ValidationError::NoPlayers => write!(f, "game has no players"),
            ValidationError::UnknownGame { game_id } => write!(f, "unknown game: {game_id}"),
            ValidationError::UnknownPlayer { player_id } => {
                write!(f, "unknown player: {player_id}")
            }
        }
    }
}

impl Error for ValidationError {}

impl ValidationError {
    pub fn unknown_game(game_id: impl Into<GameId>) -> Self {
        Self::UnknownGame {
            game_id: game_id.into(),
        }
    }

    pub fn unknown_player(player_id: impl Into<PlayerId>) -> Self {
        Self::UnknownPlayer {
            player_id: player_id.into(),
        }
    }
}
