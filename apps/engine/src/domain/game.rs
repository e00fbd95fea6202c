use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{GameId, PlayerId};

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created, players may join, no actions accepted.
    Lobby,
    /// In play; the only status that accepts player actions.
    Active,
    Completed,
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameStatus::Lobby => "lobby",
            GameStatus::Active => "active",
            GameStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Game record as held by the repository layer.
///
/// Join order of `player_ids` doubles as turn order. The hot mutable state
/// (parameters, ledgers, budgets) lives in the per-game session's guarded
/// components, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub status: GameStatus,
    /// Player whose turn it is; `None` outside active play or between
    /// turn handoffs.
    pub current_turn: Option<PlayerId>,
    pub generation: u32,
    pub player_ids: Vec<PlayerId>,
    pub created_at: OffsetDateTime,
}

impl Game {
    pub fn new(id: GameId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: GameStatus::Lobby,
            current_turn: None,
            generation: 1,
            player_ids: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    /// Next player after `after` in join order that is not in `passed`,
    /// scanning at most one full rotation. Returns `None` when every
    /// other player has passed.
    pub fn next_unpassed_player(
        &self,
        after: &PlayerId,
        passed: &[PlayerId],
    ) -> Option<PlayerId> {
        let start = self.player_ids.iter().position(|p| p == after)?;
        let n = self.player_ids.len();
        (1..=n)
            .map(|offset| &self.player_ids[(start + offset) % n])
            .find(|candidate| !passed.contains(*candidate))
            .cloned()
    }
}
