use serde::{Deserialize, Serialize};

use crate::domain::resources::Production;
use crate::domain::PlayerId;

/// Player record as held by the repository layer.
///
/// Held resources and the per-turn action budget are deliberately absent:
/// they are hot state owned by the session's guarded components
/// (`ResourceLedger`, `TurnState`). This record carries the slow-changing
/// fields that operations persist through the repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cards held, by card/effect identifier.
    pub hand: Vec<String>,
    pub played_cards: Vec<String>,
    pub production: Production,
    pub terraform_rating: i32,
    pub connected: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vec::new(),
            played_cards: Vec::new(),
            production: Production::default(),
            terraform_rating: 20,
            connected: true,
        }
    }

    pub fn holds_card(&self, card: &str) -> bool {
        self.hand.iter().any(|c| c == card)
    }
}
