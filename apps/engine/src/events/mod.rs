//! Domain events and the in-process event bus.
//!
//! Events are immutable copies describing something that already
//! happened. Guarded components *return* the events their mutations
//! produce; only the orchestrating caller publishes, strictly after all
//! state locks are released.

pub mod bus;

use serde::{Deserialize, Serialize};

use crate::domain::resources::{Production, Resources};
use crate::domain::{GameId, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    TemperatureChanged {
        game_id: GameId,
        old: i32,
        new: i32,
    },
    OxygenChanged {
        game_id: GameId,
        old: i32,
        new: i32,
    },
    OceansChanged {
        game_id: GameId,
        old: i32,
        new: i32,
    },
    ResourcesChanged {
        game_id: GameId,
        player_id: PlayerId,
        resources: Resources,
    },
    ProductionChanged {
        game_id: GameId,
        player_id: PlayerId,
        production: Production,
    },
    TerraformRatingChanged {
        game_id: GameId,
        player_id: PlayerId,
        old: i32,
        new: i32,
    },
    ActionsChanged {
        game_id: GameId,
        player_id: PlayerId,
        remaining: i32,
    },
    PlayerJoined {
        game_id: GameId,
        player_id: PlayerId,
        name: String,
    },
    PlayerPassed {
        game_id: GameId,
        player_id: PlayerId,
    },
    TurnChanged {
        game_id: GameId,
        current: Option<PlayerId>,
    },
    GenerationAdvanced {
        game_id: GameId,
        generation: u32,
    },
    CardPlayed {
        game_id: GameId,
        player_id: PlayerId,
        card: String,
    },
    EffectActivated {
        game_id: GameId,
        player_id: PlayerId,
        effect_id: String,
    },
    /// Ask the broadcast collaborator to push fresh state to clients.
    /// `player_ids: None` means all players in the game.
    BroadcastRequested {
        game_id: GameId,
        player_ids: Option<Vec<PlayerId>>,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> &GameId {
        match self {
            GameEvent::TemperatureChanged { game_id, .. }
            | GameEvent::OxygenChanged { game_id, .. }
            | GameEvent::OceansChanged { game_id, .. }
            | GameEvent::ResourcesChanged { game_id, .. }
            | GameEvent::ProductionChanged { game_id, .. }
            | GameEvent::TerraformRatingChanged { game_id, .. }
            | GameEvent::ActionsChanged { game_id, .. }
            | GameEvent::PlayerJoined { game_id, .. }
            | GameEvent::PlayerPassed { game_id, .. }
            | GameEvent::TurnChanged { game_id, .. }
            | GameEvent::GenerationAdvanced { game_id, .. }
            | GameEvent::CardPlayed { game_id, .. }
            | GameEvent::EffectActivated { game_id, .. }
            | GameEvent::BroadcastRequested { game_id, .. } => game_id,
        }
    }

    /// Short tag used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::TemperatureChanged { .. } => "temperature_changed",
            GameEvent::OxygenChanged { .. } => "oxygen_changed",
            GameEvent::OceansChanged { .. } => "oceans_changed",
            GameEvent::ResourcesChanged { .. } => "resources_changed",
            GameEvent::ProductionChanged { .. } => "production_changed",
            GameEvent::TerraformRatingChanged { .. } => "terraform_rating_changed",
            GameEvent::ActionsChanged { .. } => "actions_changed",
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::PlayerPassed { .. } => "player_passed",
            GameEvent::TurnChanged { .. } => "turn_changed",
            GameEvent::GenerationAdvanced { .. } => "generation_advanced",
            GameEvent::CardPlayed { .. } => "card_played",
            GameEvent::EffectActivated { .. } => "effect_activated",
            GameEvent::BroadcastRequested { .. } => "broadcast_requested",
        }
    }
}
