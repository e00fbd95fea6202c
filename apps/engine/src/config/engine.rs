//! Engine tuning knobs read from the environment.
//!
//! Game-rule bounds (parameter ceilings, step sizes) are constants in
//! `crate::state::parameters`, not configuration.

use std::env;

use crate::error::EngineError;

/// Runtime configuration for the engine core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Action budget granted to a player when their turn starts.
    pub actions_per_turn: i32,
    /// Credits each player starts the game with.
    pub starting_credits: i32,
    /// Maximum players a game accepts.
    pub max_players: usize,
    /// Pre-allocated capacity of a transaction's event log.
    pub event_log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            actions_per_turn: 2,
            starting_credits: 40,
            max_players: 5,
            event_log_capacity: 16,
        }
    }
}

impl EngineConfig {
    /// Build a config from `ENGINE_*` environment variables, falling back
    /// to defaults for anything unset. A set-but-unparsable variable is a
    /// configuration error, not a silent default.
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Self::default();
        Ok(Self {
            actions_per_turn: var_or("ENGINE_ACTIONS_PER_TURN", defaults.actions_per_turn)?,
            starting_credits: var_or("ENGINE_STARTING_CREDITS", defaults.starting_credits)?,
            max_players: var_or("ENGINE_MAX_PLAYERS", defaults.max_players)?,
            event_log_capacity: var_or("ENGINE_EVENT_LOG_CAPACITY", defaults.event_log_capacity)?,
        })
    }
}

fn var_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, EngineError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| EngineError::config(format!("invalid value for {name}: '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert!(cfg.actions_per_turn > 0);
        assert!(cfg.max_players >= 2);
    }

    #[test]
    fn unset_env_falls_back_to_defaults() {
        // None of the ENGINE_* variables are set in the test environment.
        let cfg = EngineConfig::from_env().unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }
}
