use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::effects::standard::{GreenhouseBurst, HeatVents, MineComplex, ThermalObservatory};
use crate::effects::{OnActivate, OnEvent, OnPlay};
use crate::error::EngineError;

/// A registered behavior, tagged by capability.
#[derive(Clone)]
pub enum EffectHandler {
    Play(Arc<dyn OnPlay>),
    Activate(Arc<dyn OnActivate>),
    Event(Arc<dyn OnEvent>),
}

impl std::fmt::Debug for EffectHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EffectHandler")
            .field(&self.effect_id())
            .finish()
    }
}

impl EffectHandler {
    pub fn effect_id(&self) -> &'static str {
        match self {
            EffectHandler::Play(h) => h.effect_id(),
            EffectHandler::Activate(h) => h.effect_id(),
            EffectHandler::Event(h) => h.effect_id(),
        }
    }
}

/// Identifier → behavior lookup.
///
/// Dispatching an unregistered identifier is always a
/// programming/configuration error: fatal to the single action, not the
/// session.
pub struct EffectRegistry {
    handlers: RwLock<HashMap<String, EffectHandler>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// A registry pre-loaded with the stock card behaviors.
    pub fn with_standard_effects() -> Self {
        let registry = Self::new();
        registry.register(EffectHandler::Play(Arc::new(GreenhouseBurst)));
        registry.register(EffectHandler::Play(Arc::new(MineComplex)));
        registry.register(EffectHandler::Activate(Arc::new(HeatVents)));
        registry.register(EffectHandler::Event(Arc::new(ThermalObservatory)));
        registry
    }

    pub fn register(&self, handler: EffectHandler) {
        let id = handler.effect_id();
        debug!(effect_id = id, "effect registered");
        self.handlers.write().insert(id.to_string(), handler);
    }

    /// Look up a handler of any capability.
    pub fn dispatch(&self, effect_id: &str) -> Result<EffectHandler, EngineError> {
        self.handlers
            .read()
            .get(effect_id)
            .cloned()
            .ok_or_else(|| EngineError::unknown_effect(effect_id))
    }

    /// Look up an on-activate handler specifically.
    pub fn on_activate(&self, effect_id: &str) -> Result<Arc<dyn OnActivate>, EngineError> {
        match self.dispatch(effect_id)? {
            EffectHandler::Activate(h) => Ok(h),
            _ => Err(EngineError::unknown_effect(effect_id)),
        }
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
