//! Card/effect behaviors and their dispatch registry.
//!
//! Behaviors are split into small capability traits rather than one deep
//! hierarchy: a handler implements exactly the capability its card needs.
//! Handlers contribute *operations* to the surrounding transaction (via
//! `build`), so their mutations share the same atomicity and rollback
//! guarantees as everything else.

pub mod registry;
pub mod standard;

use std::sync::Arc;

use crate::domain::resources::Resources;
use crate::domain::{GameId, PlayerId};
use crate::error::EngineError;
use crate::events::bus::SubscriptionId;
use crate::repos::{GameRepository, PlayerRepository};
use crate::state::session::GameSession;
use crate::txn::operation::Operation;
use crate::txn::transaction::Transaction;

pub use registry::{EffectHandler, EffectRegistry};

/// Capability bundle handed to a handler: the acting player, the game's
/// live session, and the repositories it is permitted to touch.
#[derive(Clone)]
pub struct EffectContext {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub session: Arc<GameSession>,
    pub games: Arc<dyn GameRepository>,
    pub players: Arc<dyn PlayerRepository>,
}

/// Immediate one-shot behavior applied when the card is played.
pub trait OnPlay: Send + Sync {
    fn effect_id(&self) -> &'static str;
    /// Cost to play the card.
    fn cost(&self) -> Resources;
    /// Append this effect's operations to the play transaction. Any
    /// appended operation must be reversible, or be the transaction's
    /// final operation.
    fn build(&self, ctx: &EffectContext, txn: &mut Transaction) -> Result<(), EngineError>;
}

/// Repeatable behavior gated by a cost and a once-per-generation counter.
pub trait OnActivate: Send + Sync {
    fn effect_id(&self) -> &'static str;
    /// Cost to put the card into play.
    fn cost(&self) -> Resources;
    /// Cost of each activation.
    fn activation_cost(&self) -> Resources;
    fn build(&self, ctx: &EffectContext, txn: &mut Transaction) -> Result<(), EngineError>;
}

/// Reactive behavior: playing the card registers a subscription on the
/// game's event bus; the handler then fires on other transactions'
/// events.
pub trait OnEvent: Send + Sync {
    fn effect_id(&self) -> &'static str;
    /// Cost to put the card into play.
    fn cost(&self) -> Resources;
    /// Subscribe the reactive behavior. Returns the subscription so the
    /// caller can tear it down.
    fn register(&self, ctx: &EffectContext) -> Result<SubscriptionId, EngineError>;
}

/// Operation wrapping an [`OnEvent`] registration so it participates in
/// rollback: the reverse unsubscribes.
pub fn registration_operation(handler: Arc<dyn OnEvent>, ctx: EffectContext) -> Operation {
    let bus = Arc::clone(ctx.session.bus());
    let subscription: Arc<parking_lot::Mutex<Option<SubscriptionId>>> =
        Arc::new(parking_lot::Mutex::new(None));

    let fwd_subscription = Arc::clone(&subscription);
    Operation::new(
        "register passive effect",
        move || async move {
            *fwd_subscription.lock() = Some(handler.register(&ctx)?);
            Ok(())
        },
        move || async move {
            if let Some(id) = subscription.lock().take() {
                bus.unsubscribe(id);
            }
            Ok(())
        },
    )
}
