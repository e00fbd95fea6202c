//! Stock card behaviors.

use std::sync::Arc;

use tracing::debug;

use crate::domain::resources::{Production, Resources};
use crate::effects::{EffectContext, OnActivate, OnEvent, OnPlay};
use crate::error::EngineError;
use crate::events::bus::SubscriptionId;
use crate::events::GameEvent;
use crate::txn::ops;
use crate::txn::transaction::Transaction;

/// On-play: releases greenhouse gases, raising oxygen two steps.
pub struct GreenhouseBurst;

impl OnPlay for GreenhouseBurst {
    fn effect_id(&self) -> &'static str {
        "greenhouse-burst"
    }

    fn cost(&self) -> Resources {
        Resources::credits(9)
    }

    fn build(&self, ctx: &EffectContext, txn: &mut Transaction) -> Result<(), EngineError> {
        ops::raise_oxygen_with_bonus(txn, &ctx.session, &ctx.players, &ctx.player_id, 2);
        Ok(())
    }
}

/// On-play: opens a mine, raising steel production.
pub struct MineComplex;

impl OnPlay for MineComplex {
    fn effect_id(&self) -> &'static str {
        "mine-complex"
    }

    fn cost(&self) -> Resources {
        Resources::credits(5)
    }

    fn build(&self, ctx: &EffectContext, txn: &mut Transaction) -> Result<(), EngineError> {
        let delta = Production {
            steel: 1,
            ..Production::default()
        };
        ops::add_production(txn, &ctx.players, &ctx.game_id, &ctx.player_id, delta);
        Ok(())
    }
}

/// On-activate: vents stored heat to raise the temperature one step.
/// Once per generation.
pub struct HeatVents;

impl OnActivate for HeatVents {
    fn effect_id(&self) -> &'static str {
        "heat-vents"
    }

    fn cost(&self) -> Resources {
        Resources::credits(6)
    }

    fn activation_cost(&self) -> Resources {
        Resources::heat(8)
    }

    fn build(&self, ctx: &EffectContext, txn: &mut Transaction) -> Result<(), EngineError> {
        ops::raise_temperature_with_bonus(txn, &ctx.session, &ctx.players, &ctx.player_id, 1);
        Ok(())
    }
}

/// On-event: pays its owner two credits every time the planet warms,
/// whoever caused it.
pub struct ThermalObservatory;

impl ThermalObservatory {
    const PAYOUT: i32 = 2;
}

impl OnEvent for ThermalObservatory {
    fn effect_id(&self) -> &'static str {
        "thermal-observatory"
    }

    fn cost(&self) -> Resources {
        Resources::credits(7)
    }

    fn register(&self, ctx: &EffectContext) -> Result<SubscriptionId, EngineError> {
        let game_id = ctx.game_id.clone();
        let owner = ctx.player_id.clone();
        let ledger = ctx.session.ledger(&ctx.player_id)?;
        // Weak: the bus owns this handler; a strong handle back to the
        // bus would cycle.
        let bus = Arc::downgrade(ctx.session.bus());

        let id = ctx.session.bus().subscribe(move |event| {
            let GameEvent::TemperatureChanged { game_id: event_game, .. } = event else {
                return Ok(());
            };
            if event_game != &game_id {
                return Ok(());
            }
            debug!(player_id = %owner, "thermal observatory payout");
            let events = ledger.credit(&Resources::credits(Self::PAYOUT));
            if let Some(bus) = bus.upgrade() {
                bus.publish_all(&events);
            }
            Ok(())
        });
        Ok(id)
    }
}
