use serde::{Deserialize, Serialize};

/// The six spendable resource dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Credits,
    Steel,
    Titanium,
    Plants,
    Energy,
    Heat,
}

impl ResourceKind {
    /// All kinds in canonical order. Validation reports the first failing
    /// dimension in this order.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Credits,
        ResourceKind::Steel,
        ResourceKind::Titanium,
        ResourceKind::Plants,
        ResourceKind::Energy,
        ResourceKind::Heat,
    ];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Credits => "credits",
            ResourceKind::Steel => "steel",
            ResourceKind::Titanium => "titanium",
            ResourceKind::Plants => "plants",
            ResourceKind::Energy => "energy",
            ResourceKind::Heat => "heat",
        };
        f.write_str(name)
    }
}

/// A vector over the six resource dimensions.
///
/// Used both for held resources and (as [`Production`]) for per-generation
/// income. Copy semantics throughout: reads hand out values, never
/// references into guarded state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub credits: i32,
    pub steel: i32,
    pub titanium: i32,
    pub plants: i32,
    pub energy: i32,
    pub heat: i32,
}

/// Per-generation resource income. Same shape as holdings.
pub type Production = Resources;

impl Resources {
    pub fn credits(amount: i32) -> Self {
        Self {
            credits: amount,
            ..Self::default()
        }
    }

    pub fn heat(amount: i32) -> Self {
        Self {
            heat: amount,
            ..Self::default()
        }
    }

    pub fn get(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Credits => self.credits,
            ResourceKind::Steel => self.steel,
            ResourceKind::Titanium => self.titanium,
            ResourceKind::Plants => self.plants,
            ResourceKind::Energy => self.energy,
            ResourceKind::Heat => self.heat,
        }
    }

    pub fn set(&mut self, kind: ResourceKind, amount: i32) {
        match kind {
            ResourceKind::Credits => self.credits = amount,
            ResourceKind::Steel => self.steel = amount,
            ResourceKind::Titanium => self.titanium = amount,
            ResourceKind::Plants => self.plants = amount,
            ResourceKind::Energy => self.energy = amount,
            ResourceKind::Heat => self.heat = amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        ResourceKind::ALL.iter().all(|&k| self.get(k) == 0)
    }

    /// First dimension where `self` cannot cover `cost`, with the
    /// required/available amounts, or `None` when fully covered.
    pub fn first_shortfall(&self, cost: &Resources) -> Option<(ResourceKind, i32, i32)> {
        ResourceKind::ALL
            .iter()
            .map(|&k| (k, cost.get(k), self.get(k)))
            .find(|&(_, required, available)| available < required)
    }

    /// Subtract `cost` from every dimension. Callers check coverage first
    /// via [`Resources::first_shortfall`]; this does not clamp.
    pub fn sub(&mut self, cost: &Resources) {
        for kind in ResourceKind::ALL {
            self.set(kind, self.get(kind) - cost.get(kind));
        }
    }

    /// Add `gain` to every dimension, flooring each at zero so a negative
    /// adjustment can never drive a holding below empty.
    pub fn add_clamped(&mut self, gain: &Resources) {
        for kind in ResourceKind::ALL {
            self.set(kind, (self.get(kind) + gain.get(kind)).max(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_reports_first_failing_dimension_in_order() {
        let held = Resources {
            credits: 5,
            steel: 0,
            ..Resources::default()
        };
        let cost = Resources {
            credits: 18,
            steel: 2,
            ..Resources::default()
        };
        assert_eq!(
            held.first_shortfall(&cost),
            Some((ResourceKind::Credits, 18, 5))
        );
    }

    #[test]
    fn shortfall_none_when_covered() {
        let held = Resources::credits(20);
        assert_eq!(held.first_shortfall(&Resources::credits(18)), None);
    }

    #[test]
    fn add_clamped_floors_at_zero() {
        let mut held = Resources::credits(3);
        held.add_clamped(&Resources {
            credits: -10,
            plants: 4,
            ..Resources::default()
        });
        assert_eq!(held.credits, 0);
        assert_eq!(held.plants, 4);
    }
}
