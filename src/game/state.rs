//! Incremental Adventure game state definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound of the energy pool.
pub const MAX_ENERGY: f64 = 100.0;

/// Energy spent by one click.
pub const CLICK_ENERGY_COST: f64 = 1.0;

/// Energy restored per tick for each `energyRegen` level.
pub const ENERGY_REGEN_PER_LEVEL: f64 = 0.1;

/// Cost growth factor applied on every purchase (result is floored).
pub const COST_GROWTH: f64 = 1.5;

/// Production bonus granted by each prestige level.
pub const PRESTIGE_STEP: f64 = 0.1;

/// The three purchasable upgrades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeId {
    ClickPower,
    AutoClicker,
    EnergyRegen,
}

impl UpgradeId {
    /// All upgrades in display order.
    pub fn all() -> &'static [UpgradeId] {
        &[
            UpgradeId::ClickPower,
            UpgradeId::AutoClicker,
            UpgradeId::EnergyRegen,
        ]
    }

    /// Identifier used in the persisted record and by the action API.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::ClickPower => "clickPower",
            UpgradeId::AutoClicker => "autoClicker",
            UpgradeId::EnergyRegen => "energyRegen",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeId::ClickPower => "Click Power",
            UpgradeId::AutoClicker => "Auto Clicker",
            UpgradeId::EnergyRegen => "Energy Regen",
        }
    }

    /// Cost of the first purchase.
    pub fn base_cost(&self) -> f64 {
        match self {
            UpgradeId::ClickPower => 10.0,
            UpgradeId::AutoClicker => 50.0,
            UpgradeId::EnergyRegen => 100.0,
        }
    }

    /// Level a fresh run starts with.
    pub fn initial_level(&self) -> u32 {
        match self {
            UpgradeId::ClickPower => 1,
            UpgradeId::AutoClicker => 0,
            UpgradeId::EnergyRegen => 1,
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown upgrade identifier `{0}`")]
pub struct UnknownUpgrade(pub String);

impl FromStr for UpgradeId {
    type Err = UnknownUpgrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpgradeId::all()
            .iter()
            .copied()
            .find(|id| id.key() == s)
            .ok_or_else(|| UnknownUpgrade(s.to_string()))
    }
}

/// Spendable resources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub coins: f64,
    /// Always within `0.0..=MAX_ENERGY`.
    pub energy: f64,
}

/// One upgrade's level and the price of its next level.
///
/// Only a purchase moves an upgrade forward, so `cost` always sits on the
/// `floor(cost * 1.5)` curve starting at the base cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    level: u32,
    cost: f64,
}

impl Upgrade {
    /// Fresh upgrade as a new run starts with it.
    pub fn initial(id: UpgradeId) -> Self {
        Self {
            level: id.initial_level(),
            cost: id.base_cost(),
        }
    }

    /// Upgrade after `purchases` purchases on top of the initial level.
    pub fn after_purchases(id: UpgradeId, purchases: u32) -> Self {
        (0..purchases).fold(Self::initial(id), |u, _| u.purchased())
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The upgrade one level higher, with its cost moved along the curve.
    pub fn purchased(&self) -> Self {
        Self {
            level: self.level + 1,
            cost: next_cost(self.cost),
        }
    }
}

/// Next price on the cost curve. Saturates at `f64::MAX` so the price
/// stays finite and serializable.
pub fn next_cost(cost: f64) -> f64 {
    (cost * COST_GROWTH).floor().min(f64::MAX)
}

/// All upgrades, keyed by field so the persisted record reads
/// `upgrades.clickPower`, `upgrades.autoClicker`, `upgrades.energyRegen`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrades {
    pub click_power: Upgrade,
    pub auto_clicker: Upgrade,
    pub energy_regen: Upgrade,
}

impl Upgrades {
    pub fn get(&self, id: UpgradeId) -> &Upgrade {
        match id {
            UpgradeId::ClickPower => &self.click_power,
            UpgradeId::AutoClicker => &self.auto_clicker,
            UpgradeId::EnergyRegen => &self.energy_regen,
        }
    }

    pub fn get_mut(&mut self, id: UpgradeId) -> &mut Upgrade {
        match id {
            UpgradeId::ClickPower => &mut self.click_power,
            UpgradeId::AutoClicker => &mut self.auto_clicker,
            UpgradeId::EnergyRegen => &mut self.energy_regen,
        }
    }

    /// Sum of all upgrade levels (drives story unlocks).
    pub fn total_levels(&self) -> u32 {
        UpgradeId::all().iter().map(|id| self.get(*id).level()).sum()
    }
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            click_power: Upgrade::initial(UpgradeId::ClickPower),
            auto_clicker: Upgrade::initial(UpgradeId::AutoClicker),
            energy_regen: Upgrade::initial(UpgradeId::EnergyRegen),
        }
    }
}

/// Story progress. `current_chapter` follows `unlocked_chapters`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub current_chapter: usize,
    pub unlocked_chapters: usize,
}

/// Prestige level and the production multiplier it grants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prestige {
    level: u32,
    multiplier: f64,
}

impl Prestige {
    pub fn at_level(level: u32) -> Self {
        Self {
            level,
            multiplier: Self::multiplier_for(level),
        }
    }

    pub fn multiplier_for(level: u32) -> f64 {
        1.0 + level as f64 * PRESTIGE_STEP
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Default for Prestige {
    fn default() -> Self {
        Self::at_level(0)
    }
}

/// Why a state value breaks the model's invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidState {
    #[error("coins must be finite and non-negative, got {0}")]
    Coins(f64),
    #[error("energy must be within 0..=100, got {0}")]
    Energy(f64),
    #[error("{id} level {level} is below its starting level")]
    UpgradeLevel { id: UpgradeId, level: u32 },
    #[error("{id} cost {cost} is off the cost curve (expected {expected})")]
    UpgradeCost { id: UpgradeId, cost: f64, expected: f64 },
    #[error("chapter {current}/{unlocked} out of range for {count} chapters")]
    Chapter {
        current: usize,
        unlocked: usize,
        count: usize,
    },
    #[error("prestige multiplier {multiplier} does not match level {level}")]
    Multiplier { level: u32, multiplier: f64 },
}

/// Full state of an Incremental Adventure game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub resources: Resources,
    pub upgrades: Upgrades,
    pub story: Story,
    pub prestige: Prestige,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            resources: Resources {
                coins: 0.0,
                energy: 10.0,
            },
            upgrades: Upgrades::default(),
            story: Story::default(),
            prestige: Prestige::default(),
        }
    }

    /// Check every model invariant against `chapter_count` chapters.
    pub fn validate(&self, chapter_count: usize) -> Result<(), InvalidState> {
        let coins = self.resources.coins;
        if !coins.is_finite() || coins < 0.0 {
            return Err(InvalidState::Coins(coins));
        }
        let energy = self.resources.energy;
        if !(0.0..=MAX_ENERGY).contains(&energy) {
            return Err(InvalidState::Energy(energy));
        }

        for &id in UpgradeId::all() {
            let upgrade = self.upgrades.get(id);
            let purchases = upgrade
                .level()
                .checked_sub(id.initial_level())
                .ok_or(InvalidState::UpgradeLevel {
                    id,
                    level: upgrade.level(),
                })?;
            let expected = curve_cost(id, purchases);
            if upgrade.cost() != expected {
                return Err(InvalidState::UpgradeCost {
                    id,
                    cost: upgrade.cost(),
                    expected,
                });
            }
        }

        let Story {
            current_chapter,
            unlocked_chapters,
        } = self.story;
        if unlocked_chapters >= chapter_count || current_chapter > unlocked_chapters {
            return Err(InvalidState::Chapter {
                current: current_chapter,
                unlocked: unlocked_chapters,
                count: chapter_count,
            });
        }

        let prestige = &self.prestige;
        if prestige.multiplier() != Prestige::multiplier_for(prestige.level()) {
            return Err(InvalidState::Multiplier {
                level: prestige.level(),
                multiplier: prestige.multiplier(),
            });
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cost after `purchases` steps along the curve. Stops early once the
/// price has saturated, since `f64::MAX` is a fixed point of the step.
fn curve_cost(id: UpgradeId, purchases: u32) -> f64 {
    let mut cost = id.base_cost();
    for _ in 0..purchases {
        let next = next_cost(cost);
        if next == cost {
            break;
        }
        cost = next;
    }
    cost
}
