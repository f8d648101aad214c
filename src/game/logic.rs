//! Incremental Adventure game logic: pure functions, fully testable.
//!
//! Every transition takes the current state by reference and returns the
//! next one. Nothing here touches storage or notification queues; the
//! store decides what to commit.

use super::state::{
    GameState, Prestige, UpgradeId, CLICK_ENERGY_COST, ENERGY_REGEN_PER_LEVEL, MAX_ENERGY,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickResult {
    Success,
    InsufficientEnergy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseResult {
    Success,
    InsufficientCoins,
}

/// What a prestige reset granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrestigeReport {
    pub level: u32,
    /// Total production boost in percent (`level * 10`).
    pub boost_percent: u32,
}

/// Coins earned by one click.
pub fn click_value(state: &GameState) -> f64 {
    state.upgrades.click_power.level() as f64 * state.prestige.multiplier()
}

/// Coins produced per tick by auto clickers.
pub fn coins_per_tick(state: &GameState) -> f64 {
    state.upgrades.auto_clicker.level() as f64 * state.prestige.multiplier()
}

/// Energy restored per tick (before the cap).
pub fn energy_per_tick(state: &GameState) -> f64 {
    state.upgrades.energy_regen.level() as f64 * ENERGY_REGEN_PER_LEVEL
}

pub fn can_click(state: &GameState) -> bool {
    state.resources.energy >= CLICK_ENERGY_COST
}

pub fn can_afford(state: &GameState, id: UpgradeId) -> bool {
    state.resources.coins >= state.upgrades.get(id).cost()
}

/// Spend one energy for coins. On `InsufficientEnergy` the returned state
/// equals the input and must not be committed.
pub fn click(state: &GameState) -> (GameState, ClickResult) {
    if !can_click(state) {
        return (state.clone(), ClickResult::InsufficientEnergy);
    }
    let mut next = state.clone();
    next.resources.coins += click_value(state);
    next.resources.energy -= CLICK_ENERGY_COST;
    (next, ClickResult::Success)
}

/// Buy one level of `id`. On `InsufficientCoins` the returned state equals
/// the input and must not be committed.
pub fn purchase_upgrade(state: &GameState, id: UpgradeId) -> (GameState, PurchaseResult) {
    if !can_afford(state, id) {
        return (state.clone(), PurchaseResult::InsufficientCoins);
    }
    let mut next = state.clone();
    let upgrade = next.upgrades.get_mut(id);
    next.resources.coins -= upgrade.cost();
    *upgrade = upgrade.purchased();
    (next, PurchaseResult::Success)
}

/// One tick of passive production.
pub fn produce(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.resources.coins += coins_per_tick(state);
    next.resources.energy = (state.resources.energy + energy_per_tick(state)).min(MAX_ENERGY);
    next
}

/// Start a new run one prestige level higher. Resources and upgrades go
/// back to their initial values; story progress carries over.
pub fn prestige_reset(state: &GameState) -> (GameState, PrestigeReport) {
    let level = state.prestige.level() + 1;
    let next = GameState {
        story: state.story.clone(),
        prestige: Prestige::at_level(level),
        ..GameState::new()
    };
    let report = PrestigeReport {
        level,
        boost_percent: level * 10,
    };
    (next, report)
}
