//! Headless play-through of Incremental Adventure.
//! Run with: cargo test -p incremental-adventure simulate_ -- --nocapture

use super::logic::{self, ClickResult, PurchaseResult};
use super::save::MemoryStore;
use super::state::{GameState, UpgradeId, MAX_ENERGY};
use super::story::chapter_count;
use super::GameStore;
use crate::config::EngineConfig;

/// Cheapest affordable upgrade, preferring auto clickers on ties.
fn pick_purchase(state: &GameState) -> Option<UpgradeId> {
    [
        UpgradeId::AutoClicker,
        UpgradeId::ClickPower,
        UpgradeId::EnergyRegen,
    ]
    .into_iter()
    .filter(|id| logic::can_afford(state, *id))
    .min_by(|a, b| {
        state
            .upgrades
            .get(*a)
            .cost()
            .total_cmp(&state.upgrades.get(*b).cost())
    })
}

/// Play `seconds` ticks: click whenever energy allows, then buy greedily.
fn play(store: &mut GameStore<MemoryStore>, seconds: u32) -> u32 {
    let mut purchases = 0;
    for _ in 0..seconds {
        while logic::can_click(store.state()) {
            assert_eq!(store.click().result, ClickResult::Success);
        }
        while let Some(id) = pick_purchase(store.state()) {
            assert_eq!(store.purchase_upgrade(id).result, PurchaseResult::Success);
            purchases += 1;
        }
        store.tick();

        let state = store.state();
        assert!(state.resources.energy >= 0.0 && state.resources.energy <= MAX_ENERGY);
        assert_eq!(state.validate(chapter_count()), Ok(()));
    }
    purchases
}

#[test]
fn simulate_first_run_reaches_second_chapter() {
    let mut store = GameStore::hydrate(&EngineConfig::default(), MemoryStore::new());
    let purchases = play(&mut store, 600);
    let state = store.state();
    println!(
        "10 min: {:.0} coins, {} purchases, levels cp={} ac={} er={}, chapter {}",
        state.resources.coins,
        purchases,
        state.upgrades.click_power.level(),
        state.upgrades.auto_clicker.level(),
        state.upgrades.energy_regen.level(),
        state.story.unlocked_chapters + 1,
    );
    assert!(purchases >= 3, "expected at least 3 purchases, got {purchases}");
    assert!(state.story.unlocked_chapters >= 1);
}

#[test]
fn simulate_prestige_cycles_speed_up_income() {
    let mut store = GameStore::hydrate(&EngineConfig::default(), MemoryStore::new());
    let mut unlocked = 0;
    for cycle in 1..=3 {
        play(&mut store, 300);
        assert!(store.state().story.unlocked_chapters >= unlocked);
        unlocked = store.state().story.unlocked_chapters;

        let out = store.prestige_reset();
        assert_eq!(out.result.level, cycle);
        assert_eq!(out.state.story.unlocked_chapters, unlocked);
    }

    // A click after three resets is worth 1.3 coins.
    let coins_before = store.state().resources.coins;
    store.click();
    assert!((store.state().resources.coins - coins_before - 1.3).abs() < 0.001);
}
