//! Incremental Adventure: click for coins, buy upgrades, prestige, read the story.
//!
//! `GameStore` owns the single `GameState`. Every change goes through a pure
//! transition from `logic`; after each commit the store runs the story check
//! and then saves, in that order.

pub mod logic;
pub mod notify;
pub mod save;
pub mod state;
pub mod story;

#[cfg(test)]
mod simulator;

use std::collections::VecDeque;

use crate::config::EngineConfig;

use logic::{ClickResult, PrestigeReport, PurchaseResult};
use notify::Notification;
use save::{KeyValueStore, Persistence};
use state::{GameState, UpgradeId};

/// Result of a player action: what happened, the state afterwards, and the
/// notification (if any) to show for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome<R> {
    pub result: R,
    pub state: GameState,
    pub notification: Option<Notification>,
}

pub struct GameStore<S: KeyValueStore> {
    state: GameState,
    persistence: Persistence<S>,
    /// Notifications not yet picked up by the presentation layer.
    pending: VecDeque<Notification>,
    pending_capacity: usize,
    /// Number of committed transitions since hydration.
    revision: u64,
}

impl<S: KeyValueStore> GameStore<S> {
    /// Load the saved game from `backend`, or start fresh if there is none
    /// (or it cannot be used).
    pub fn hydrate(config: &EngineConfig, backend: S) -> Self {
        let mut persistence = Persistence::new(backend, config.storage_key.clone());
        let state = match persistence.load() {
            Some(state) => {
                log::info!(
                    "loaded save: {:.0} coins, prestige {}",
                    state.resources.coins,
                    state.prestige.level()
                );
                state
            }
            None => {
                log::info!("no usable save found, starting a new game");
                GameState::new()
            }
        };
        Self {
            state,
            persistence,
            pending: VecDeque::new(),
            pending_capacity: config.notification_capacity,
            revision: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Compute and commit the next state.
    pub fn apply<F>(&mut self, transition: F) -> &GameState
    where
        F: FnOnce(&GameState) -> GameState,
    {
        let next = transition(&self.state);
        self.commit(next);
        &self.state
    }

    /// Replace the state, then run the story check and save.
    /// Returns the unlock notification if a chapter opened.
    fn commit(&mut self, next: GameState) -> Option<Notification> {
        let (next, unlocked) = story::evaluate(&next);
        self.state = next;
        self.revision += 1;
        if let Some(n) = &unlocked {
            self.notify(n.clone());
        }
        self.persistence.save(&self.state);
        unlocked
    }

    fn notify(&mut self, notification: Notification) {
        if self.pending_capacity == 0 {
            return;
        }
        if self.pending.len() == self.pending_capacity {
            self.pending.pop_front();
        }
        self.pending.push_back(notification);
    }

    fn outcome<R>(&self, result: R, notification: Option<Notification>) -> Outcome<R> {
        Outcome {
            result,
            state: self.snapshot(),
            notification,
        }
    }

    /// Take every notification raised since the last call, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn click(&mut self) -> Outcome<ClickResult> {
        let (next, result) = logic::click(&self.state);
        match result {
            ClickResult::Success => {
                self.commit(next);
                self.outcome(result, None)
            }
            ClickResult::InsufficientEnergy => {
                let n = Notification::insufficient_energy();
                self.notify(n.clone());
                self.outcome(result, Some(n))
            }
        }
    }

    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Outcome<PurchaseResult> {
        let (next, result) = logic::purchase_upgrade(&self.state, id);
        match result {
            PurchaseResult::Success => {
                log::debug!("bought {} level {}", id, next.upgrades.get(id).level());
                let unlocked = self.commit(next);
                self.outcome(result, unlocked)
            }
            PurchaseResult::InsufficientCoins => {
                let n = Notification::insufficient_coins();
                self.notify(n.clone());
                self.outcome(result, Some(n))
            }
        }
    }

    /// Purchase by identifier string, as the presentation layer names
    /// upgrades.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not one of `clickPower`, `autoClicker`,
    /// `energyRegen`; callers must only pass identifiers the engine listed.
    pub fn purchase_upgrade_named(&mut self, key: &str) -> Outcome<PurchaseResult> {
        let id = key
            .parse::<UpgradeId>()
            .unwrap_or_else(|e| panic!("purchase_upgrade_named: {e}"));
        self.purchase_upgrade(id)
    }

    pub fn prestige_reset(&mut self) -> Outcome<PrestigeReport> {
        let (next, report) = logic::prestige_reset(&self.state);
        log::info!(
            "prestige reset to level {} (+{}% production)",
            report.level,
            report.boost_percent
        );
        self.commit(next);
        let n = Notification::prestige(report.boost_percent);
        self.notify(n.clone());
        self.outcome(report, Some(n))
    }

    /// One production tick.
    pub fn tick(&mut self) -> &GameState {
        self.apply(logic::produce)
    }

    /// Final write, for process shutdown.
    pub fn flush(&mut self) {
        self.persistence.save(&self.state);
    }

    /// Delete the save and start over from the initial state (prestige
    /// included).
    pub fn reset_save(&mut self) {
        log::info!("save deleted, starting a new game");
        self.persistence.clear();
        self.state = GameState::new();
        self.pending.clear();
        self.revision += 1;
    }
}
