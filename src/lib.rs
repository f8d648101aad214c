//! Incremental Adventure game engine.
//!
//! Collect coins with energy, buy upgrades, prestige for a permanent
//! production boost and unlock story chapters along the way. This crate is
//! the engine only: the presentation layer calls the action API on
//! [`GameStore`], drives [`TickScheduler`] from its frame or timer loop, and
//! renders the state snapshots and notifications it gets back.
//!
//! ```
//! use incremental_adventure::{EngineConfig, GameStore, ManualClock, MemoryStore, TickScheduler};
//!
//! let config = EngineConfig::default();
//! let mut store = GameStore::hydrate(&config, MemoryStore::new());
//! let clock = ManualClock::new();
//! let mut scheduler = TickScheduler::new(clock.clone(), config.tick_interval_ms);
//! scheduler.start();
//!
//! store.click();
//! clock.advance(2000.0);
//! assert_eq!(scheduler.pump(&mut store), 2);
//! ```

pub mod config;
pub mod game;
pub mod logging;
pub mod time;

pub use config::{ConfigError, EngineConfig};
pub use game::logic::{ClickResult, PrestigeReport, PurchaseResult};
pub use game::notify::{Notification, Severity};
#[cfg(not(target_arch = "wasm32"))]
pub use game::save::FileStore;
#[cfg(target_arch = "wasm32")]
pub use game::save::LocalStorage;
pub use game::save::{KeyValueStore, MemoryStore, PersistenceError};
pub use game::state::{GameState, UpgradeId};
pub use game::{GameStore, Outcome};
#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;
pub use time::{Clock, ManualClock, StopHandle, TickScheduler};
