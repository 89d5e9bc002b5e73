//! Host-facing driver: owns the session, its clock and its store.
//!
//! The host calls `frame()` once per animation frame and `apply()` for each
//! player command. Loading happens once at construction; saving happens on
//! the autosave cadence and on demand.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::{save, Catalog, Command, Notification, Session};
use crate::error::{EngineError, StorageError};
use crate::storage::KeyValueStore;
use crate::time::GameTime;

pub struct Runtime<C: Clock, S: KeyValueStore> {
    session: Session,
    clock: C,
    store: S,
    game_time: GameTime,
    ticks_since_save: u32,
}

impl<C: Clock, S: KeyValueStore> Runtime<C, S> {
    /// Build a session and load any saved progress into it. A missing or
    /// unreadable save is not an error: the session simply starts fresh.
    pub fn new(config: EngineConfig, catalog: Catalog, clock: C, mut store: S) -> Result<Self, EngineError> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let now = clock.now_ms();
        let game_time = GameTime::new(config.tick_rate_hz);
        let mut session = Session::new(config, catalog, now)?;

        match save::load_from_store(&mut session, &mut store) {
            Ok(true) => log::info!("loaded saved session"),
            Ok(false) => log::info!("no usable save, starting fresh"),
            Err(e) => log::warn!("failed to load save: {e}"),
        }

        Ok(Self {
            session,
            clock,
            store,
            game_time,
            ticks_since_save: 0,
        })
    }

    /// Advance by however many fixed ticks fit since the last frame.
    /// Returns the number of ticks run.
    pub fn frame(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let ticks = self.game_time.update(now as f64);
        if ticks == 0 {
            return 0;
        }
        self.session.tick(ticks, now);

        self.ticks_since_save = self.ticks_since_save.saturating_add(ticks);
        let interval = self.session.config.autosave_interval_ticks;
        if interval > 0 && self.ticks_since_save >= interval {
            // A failed autosave is retried on the next interval.
            let _ = self.save_now();
        }
        ticks
    }

    pub fn apply(&mut self, command: &Command) -> bool {
        let now = self.clock.now_ms();
        self.session.apply(command, now)
    }

    /// Write the session to the store immediately.
    pub fn save_now(&mut self) -> Result<(), StorageError> {
        self.ticks_since_save = 0;
        save::save_to_store(&self.session, &mut self.store).map_err(|e| {
            log::warn!("failed to save session: {e}");
            e
        })
    }

    pub fn next_notification(&mut self) -> Option<Notification> {
        self.session.next_notification()
    }

    /// Drop the frame timestamp so the next frame runs no ticks, e.g. when
    /// the page becomes visible again.
    pub fn resume(&mut self) {
        self.game_time.reset();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn total_ticks(&self) -> u64 {
        self.game_time.total_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    /// Store whose writes always fail.
    #[derive(Default)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            rng_seed: Some(3),
            autosave_interval_ticks: 40,
            ..EngineConfig::default()
        }
    }

    fn runtime(clock: &ManualClock) -> Runtime<&ManualClock, MemoryStore> {
        Runtime::new(config(), Catalog::standard(), clock, MemoryStore::new()).unwrap()
    }

    #[test]
    fn frame_runs_fixed_ticks() {
        let clock = ManualClock::new(1_000);
        let mut rt = runtime(&clock);
        assert_eq!(rt.frame(), 0);
        clock.advance(120);
        assert_eq!(rt.frame(), 2);
        clock.advance(30);
        assert_eq!(rt.frame(), 1);
        assert_eq!(rt.total_ticks(), 3);
    }

    #[test]
    fn production_accrues_through_frames() {
        let clock = ManualClock::new(0);
        let mut rt = runtime(&clock);
        let drip = rt.session().upgrade_index("drip").unwrap();
        rt.session_mut().upgrades[drip].level = 5; // 1.0/s
        rt.frame();
        for _ in 0..10 {
            clock.advance(100);
            rt.frame();
        }
        assert!((rt.session().ledger.balance - 1.0).abs() < 0.001);
    }

    #[test]
    fn autosave_after_interval() {
        let clock = ManualClock::new(0);
        let mut rt = runtime(&clock);
        rt.frame();
        rt.apply(&Command::Click);
        assert_eq!(rt.store().get("essence_engine_save").unwrap(), None);

        // 40 ticks = 2s at 20 Hz, fed in 500ms frames
        for _ in 0..4 {
            clock.advance(500);
            rt.frame();
        }
        let json = rt.store().get("essence_engine_save").unwrap().unwrap();
        let saved = save::parse_save(&json).unwrap();
        assert_eq!(saved.stats.total_clicks, 1);
    }

    #[test]
    fn progress_survives_restart() {
        let clock = ManualClock::new(0);
        let mut rt = runtime(&clock);
        for _ in 0..30 {
            rt.apply(&Command::Click);
        }
        assert!(rt.apply(&Command::buy("drip", 1)));
        let balance = rt.session().ledger.balance;
        rt.save_now().unwrap();

        let store = rt.store().clone();
        let reloaded = Runtime::new(config(), Catalog::standard(), &clock, store).unwrap();
        assert_eq!(reloaded.session().upgrade("drip").unwrap().level, 1);
        assert_eq!(reloaded.session().stats.total_clicks, 30);
        assert!((reloaded.session().ledger.balance - balance).abs() < 0.001);
    }

    #[test]
    fn corrupt_save_starts_fresh() {
        let clock = ManualClock::new(0);
        let mut store = MemoryStore::new();
        store.set("essence_engine_save", "][ not json").unwrap();
        let rt = Runtime::new(config(), Catalog::standard(), &clock, store).unwrap();
        assert_eq!(rt.session().ledger.balance, 0.0);
        assert_eq!(rt.store().get("essence_engine_save").unwrap(), None);
    }

    #[test]
    fn broken_store_is_not_fatal() {
        let clock = ManualClock::new(0);
        let mut rt = Runtime::new(config(), Catalog::standard(), &clock, BrokenStore).unwrap();
        rt.frame();
        for _ in 0..4 {
            clock.advance(500);
            rt.frame();
        }
        assert!(rt.apply(&Command::Click));
        assert!(rt.save_now().is_err());
        assert_eq!(rt.session().stats.total_clicks, 1);
    }

    #[test]
    fn resume_skips_suspended_time() {
        let clock = ManualClock::new(0);
        let mut rt = runtime(&clock);
        rt.frame();
        clock.advance(60_000);
        rt.resume();
        assert_eq!(rt.frame(), 0);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let clock = ManualClock::new(0);
        let config = EngineConfig {
            tick_rate_hz: 0,
            ..EngineConfig::default()
        };
        let result = Runtime::new(config, Catalog::standard(), &clock, MemoryStore::new());
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
