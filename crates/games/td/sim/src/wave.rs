use crate::config::{EnemyKind, TdConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim_core::Tick;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledSpawn {
    pub kind: EnemyKind,
    pub at_tick: Tick,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WavePhase {
    Pause {
        until_tick: Tick,
    },
    InWave {
        spawned: u16,
        wave_size: u16,
        queue: VecDeque<ScheduledSpawn>,
    },
    /// The configured final wave has been cleared.
    Finished,
}

/// Schedules enemy spawns wave by wave.
///
/// Cooperative and tick-driven: the game polls it at the start of every step
/// and reports the live enemy count once combat has resolved.
#[derive(Clone, Debug)]
pub struct WaveDirector {
    current_wave: u32,
    phase: WavePhase,
    rng: ChaCha8Rng,
}

impl WaveDirector {
    pub fn new(config: &TdConfig, seed: u64) -> Self {
        Self {
            current_wave: 0,
            phase: WavePhase::Pause {
                until_tick: config.duration_to_ticks(config.initial_wave_delay),
            },
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn phase(&self) -> &WavePhase {
        &self.phase
    }

    pub fn in_progress(&self) -> bool {
        matches!(self.phase, WavePhase::InWave { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, WavePhase::Finished)
    }

    /// Enemy kinds for `wave`, in spawn order. Boss waves lead with exactly one boss.
    pub fn plan_wave(&mut self, config: &TdConfig, wave: u32) -> Vec<EnemyKind> {
        let size = config.wave_size(wave) as usize;
        let pool = config.enemy_pool(wave);
        let mut kinds = Vec::with_capacity(size);

        if config.is_boss_wave(wave) && size > 0 {
            kinds.push(EnemyKind::Boss);
        }
        while kinds.len() < size {
            kinds.push(pool[self.rng.gen_range(0..pool.len())]);
        }
        kinds
    }

    /// Starts `wave` at `now`. Returns the wave size, or `None` if a wave is
    /// already running or the campaign is over.
    pub fn start_wave(&mut self, config: &TdConfig, wave: u32, now: Tick) -> Option<u16> {
        if self.in_progress() || self.is_finished() {
            return None;
        }

        let spawn_interval = config.duration_to_ticks(config.spawn_interval);
        let boss_delay = config.duration_to_ticks(config.boss_spawn_delay);

        let mut at_tick = now;
        let mut queue = VecDeque::new();
        for kind in self.plan_wave(config, wave) {
            queue.push_back(ScheduledSpawn { kind, at_tick });
            at_tick += if kind == EnemyKind::Boss {
                boss_delay
            } else {
                spawn_interval
            };
        }

        let wave_size = queue.len() as u16;
        self.current_wave = wave;
        self.phase = WavePhase::InWave {
            spawned: 0,
            wave_size,
            queue,
        };
        tracing::info!(wave, wave_size, "wave started");
        Some(wave_size)
    }

    /// Starts the next wave once the pause has elapsed.
    pub fn poll_start(&mut self, config: &TdConfig, now: Tick) -> Option<(u32, u16)> {
        let WavePhase::Pause { until_tick } = self.phase else {
            return None;
        };
        if now < until_tick {
            return None;
        }
        let wave = self.current_wave + 1;
        self.start_wave(config, wave, now).map(|size| (wave, size))
    }

    /// Pops every spawn due at or before `now`.
    pub fn due_spawns(&mut self, now: Tick) -> Vec<EnemyKind> {
        let WavePhase::InWave { spawned, queue, .. } = &mut self.phase else {
            return Vec::new();
        };

        let mut due = Vec::new();
        while queue.front().is_some_and(|s| s.at_tick <= now) {
            if let Some(spawn) = queue.pop_front() {
                due.push(spawn.kind);
                *spawned += 1;
            }
        }
        due
    }

    /// Ends the wave when every spawn has been emitted and no enemies remain.
    /// Returns the tick the next wave starts, or `None` if nothing changed.
    pub fn on_wave_cleared(&mut self, config: &TdConfig, now: Tick, live_enemies: usize) -> Option<WaveCleared> {
        let WavePhase::InWave { queue, .. } = &self.phase else {
            return None;
        };
        if !queue.is_empty() || live_enemies > 0 {
            return None;
        }

        let wave = self.current_wave;
        if config.waves_total.is_some_and(|total| wave >= total) {
            self.phase = WavePhase::Finished;
            tracing::info!(wave, "final wave cleared");
            return Some(WaveCleared {
                wave,
                next_wave_tick: None,
            });
        }

        let until_tick = now + config.duration_to_ticks(config.wave_grace_delay);
        self.phase = WavePhase::Pause { until_tick };
        tracing::info!(wave, next_wave_tick = until_tick, "wave cleared");
        Some(WaveCleared {
            wave,
            next_wave_tick: Some(until_tick),
        })
    }

    pub fn next_spawn_tick(&self) -> Option<Tick> {
        match &self.phase {
            WavePhase::InWave { queue, .. } => queue.front().map(|s| s.at_tick),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveCleared {
    pub wave: u32,
    pub next_wave_tick: Option<Tick>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wave_waits_for_initial_delay() {
        let config = TdConfig::default();
        let mut director = WaveDirector::new(&config, 1);
        assert_eq!(director.poll_start(&config, 179), None);
        assert_eq!(director.poll_start(&config, 180), Some((1, 7)));
        assert!(director.in_progress());
        assert_eq!(director.poll_start(&config, 181), None);
    }

    #[test]
    fn start_is_a_noop_while_in_progress() {
        let config = TdConfig::default();
        let mut director = WaveDirector::new(&config, 1);
        assert_eq!(director.start_wave(&config, 1, 0), Some(7));
        assert_eq!(director.start_wave(&config, 2, 5), None);
        assert_eq!(director.current_wave(), 1);
    }

    #[test]
    fn spawns_are_spaced_by_interval() {
        let config = TdConfig::default();
        let mut director = WaveDirector::new(&config, 1);
        director.start_wave(&config, 1, 10);

        assert_eq!(director.due_spawns(10), vec![EnemyKind::Regular]);
        assert!(director.due_spawns(69).is_empty());
        assert_eq!(director.due_spawns(70), vec![EnemyKind::Regular]);
        // A late poll releases everything that came due.
        assert_eq!(director.due_spawns(190).len(), 2);
        assert_eq!(director.next_spawn_tick(), Some(250));
    }

    #[test]
    fn boss_waves_lead_with_exactly_one_boss() {
        let config = TdConfig::default();
        for seed in 0..8 {
            let mut director = WaveDirector::new(&config, seed);
            let kinds = director.plan_wave(&config, 5);
            assert_eq!(kinds.len(), 15);
            assert_eq!(kinds[0], EnemyKind::Boss);
            assert_eq!(kinds.iter().filter(|k| **k == EnemyKind::Boss).count(), 1);
            assert!(kinds[1..]
                .iter()
                .all(|k| config.enemy_pool(5).contains(k)));
        }
    }

    #[test]
    fn boss_is_followed_by_longer_delay() {
        let config = TdConfig::default();
        let mut director = WaveDirector::new(&config, 3);
        director.start_wave(&config, 5, 0);
        assert_eq!(director.due_spawns(0), vec![EnemyKind::Boss]);
        assert_eq!(director.next_spawn_tick(), Some(180));
    }

    #[test]
    fn same_seed_same_plan() {
        let config = TdConfig::default();
        let a = WaveDirector::new(&config, 42).plan_wave(&config, 9);
        let b = WaveDirector::new(&config, 42).plan_wave(&config, 9);
        assert_eq!(a, b);
    }

    #[test]
    fn clears_only_after_all_spawns_and_kills() {
        let config = TdConfig::default();
        let mut director = WaveDirector::new(&config, 1);
        director.start_wave(&config, 1, 0);
        director.due_spawns(0);
        assert_eq!(director.on_wave_cleared(&config, 0, 0), None);

        director.due_spawns(1000);
        assert_eq!(director.on_wave_cleared(&config, 1000, 2), None);
        assert_eq!(
            director.on_wave_cleared(&config, 1001, 0),
            Some(WaveCleared {
                wave: 1,
                next_wave_tick: Some(1181)
            })
        );
        assert!(!director.in_progress());
        assert_eq!(director.poll_start(&config, 1181), Some((2, 9)));
    }

    #[test]
    fn final_wave_finishes_the_campaign() {
        let config = TdConfig {
            waves_total: Some(1),
            ..TdConfig::default()
        };
        let mut director = WaveDirector::new(&config, 1);
        director.start_wave(&config, 1, 0);
        director.due_spawns(10_000);
        assert_eq!(
            director.on_wave_cleared(&config, 10_000, 0),
            Some(WaveCleared {
                wave: 1,
                next_wave_tick: None
            })
        );
        assert!(director.is_finished());
        assert_eq!(director.start_wave(&config, 2, 10_001), None);
    }
}
