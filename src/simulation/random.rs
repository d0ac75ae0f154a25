use std::collections::VecDeque;
use std::sync::Mutex;

use rand::Rng;

/// Source of the draws that drive the simulation.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, bound)`. `bound` is never zero.
    fn below(&self, bound: u64) -> u64;

    /// Uniform integer in `[min, max]`, both inclusive.
    fn between(&self, min: u64, max: u64) -> u64;
}

/// Thread-local rng backed source used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, bound: u64) -> u64 {
        rand::thread_rng().gen_range(0..bound)
    }

    fn between(&self, min: u64, max: u64) -> u64 {
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Replays a fixed sequence of draws, cycling once exhausted.
///
/// Each value is clamped into the requested range so a script can be
/// written without knowing the exact bounds a call will use.
#[derive(Debug)]
pub struct ScriptedRandom {
    script: Vec<u64>,
    queue: Mutex<VecDeque<u64>>,
}

impl ScriptedRandom {
    pub fn new(script: Vec<u64>) -> Self {
        let queue = Mutex::new(script.iter().copied().collect());
        Self { script, queue }
    }

    fn next(&self) -> u64 {
        let mut queue = self.queue.lock().unwrap_or_else(|p| p.into_inner());
        if queue.is_empty() {
            queue.extend(self.script.iter().copied());
        }
        queue.pop_front().unwrap_or(0)
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&self, bound: u64) -> u64 {
        self.next().min(bound.saturating_sub(1))
    }

    fn between(&self, min: u64, max: u64) -> u64 {
        self.next().clamp(min, max)
    }
}
