use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::{debug, info};
use parking_lot::Mutex;

use crate::expression::{ExprPool, PoolSet};
use crate::solver::config::SolverConfig;
use crate::solver::creator::GenerationCreator;
use crate::solver::generation::Generation;
use crate::solver::reachable::ReachableSet;

/// State shared by every worker of a pass.
pub(crate) struct SearchShared {
    pub(crate) target: i64,
    pub(crate) seed: u32,
    pub(crate) config: SolverConfig,
    pub(crate) reachable: ReachableSet,
    found: AtomicBool,
    result: Mutex<Option<String>>,
}

impl SearchShared {
    fn new(target: i64, seed: u32, config: SolverConfig) -> Self {
        Self {
            target,
            seed,
            config,
            reachable: ReachableSet::new(config.precision),
            found: AtomicBool::new(false),
            result: Mutex::new(None),
        }
    }

    pub(crate) fn found(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    /// Publishes the winning rendering. The flag is raised only after
    /// the rendering is in place, so no reader observes found without a
    /// result; racing winners keep the first rendering.
    pub(crate) fn publish(&self, rendering: String) {
        let mut slot = self.result.lock();
        if slot.is_none() {
            *slot = Some(rendering);
        }
        drop(slot);
        self.found.store(true, Ordering::Release);
    }
}

/// Iterative-deepening driver.
///
/// Pass n admits every value reachable with exactly n copies of the
/// seed digit by pairing the frozen generations (i, n−i), and stops as
/// soon as the target is produced, which makes the first hit a
/// minimal-digit expression.
pub struct TchislaSolver {
    shared: SearchShared,
    pools: PoolSet,
    generations: Vec<Generation>,
}

impl TchislaSolver {
    pub fn new(target: i64, seed: u32, config: SolverConfig) -> Self {
        Self {
            shared: SearchShared::new(target, seed, config),
            pools: PoolSet::new(),
            generations: Vec::new(),
        }
    }

    /// Runs passes up to the configured search depth. True iff the
    /// target was reached; the rendering is then available via
    /// [`result`](Self::result).
    pub fn solve(&mut self) -> bool {
        info!(
            "searching for {} from seed {}",
            self.shared.target, self.shared.seed
        );
        for pass in 1..=self.shared.config.search_depth {
            if self.run_pass(pass) {
                return true;
            }
        }
        false
    }

    /// Rendering of the winning expression, once `solve` returned true.
    pub fn result(&self) -> Option<String> {
        self.shared.result.lock().clone()
    }

    /// Sizes of the frozen generations, in pass order.
    pub fn generation_sizes(&self) -> Vec<usize> {
        self.generations.iter().map(Generation::len).collect()
    }

    #[cfg(test)]
    pub(crate) fn generations(&self) -> &[Generation] {
        &self.generations
    }

    #[cfg(test)]
    pub(crate) fn pools(&self) -> &PoolSet {
        &self.pools
    }

    /// The (i, prior − 1 − i) schedule: with generations g_1..g_prior
    /// frozen, it covers every split |a| + |b| = prior + 1 with
    /// |a| ≤ |b| exactly once.
    pub(crate) fn pair_schedule(prior: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..(prior + 1) / 2).map(move |i| (i, prior - 1 - i))
    }

    fn use_multithread(&self) -> bool {
        self.generations
            .last()
            .is_some_and(|g| g.len() > self.shared.config.multithread_threshold)
    }

    fn run_pass(&mut self, pass: usize) -> bool {
        let prior = self.generations.len();
        let loops = (prior + 1) / 2;
        let multithread = loops > 1 && self.use_multithread();
        let partitions = if multithread { loops } else { 1 };

        let mut generation = Generation::new(partitions);
        let first_id = self.pools.next_id();
        let mut pools: Vec<ExprPool> = (0..partitions)
            .map(|i| ExprPool::new(first_id + i as u32))
            .collect();

        let shared = &self.shared;
        let frozen = &self.pools;
        let generations = &self.generations;

        if multithread {
            thread::scope(|scope| {
                let mut lead = None;
                for ((i, j), (pool, part)) in
                    Self::pair_schedule(prior).zip(pools.iter_mut().zip(generation.parts_mut()))
                {
                    let (g1, g2) = (&generations[i], &generations[j]);
                    if lead.is_none() {
                        lead = Some((pool, part, g1, g2));
                    } else {
                        scope.spawn(move || {
                            GenerationCreator::new(shared, frozen, pool, part)
                                .cross_generation(g1, g2);
                        });
                    }
                }
                if let Some((pool, part, g1, g2)) = lead {
                    GenerationCreator::new(shared, frozen, pool, part).cross_generation(g1, g2);
                }
            });
        } else {
            let mut creator =
                GenerationCreator::new(shared, frozen, &mut pools[0], generation.part_mut(0));
            for (i, j) in Self::pair_schedule(prior) {
                if creator.cross_generation(&generations[i], &generations[j]) {
                    break;
                }
            }
        }

        if !shared.found()
            && GenerationCreator::new(shared, frozen, &mut pools[0], generation.part_mut(0))
                .add_literal(pass)
        {
            return true;
        }
        if shared.found() {
            return true;
        }

        if shared.config.trace {
            println!("Seed: {}, G{} size: {}", shared.seed, pass, generation.len());
        }
        debug!("pass {} admitted {} values", pass, generation.len());
        self.pools.absorb(pools);
        self.generations.push(generation);
        false
    }
}
