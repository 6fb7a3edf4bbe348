//! Randomized stress pass: a few thousand mutations submitted through the
//! queue and validated against an offline replay of the same series.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relist_core::compare::EqComparator;
use relist_core::mutation::Mutation;
use relist_queue::NotifyQueue;
use std::time::Instant;

pub struct StressStats {
    pub mutations: usize,
    pub full_compares: usize,
    pub final_len: usize,
    pub elapsed_ms: u128,
    pub matched: bool,
}

impl StressStats {
    pub fn print(&self) {
        println!("=== stress results ===");
        println!("mutations submitted: {}", self.mutations);
        println!("full comparisons:    {}", self.full_compares);
        println!("final length:        {}", self.final_len);
        println!("elapsed:             {}ms", self.elapsed_ms);
        println!("replay matched:      {}", self.matched);
    }
}

/// A mutation recipe that can be instantiated twice: once for the queue,
/// once for the offline replay.
enum Recipe {
    Append(u32),
    Insert(usize, u32),
    RemoveAt(usize),
    Replace(usize, u32),
    Move(usize, usize),
    Refresh(Vec<u32>),
    RemoveAll(Vec<u32>),
    Bump(u32),
}

impl Recipe {
    fn to_mutation(&self) -> Mutation<u32> {
        match self {
            Recipe::Append(value) => Mutation::append(*value),
            Recipe::Insert(index, value) => Mutation::insert(*index, *value),
            Recipe::RemoveAt(index) => Mutation::remove_at(*index),
            Recipe::Replace(index, value) => Mutation::replace(*index, *value),
            Recipe::Move(from, to) => Mutation::move_item(*from, *to),
            Recipe::Refresh(items) => Mutation::refresh(items.clone()),
            Recipe::RemoveAll(values) => Mutation::remove_all(values.clone()),
            Recipe::Bump(threshold) => {
                let threshold = *threshold;
                Mutation::update_where(move |x| *x < threshold, |x| *x += 1)
            }
        }
    }

    fn is_full_compare(&self) -> bool {
        matches!(
            self,
            Recipe::Refresh(_) | Recipe::RemoveAll(_) | Recipe::Bump(_)
        )
    }
}

fn random_recipe(rng: &mut StdRng, len: usize) -> Recipe {
    match rng.gen_range(0u8..10) {
        0 | 1 => Recipe::Append(rng.gen_range(0..1000)),
        2 => Recipe::Insert(rng.gen_range(0..=len), rng.gen_range(0..1000)),
        3 if len > 0 => Recipe::RemoveAt(rng.gen_range(0..len)),
        4 if len > 0 => Recipe::Replace(rng.gen_range(0..len), rng.gen_range(0..1000)),
        5 if len > 1 => Recipe::Move(rng.gen_range(0..len), rng.gen_range(0..len)),
        6 => {
            let count = rng.gen_range(0..20);
            Recipe::Refresh((0..count).map(|_| rng.gen_range(0..1000)).collect())
        }
        7 => {
            let count = rng.gen_range(1..4);
            Recipe::RemoveAll((0..count).map(|_| rng.gen_range(0..1000)).collect())
        }
        8 => Recipe::Bump(rng.gen_range(0..1000)),
        _ => Recipe::Append(rng.gen_range(0..1000)),
    }
}

pub async fn run_stress(rounds: usize) -> StressStats {
    let started = Instant::now();
    let queue: NotifyQueue<u32> = NotifyQueue::new(EqComparator);
    let mut offline: Vec<u32> = Vec::new();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut full_compares = 0;

    for _ in 0..rounds {
        let recipe = random_recipe(&mut rng, offline.len());
        if recipe.is_full_compare() {
            full_compares += 1;
        }
        queue.submit(recipe.to_mutation());
        recipe.to_mutation()
            .apply_direct(&mut offline, &EqComparator)
            .unwrap();
    }
    queue.settled().await;

    StressStats {
        mutations: rounds,
        full_compares,
        final_len: offline.len(),
        elapsed_ms: started.elapsed().as_millis(),
        matched: queue.snapshot() == offline,
    }
}
