use relist_core::mutation::Mutation;
use relist_core::sink::{ChangePayload, ChangeSink};
use relist_queue::{EqComparator, NotifyQueue};
use std::sync::Arc;

use stress::run_stress;
pub mod stress;

/// Sink that prints every notification the way a renderer would see it.
struct ConsoleSink;

impl ChangeSink for ConsoleSink {
    fn on_inserted(&self, index: usize, count: usize) {
        println!("  -> inserted {} at {}", count, index);
    }

    fn on_removed(&self, index: usize, count: usize) {
        println!("  -> removed {} at {}", count, index);
    }

    fn on_changed(&self, index: usize, count: usize, _payload: Option<&ChangePayload>) {
        println!("  -> changed {} at {}", count, index);
    }

    fn on_moved(&self, from: usize, to: usize) {
        println!("  -> moved {} to {}", from, to);
    }
}

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async_main());
}

async fn async_main() {
    println!("=== scripted scenario ===");
    let queue: NotifyQueue<&str> = NotifyQueue::new(EqComparator);
    let sink = Arc::new(ConsoleSink);
    queue.attach(&sink);

    println!("append [alpha, beta, gamma]");
    queue.submit(Mutation::append_all(vec!["alpha", "beta", "gamma"]));
    queue.settled().await;

    println!("remove beta");
    queue.submit(Mutation::remove("beta"));

    println!("refresh to [gamma, alpha, delta]");
    queue.submit(Mutation::refresh(vec!["gamma", "alpha", "delta"]));
    queue.settled().await;

    println!("final sequence: {:?}", queue.snapshot());
    println!();

    let stats = run_stress(2_000).await;
    stats.print();
}
