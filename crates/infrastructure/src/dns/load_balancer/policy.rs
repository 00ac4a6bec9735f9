use ferrous_doh_domain::UpstreamPolicy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Attempt order over a pool of upstreams.
///
/// `list(n)` returns indices in `0..n`; an empty pool yields an empty order.
pub trait SelectionPolicy: Send + Sync {
    fn list(&self, pool_len: usize) -> Vec<usize>;

    fn name(&self) -> &'static str;
}

/// Fresh uniformly random permutation on every call.
#[derive(Debug, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionPolicy for RandomPolicy {
    fn list(&self, pool_len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..pool_len).collect();
        fastrand::shuffle(&mut order);
        order
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Identity order rotated by a cursor that moves one step per call.
///
/// The cursor is owned by the instance, so independent balancers do not
/// share rotation state.
#[derive(Debug, Default)]
pub struct RoundRobinPolicy {
    counter: AtomicUsize,
}

impl RoundRobinPolicy {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }
}

impl SelectionPolicy for RoundRobinPolicy {
    fn list(&self, pool_len: usize) -> Vec<usize> {
        if pool_len == 0 {
            return Vec::new();
        }

        let start = self.counter.fetch_add(1, Ordering::Relaxed) % pool_len;
        (start..pool_len).chain(0..start).collect()
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}

/// Always `0..n`, in configuration order.
#[derive(Debug, Default)]
pub struct SequentialPolicy;

impl SequentialPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionPolicy for SequentialPolicy {
    fn list(&self, pool_len: usize) -> Vec<usize> {
        (0..pool_len).collect()
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}

/// Fresh policy instance for a configured choice.
pub fn from_choice(choice: UpstreamPolicy) -> Arc<dyn SelectionPolicy> {
    match choice {
        UpstreamPolicy::Random => Arc::new(RandomPolicy::new()),
        UpstreamPolicy::RoundRobin => Arc::new(RoundRobinPolicy::new()),
        UpstreamPolicy::Sequential => Arc::new(SequentialPolicy::new()),
    }
}
