use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out monotonically increasing sequence numbers and maps each onto a
/// fixed-capacity shard index.
///
/// The counter is a sequencing device, not an identity: the materialize
/// phase and the classification phase each own their own allocator, and
/// identical indices across the two are expected. Increments are atomic, so
/// concurrent workers can never observe the same sequence number.
///
/// # Examples
///
/// ```
/// use wallshard_library::shard::ShardAllocator;
///
/// let allocator = ShardAllocator::new(100);
/// assert_eq!(allocator.assign().shard, 0);   // 1st item
/// for _ in 1..99 { allocator.assign(); }
/// assert_eq!(allocator.assign().shard, 0);   // 100th item
/// assert_eq!(allocator.assign().shard, 1);   // 101st item
/// ```
pub struct ShardAllocator {
    capacity: u64,
    counter: AtomicU64,
}

/// One assigned position: the sequence number and the shard it lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShardSlot {
    pub seq: u64,
    pub shard: u64,
}

impl ShardAllocator {
    /// Create an allocator with the given items-per-shard capacity.
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: u64) -> Self {
        Self { capacity: capacity.max(1), counter: AtomicU64::new(0) }
    }

    /// Claim the next sequence number and its shard index.
    pub fn assign(&self) -> ShardSlot {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        ShardSlot { seq, shard: seq / self.capacity }
    }

    /// Total number of assignments made so far.
    pub fn assigned(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}
