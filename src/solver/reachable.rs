use parking_lot::RwLock;

use crate::expression::Value;

/// Shards per numeric domain; prime to spread pathological key patterns.
const NUM_SHARDS: usize = 11;
const INITIAL_BUCKETS: usize = 16;

/// Open-chaining hash table guarded by one shard lock.
struct Shard {
    buckets: Vec<Vec<i64>>,
    len: usize,
}

fn bucket_index(key: i64, buckets: usize) -> usize {
    (key as u64 & (buckets as u64 - 1)) as usize
}

impl Shard {
    fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); INITIAL_BUCKETS],
            len: 0,
        }
    }

    fn contains(&self, key: i64) -> bool {
        self.buckets[bucket_index(key, self.buckets.len())].contains(&key)
    }

    fn insert(&mut self, key: i64) -> bool {
        let idx = bucket_index(key, self.buckets.len());
        let bucket = &mut self.buckets[idx];
        if bucket.contains(&key) {
            return false;
        }
        bucket.push(key);
        self.len += 1;
        // rehash above load factor 1.5
        if self.len * 2 > self.buckets.len() * 3 {
            self.grow();
        }
        true
    }

    fn grow(&mut self) {
        let mut size = INITIAL_BUCKETS;
        while size < self.len * 3 {
            size *= 2;
        }
        let mut buckets = vec![Vec::new(); size];
        for key in self.buckets.drain(..).flatten() {
            buckets[bucket_index(key, size)].push(key);
        }
        self.buckets = buckets;
    }
}

/// Concurrent "seen before" set over i64 keys.
struct ShardedSet {
    shards: Vec<RwLock<Shard>>,
}

impl ShardedSet {
    fn new() -> Self {
        Self {
            shards: (0..NUM_SHARDS).map(|_| RwLock::new(Shard::new())).collect(),
        }
    }

    /// Returns true exactly once per distinct key, in any concurrent
    /// ordering.
    fn insert_if_absent(&self, key: i64) -> bool {
        let shard = &self.shards[key.rem_euclid(NUM_SHARDS as i64) as usize];
        if shard.read().contains(key) {
            return false;
        }
        // Another caller may have inserted between the two locks;
        // `insert` re-checks under the write lock.
        shard.write().insert(key)
    }
}

/// Every distinct value reached so far, partitioned into three domains
/// that never collide: exact integers, quantised doubles, and doubles
/// beyond the quantisable range.
pub struct ReachableSet {
    precision: f64,
    ints: ShardedSet,
    small_doubles: ShardedSet,
    big_doubles: ShardedSet,
}

impl ReachableSet {
    pub fn new(precision: f64) -> Self {
        Self {
            precision,
            ints: ShardedSet::new(),
            small_doubles: ShardedSet::new(),
            big_doubles: ShardedSet::new(),
        }
    }

    pub fn insert_if_absent(&self, value: Value) -> bool {
        match value {
            Value::Int(key) => self.ints.insert_if_absent(key),
            Value::Float(v) => {
                let span = self.precision * i64::MAX as f64;
                if v.abs() < span {
                    self.small_doubles
                        .insert_if_absent((v / self.precision).floor() as i64)
                } else {
                    self.big_doubles
                        .insert_if_absent(((v - span) / self.precision).floor() as i64)
                }
            }
        }
    }
}
