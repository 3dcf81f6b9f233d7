//! Counter store contract for fixed-window rate limiting
//!
//! A [`CounterStore`] is the only state the rate limiter touches. It is an
//! external key-value store with per-key expiry: `get` returns a live
//! counter or nothing, `set` writes a count with a time-to-live, and expired
//! entries are purged by the store itself.
//!
//! Stores with a native atomic increment override
//! [`CounterStore::try_acquire`]. The default implementation is a
//! read-then-write over `get`/`set`; two concurrent requests from one client
//! may both read the same count, so the limiter can over-allow by the number
//! of racing callers. It never under-allows.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use super::clock::{Clock, SystemClock};
use crate::error::{CommonError, CommonResult};

/// A live counter read from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounter {
    /// Requests admitted so far in the current window
    pub count: u64,
    /// Time left until the store expires the counter
    pub ttl_remaining: Duration,
}

/// Outcome of a single admission attempt against a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAdmission {
    /// The request was counted; `count` includes it
    Admitted { count: u64, resets_in: Duration },
    /// The window budget is spent; the counter was not modified
    Rejected { count: u64, resets_in: Duration },
}

/// External counter store with per-key expiry
pub trait CounterStore: Send + Sync {
    /// Read a live counter; expired or missing keys yield `None`
    fn get(&self, key: &str) -> CommonResult<Option<WindowCounter>>;

    /// Write `count` under `key`, expiring after `ttl`
    fn set(&self, key: &str, count: u64, ttl: Duration) -> CommonResult<()>;

    /// Admit one request if the window for `key` has budget left.
    ///
    /// A missing counter is created with `count = 1` and `ttl = window`. A
    /// live counter below `limit` is incremented and keeps its remaining
    /// TTL, so the window stays anchored to the first request.
    fn try_acquire(&self, key: &str, limit: u64, window: Duration) -> CommonResult<WindowAdmission> {
        match self.get(key)? {
            None => {
                self.set(key, 1, window)?;
                Ok(WindowAdmission::Admitted { count: 1, resets_in: window })
            }
            Some(counter) if counter.count < limit => {
                let count = counter.count + 1;
                self.set(key, count, counter.ttl_remaining)?;
                Ok(WindowAdmission::Admitted { count, resets_in: counter.ttl_remaining })
            }
            Some(counter) => Ok(WindowAdmission::Rejected {
                count: counter.count,
                resets_in: counter.ttl_remaining,
            }),
        }
    }
}

impl<T: CounterStore + ?Sized> CounterStore for Arc<T> {
    fn get(&self, key: &str) -> CommonResult<Option<WindowCounter>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, count: u64, ttl: Duration) -> CommonResult<()> {
        (**self).set(key, count, ttl)
    }

    fn try_acquire(&self, key: &str, limit: u64, window: Duration) -> CommonResult<WindowAdmission> {
        (**self).try_acquire(key, limit, window)
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    count: u64,
    expires_at: Instant,
}

impl Slot {
    fn starting_at(now: Instant, count: u64, ttl: Duration) -> CommonResult<Self> {
        let expires_at = now.checked_add(ttl).ok_or_else(|| {
            CommonError::config_field("window_seconds", "window is too large to schedule")
        })?;
        Ok(Self { count, expires_at })
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process counter store backed by a sharded concurrent map
///
/// `try_acquire` runs under the shard lock for the key, so concurrent
/// requests for one key are serialised and never lose updates. Useful for
/// single-process deployments and for tests with a [`MockClock`].
///
/// [`MockClock`]: super::clock::MockClock
#[derive(Debug)]
pub struct InMemoryCounterStore<C: Clock = SystemClock> {
    slots: DashMap<String, Slot>,
    clock: C,
}

impl InMemoryCounterStore<SystemClock> {
    /// Create a store driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryCounterStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryCounterStore<C> {
    /// Create a store with a custom clock
    pub fn with_clock(clock: C) -> Self {
        Self { slots: DashMap::new(), clock }
    }

    /// Drop every expired counter, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| !slot.is_expired(now));
        before - self.slots.len()
    }

    /// Number of counters currently held, including not-yet-purged ones
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store holds no counters
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<C: Clock> CounterStore for InMemoryCounterStore<C> {
    fn get(&self, key: &str) -> CommonResult<Option<WindowCounter>> {
        let now = self.clock.now();
        let live = self.slots.get(key).and_then(|slot| {
            (!slot.is_expired(now)).then(|| WindowCounter {
                count: slot.count,
                ttl_remaining: slot.expires_at.duration_since(now),
            })
        });

        if live.is_none() {
            self.slots.remove_if(key, |_, slot| slot.is_expired(now));
        }
        Ok(live)
    }

    fn set(&self, key: &str, count: u64, ttl: Duration) -> CommonResult<()> {
        if ttl.is_zero() {
            self.slots.remove(key);
            return Ok(());
        }
        let slot = Slot::starting_at(self.clock.now(), count, ttl)?;
        self.slots.insert(key.to_string(), slot);
        Ok(())
    }

    fn try_acquire(&self, key: &str, limit: u64, window: Duration) -> CommonResult<WindowAdmission> {
        let now = self.clock.now();
        let admission = match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if slot.is_expired(now) {
                    *slot = Slot::starting_at(now, 1, window)?;
                    WindowAdmission::Admitted { count: 1, resets_in: window }
                } else if slot.count < limit {
                    slot.count += 1;
                    WindowAdmission::Admitted {
                        count: slot.count,
                        resets_in: slot.expires_at.duration_since(now),
                    }
                } else {
                    WindowAdmission::Rejected {
                        count: slot.count,
                        resets_in: slot.expires_at.duration_since(now),
                    }
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::starting_at(now, 1, window)?);
                WindowAdmission::Admitted { count: 1, resets_in: window }
            }
        };

        trace!(key, ?admission, "counter store admission");
        Ok(admission)
    }
}
