// limit_core/src/ring.rs
//
// Bounded single-consumer event ring: a producer cursor and a consumer gate,
// each pinned to its own cache line so hammering one never invalidates the
// other's line. The publish side assumes a single (or externally serialized)
// producer — admitting concurrent producers means replacing the plain
// load-then-store on `cursor` with a claim/commit CAS protocol, which this
// type does not implement.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};

const DEFAULT_CAPACITY: usize = 1024;

fn round_up_to_power_of_two(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    n.next_power_of_two()
}

/// A value exclusively owned by one role (producer or consumer), padded out
/// to a full cache line so the two roles never false-share.
#[repr(align(128))]
struct CachePadded<T> {
    value: T,
}

impl<T> std::ops::Deref for CachePadded<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.value
    }
}

/// A fixed-capacity, power-of-two-sized ring of `T` carrying events from
/// producers to a single consumer.
pub struct EventRing<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: u64,
    capacity: u64,
    cursor: CachePadded<AtomicU64>,
    gate: CachePadded<AtomicU64>,
}

// SAFETY: `cursor` is only ever written by the single producer and `gate`
// only by the single consumer; slot access is disjoint because a producer
// never claims a slot the consumer hasn't yet released (enforced by the
// backpressure check in `try_publish`), and the consumer only ever reads
// slots the producer has already published (enforced by reading `cursor`
// with Acquire before touching any slot).
unsafe impl<T: Send> Sync for EventRing<T> {}
unsafe impl<T: Send> Send for EventRing<T> {}

impl<T> EventRing<T> {
    /// Construct a ring with `requested` capacity rounded up to the next
    /// power of two; zero falls back to the default capacity.
    pub fn new(requested: usize) -> Self {
        let capacity = if requested == 0 {
            DEFAULT_CAPACITY
        } else {
            round_up_to_power_of_two(requested)
        };
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(UnsafeCell::new(MaybeUninit::uninit()));
        }
        Self {
            slots: slots.into_boxed_slice(),
            mask: (capacity as u64) - 1,
            capacity: capacity as u64,
            cursor: CachePadded { value: AtomicU64::new(0) },
            gate: CachePadded { value: AtomicU64::new(0) },
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Non-blocking publish. Returns `false` if the ring is full; the caller
    /// decides whether to retry, drop, or surface backpressure.
    pub fn try_publish(&self, event: T) -> bool {
        let cursor = self.cursor.load(Ordering::Acquire);
        let gate = self.gate.load(Ordering::Acquire);
        let next = cursor.wrapping_add(1);
        let wrap = next.wrapping_sub(self.capacity);
        if wrap > gate {
            return false;
        }
        let idx = (next & self.mask) as usize;
        // SAFETY: backpressure check above guarantees this slot was already
        // consumed (and its previous value dropped) by the single consumer.
        unsafe {
            (*self.slots[idx].get()).write(event);
        }
        self.cursor.store(next, Ordering::Release);
        true
    }

    /// True if the consumer has nothing left to drain.
    pub fn is_empty(&self) -> bool {
        self.gate.load(Ordering::Relaxed) == self.cursor.load(Ordering::Acquire)
    }

    /// Drain every slot published since the last drain, strictly in sequence
    /// order, invoking `handler` once per event. Returns the number of events
    /// processed. Must only ever be called from the single consumer.
    pub fn drain<F: FnMut(T)>(&self, mut handler: F) -> u64 {
        let cursor = self.cursor.load(Ordering::Acquire);
        let mut gate = self.gate.load(Ordering::Relaxed);
        let mut processed = 0u64;
        while gate < cursor {
            gate = gate.wrapping_add(1);
            let idx = (gate & self.mask) as usize;
            // SAFETY: `gate < cursor` means this slot was published by a
            // `try_publish` whose Release store to `cursor` we observed via
            // the Acquire load above; the value is fully constructed.
            let event = unsafe { (*self.slots[idx].get()).assume_init_read() };
            handler(event);
            processed += 1;
        }
        if processed > 0 {
            self.gate.store(gate, Ordering::Release);
        }
        processed
    }
}

impl<T> Drop for EventRing<T> {
    fn drop(&mut self) {
        let gate = *self.gate.get_mut();
        let cursor = *self.cursor.get_mut();
        let mut seq = gate;
        while seq < cursor {
            seq = seq.wrapping_add(1);
            let idx = (seq & self.mask) as usize;
            unsafe {
                (*self.slots[idx].get()).assume_init_drop();
            }
        }
    }
}
