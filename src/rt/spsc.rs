use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/*
SPSC Ring Queue
===============

A bounded queue between exactly one producer and exactly one consumer,
wait-free on both sides. The storage holds one slot more than the requested
capacity so that "full" and "empty" are distinguishable without a separate
counter:

    empty:  read == write
    full:   (write + 1) mod cap == read

Each side owns one index and only ever loads the other side's index. The
release store on the owned index pairs with the acquire load on the opposite
side, so a pushed element is fully written before the consumer can observe
the advanced write index, and a popped slot is fully vacated before the
producer can observe the advanced read index.

    producer                         consumer
    --------                         --------
    w = write.load(Relaxed)          r = read.load(Relaxed)
    r = read.load(Acquire)           w = write.load(Acquire)
    full? bail                       empty? bail
    slot[w] = value                  value = slot[r]
    write.store(w+1, Release)        read.store(r+1, Release)

There is no cancellation and no blocking: a full ring returns the value to
the caller, which chooses to retry, drop, or coalesce.
*/

struct Shared<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    write: AtomicUsize,
    read: AtomicUsize,
}

// One producer and one consumer on different threads; slot access is
// serialized by the index protocol above.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send> Sync for Shared<T> {}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        // Both halves are gone, so no concurrent access remains.
        let cap = self.slots.len();
        let mut r = self.read.load(Ordering::Relaxed);
        let w = self.write.load(Ordering::Relaxed);
        while r != w {
            unsafe { (*self.slots[r].get()).assume_init_drop() };
            r = (r + 1) % cap;
        }
    }
}

/// Returned by [`Producer::push`] when the ring is full; hands the rejected
/// value back to the caller.
pub struct Full<T>(pub T);

impl<T> Full<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

/// Producing half of the ring. Must stay on a single thread.
pub struct Producer<T> {
    shared: Arc<Shared<T>>,
}

/// Consuming half of the ring. Must stay on a single thread.
pub struct Consumer<T> {
    shared: Arc<Shared<T>>,
}

/// Create a ring with `capacity` usable slots and split it into its two
/// halves. Allocates once, here; neither half allocates afterwards.
pub fn ring<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    assert!(capacity > 0, "ring capacity must be non-zero");
    let slots = (0..capacity + 1)
        .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
        .collect::<Vec<_>>()
        .into_boxed_slice();
    let shared = Arc::new(Shared {
        slots,
        write: AtomicUsize::new(0),
        read: AtomicUsize::new(0),
    });
    (
        Producer {
            shared: Arc::clone(&shared),
        },
        Consumer { shared },
    )
}

impl<T> Producer<T> {
    /// Push a value, or return it if the ring is full.
    pub fn push(&mut self, value: T) -> Result<(), Full<T>> {
        let cap = self.shared.slots.len();
        let w = self.shared.write.load(Ordering::Relaxed);
        let r = self.shared.read.load(Ordering::Acquire);
        if (w + 1) % cap == r {
            return Err(Full(value));
        }
        unsafe { (*self.shared.slots[w].get()).write(value) };
        self.shared.write.store((w + 1) % cap, Ordering::Release);
        Ok(())
    }

    /// Usable slot count.
    pub fn capacity(&self) -> usize {
        self.shared.slots.len() - 1
    }
}

impl<T> Consumer<T> {
    /// Pop the oldest value, or `None` if the ring is empty.
    pub fn pop(&mut self) -> Option<T> {
        let cap = self.shared.slots.len();
        let r = self.shared.read.load(Ordering::Relaxed);
        let w = self.shared.write.load(Ordering::Acquire);
        if r == w {
            return None;
        }
        let value = unsafe { (*self.shared.slots[r].get()).assume_init_read() };
        self.shared.read.store((r + 1) % cap, Ordering::Release);
        Some(value)
    }

    /// Usable slot count.
    pub fn capacity(&self) -> usize {
        self.shared.slots.len() - 1
    }
}
