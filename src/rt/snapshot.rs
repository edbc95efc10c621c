use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU8, Ordering};

/*
Parameter Snapshot
==================

Publishes a whole parameter record from the control thread to the audio
thread without locks and without tearing individual fields apart. Two slots
hold copies of the record; an atomic index says which one is the "front".

    publish:  write record into slot (front ^ 1), then
              store the new index with Release
    read:     load the index with Acquire, copy that slot by value

The writer never touches the slot the reader was directed to, and the
Release/Acquire pair on the index orders the slot write before any read
through the new index. The record must be plain old data (`Copy`, no
references, no heap) so the consumer-side copy is a plain memcpy.

Usage contract: one publishing thread, one reading thread, and at most one
publication per audio block - the control thread pushes a fresh record per
UI tick, the audio thread copies one snapshot per block.
*/

/// Double-buffered cell publishing a POD record across threads.
pub struct ParamSnapshot<T> {
    slots: [UnsafeCell<T>; 2],
    front: AtomicU8,
}

// Single writer / single reader, slot access directed by `front`.
unsafe impl<T: Copy + Send> Sync for ParamSnapshot<T> {}

impl<T: Copy> ParamSnapshot<T> {
    pub fn new(initial: T) -> Self {
        Self {
            slots: [UnsafeCell::new(initial), UnsafeCell::new(initial)],
            front: AtomicU8::new(0),
        }
    }

    /// Publish a new record. Control thread only.
    pub fn publish(&self, value: T) {
        let back = self.front.load(Ordering::Relaxed) ^ 1;
        unsafe { *self.slots[back as usize].get() = value };
        self.front.store(back, Ordering::Release);
    }

    /// Copy the most recently published record. Audio thread only.
    pub fn read(&self) -> T {
        let front = self.front.load(Ordering::Acquire);
        unsafe { *self.slots[front as usize].get() }
    }
}
