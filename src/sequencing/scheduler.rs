use crate::sequencing::{Frame, NoteEvent, NoteRecord};

/// Most note records a single track holds. Inserts beyond this are dropped
/// rather than allocating on the audio thread.
pub const MAX_NOTES: usize = 1024;

/*
Note Scheduling
===============

The scheduler owns a slice of note records sorted by start frame and, given
a block's frame window, says which On/Off events fall inside it. Both edges
are half-open:

  On(note)   for every record with  start in [block_start, block_end)
  Off(note)  for every record with  end   in [block_start, block_end)

Two passes emit all Ons before all Offs, in record order. A record that
starts and ends inside the same block produces both events - no coalescing.
Because records are sorted by start and end >= start, both passes stop at
the first record starting at or past the block end.

Scheduling is a pure read: the playhead lives in the driver, and covering a
span with one block or many sub-blocks yields the same event multiset.
*/

/// Sorted note records plus the per-block event scan.
pub struct NoteScheduler {
    records: Vec<NoteRecord>,
}

impl NoteScheduler {
    /// Pre-allocates full capacity so inserts never touch the allocator.
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(MAX_NOTES),
        }
    }

    /// Insert keeping start-order. Returns false (dropping the record) when
    /// full.
    pub fn insert(&mut self, record: NoteRecord) -> bool {
        debug_assert!(record.start <= record.end);
        if self.records.len() == self.records.capacity() {
            return false;
        }
        let idx = self.records.partition_point(|r| r.start <= record.start);
        self.records.insert(idx, record);
        true
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[NoteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collect the block's events into `out`, Ons first, returning how many
    /// were written. Events beyond `out.len()` are dropped.
    pub fn collect_block(&self, block_start: Frame, block_end: Frame, out: &mut [NoteEvent]) -> usize {
        let mut n = 0;

        for record in &self.records {
            if record.start >= block_end {
                break;
            }
            if record.start >= block_start && n < out.len() {
                out[n] = NoteEvent::On(record.note);
                n += 1;
            }
        }

        for record in &self.records {
            if record.start >= block_end {
                // end >= start, so nothing past here can end in this block.
                break;
            }
            if record.end >= block_start && record.end < block_end && n < out.len() {
                out[n] = NoteEvent::Off(record.note);
                n += 1;
            }
        }

        n
    }
}

impl Default for NoteScheduler {
    fn default() -> Self {
        Self::new()
    }
}
