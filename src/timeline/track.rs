use std::sync::atomic::{AtomicU8, Ordering};

use crate::graph::{AudioNode, RenderCtx};
use crate::sequencing::NoteScheduler;
use crate::synth::PolySynth;
use crate::timeline::chain::{PluginChain, PluginSlot};
use crate::timeline::plugin::{PluginKind, PluginParam, PluginState, MAX_PLUGINS};
use crate::NUM_VOICES;

/*
Track Topology Swaps
====================

A track keeps two copies of its effect chain and an atomic index saying
which one is live. Rendering loads the index with Acquire and walks that
chain; a structural mutation follows the swap protocol:

  1. edit the inactive chain (the live one is untouched)
  2. release-store the inactive index as the new active
  3. mirror the same edit onto the now-inactive old copy

Plugin state never lives in a chain. The chain slots carry (tag, index)
pairs into the track's state table, so the two copies share every state
object by construction - a filter keeps its stage voltages across any
number of swaps.

Removal is two-step by the same protocol: drop the slot from the back
chain, swap, drop it from the front chain, and only then lift the state box
out of the table. The release/acquire pair on the index is the quiescence
proof: once the mirror edit runs, the renderer has necessarily observed the
new active index, so no traversal still references the removed slot. The
box travels back to the control thread to be freed there.
*/

/// One project track: a synth, its recorded notes, and a double-buffered
/// effect chain.
pub struct Track {
    synth: PolySynth,
    notes: NoteScheduler,
    chains: [PluginChain; 2],
    active: AtomicU8,
    states: [Option<Box<PluginState>>; MAX_PLUGINS],
}

impl Track {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            synth: PolySynth::new(sample_rate, NUM_VOICES),
            notes: NoteScheduler::new(),
            chains: [PluginChain::new(), PluginChain::new()],
            active: AtomicU8::new(0),
            states: std::array::from_fn(|_| None),
        }
    }

    pub fn synth(&self) -> &PolySynth {
        &self.synth
    }

    pub fn synth_mut(&mut self) -> &mut PolySynth {
        &mut self.synth
    }

    pub fn notes(&self) -> &NoteScheduler {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NoteScheduler {
        &mut self.notes
    }

    pub fn note_on(&mut self, note: u8) {
        self.synth.note_on(note);
    }

    pub fn note_off(&mut self, note: u8) {
        self.synth.note_off(note);
    }

    pub fn plugin_count(&self) -> usize {
        self.chains[self.active_idx()].len()
    }

    /// Tags of the live chain, in order.
    pub fn plugin_kinds(&self) -> Vec<PluginKind> {
        self.chains[self.active_idx()]
            .slots()
            .iter()
            .map(|s| s.kind)
            .collect()
    }

    fn active_idx(&self) -> usize {
        self.active.load(Ordering::Acquire) as usize
    }

    /// Install a plugin at the end of the chain via the swap protocol.
    /// Returns the state back to the caller when the chain or state table
    /// is full, so it can be disposed off the audio thread.
    pub fn add_plugin(&mut self, state: Box<PluginState>) -> Result<(), Box<PluginState>> {
        let free = match self.states.iter().position(|s| s.is_none()) {
            Some(idx) => idx,
            None => return Err(state),
        };
        if self.chains[0].len() == MAX_PLUGINS {
            return Err(state);
        }

        let slot = PluginSlot {
            kind: state.kind(),
            state: free,
        };
        self.states[free] = Some(state);

        let active = self.active.load(Ordering::Relaxed) as usize;
        let inactive = active ^ 1;

        // Step 1: build the new topology in the inactive copy.
        let _ = self.chains[inactive].push(slot);
        // Step 2: publish. Rendering from here on walks the new chain.
        self.active.store(inactive as u8, Ordering::Release);
        // Step 3: mirror, so both copies stay structurally identical.
        let _ = self.chains[active].push(slot);

        Ok(())
    }

    /// Remove the plugin at `index` via the two-step protocol, returning
    /// its state for disposal on the control thread.
    pub fn remove_plugin(&mut self, index: usize) -> Option<Box<PluginState>> {
        let active = self.active.load(Ordering::Relaxed) as usize;
        let inactive = active ^ 1;

        // Step 1: drop the slot from the back chain.
        let slot = self.chains[inactive].remove(index)?;
        // Step 2: publish the shortened chain.
        self.active.store(inactive as u8, Ordering::Release);
        // Step 3: drop it from the old front; after the publish above no
        // traversal references it, so the state can leave the table.
        let mirrored = self.chains[active].remove(index);
        debug_assert_eq!(mirrored, Some(slot));

        self.states[slot.state].take()
    }

    /// Adjust one plugin parameter; both chain copies see it because state
    /// is shared.
    pub fn set_plugin_param(&mut self, index: usize, param: PluginParam, value: f32) {
        let slot = match self.chains[self.active_idx()].slots().get(index) {
            Some(slot) => *slot,
            None => return,
        };
        if let Some(state) = self.states[slot.state].as_mut() {
            state.set_param(param, value);
        }
    }

    /// Quiesce notes, drop both chain copies, and hand every plugin state
    /// to `dispose` exactly once.
    pub fn clear(&mut self, dispose: &mut dyn FnMut(Box<PluginState>)) {
        self.synth.all_notes_off();
        self.notes.clear();
        self.chains[0].clear();
        self.chains[1].clear();
        for state in self.states.iter_mut() {
            if let Some(boxed) = state.take() {
                dispose(boxed);
            }
        }
    }

    /// Check the structural invariant: both chains agree on tags and state
    /// indices slot-for-slot.
    pub fn chains_mirrored(&self) -> bool {
        self.chains[0].slots() == self.chains[1].slots()
    }

    fn process_slots(
        slots: &[PluginSlot],
        states: &mut [Option<Box<PluginState>>; MAX_PLUGINS],
        synth: &mut PolySynth,
        ctx: &RenderCtx,
        out: &mut [f32],
    ) {
        match slots.split_last() {
            None => synth.process(ctx, out),
            Some((last, upstream)) => {
                // A muting plugin (closed gate) zeroes the block without
                // pulling anything upstream.
                if states[last.state]
                    .as_deref()
                    .is_some_and(|s| s.mutes_input())
                {
                    out.fill(0.0);
                    return;
                }
                Self::process_slots(upstream, states, synth, ctx, out);
                if let Some(state) = states[last.state].as_mut() {
                    state.process(ctx, out);
                }
            }
        }
    }
}

impl AudioNode for Track {
    fn process(&mut self, ctx: &RenderCtx, out: &mut [f32]) {
        let active = self.active.load(Ordering::Acquire) as usize;
        let chain = &self.chains[active];
        Self::process_slots(chain.slots(), &mut self.states, &mut self.synth, ctx, out);
    }
}
