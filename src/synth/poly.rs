use crate::dsp::mix::{apply_gain, mix_into};
use crate::graph::{AudioNode, RenderCtx};
use crate::synth::{SynthParams, Voice};

/*
Voice Allocation
================

Two-step policy:

  1. Prefer a free voice - one with no note assigned, which includes voices
     whose release has fully finished. This keeps long tails ringing.
  2. If every voice is busy, steal the voice under a round-robin pointer
     and advance the pointer. Stealing round-robin (rather than
     oldest/quietest heuristics) guarantees progress under sustained input
     with no extra bookkeeping.

Duplicate note-ons are not coalesced: several voices may carry the same
note, and note-off releases all of them, so the last-assigned voice is the
one that matters for lifetime purposes.
*/

/// Polyphonic synthesizer: a fixed bank of voices summed at equal gain.
pub struct PolySynth {
    voices: Vec<Voice>,
    next_idx: usize,
    params: SynthParams,
}

impl PolySynth {
    /// Create a synth with `max_voices` voices.
    pub fn new(sample_rate: f32, max_voices: usize) -> Self {
        assert!(max_voices > 0, "a synth needs at least one voice");
        Self {
            voices: (0..max_voices).map(|_| Voice::new(sample_rate)).collect(),
            next_idx: 0,
            params: SynthParams::default(),
        }
    }

    /// Assign a note: free voice first, round-robin steal otherwise.
    pub fn note_on(&mut self, note: u8) {
        if let Some(voice) = self.voices.iter_mut().find(|v| v.is_free()) {
            voice.note_on(note);
            return;
        }

        let idx = self.next_idx;
        self.voices[idx].note_on(note);
        self.next_idx = (idx + 1) % self.voices.len();
    }

    /// Release every voice currently holding `note`.
    pub fn note_off(&mut self, note: u8) {
        for voice in &mut self.voices {
            voice.note_off(note);
        }
    }

    /// Release everything that is sounding.
    pub fn all_notes_off(&mut self) {
        for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
            voice.release();
        }
    }

    /// Install the parameter record for subsequent blocks.
    pub fn set_params(&mut self, params: SynthParams) {
        self.params = params;
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Round-robin steal pointer, exposed for allocation diagnostics.
    pub fn next_idx(&self) -> usize {
        self.next_idx
    }

    /// Voices currently sounding (assigned and not yet idle).
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }
}

impl AudioNode for PolySynth {
    fn process(&mut self, ctx: &RenderCtx, out: &mut [f32]) {
        out.fill(0.0);
        let scratch = ctx.arena.alloc(out.len());

        for voice in &mut self.voices {
            // Idle voices cost one branch and nothing else.
            if voice.is_free() && voice.is_silent() {
                continue;
            }
            voice.process(ctx, &self.params, scratch);
            mix_into(out, scratch, 1.0);
        }

        apply_gain(out, self.params.level);
    }
}
