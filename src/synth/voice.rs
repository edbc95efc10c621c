use crate::dsp::envelope::AdsrEnvelope;
use crate::dsp::ladder::LadderFilter;
use crate::dsp::mix::mix_into;
use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::graph::RenderCtx;
use crate::synth::{note_to_freq, SynthParams};

/// One sounding note: the fixed sub-graph
/// `{pulse, saw, sub} -> mixer -> ladder -> adsr`.
///
/// A voice holds a note from note-on until its envelope falls idle; only
/// then does it report free for reallocation, so long releases survive
/// while truly silent voices are preferred for new notes.
pub struct Voice {
    note: Option<u8>,
    pulse: Oscillator,
    saw: Oscillator,
    sub: Oscillator,
    filter: LadderFilter,
    env: AdsrEnvelope,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            note: None,
            pulse: Oscillator::new(),
            saw: Oscillator::new(),
            sub: Oscillator::new(),
            filter: LadderFilter::new(2_000.0),
            env: AdsrEnvelope::new(sample_rate),
        }
    }

    /// Assign a note: reset oscillator phases for a coherent start and
    /// retrigger the envelope.
    pub fn note_on(&mut self, note: u8) {
        self.note = Some(note);
        self.pulse.reset_phase();
        self.saw.reset_phase();
        self.sub.reset_phase();
        self.env.note_on();
    }

    /// Release, but only if this voice still holds exactly that note.
    pub fn note_off(&mut self, note: u8) {
        if self.note == Some(note) {
            self.env.note_off();
        }
    }

    /// Unconditional release of whatever is sounding.
    pub fn release(&mut self) {
        self.env.note_off();
    }

    /// Free means no note assigned at all - a releasing voice is not free.
    pub fn is_free(&self) -> bool {
        self.note.is_none()
    }

    /// True once the envelope has gone idle; the block can be skipped.
    pub fn is_silent(&self) -> bool {
        self.env.is_idle()
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn envelope(&self) -> &AdsrEnvelope {
        &self.env
    }

    /// Render one block. The caller skips silent voices; this also clears
    /// the note assignment once the release has finished.
    pub fn process(&mut self, ctx: &RenderCtx, params: &SynthParams, out: &mut [f32]) {
        let note = match self.note {
            Some(note) => note,
            None => {
                out.fill(0.0);
                return;
            }
        };
        if self.env.is_idle() {
            // Release completed in an earlier block.
            out.fill(0.0);
            self.note = None;
            return;
        }

        let freq = note_to_freq(note);
        let sr = ctx.sample_rate;

        // Oscillator mixer: pull each source into scratch, accumulate.
        out.fill(0.0);
        let scratch = ctx.arena.alloc(out.len());

        self.saw.render(scratch, Waveform::Saw, freq, sr);
        mix_into(out, scratch, params.saw_level);

        self.pulse.render(
            scratch,
            Waveform::Pulse {
                duty: params.pulse_duty,
            },
            freq,
            sr,
        );
        mix_into(out, scratch, params.pulse_level);

        self.sub.render(
            scratch,
            Waveform::Sub {
                duty: params.sub_duty,
                offset_semitones: params.sub_offset_semitones,
            },
            freq,
            sr,
        );
        mix_into(out, scratch, params.sub_level);

        self.filter.set_cutoff(params.cutoff_hz);
        self.filter.set_resonance(params.resonance);
        self.filter.set_drive(params.drive);
        self.filter.render(out, sr);

        self.env
            .set_params(params.attack, params.decay, params.sustain, params.release);
        self.env.apply(out);

        if self.env.is_idle() {
            self.note = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rt::BlockArena;

    fn render(voice: &mut Voice, params: &SynthParams, len: usize) -> Vec<f32> {
        let mut arena = BlockArena::with_capacity(8192);
        let mut out = vec![0.0; len];
        let mut rendered = 0;
        while rendered < len {
            arena.begin_block();
            let ctx = RenderCtx::new(48_000.0, 120.0, &arena);
            let n = (len - rendered).min(512);
            voice.process(&ctx, params, &mut out[rendered..rendered + n]);
            rendered += n;
        }
        out
    }

    #[test]
    fn produces_signal_after_note_on() {
        let mut voice = Voice::new(48_000.0);
        let params = SynthParams::default();
        voice.note_on(69);

        let out = render(&mut voice, &params, 1024);
        let peak = out.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak > 0.01, "voice should sound, peak {peak}");
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn ignores_note_off_for_other_notes() {
        let mut voice = Voice::new(48_000.0);
        voice.note_on(60);
        voice.note_off(61);
        assert!(!voice.envelope().is_idle());
        assert_eq!(voice.note(), Some(60));
    }

    #[test]
    fn frees_itself_after_release_completes() {
        let mut voice = Voice::new(48_000.0);
        let mut params = SynthParams::default();
        params.release = 0.01;
        voice.note_on(60);

        let _ = render(&mut voice, &params, 512);
        voice.note_off(60);
        // 0.01s release at 48kHz is 480 samples; give it two blocks.
        let _ = render(&mut voice, &params, 1024);

        assert!(voice.is_free(), "voice should be free after release");
        assert!(voice.is_silent());
    }

    #[test]
    fn note_on_resets_phases() {
        let mut voice = Voice::new(48_000.0);
        let params = SynthParams::default();
        voice.note_on(60);
        let _ = render(&mut voice, &params, 197);
        assert!(voice.saw.phase() > 0.0);

        voice.note_on(60);
        assert_eq!(voice.saw.phase(), 0.0);
        assert_eq!(voice.pulse.phase(), 0.0);
        assert_eq!(voice.sub.phase(), 0.0);
        assert_eq!(voice.envelope().stage(), crate::dsp::EnvelopeStage::Attack);
    }
}
