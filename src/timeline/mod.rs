//! Tracks, effect chains, and the master mix.
//!
//! The timeline owns a fixed bank of pre-constructed tracks and mixes the
//! live ones into the master output. Activating or retiring a track is a
//! count adjustment plus swaps - the audio thread never constructs or
//! destroys a track.

pub mod chain;
pub mod plugin;
pub mod track;

pub use chain::{PluginChain, PluginSlot};
pub use plugin::{DelayFx, PluginKind, PluginParam, PluginState, MAX_PLUGINS};
pub use track::Track;

use crate::dsp::mix::mix_into;
use crate::error::EngineError;
use crate::graph::{AudioNode, RenderCtx};

/// Most tracks a project holds. Slots beyond the live count are
/// pre-constructed and idle.
pub const MAX_TRACKS: usize = 8;

/// Fixed bank of tracks plus the master mixer across the live ones.
pub struct Timeline {
    tracks: [Track; MAX_TRACKS],
    track_count: usize,
}

impl Timeline {
    /// Build every slot up front; all start inactive.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            tracks: std::array::from_fn(|_| Track::new(sample_rate)),
            track_count: 0,
        }
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        (index < self.track_count).then(|| &self.tracks[index])
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        (index < self.track_count).then(|| &mut self.tracks[index])
    }

    /// Iterate the live tracks.
    pub fn tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks[..self.track_count].iter_mut()
    }

    /// Activate the next pre-constructed slot. No allocation happens here.
    pub fn add_track(&mut self) -> Result<usize, EngineError> {
        if self.track_count == MAX_TRACKS {
            return Err(EngineError::CapacityExceeded);
        }
        let index = self.track_count;
        self.track_count += 1;
        Ok(index)
    }

    /// Clear track `index` and rotate the remaining live tracks left so
    /// they stay contiguous; the cleared slot rejoins the idle tail.
    pub fn remove_track(
        &mut self,
        index: usize,
        dispose: &mut dyn FnMut(Box<PluginState>),
    ) -> Result<(), EngineError> {
        if index >= self.track_count {
            debug_assert!(false, "track index {index} out of range");
            return Err(EngineError::InvalidArgument);
        }
        self.tracks[index].clear(dispose);
        for i in index..self.track_count - 1 {
            self.tracks.swap(i, i + 1);
        }
        self.track_count -= 1;
        Ok(())
    }
}

impl AudioNode for Timeline {
    fn process(&mut self, ctx: &RenderCtx, out: &mut [f32]) {
        out.fill(0.0);
        if self.track_count == 0 {
            return;
        }

        let scratch = ctx.arena.alloc(out.len());
        for track in self.tracks[..self.track_count].iter_mut() {
            track.process(ctx, scratch);
            mix_into(out, scratch, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rt::BlockArena;

    #[test]
    fn add_track_is_bounded() {
        let mut timeline = Timeline::new(48_000.0);
        for i in 0..MAX_TRACKS {
            assert_eq!(timeline.add_track(), Ok(i));
        }
        assert_eq!(timeline.add_track(), Err(EngineError::CapacityExceeded));
        assert_eq!(timeline.track_count(), MAX_TRACKS);
    }

    #[test]
    fn remove_track_keeps_live_tracks_contiguous() {
        let mut timeline = Timeline::new(48_000.0);
        for _ in 0..3 {
            timeline.add_track().unwrap();
        }
        // Tag each live track with a distinguishable plugin count.
        timeline
            .track_mut(1)
            .unwrap()
            .add_plugin(Box::new(PluginState::gain(1.0)))
            .unwrap();
        timeline
            .track_mut(2)
            .unwrap()
            .add_plugin(Box::new(PluginState::gain(1.0)))
            .unwrap();
        timeline
            .track_mut(2)
            .unwrap()
            .add_plugin(Box::new(PluginState::gate()))
            .unwrap();

        let mut disposed = 0;
        timeline.remove_track(0, &mut |_| disposed += 1).unwrap();

        assert_eq!(timeline.track_count(), 2);
        assert_eq!(disposed, 0, "track 0 had no plugin state");
        assert_eq!(timeline.track(0).unwrap().plugin_count(), 1);
        assert_eq!(timeline.track(1).unwrap().plugin_count(), 2);
    }

    #[test]
    fn removing_a_track_disposes_its_plugins() {
        let mut timeline = Timeline::new(48_000.0);
        timeline.add_track().unwrap();
        timeline
            .track_mut(0)
            .unwrap()
            .add_plugin(Box::new(PluginState::delay(4800, 2400, 0.3, 0.5)))
            .unwrap();

        let mut disposed = 0;
        timeline.remove_track(0, &mut |_| disposed += 1).unwrap();
        assert_eq!(disposed, 1);
        assert_eq!(timeline.track_count(), 0);
    }

    #[test]
    fn empty_timeline_is_silent() {
        let mut timeline = Timeline::new(48_000.0);
        let mut arena = BlockArena::with_capacity(4096);
        arena.begin_block();
        let ctx = RenderCtx::new(48_000.0, 120.0, &arena);
        let mut out = vec![1.0; 512];
        timeline.process(&ctx, &mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
