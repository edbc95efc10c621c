use crate::sequencing::Frame;
use crate::timeline::{PluginParam, PluginState};

/// Live note input from the UI thread, delivered over the note ring and
/// applied to the selected track's synth. Carries no velocity - the voice
/// model has no velocity input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMessage {
    On { note: u8 },
    Off { note: u8 },
}

/// Closed set of control operations, delivered over the op ring and applied
/// by the driver between blocks.
///
/// Anything that needs heap memory (a plugin's state, including any delay
/// buffer) is allocated on the control thread and travels inside the op;
/// the driver only moves pointers. Freed state flows back over the trash
/// ring.
#[derive(Debug)]
pub enum EngineOp {
    /// Start or stop the playhead. Quiesces sounding notes first.
    TogglePlay,
    /// Rewind the playhead to zero without changing the play state.
    Reset,
    /// Jump the playhead. Constant-time thanks to frame-indexed records.
    Seek(Frame),
    /// Arm or disarm recording of live input into `track`'s note list.
    ToggleRecord { track: usize },
    /// Route subsequent live note input to `track`.
    SelectTrack { track: usize },
    /// Activate the next pre-built track slot.
    AddTrack,
    /// Clear and retire a track; its plugin state returns via the trash
    /// ring.
    RemoveTrack { track: usize },
    /// Append a plugin, state pre-built by the control thread.
    AddPlugin {
        track: usize,
        state: Box<PluginState>,
    },
    /// Remove the plugin at `slot` via the two-step chain swap.
    RemovePlugin { track: usize, slot: usize },
    /// Adjust one effect parameter at the next block boundary.
    SetPluginParam {
        track: usize,
        slot: usize,
        param: PluginParam,
        value: f32,
    },
}

/// Per-block status published by the driver for the UI: the audio thread's
/// own view of the transport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStatus {
    /// Playhead after the block that published this.
    pub playhead: Frame,
    pub playing: bool,
    /// Track armed for recording, if any.
    pub recording: Option<usize>,
    /// Track receiving live note input.
    pub live_track: usize,
    pub track_count: usize,
    /// Absolute peak of the block's master output.
    pub peak: f32,
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self {
            playhead: 0,
            playing: false,
            recording: None,
            live_track: 0,
            track_count: 0,
            peak: 0.0,
        }
    }
}
