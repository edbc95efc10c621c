//! Application wiring: audio stream on one side, terminal UI on the other.

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use groovekit::dsp::distortion::DistortionMode;
use groovekit::engine::{engine_pair, EngineConfig, EngineStatus};
use groovekit::synth::SynthParams;
use groovekit::timeline::{PluginKind, PluginState};
use groovekit::{EngineHandle, MAX_BLOCK_SIZE};

use crate::keys::note_for_key;
use crate::ui;

/// How long a key-triggered note rings before the matching note-off.
/// Terminals report presses but not releases, so the harness times out held
/// notes itself.
const KEY_NOTE_HOLD: Duration = Duration::from_millis(250);

/// Delay effect dimensions built on toggle: a quarter-second tap inside a
/// two-second buffer at the stream rate.
const DELAY_BUFFER_SECONDS: usize = 2;

/// Everything the render function needs to draw one frame.
pub struct UiView {
    pub status: EngineStatus,
    pub bpm: f32,
    pub sample_rate: u32,
    pub selected: usize,
    pub plugins: Vec<Vec<PluginKind>>,
    pub params: SynthParams,
}

pub struct App {
    config: EngineConfig,
}

impl App {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Open the audio stream, run the UI loop until quit, then tear down.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        if stream_config.sample_format() != cpal::SampleFormat::F32 {
            return Err(eyre!("only f32 output is supported"));
        }

        let sample_rate = stream_config.sample_rate().0;
        let channels = stream_config.channels() as usize;

        let config = EngineConfig {
            sample_rate,
            ..self.config
        };
        let (mut engine, mut handle) = engine_pair(config);
        handle.add_track();

        println!("groovekit  |  {} Hz, {} channels", sample_rate, channels);

        // The audio thread: cpal invokes this callback on its own realtime
        // thread; the engine renders mono and the harness fans it out.
        let mut block = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut written = 0;

                while written < total_frames {
                    let frames = (total_frames - written).min(MAX_BLOCK_SIZE);
                    let buf = &mut block[..frames];
                    engine.process(buf);

                    let offset = written * channels;
                    for (i, &sample) in buf.iter().enumerate() {
                        for ch in 0..channels {
                            data[offset + i * channels + ch] = sample;
                        }
                    }
                    written += frames;
                }
            },
            |err| eprintln!("stream error: {err}"),
            None,
        )?;
        stream.play()?;

        let result = run_ui(&mut handle, config);
        ratatui::restore();

        // Silence the driver before the stream drops.
        handle.shutdown();
        result
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Control-side event loop: keyboard in, ops/params/notes out, status back.
fn run_ui(handle: &mut EngineHandle, config: EngineConfig) -> EyreResult<()> {
    let mut terminal = ratatui::init();

    let mut view = UiView {
        status: EngineStatus::default(),
        bpm: config.bpm,
        sample_rate: config.sample_rate,
        selected: 0,
        plugins: vec![Vec::new()],
        params: SynthParams::default(),
    };
    // (note, when to send the off)
    let mut held: Vec<(u8, Instant)> = Vec::new();
    let mut quit = false;

    while !quit {
        if let Some(status) = handle.latest_status() {
            view.status = status;
        }
        handle.collect_garbage();

        // Expire held notes.
        let now = Instant::now();
        held.retain_mut(|(note, deadline)| {
            if now >= *deadline {
                handle.note_off(*note);
                false
            } else {
                true
            }
        });

        terminal.draw(|frame| ui::render(frame, &view))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    quit = handle_key(key.code, handle, &mut view, &mut held);
                }
            }
        }
    }

    Ok(())
}

/// Handle one key press; returns true to quit.
fn handle_key(
    code: KeyCode,
    handle: &mut EngineHandle,
    view: &mut UiView,
    held: &mut Vec<(u8, Instant)>,
) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,

        KeyCode::Char(' ') => {
            handle.toggle_play();
        }
        KeyCode::Backspace => {
            handle.reset();
        }
        KeyCode::Char('r') => {
            handle.toggle_record(view.selected);
        }

        KeyCode::Char('[') => {
            if view.selected > 0 {
                view.selected -= 1;
                handle.select_track(view.selected);
            }
        }
        KeyCode::Char(']') => {
            if view.selected + 1 < view.plugins.len() {
                view.selected += 1;
                handle.select_track(view.selected);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if handle.add_track() {
                view.plugins.push(Vec::new());
            }
        }
        KeyCode::Char('-') => {
            if view.plugins.len() > 1 {
                let track = view.plugins.len() - 1;
                if handle.remove_track(track) {
                    view.plugins.pop();
                    if view.selected >= view.plugins.len() {
                        view.selected = view.plugins.len() - 1;
                    }
                }
            }
        }

        KeyCode::Char(d @ '1'..='5') => {
            toggle_plugin(d, handle, view);
        }

        KeyCode::Left => {
            view.params.cutoff_hz = (view.params.cutoff_hz / 1.2).max(50.0);
            handle.publish_params(view.selected, view.params);
        }
        KeyCode::Right => {
            view.params.cutoff_hz = (view.params.cutoff_hz * 1.2).min(18_000.0);
            handle.publish_params(view.selected, view.params);
        }
        KeyCode::Down => {
            view.params.resonance = (view.params.resonance - 0.2).max(0.0);
            handle.publish_params(view.selected, view.params);
        }
        KeyCode::Up => {
            view.params.resonance = (view.params.resonance + 0.2).min(4.0);
            handle.publish_params(view.selected, view.params);
        }

        KeyCode::Char(ch) => {
            if let Some(note) = note_for_key(ch) {
                // Retry briefly; live notes are worth a short spin.
                for _ in 0..64 {
                    if handle.note_on(note) {
                        held.push((note, Instant::now() + KEY_NOTE_HOLD));
                        break;
                    }
                    std::hint::spin_loop();
                }
            }
        }

        _ => {}
    }
    false
}

/// Digits 1-5 toggle one effect each on the selected track, tracked by a
/// UI-side mirror of the chain.
fn toggle_plugin(digit: char, handle: &mut EngineHandle, view: &mut UiView) {
    let kind = match digit {
        '1' => PluginKind::Ladder,
        '2' => PluginKind::Gain,
        '3' => PluginKind::Distortion,
        '4' => PluginKind::Gate,
        '5' => PluginKind::Delay,
        _ => return,
    };
    let track = view.selected;
    let chain = &mut view.plugins[track];

    if let Some(slot) = chain.iter().position(|&k| k == kind) {
        if handle.remove_plugin(track, slot) {
            chain.remove(slot);
        }
        return;
    }

    let sample_rate = handle.sample_rate() as usize;
    let state = match kind {
        PluginKind::Ladder => PluginState::ladder(1_200.0),
        PluginKind::Gain => PluginState::gain(0.7),
        PluginKind::Distortion => PluginState::distortion(DistortionMode::Tanh, 3.0, 0.8),
        PluginKind::Gate => PluginState::gate(),
        PluginKind::Delay => PluginState::delay(
            sample_rate * DELAY_BUFFER_SECONDS,
            sample_rate / 4,
            0.35,
            0.4,
        ),
    };
    if handle.add_plugin(track, state) {
        chain.push(kind);
    }
}
