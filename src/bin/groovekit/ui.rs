//! Terminal view: transport bar, track table, help footer.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use groovekit::timeline::PluginKind;

use crate::app::UiView;

pub fn render(frame: &mut Frame, view: &UiView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // transport
            Constraint::Min(4),    // tracks
            Constraint::Length(3), // synth params
            Constraint::Length(1), // help
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], view);
    render_tracks(frame, chunks[1], view);
    render_params(frame, chunks[2], view);

    let help = Paragraph::new(
        " [q] quit  [space] play  [backspace] rewind  [r] record  [[/]] track  [+/-] add/remove  \
         [1-5] fx  [arrows] filter  [zsxdcvgbhnjm,] notes",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn render_transport(frame: &mut Frame, area: ratatui::layout::Rect, view: &UiView) {
    let status = &view.status;
    let seconds = status.playhead as f64 / view.sample_rate as f64;
    let beats = seconds * view.bpm as f64 / 60.0;

    let play_span = if status.playing {
        Span::styled("> playing", Style::default().fg(Color::Green))
    } else {
        Span::styled("|| stopped", Style::default().fg(Color::Yellow))
    };
    let record_span = match status.recording {
        Some(track) => Span::styled(
            format!("  REC track {track}"),
            Style::default().fg(Color::Red),
        ),
        None => Span::raw(""),
    };

    let meter = peak_meter(status.peak);
    let line = Line::from(vec![
        Span::styled(
            format!(" {:.0} BPM  ", view.bpm),
            Style::default().fg(Color::Cyan),
        ),
        play_span,
        record_span,
        Span::raw(format!("    beat {beats:.1}  ({seconds:.2}s)  ")),
        Span::styled(meter, Style::default().fg(Color::Magenta)),
    ]);

    let block = Block::default().title(" groovekit ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tracks(frame: &mut Frame, area: ratatui::layout::Rect, view: &UiView) {
    let rows: Vec<Row> = view
        .plugins
        .iter()
        .enumerate()
        .map(|(index, chain)| {
            let marker = if index == view.selected { ">" } else { " " };
            let record = if view.status.recording == Some(index) {
                "R"
            } else {
                " "
            };
            let chain_text = if chain.is_empty() {
                "-".to_string()
            } else {
                chain
                    .iter()
                    .map(|k| kind_label(*k))
                    .collect::<Vec<_>>()
                    .join(" -> ")
            };
            let style = if index == view.selected {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            Row::new(vec![
                format!("{marker}{record}"),
                format!("track {index}"),
                chain_text,
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Min(20),
        ],
    )
    .block(Block::default().title(" tracks ").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_params(frame: &mut Frame, area: ratatui::layout::Rect, view: &UiView) {
    let p = &view.params;
    let line = Line::from(vec![
        Span::raw(format!(
            " cutoff {:.0} Hz   resonance {:.1}   drive {:.1}   ",
            p.cutoff_hz, p.resonance, p.drive
        )),
        Span::styled(
            format!(
                "ADSR {:.0}/{:.0}/{:.0}%/{:.0}ms",
                p.attack * 1000.0,
                p.decay * 1000.0,
                p.sustain * 100.0,
                p.release * 1000.0
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::default().title(" synth ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn kind_label(kind: PluginKind) -> &'static str {
    match kind {
        PluginKind::Ladder => "lpf",
        PluginKind::Gain => "gain",
        PluginKind::Distortion => "dist",
        PluginKind::Gate => "gate",
        PluginKind::Delay => "delay",
    }
}

fn peak_meter(peak: f32) -> String {
    let filled = ((peak.min(1.0)) * 12.0) as usize;
    let mut bar = String::from("[");
    for i in 0..12 {
        bar.push(if i < filled { '#' } else { ' ' });
    }
    bar.push(']');
    bar
}
