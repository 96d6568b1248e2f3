use ratatui::{prelude::*, widgets::*, Frame};

use crate::state_store::PlaybackState;

use crate::ui_management::components::ComponentRender;

/// Renders the track of the room, holds nothing but the last snapshot
pub struct MusicPlayer {
    pub playback: Option<PlaybackState>,
}

pub struct RenderProps {
    pub area: Rect,
    pub border_color: Color,
}

fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;

    format!("{}:{:02}", secs / 60, secs % 60)
}

impl ComponentRender<RenderProps> for MusicPlayer {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let block = Block::default()
            .borders(Borders::ALL)
            .fg(props.border_color)
            .title("Now Playing");

        let Some(playback) = self.playback.as_ref() else {
            let idle = Paragraph::new("No song is playing right now.".italic()).block(block);
            frame.render_widget(idle, props.area);
            return;
        };

        let inner = block.inner(props.area);
        frame.render_widget(block, props.area);

        let [container_track, container_progress] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
            .split(inner)
        else {
            panic!("The music player layout should have 2 chunks")
        };

        let play_state = if playback.is_playing {
            "▶ Playing".green()
        } else {
            "⏸ Paused".yellow()
        };

        let track = Paragraph::new(Text::from(vec![
            Line::from(playback.title.as_str().bold()),
            Line::from(playback.artist.as_str().italic()),
            Line::from(vec![
                play_state,
                Span::from(format!(
                    "   Votes to skip: {} / {}",
                    playback.votes, playback.votes_required
                )),
            ]),
        ]))
        .wrap(Wrap { trim: true });
        frame.render_widget(track, container_track);

        let progress = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(playback.progress())
            .label(format!(
                "{} / {}",
                format_duration(playback.position_ms),
                format_duration(playback.duration_ms)
            ));
        frame.render_widget(progress, container_progress);
    }
}
