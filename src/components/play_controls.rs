// Bottom status bar: playback state, keybinding hints, volume, and sky mode.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::components::player_card::PlaybackView;
use crate::components::{Component, BRAILLE_SPINNER};
use crate::theme::{SkyMode, Theme};

/// Bottom status bar showing playback state and keybinding hints.
#[derive(Default)]
pub struct PlayControls {
    action_tx: Option<UnboundedSender<Action>>,
    view: PlaybackView,
    mode: SkyMode,
    frame_count: u64,
}

impl PlayControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: PlaybackView) {
        self.view = view;
    }

    pub fn set_mode(&mut self, mode: SkyMode) {
        self.mode = mode;
    }

    fn status(&self) -> String {
        if self.view.is_loading {
            let idx = (self.frame_count / 3) as usize % BRAILLE_SPINNER.len();
            BRAILLE_SPINNER[idx].to_string()
        } else if self.view.is_playing {
            if self.frame_count % 30 < 15 { "♪ ▶" } else { "♫ ▶" }.to_string()
        } else if self.view.url.is_some() {
            "⏸".to_string()
        } else {
            "■".to_string()
        }
    }
}

impl Component for PlayControls {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) {
        self.action_tx = Some(tx);
    }

    fn update(&mut self, action: &Action) -> anyhow::Result<Vec<Action>> {
        if let Action::Tick = action {
            self.frame_count = self.frame_count.wrapping_add(1);
        }
        Ok(vec![])
    }

    fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let status_color = if self.view.is_loading {
            theme.buffering
        } else if self.view.is_playing {
            theme.success
        } else {
            theme.text_dim
        };
        let border_color = if self.view.is_playing {
            theme.primary
        } else {
            theme.border
        };

        let div = Span::styled(" │ ", Style::default().fg(theme.border));
        let key_style = Style::default().fg(theme.text);
        let desc_style = Style::default().fg(theme.text_dim);
        let mode_icon = if self.mode.is_night() { "☾ Night" } else { "☀ Day" };

        let line1 = Line::from(vec![
            Span::styled(
                format!(" {} ", self.status()),
                Style::default().fg(status_color).add_modifier(Modifier::BOLD),
            ),
            div.clone(),
            Span::styled("Space", key_style),
            Span::styled(" Play/Pause", desc_style),
            div.clone(),
            Span::styled("←→", key_style),
            Span::styled(" Skip", desc_style),
            div.clone(),
            Span::styled("o", key_style),
            Span::styled(" URL", desc_style),
            div.clone(),
            Span::styled("f", key_style),
            Span::styled(" Favorite", desc_style),
            div.clone(),
            Span::styled("t", key_style),
            Span::styled(" Theme", desc_style),
        ]);

        let line2 = Line::from(vec![
            Span::raw("   "),
            Span::styled("Tab", key_style),
            Span::styled(" Switch", desc_style),
            div.clone(),
            Span::styled("[ ]", key_style),
            Span::styled(" Vol", desc_style),
            div.clone(),
            Span::styled("m", key_style),
            Span::styled(" Mute", desc_style),
            div.clone(),
            Span::styled("?", key_style),
            Span::styled(" Help", desc_style),
            div.clone(),
            Span::styled("q", key_style),
            Span::styled(" Quit", desc_style),
            Span::raw("   "),
            Span::styled(
                format!("Vol {}", self.view.volume_label()),
                Style::default().fg(theme.primary),
            ),
            Span::raw("  "),
            Span::styled(mode_icon, Style::default().fg(theme.accent)),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme.panel_bg));

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(vec![line1, line2]).block(block), area);
    }
}
