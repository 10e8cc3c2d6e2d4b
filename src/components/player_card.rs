// Player card: title, source URL, play state, progress and volume for the
// loaded audio.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::components::{format_time, Component, BRAILLE_SPINNER};
use crate::theme::Theme;

/// What the UI shows about playback, copied from the controller after each
/// action so components never hold the controller itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackView {
    pub title: Option<String>,
    pub url: Option<String>,
    pub is_playing: bool,
    pub is_loading: bool,
    pub position: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub is_favorite: bool,
}

impl PlaybackView {
    /// Fraction of the track played, 0.0 when the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn volume_label(&self) -> String {
        if self.muted {
            "muted".to_string()
        } else {
            format!("{}%", (self.volume * 100.0).round() as u32)
        }
    }
}

#[derive(Default)]
pub struct PlayerCard {
    action_tx: Option<UnboundedSender<Action>>,
    view: PlaybackView,
    frame_count: u64,
}

impl PlayerCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: PlaybackView) {
        self.view = view;
    }

    pub fn view(&self) -> &PlaybackView {
        &self.view
    }

    fn status_line(&self, theme: &Theme) -> Line<'static> {
        if self.view.is_loading {
            let idx = (self.frame_count / 3) as usize % BRAILLE_SPINNER.len();
            return Line::from(vec![
                Span::styled(format!("{} ", BRAILLE_SPINNER[idx]), Style::default().fg(theme.buffering)),
                Span::styled("Loading…", Style::default().fg(theme.text_dim)),
            ]);
        }
        if self.view.is_playing {
            let note = if self.frame_count % 30 < 15 { "♪" } else { "♫" };
            return Line::from(vec![
                Span::styled(format!("{} ▶ ", note), Style::default().fg(theme.success)),
                Span::styled("Playing", Style::default().fg(theme.text)),
            ]);
        }
        Line::from(vec![
            Span::styled("⏸ ", Style::default().fg(theme.text_dim)),
            Span::styled("Paused", Style::default().fg(theme.text_dim)),
        ])
    }

    fn progress_line(&self, width: u16, theme: &Theme) -> Line<'static> {
        let elapsed = format_time(self.view.position);
        let total = format_time(self.view.duration);
        let bar_width = (width as usize).saturating_sub(elapsed.len() + total.len() + 2);
        let filled = ((bar_width as f64) * self.view.progress()).round() as usize;
        let filled = filled.min(bar_width);

        let (played, head, rest) = if bar_width == 0 {
            (String::new(), String::new(), String::new())
        } else if filled >= bar_width {
            ("━".repeat(bar_width), String::new(), String::new())
        } else {
            ("━".repeat(filled), "●".to_string(), "─".repeat(bar_width - filled - 1))
        };

        Line::from(vec![
            Span::styled(format!("{} ", elapsed), Style::default().fg(theme.text)),
            Span::styled(played, Style::default().fg(theme.primary)),
            Span::styled(head, Style::default().fg(theme.primary)),
            Span::styled(rest, Style::default().fg(theme.border)),
            Span::styled(format!(" {}", total), Style::default().fg(theme.text_dim)),
        ])
    }
}

impl Component for PlayerCard {
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
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if self.view.is_playing {
                theme.primary
            } else {
                theme.border
            }))
            .style(Style::default().bg(theme.panel_bg))
            .title(" Now playing ")
            .title_style(Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(url) = self.view.url.as_deref() else {
            let empty = vec![
                Line::from(""),
                Line::from(Span::styled("No audio loaded", Style::default().fg(theme.text))),
                Line::from(Span::styled(
                    "Press o to open an audio URL",
                    Style::default().fg(theme.text_dim),
                )),
            ];
            frame.render_widget(Paragraph::new(empty).centered(), inner);
            return;
        };

        let title = self.view.title.clone().unwrap_or_default();
        let heart = if self.view.is_favorite { "♥" } else { "♡" };
        let heart_style = if self.view.is_favorite {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.text_dim)
        };
        let content_width = inner.width.saturating_sub(2);
        let title_width = (content_width as usize).saturating_sub(3);
        let title: String = title.chars().take(title_width).collect();

        let lines = vec![
            Line::from(vec![
                Span::styled(title, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(heart, heart_style),
            ]),
            Line::from(Span::styled(
                url.chars().take(content_width as usize).collect::<String>(),
                Style::default().fg(theme.text_dim),
            )),
            Line::from(""),
            self.status_line(theme),
            self.progress_line(content_width, theme),
            Line::from(vec![
                Span::styled("Volume ", Style::default().fg(theme.text_dim)),
                Span::styled(self.view.volume_label(), Style::default().fg(theme.accent)),
            ]),
        ];

        let padded = Rect {
            x: inner.x + 1,
            width: content_width,
            ..inner
        };
        frame.render_widget(Paragraph::new(lines), padded);
    }
}
