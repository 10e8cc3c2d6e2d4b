// Modal dialog for opening an audio URL (press `o`). Up/Down cycles through
// the example URLs from the config.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::components::{centered_overlay, Component};
use crate::theme::Theme;

#[derive(Default)]
pub struct UrlModal {
    action_tx: Option<UnboundedSender<Action>>,
    visible: bool,
    input: String,
    error: Option<String>,
    examples: Vec<String>,
    example_index: Option<usize>,
}

impl UrlModal {
    pub fn new(examples: Vec<String>) -> Self {
        Self {
            examples,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.input.clear();
        self.error = None;
        self.example_index = None;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.input.clear();
        self.error = None;
        self.example_index = None;
    }

    fn cycle_example(&mut self, forward: bool) {
        if self.examples.is_empty() {
            return;
        }
        let len = self.examples.len();
        let next = match (self.example_index, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.example_index = Some(next);
        self.input = self.examples[next].clone();
        self.error = None;
    }

    fn submit(&mut self) {
        let url = self.input.trim().to_string();
        if url.is_empty() {
            self.hide();
            return;
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            self.error = Some("URL must start with http:// or https://".to_string());
            return;
        }
        if let Some(tx) = &self.action_tx {
            tx.send(Action::LoadUrl(url)).ok();
        }
        self.hide();
    }
}

impl Component for UrlModal {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) {
        self.action_tx = Some(tx);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
        if !self.visible {
            return Ok(false);
        }

        match key.code {
            KeyCode::Esc => {
                if let Some(tx) = &self.action_tx {
                    tx.send(Action::CloseUrlModal).ok();
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Up => self.cycle_example(false),
            KeyCode::Down => self.cycle_example(true),
            KeyCode::Char(c) => {
                self.input.push(c);
                self.error = None;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
            }
            _ => {}
        }

        Ok(true)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.visible {
            return;
        }

        let overlay_area = centered_overlay(area, 72, 7);
        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.panel_bg))
            .title(" Open URL ")
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD));
        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let prompt = Line::from(vec![
            Span::styled("URL: ", Style::default().fg(theme.accent)),
            Span::styled(self.input.as_str(), Style::default().fg(theme.text)),
            Span::styled("█", Style::default().fg(theme.text)),
        ]);
        let hint = Line::from(Span::styled(
            "  Enter to load · ↑/↓ examples · Esc to cancel",
            Style::default().fg(theme.text_dim),
        ));
        let error_line = match &self.error {
            Some(err) => Line::from(Span::styled(format!("  {}", err), Style::default().fg(theme.error))),
            None => Line::from(""),
        };

        frame.render_widget(Paragraph::new(vec![prompt, Line::from(""), hint, error_line]), inner);
    }
}
