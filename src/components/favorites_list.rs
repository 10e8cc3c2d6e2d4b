// Favorites tab: saved URLs, newest first. Enter plays, d removes.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::components::Component;
use crate::favorites::FavoriteEntry;
use crate::theme::Theme;

pub struct FavoritesList {
    action_tx: Option<UnboundedSender<Action>>,
    entries: Vec<FavoriteEntry>,
    state: ListState,
}

impl Default for FavoritesList {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesList {
    pub fn new() -> Self {
        Self {
            action_tx: None,
            entries: vec![],
            state: ListState::default(),
        }
    }

    /// Replace the entries, keeping the selection in range.
    pub fn set_entries(&mut self, entries: Vec<FavoriteEntry>) {
        self.entries = entries;
        let selected = match (self.state.selected(), self.entries.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.state.select(selected);
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn selected_entry(&self) -> Option<&FavoriteEntry> {
        self.state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1).min(self.entries.len() - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(i));
    }

    fn send(&self, action: Action) {
        if let Some(tx) = &self.action_tx {
            tx.send(action).ok();
        }
    }
}

impl Component for FavoritesList {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) {
        self.action_tx = Some(tx);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::Enter => {
                if let Some(entry) = self.selected_entry() {
                    self.send(Action::PlayFavorite(entry.url.clone()));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(entry) = self.selected_entry() {
                    self.send(Action::RemoveFavorite(entry.id.clone()));
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.panel_bg))
            .title(" Favorites ")
            .title_style(Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.entries.is_empty() {
            let empty = vec![
                Line::from(""),
                Line::from(Span::styled("No favorites yet", Style::default().fg(theme.text))),
                Line::from(Span::styled(
                    "Press f while something is loaded to save it",
                    Style::default().fg(theme.text_dim),
                )),
            ];
            frame.render_widget(Paragraph::new(empty).centered(), inner);
            return;
        }

        let selected = self.state.selected();
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let is_selected = selected == Some(i);
                let title_style = if is_selected {
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                let added = entry.added_at.format("%Y-%m-%d %H:%M").to_string();
                let title_line = Line::from(vec![
                    Span::styled("♥ ", Style::default().fg(theme.error)),
                    Span::styled(entry.title.clone(), title_style),
                    Span::styled(format!("  {}", added), Style::default().fg(theme.text_dim)),
                ]);
                let url_line = Line::from(vec![
                    Span::raw("  "),
                    Span::styled(entry.url.clone(), Style::default().fg(theme.text_dim)),
                ]);
                let mut item = ListItem::new(vec![title_line, url_line]);
                if is_selected {
                    item = item.style(Style::default().bg(theme.selection_bg));
                }
                item
            })
            .collect();

        let list = List::new(items).highlight_symbol("▌");
        frame.render_stateful_widget(list, inner, &mut self.state.clone());
    }
}
