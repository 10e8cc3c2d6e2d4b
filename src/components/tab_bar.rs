// Tab strip under the header: Player and Favorites (with a count).

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Player,
    Favorites,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Player, Tab::Favorites];

    pub fn next(self) -> Self {
        match self {
            Tab::Player => Tab::Favorites,
            Tab::Favorites => Tab::Player,
        }
    }

    /// Tab for a 1-based number key.
    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.get((n as usize).checked_sub(1)?).copied()
    }
}

#[derive(Default)]
pub struct TabBar {
    action_tx: Option<UnboundedSender<Action>>,
    active: Tab,
    favorites_count: usize,
}

impl TabBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn set_favorites_count(&mut self, count: usize) {
        self.favorites_count = count;
    }

    fn label(&self, tab: Tab) -> String {
        match tab {
            Tab::Player => "Player".to_string(),
            Tab::Favorites => format!("Favorites ({})", self.favorites_count),
        }
    }
}

impl Component for TabBar {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) {
        self.action_tx = Some(tx);
    }

    fn update(&mut self, action: &Action) -> anyhow::Result<Vec<Action>> {
        match action {
            Action::SelectTab(tab) => self.active = *tab,
            Action::NextTab => self.active = self.active.next(),
            _ => {}
        }
        Ok(vec![])
    }

    fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans: Vec<Span> = Vec::new();
        for (i, tab) in Tab::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(theme.text_dim)));
            }
            let style = if *tab == self.active {
                Style::default()
                    .fg(theme.primary)
                    .bg(theme.panel_bg)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(theme.text_dim).bg(theme.panel_bg)
            };
            spans.push(Span::styled(format!(" {} ", self.label(*tab)), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).centered(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_map_to_tabs() {
        assert_eq!(Tab::from_number(1), Some(Tab::Player));
        assert_eq!(Tab::from_number(2), Some(Tab::Favorites));
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(3), None);
    }

    #[test]
    fn next_tab_cycles() {
        let mut bar = TabBar::new();
        bar.update(&Action::NextTab).unwrap();
        assert_eq!(bar.active(), Tab::Favorites);
        bar.update(&Action::NextTab).unwrap();
        assert_eq!(bar.active(), Tab::Player);
    }
}
