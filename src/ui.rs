// Layout and rendering: paints the sky over the whole terminal, then the
// header, tabs, the active tab's card, the status bar and overlays on top.

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::components::favorites_list::FavoritesList;
use crate::components::play_controls::PlayControls;
use crate::components::player_card::PlayerCard;
use crate::components::tab_bar::{Tab, TabBar};
use crate::components::url_modal::UrlModal;
use crate::components::{centered_overlay, Component};
use crate::sky::Sky;
use crate::theme::{SkyMode, Theme};

const PLAYER_CARD_WIDTH: u16 = 64;
const PLAYER_CARD_HEIGHT: u16 = 9;
const FAVORITES_WIDTH: u16 = 80;
const FAVORITES_MAX_HEIGHT: u16 = 22;

pub struct DrawState<'a> {
    pub sky: &'a Sky,
    pub now: Instant,
    pub mode: SkyMode,
    pub theme: &'a Theme,
    pub tab_bar: &'a TabBar,
    pub player_card: &'a PlayerCard,
    pub favorites_list: &'a FavoritesList,
    pub play_controls: &'a PlayControls,
    pub url_modal: &'a UrlModal,
    pub error_message: &'a Option<String>,
    pub show_help: bool,
}

/// Rows of the main layout: header, tabs, content, error bar, status bar.
pub fn layout(area: Rect, has_error: bool) -> [Rect; 5] {
    let error_height = if has_error { 1 } else { 0 };
    Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(error_height),
        Constraint::Length(4),
    ])
    .areas(area)
}

pub fn draw(frame: &mut Frame, state: &DrawState) {
    let area = frame.area();
    state.sky.render(area, frame.buffer_mut(), state.now);

    let [header, tabs, content, error, controls] = layout(area, state.error_message.is_some());
    let theme = state.theme;

    draw_header(frame, header, state.mode, theme);
    state.tab_bar.draw(frame, tabs, theme);

    match state.tab_bar.active() {
        Tab::Player => {
            let card = centered_overlay(content, PLAYER_CARD_WIDTH, PLAYER_CARD_HEIGHT);
            state.player_card.draw(frame, card, theme);
        }
        Tab::Favorites => {
            let height = content.height.saturating_sub(2).min(FAVORITES_MAX_HEIGHT);
            let list = centered_overlay(content, FAVORITES_WIDTH, height);
            state.favorites_list.draw(frame, list, theme);
        }
    }

    if let Some(ref msg) = state.error_message {
        let error_line = Line::from(vec![
            Span::styled(" ⚠ ", Style::default().fg(theme.error).bg(theme.panel_bg)),
            Span::styled(msg.as_str(), Style::default().fg(theme.text).bg(theme.panel_bg)),
        ]);
        frame.render_widget(Clear, error);
        frame.render_widget(
            Paragraph::new(error_line).style(Style::default().bg(theme.panel_bg)),
            error,
        );
    }

    state.play_controls.draw(frame, controls, theme);

    if state.url_modal.is_visible() {
        state.url_modal.draw(frame, area, theme);
    }

    if state.show_help {
        draw_help_overlay(frame, theme);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, mode: SkyMode, theme: &Theme) {
    let indicator = if mode.is_night() { "☾" } else { "☀" };
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} Sky Player", indicator),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(mode.tagline(), Style::default().fg(theme.secondary))),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_help_overlay(frame: &mut Frame, theme: &Theme) {
    let keybindings = [
        ("q", "Quit"),
        ("Space", "Play / pause"),
        ("← / →", "Skip back / forward 10s"),
        ("Home", "Back to the start"),
        ("[ ]", "Volume down / up"),
        ("m", "Mute / unmute"),
        ("f", "Toggle favorite"),
        ("o", "Open an audio URL"),
        ("t", "Switch day / night"),
        ("Tab", "Next tab"),
        ("1 / 2", "Player / Favorites"),
        ("j k / ↑ ↓", "Move in favorites"),
        ("Enter", "Play selected favorite"),
        ("d", "Remove selected favorite"),
        ("?", "Toggle this help overlay"),
    ];

    let overlay_area = centered_overlay(frame.area(), 52, keybindings.len() as u16 + 6);
    frame.render_widget(Clear, overlay_area);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Keybindings ",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (key, desc) in &keybindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:12}", key), Style::default().fg(theme.accent)),
            Span::styled(*desc, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press any key to close",
        Style::default().fg(theme.text_dim),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.panel_bg))
        .title(" Help ")
        .title_alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
