// Key event handling: maps key presses to actions.

use crossterm::event::{KeyCode, KeyEvent};

use crate::action::Action;
use crate::app::App;
use crate::components::tab_bar::Tab;
use crate::components::Component;
use crate::player::MediaBackend;

impl<B: MediaBackend> App<B> {
    pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        use KeyCode::{Char, Home, Left, Right};

        // Overlays consume all keys
        if self.show_help {
            self.action_tx.send(Action::HideHelp)?;
            return Ok(());
        }
        if self.url_modal.is_visible() {
            self.url_modal.handle_key_event(key)?;
            return Ok(());
        }

        let skip = self.config.general.skip_seconds;
        match key.code {
            Char('q') => self.action_tx.send(Action::Quit)?,
            Char('?') => self.action_tx.send(Action::ShowHelp)?,
            Char('o') => self.action_tx.send(Action::OpenUrlModal)?,
            Char('t') => self.action_tx.send(Action::ToggleTheme)?,
            Char(' ') => self.action_tx.send(Action::TogglePlayPause)?,
            Left => self.action_tx.send(Action::SkipBy(-skip))?,
            Right => self.action_tx.send(Action::SkipBy(skip))?,
            Home => self.action_tx.send(Action::SeekTo(0.0))?,
            Char('[') => self.action_tx.send(Action::VolumeDown)?,
            Char(']') => self.action_tx.send(Action::VolumeUp)?,
            Char('m') => self.action_tx.send(Action::ToggleMute)?,
            Char('f') => self.action_tx.send(Action::ToggleFavorite)?,
            KeyCode::Tab => self.action_tx.send(Action::NextTab)?,
            Char(c) if c.is_ascii_digit() => {
                if let Some(tab) = c.to_digit(10).and_then(Tab::from_number) {
                    self.action_tx.send(Action::SelectTab(tab))?;
                }
            }
            _ => {
                if self.tab_bar.active() == Tab::Favorites {
                    self.favorites_list.handle_key_event(key)?;
                }
            }
        }
        Ok(())
    }
}
