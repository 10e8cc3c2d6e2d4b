// Library root: re-exports all modules so integration tests can `use skyplayer::*`.

pub mod action;
pub mod app;
pub mod components;
pub mod config;
pub mod db;
pub mod favorites;
pub mod logging;
pub mod player;
pub mod sky;
pub mod theme;
pub mod tui;
pub mod ui;
