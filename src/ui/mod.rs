//! Terminal UI: hot-seat game view with explosion replay and a turn timer.

mod app;
pub mod board_widget;
mod game_view;

pub use app::App;
