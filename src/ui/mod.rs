//! Ratatui front-end for the roster. The UI holds no query logic of its own:
//! every key press maps onto one engine operation and every frame renders the
//! engine's current derived view.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
