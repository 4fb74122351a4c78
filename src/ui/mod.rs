//! Terminal UI: a keyboard front-end that registers seats with a session,
//! forwards column choices and renders board snapshots.

mod app;
mod game_view;

pub use app::App;
