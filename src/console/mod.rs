//! Terminal front end
//!
//! Hosts a [`Dashboard`](crate::Dashboard) in a terminal. Mounting the app
//! activates the dashboard, quitting unmounts it.

mod app;
mod ui;

pub use app::App;
