//! TUI module for the chat-demo player
//!
//! Terminal user interface using Ratatui.

mod app;
mod chat;
mod log_capture;
mod ui;

pub use app::run;
pub use log_capture::LogTail;
