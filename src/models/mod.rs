//! Data models for demo transcripts and WhatsApp Cloud API payloads

mod cloud;
mod demo;
mod webhook;

pub use cloud::*;
pub use demo::*;
pub use webhook::*;
