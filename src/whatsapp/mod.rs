//! WhatsApp Cloud API button-flow toolkit
//!
//! Payload builders, webhook parsing, state routing and a sample handler.
//! Nothing in here performs network I/O.

pub mod catalog;
pub mod handler;
pub mod payload;
pub mod routing;
pub mod session;
pub mod webhook;
