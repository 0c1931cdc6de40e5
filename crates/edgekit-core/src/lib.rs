//! # EdgeKit Core
//!
//! Core types, errors and events for EdgeKit.
//! Provides the fundamental abstractions for the job-session lifecycle,
//! error taxonomy, and event notification.

pub mod error;
pub mod event;
pub mod listener;
pub mod session_state;

pub use error::{ChannelError, Error, PayloadError, Result, SessionError, UploadError};
pub use event::{EventDispatcher, SessionEvent};
pub use listener::SessionListener;
pub use session_state::SessionState;
