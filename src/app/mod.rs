//! Presentation-layer state for the client app.

pub mod create;
pub mod session_file;

pub use create::{Alert, CreateForm, CreateScreen};
