//! Interactive shape drawing and editing on a map surface.
//!
//! [`sketch`] holds the engine: shapes, vertex handles and the factory that
//! keeps a single shape active. [`host`] runs it inside a Bevy app.

pub mod config;
pub mod constants;
pub mod host;
pub mod paths;
pub mod sketch;
