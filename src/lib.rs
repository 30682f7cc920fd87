//! Exports a URL as a QR Code image file.
//!
//! Arguments are split by a small schema-driven parser, anything missing is
//! asked for on the terminal, and the output path is normalized to one of the
//! supported image formats before the code is rendered.

pub mod args;
pub mod error;
pub mod export;
pub mod output;
pub mod prompt;
pub mod run;

pub use error::{Error, Result};
pub use run::run;
