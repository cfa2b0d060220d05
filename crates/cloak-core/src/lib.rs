#![allow(clippy::missing_const_for_fn)]

pub mod delegates;
pub mod descriptor;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod handler;
pub mod label;
pub mod license;
pub mod rights;
pub mod types;
pub mod watermark;

pub mod stream {
    pub mod buffer;

    mod traits;
    pub use traits::{EditableStream, Stream};
}

pub use error::{Result, SdkError};
