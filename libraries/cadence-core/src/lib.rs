//! Cadence Core
//!
//! Platform-agnostic core types, traits, and error handling for Cadence.
//!
//! This crate provides the foundational building blocks shared by the
//! playback engine, the persistence layer and the audio engine adapter.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `SongId`, `PlayEvent`
//! - **Core Traits**: `PlayReporter` (listening history collaborator)
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Song, SongId};
//!
//! let song = Song::new(7, "Blue in Green", "Miles Davis", "5:37", "https://cdn.example/7.mp3");
//! assert_eq!(song.id, SongId::new(7));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use traits::PlayReporter;
pub use types::{PlayEvent, Song, SongId};
