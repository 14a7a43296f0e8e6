//! Reading, writing and transforming RPTx tracker songs.
//!
//! An RPTx file holds an 8-byte header (magic tag, octave, volume and
//! sequence length), a fixed number of 32 x 9 patterns and a 256-entry
//! sequence table. [`Format::Rpt1`] stores 16 patterns of 4-byte cells,
//! [`Format::Rpt2`] stores 32 patterns of 5-byte cells.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod consts;
pub mod enhance;
pub mod migrate;
pub mod observer;

mod cell;
mod song;

pub use cell::{EffectKind, PatternCell};
pub use enhance::enhance;
pub use migrate::migrate;
pub use observer::{Event, LogObserver, Observer};
pub use song::{Error, Format, Pattern, Song};
