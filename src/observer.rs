//! Progress and diagnostic reporting.
//!
//! Reading, writing and transforming songs never print. They report
//! [`Event`]s to an [`Observer`] supplied by the caller instead.

use std::fmt;

use crate::song::Format;

/// The fixed-size field a truncated read fell short on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Metadata,
    Cell {
        pattern: usize,
        row: usize,
        channel: usize,
    },
    SequenceTable,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event<'a> {
    /// Header and metadata have been decoded.
    Loading {
        format: Format,
        octave: u8,
        volume: u8,
        sequence_length: u16,
    },

    /// A field was shorter than its fixed size and has been zero-padded.
    Truncated {
        field: Field,
        expected: usize,
        available: usize,
    },

    /// `sequence_length` exceeded the table and was replaced.
    SequenceLengthClamped { found: u16, clamped: u16 },

    /// The whole song has been read.
    Loaded {
        format: Format,
        patterns: usize,
        sequence: &'a [u8],
    },

    /// The whole song has been serialized.
    Written {
        format: Format,
        patterns: usize,
        bytes: usize,
    },

    /// Empty patterns were appended during migration.
    PatternsAppended { count: usize },

    /// A pattern received its authored content.
    PatternPatched {
        pattern: usize,
        description: &'a str,
        applied: usize,
        skipped: usize,
    },

    /// The authored playback order replaced the head of the sequence table.
    SequenceRewritten { sequence: &'a [u8] },
}

impl Event<'_> {
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::Truncated { .. } | Event::SequenceLengthClamped { .. }
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::Metadata => write!(f, "metadata"),
            Field::Cell {
                pattern,
                row,
                channel,
            } => write!(f, "cell at pattern {pattern}, row {row}, channel {channel}"),
            Field::SequenceTable => write!(f, "sequence table"),
        }
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::Loading {
                format,
                octave,
                volume,
                sequence_length,
            } => write!(
                f,
                "{format}: octave={octave}, volume={volume}, sequence length={sequence_length}"
            ),
            Event::Truncated {
                field,
                expected,
                available,
            } => write!(
                f,
                "Incomplete {field}: {available} of {expected} bytes, padding with zeros"
            ),
            Event::SequenceLengthClamped { found, clamped } => write!(
                f,
                "Sequence length {found} exceeds the table, capping at {clamped}"
            ),
            Event::Loaded {
                format,
                patterns,
                sequence,
            } => write!(f, "Read {format}: {patterns} patterns, sequence {sequence:?}"),
            Event::Written {
                format,
                patterns,
                bytes,
            } => write!(f, "Wrote {format}: {patterns} patterns, {bytes} bytes"),
            Event::PatternsAppended { count } => write!(f, "Appended {count} empty patterns"),
            Event::PatternPatched {
                pattern,
                description,
                applied,
                skipped,
            } => {
                write!(f, "Pattern {pattern}: {description} ({applied} cells")?;
                if *skipped > 0 {
                    write!(f, ", {skipped} guarded cells left alone")?;
                }
                write!(f, ")")
            }
            Event::SequenceRewritten { sequence } => {
                write!(f, "Sequence expanded to {} steps: {sequence:?}", sequence.len())
            }
        }
    }
}

/// A sink for [`Event`]s.
pub trait Observer {
    fn notify(&mut self, event: &Event);
}

impl<F> Observer for F
where
    F: FnMut(&Event),
{
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}

/// Forwards events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn notify(&mut self, event: &Event) {
        match event {
            Event::PatternPatched { .. } => log::debug!("{}", event),
            event if event.is_warning() => log::warn!("{}", event),
            event => log::info!("{}", event),
        }
    }
}

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl Observer for Discard {
    fn notify(&mut self, _event: &Event) {}
}
