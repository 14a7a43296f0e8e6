//! RPT1 to RPT2 conversion.

use std::io::Read;

use crate::consts::*;
use crate::observer::{Event, Observer};
use crate::song::{Error, Format, Song};

/// Grow a song decoded from RPT1 to the RPT2 pattern count.
///
/// Cells are already held in their wide form, so only the missing patterns
/// need to be appended. The sequence table is carried over untouched.
pub fn migrate_song<O>(mut song: Song, observer: &mut O) -> Song
where
    O: Observer + ?Sized,
{
    let count = song.pad_patterns(RPT2_PATTERNS);
    observer.notify(&Event::PatternsAppended { count });

    song
}

/// Convert an RPT1 stream to the bytes of an equivalent RPT2 file.
///
/// Nothing is returned unless the whole input decoded, so callers never
/// produce a partial file.
pub fn migrate<R, O>(input: &mut R, observer: &mut O) -> Result<Vec<u8>, Error>
where
    R: Read,
    O: Observer + ?Sized,
{
    let song = Song::read_from(input, Format::Rpt1, observer)?;
    let song = migrate_song(song, observer);

    song.to_vec(Format::Rpt2, observer)
}
