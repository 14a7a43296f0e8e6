use arrayvec::ArrayVec;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Read, Write};

use crate::cell::PatternCell;
use crate::consts::*;
use crate::observer::{Event, Field, Observer};

/// Possible errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not a valid {expected} file (found tag \"{}\")", .found.escape_ascii())]
    InvalidTag { expected: Format, found: [u8; TAG_LENGTH] },

    #[error("{format} requires {} patterns, song has {found}", .format.pattern_count())]
    PatternCount { format: Format, found: usize },

    #[error("I/O error")]
    Io(#[from] io::Error),
}

/// The two revisions of the file layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Format {
    /// 16 patterns of 4-byte cells.
    Rpt1,
    /// 32 patterns of 5-byte cells.
    Rpt2,
}

impl Format {
    pub fn tag(self) -> &'static [u8; TAG_LENGTH] {
        match self {
            Format::Rpt1 => b"RPT1",
            Format::Rpt2 => b"RPT2",
        }
    }

    pub fn pattern_count(self) -> usize {
        match self {
            Format::Rpt1 => RPT1_PATTERNS,
            Format::Rpt2 => RPT2_PATTERNS,
        }
    }

    pub fn cell_length(self) -> usize {
        match self {
            Format::Rpt1 => RPT1_CELL_LENGTH,
            Format::Rpt2 => RPT2_CELL_LENGTH,
        }
    }

    /// Nominal size of a complete file.
    pub fn file_length(self) -> usize {
        match self {
            Format::Rpt1 => RPT1_LENGTH,
            Format::Rpt2 => RPT2_LENGTH,
        }
    }

    fn decode_cell(self, bytes: &[u8]) -> PatternCell {
        match self {
            Format::Rpt1 => PatternCell::decode_v1(bytes),
            Format::Rpt2 => PatternCell::decode_v2(bytes),
        }
    }

    fn write_cell<W: Write>(self, writer: &mut W, cell: &PatternCell) -> io::Result<()> {
        match self {
            Format::Rpt1 => writer.write_all(&cell.encode_v1()),
            Format::Rpt2 => writer.write_all(&cell.encode_v2()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Format::Rpt1 => "RPT1",
            Format::Rpt2 => "RPT2",
        })
    }
}

/// A grid of 32 rows by 9 channels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pattern {
    pub(crate) rows: [[PatternCell; CHANNELS]; ROWS],
}

/// A `Song` holds the player settings, up to 32 `Pattern`s and the
/// 256-entry sequence table. Only the first `sequence_length` entries of the
/// table are played, but all of them are persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Song {
    pub octave: u8,
    pub volume: u8,
    pub sequence_length: u16,
    pub(crate) patterns: ArrayVec<Pattern, MAX_PATTERNS>,
    pub sequence: [u8; SEQUENCE_TABLE_LENGTH],
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern {
            rows: [[PatternCell::EMPTY; CHANNELS]; ROWS],
        }
    }
}

impl Pattern {
    pub fn cell(&self, row: usize, channel: usize) -> Option<&PatternCell> {
        self.rows.get(row)?.get(channel)
    }

    pub fn cell_mut(&mut self, row: usize, channel: usize) -> Option<&mut PatternCell> {
        self.rows.get_mut(row)?.get_mut(channel)
    }

    /// Cells in file order: row-major, channel-minor.
    pub fn cells(&self) -> impl Iterator<Item = &PatternCell> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.cells().all(PatternCell::is_empty)
    }
}

impl Default for Song {
    fn default() -> Self {
        let mut patterns = ArrayVec::new();
        for _ in 0..RPT2_PATTERNS {
            patterns.push(Pattern::default());
        }

        Song {
            octave: 3,
            volume: 63,
            sequence_length: 1,
            patterns,
            sequence: [0; SEQUENCE_TABLE_LENGTH],
        }
    }
}

/// Fill `buf` from `reader` until it is full or the stream ends. Returns the
/// number of bytes read; the remainder of `buf` is left zeroed.
fn read_padded<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    buf[filled..].fill(0);

    Ok(filled)
}

fn check_truncated<O>(observer: &mut O, field: Field, expected: usize, available: usize)
where
    O: Observer + ?Sized,
{
    if available < expected {
        observer.notify(&Event::Truncated {
            field,
            expected,
            available,
        });
    }
}

impl Song {
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    pub fn pattern_mut(&mut self, index: usize) -> Option<&mut Pattern> {
        self.patterns.get_mut(index)
    }

    /// The part of the sequence table that is played.
    pub fn playback_order(&self) -> &[u8] {
        let len = usize::from(self.sequence_length).min(SEQUENCE_TABLE_LENGTH);

        &self.sequence[..len]
    }

    /// Append empty patterns until the song holds `count` of them.
    pub(crate) fn pad_patterns(&mut self, count: usize) -> usize {
        let count = count.min(MAX_PATTERNS);
        let mut added = 0;
        while self.patterns.len() < count {
            self.patterns.push(Pattern::default());
            added += 1;
        }

        added
    }

    /// Decode a song in the given `format` from `reader`.
    ///
    /// Fields cut short by the end of the stream are zero-padded and
    /// reported to `observer`; only a mismatched magic tag is an error.
    pub fn read_from<R, O>(reader: &mut R, format: Format, observer: &mut O) -> Result<Song, Error>
    where
        R: Read,
        O: Observer + ?Sized,
    {
        let mut tag = [0; TAG_LENGTH];
        read_padded(reader, &mut tag)?;
        if &tag != format.tag() {
            return Err(Error::InvalidTag {
                expected: format,
                found: tag,
            });
        }

        let mut meta = [0; METADATA_LENGTH];
        let available = read_padded(reader, &mut meta)?;
        check_truncated(observer, Field::Metadata, METADATA_LENGTH, available);
        let mut meta = &meta[..];
        let octave = meta.read_u8()?;
        let volume = meta.read_u8()?;
        let sequence_length = meta.read_u16::<LittleEndian>()?;

        observer.notify(&Event::Loading {
            format,
            octave,
            volume,
            sequence_length,
        });

        let cell_length = format.cell_length();
        let mut buf = [0; RPT2_CELL_LENGTH];
        let mut patterns = ArrayVec::new();
        for p in 0..format.pattern_count() {
            let mut pattern = Pattern::default();
            for (r, row) in pattern.rows.iter_mut().enumerate() {
                for (c, cell) in row.iter_mut().enumerate() {
                    let bytes = &mut buf[..cell_length];
                    let available = read_padded(reader, bytes)?;
                    let field = Field::Cell {
                        pattern: p,
                        row: r,
                        channel: c,
                    };
                    check_truncated(observer, field, cell_length, available);
                    *cell = format.decode_cell(bytes);
                }
            }
            patterns.push(pattern);
        }

        let mut sequence = [0; SEQUENCE_TABLE_LENGTH];
        let available = read_padded(reader, &mut sequence)?;
        check_truncated(observer, Field::SequenceTable, SEQUENCE_TABLE_LENGTH, available);

        let mut song = Song {
            octave,
            volume,
            sequence_length,
            patterns,
            sequence,
        };

        if usize::from(song.sequence_length) > SEQUENCE_TABLE_LENGTH {
            observer.notify(&Event::SequenceLengthClamped {
                found: song.sequence_length,
                clamped: FALLBACK_SEQUENCE_LENGTH,
            });
            song.sequence_length = FALLBACK_SEQUENCE_LENGTH;
        }

        observer.notify(&Event::Loaded {
            format,
            patterns: song.patterns.len(),
            sequence: song.playback_order(),
        });

        Ok(song)
    }

    /// Create a new `Song` from a byte slice.
    ///
    /// ```rust
    /// use rptx::{observer::Discard, Format, Song};
    ///
    /// let data = Song::default().to_vec(Format::Rpt2, &mut Discard).unwrap();
    /// let song = Song::from_slice(&data, Format::Rpt2, &mut Discard).unwrap();
    /// assert_eq!(song.octave, 3);
    /// ```
    pub fn from_slice<O>(mut slice: &[u8], format: Format, observer: &mut O) -> Result<Song, Error>
    where
        O: Observer + ?Sized,
    {
        Song::read_from(&mut slice, format, observer)
    }

    /// Encode the whole song to `writer` in the given `format`.
    ///
    /// The song must hold exactly as many patterns as the format does.
    pub fn write_to<W, O>(&self, writer: &mut W, format: Format, observer: &mut O) -> Result<(), Error>
    where
        W: Write,
        O: Observer + ?Sized,
    {
        if self.patterns.len() != format.pattern_count() {
            return Err(Error::PatternCount {
                format,
                found: self.patterns.len(),
            });
        }

        writer.write_all(format.tag())?;
        writer.write_u8(self.octave)?;
        writer.write_u8(self.volume)?;
        writer.write_u16::<LittleEndian>(self.sequence_length)?;

        for cell in self.patterns.iter().flat_map(|pattern| pattern.cells()) {
            format.write_cell(writer, cell)?;
        }

        writer.write_all(&self.sequence)?;

        observer.notify(&Event::Written {
            format,
            patterns: self.patterns.len(),
            bytes: format.file_length(),
        });

        Ok(())
    }

    /// Encode the whole song into a new buffer.
    pub fn to_vec<O>(&self, format: Format, observer: &mut O) -> Result<Vec<u8>, Error>
    where
        O: Observer + ?Sized,
    {
        let mut data = Vec::with_capacity(format.file_length());
        self.write_to(&mut data, format, observer)?;

        Ok(data)
    }
}
