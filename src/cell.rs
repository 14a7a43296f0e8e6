use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

use crate::consts::*;

/// One channel's event within one row of a pattern.
///
/// `note` is 0 for an empty cell, 255 for note-off and 12-119 for a pitch.
/// `volume` ranges over 0-63. The effect word is stored little-endian in
/// RPT2 files; RPT1 files only carry its low byte.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct PatternCell {
    pub note: u8,
    pub instrument: u8,
    pub volume: u8,
    pub effect: u16,
}

/// Effect command, selected by the top nibble of the effect word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EffectKind {
    Arpeggio,
    Portamento,
    VolumeSlide,
    Vibrato,
    NoteCut,
    NoteDelay,
    Retrigger,
    Tremolo,
}

impl EffectKind {
    pub fn from_effect(effect: u16) -> Option<EffectKind> {
        Some(match effect >> 12 {
            0x1 => EffectKind::Arpeggio,
            0x2 => EffectKind::Portamento,
            0x3 => EffectKind::VolumeSlide,
            0x4 => EffectKind::Vibrato,
            0x5 => EffectKind::NoteCut,
            0x6 => EffectKind::NoteDelay,
            0x7 => EffectKind::Retrigger,
            0x8 => EffectKind::Tremolo,
            _ => return None,
        })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EffectKind::Arpeggio => "arpeggio",
            EffectKind::Portamento => "portamento",
            EffectKind::VolumeSlide => "volume slide",
            EffectKind::Vibrato => "vibrato",
            EffectKind::NoteCut => "note cut",
            EffectKind::NoteDelay => "note delay",
            EffectKind::Retrigger => "retrigger",
            EffectKind::Tremolo => "tremolo",
        };

        f.write_str(name)
    }
}

/// Copy up to `N` bytes, leaving the missing tail zeroed.
fn padded<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut buf = [0; N];
    let len = bytes.len().min(N);
    buf[..len].copy_from_slice(&bytes[..len]);

    buf
}

impl PatternCell {
    pub const EMPTY: PatternCell = PatternCell::new(NOTE_EMPTY, 0, 0, 0);

    pub const fn new(note: u8, instrument: u8, volume: u8, effect: u16) -> Self {
        PatternCell {
            note,
            instrument,
            volume,
            effect,
        }
    }

    /// Decode a 4-byte RPT1 cell. Missing bytes read as zero.
    pub fn decode_v1(bytes: &[u8]) -> Self {
        let [note, instrument, volume, effect] = padded::<RPT1_CELL_LENGTH>(bytes);

        PatternCell::new(note, instrument, volume, u16::from(effect))
    }

    /// Encode as a 4-byte RPT1 cell. The effect high byte is dropped.
    pub fn encode_v1(&self) -> [u8; RPT1_CELL_LENGTH] {
        [self.note, self.instrument, self.volume, self.effect as u8]
    }

    /// Decode a 5-byte RPT2 cell. Missing bytes read as zero.
    pub fn decode_v2(bytes: &[u8]) -> Self {
        let buf = padded::<RPT2_CELL_LENGTH>(bytes);
        let effect = LittleEndian::read_u16(&buf[3..5]);

        PatternCell::new(buf[0], buf[1], buf[2], effect)
    }

    /// Encode as a 5-byte RPT2 cell.
    pub fn encode_v2(&self) -> [u8; RPT2_CELL_LENGTH] {
        let mut buf = [self.note, self.instrument, self.volume, 0, 0];
        LittleEndian::write_u16(&mut buf[3..5], self.effect);

        buf
    }

    pub fn is_empty(&self) -> bool {
        *self == PatternCell::EMPTY
    }

    /// `true` when the note is a pitch, neither empty nor note-off.
    pub fn has_pitch(&self) -> bool {
        self.note > NOTE_EMPTY && self.note < NOTE_OFF
    }

    pub fn effect_kind(&self) -> Option<EffectKind> {
        EffectKind::from_effect(self.effect)
    }
}
