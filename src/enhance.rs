//! Demo content generator.
//!
//! Overwrites a handful of patterns with authored bass lines, melodies and
//! effect showcases, then replaces the head of the sequence table so that
//! every showcase pattern gets played.

use crate::cell::PatternCell;
use crate::observer::{Event, Observer};
use crate::song::{Pattern, Song};

/// A single edit to a pattern.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Patch {
    /// Replace the whole cell.
    Cell {
        row: usize,
        channel: usize,
        cell: PatternCell,
    },

    /// Replace only the effect word, keeping note, instrument and volume.
    Effect {
        row: usize,
        channel: usize,
        effect: u16,
    },

    /// Replace the effect word at `(row, channel)` only when the note at
    /// `(guard_row, guard_channel)` is a pitch.
    Guarded {
        guard_row: usize,
        guard_channel: usize,
        row: usize,
        channel: usize,
        effect: u16,
    },
}

/// Authored content for one pattern.
#[derive(Clone, Copy, Debug)]
pub struct PatternPatch {
    pub pattern: usize,
    pub description: &'static str,
    pub patches: &'static [Patch],
}

// Notes are MIDI numbers, C-4 = 60
const C2: u8 = 36;
const F2: u8 = 41;
const G2: u8 = 43;
const AS2: u8 = 46;
const C3: u8 = 48;
const G3: u8 = 55;
const C4: u8 = 60;
const E4: u8 = 64;
const G4: u8 = 67;
const C5: u8 = 72;
const D5: u8 = 74;
const E5: u8 = 76;
const F5: u8 = 77;
const FS5: u8 = 78;
const G5: u8 = 79;
const A5: u8 = 81;

const ARP_MAJOR: u16 = 0x12C3;
const PORTA_UP: u16 = 0x2046;
const VIBRATO: u16 = 0x4420;
const TREMOLO: u16 = 0x8440;
const NOTE_DELAY: u16 = 0x6030;
const FADE_IN: u16 = 0x3020;

const BASS: u8 = 32;
const LEAD: u8 = 72;
const PAD: u8 = 80;

const fn cell(row: usize, channel: usize, note: u8, instrument: u8, volume: u8, effect: u16) -> Patch {
    Patch::Cell {
        row,
        channel,
        cell: PatternCell::new(note, instrument, volume, effect),
    }
}

const fn effect(row: usize, channel: usize, effect: u16) -> Patch {
    Patch::Effect {
        row,
        channel,
        effect,
    }
}

const fn guarded(guard_row: usize, guard_channel: usize, row: usize, channel: usize, effect: u16) -> Patch {
    Patch::Guarded {
        guard_row,
        guard_channel,
        row,
        channel,
        effect,
    }
}

pub static PATTERN_PATCHES: &[PatternPatch] = &[
    PatternPatch {
        pattern: 1,
        description: "arpeggios and volume slides",
        patches: &[
            guarded(0, 0, 0, 0, ARP_MAJOR),
            guarded(0, 1, 2, 1, 0x3130),
            guarded(8, 0, 8, 0, ARP_MAJOR),
            guarded(8, 1, 10, 1, 0x3130),
            guarded(16, 0, 16, 0, ARP_MAJOR),
            guarded(16, 1, 18, 1, 0x3130),
            guarded(24, 0, 24, 0, ARP_MAJOR),
            guarded(24, 1, 26, 1, 0x3130),
        ],
    },
    PatternPatch {
        pattern: 2,
        description: "bass line with portamento on CH6",
        patches: &[
            cell(0, 6, C2, BASS, 63, 0),
            effect(4, 6, PORTA_UP),
            cell(8, 6, G2, BASS, 63, 0),
            effect(12, 6, PORTA_UP),
            cell(16, 6, AS2, BASS, 63, 0),
            effect(20, 6, PORTA_UP),
            cell(24, 6, F2, BASS, 63, 0),
        ],
    },
    PatternPatch {
        pattern: 3,
        description: "lead melody with vibrato on CH7",
        patches: &[
            cell(0, 7, C5, LEAD, 50, VIBRATO),
            cell(4, 7, E5, LEAD, 50, VIBRATO),
            cell(8, 7, G5, LEAD, 50, VIBRATO),
            cell(12, 7, E5, LEAD, 50, VIBRATO),
            cell(16, 7, D5, LEAD, 50, VIBRATO),
            cell(20, 7, F5, LEAD, 50, VIBRATO),
            cell(24, 7, A5, LEAD, 50, VIBRATO),
            cell(28, 7, G5, LEAD, 50, VIBRATO),
        ],
    },
    PatternPatch {
        pattern: 4,
        description: "rhythmic stabs with note cuts on CH8",
        patches: &[
            cell(0, 8, C4, PAD, 63, 0x5003),
            cell(4, 8, C4, PAD, 63, 0x5003),
            cell(8, 8, C4, PAD, 63, 0x5003),
            cell(10, 8, C4, PAD, 63, 0x5003),
            cell(16, 8, C4, PAD, 63, 0x5003),
            cell(20, 8, C4, PAD, 63, 0x5003),
            cell(24, 8, C4, PAD, 63, 0x5003),
            cell(28, 8, C4, PAD, 63, 0x5003),
        ],
    },
    PatternPatch {
        pattern: 5,
        description: "arpeggio style showcase",
        patches: &[
            cell(0, 6, C3, 0, 63, 0x10C3),  // up
            cell(4, 6, C3, 0, 63, 0x11C3),  // down
            cell(8, 6, C3, 0, 63, 0x12C3),  // major
            cell(12, 6, C3, 0, 63, 0x13C3), // minor
            cell(16, 6, C3, 0, 63, 0x14C3), // maj7
            cell(20, 6, C3, 0, 63, 0x15C3), // min7
            cell(24, 6, C3, 0, 63, 0x1AC3), // power
            cell(28, 6, C3, 0, 63, 0x1DC3), // octave
        ],
    },
    PatternPatch {
        pattern: 6,
        description: "tremolo and vibrato combo",
        patches: &[
            cell(0, 7, C5, 9, 63, VIBRATO),
            effect(2, 7, TREMOLO),
            cell(8, 7, G5, 9, 63, VIBRATO),
            effect(10, 7, TREMOLO),
            cell(16, 7, E5, 9, 63, VIBRATO),
            effect(18, 7, TREMOLO),
            cell(24, 7, C5, 9, 63, VIBRATO),
            effect(26, 7, TREMOLO),
        ],
    },
    PatternPatch {
        pattern: 7,
        description: "retrigger effects",
        patches: &[
            cell(0, 8, C4, 96, 63, 0x7003),
            cell(8, 8, E4, 96, 63, 0x7001),
            cell(16, 8, G4, 96, 63, 0x7006),
            cell(24, 8, C5, 96, 63, 0x7002),
        ],
    },
    PatternPatch {
        pattern: 8,
        description: "complex chord progression",
        patches: &[
            cell(0, 6, C2, BASS, 63, PORTA_UP),
            cell(8, 6, F2, BASS, 63, PORTA_UP),
            cell(16, 6, G2, BASS, 63, PORTA_UP),
            cell(24, 6, AS2, BASS, 63, 0),
            cell(0, 7, C5, LEAD, 50, VIBRATO),
            cell(8, 7, D5, LEAD, 50, VIBRATO),
            cell(16, 7, E5, LEAD, 50, VIBRATO),
            cell(24, 7, FS5, LEAD, 50, VIBRATO),
            cell(0, 8, C4, PAD, 40, TREMOLO),
            cell(16, 8, C4, PAD, 40, TREMOLO),
        ],
    },
    PatternPatch {
        pattern: 9,
        description: "breakdown with note delays",
        patches: &[
            cell(0, 6, C2, BASS, 63, 0),
            effect(0, 7, NOTE_DELAY),
            cell(4, 6, G2, BASS, 50, 0),
            cell(8, 6, C2, BASS, 63, 0),
            effect(8, 7, NOTE_DELAY),
            cell(12, 6, G2, BASS, 50, 0),
            cell(16, 6, C2, BASS, 63, 0),
            effect(16, 7, NOTE_DELAY),
            cell(20, 6, G2, BASS, 50, 0),
            cell(24, 6, C2, BASS, 63, 0),
            effect(24, 7, NOTE_DELAY),
            cell(28, 6, G2, BASS, 50, 0),
        ],
    },
    PatternPatch {
        pattern: 10,
        description: "build-up with volume slides",
        patches: &[
            cell(0, 6, C3, PAD, 10, FADE_IN),
            cell(16, 6, G3, PAD, 10, FADE_IN),
            cell(0, 7, C4, PAD, 10, FADE_IN),
            cell(16, 7, G4, PAD, 10, FADE_IN),
            cell(0, 8, C5, PAD, 10, FADE_IN),
            cell(16, 8, G5, PAD, 10, FADE_IN),
        ],
    },
];

/// Playback order written over the head of the sequence table.
pub const SEQUENCE: [u8; 16] = [0, 1, 2, 3, 2, 3, 4, 5, 6, 7, 8, 9, 10, 1, 8, 0];

impl Patch {
    /// Apply to `pattern`, returning `false` when the edit did not happen
    /// because its guard failed or its coordinates are out of range.
    pub fn apply(&self, pattern: &mut Pattern) -> bool {
        match *self {
            Patch::Cell { row, channel, cell } => pattern
                .cell_mut(row, channel)
                .map(|target| *target = cell)
                .is_some(),
            Patch::Effect {
                row,
                channel,
                effect,
            } => pattern
                .cell_mut(row, channel)
                .map(|target| target.effect = effect)
                .is_some(),
            Patch::Guarded {
                guard_row,
                guard_channel,
                row,
                channel,
                effect,
            } => {
                let pitched = pattern
                    .cell(guard_row, guard_channel)
                    .is_some_and(PatternCell::has_pitch);
                if !pitched {
                    return false;
                }

                pattern
                    .cell_mut(row, channel)
                    .map(|target| target.effect = effect)
                    .is_some()
            }
        }
    }
}

/// Apply the authored content to `song`.
///
/// Patterns missing from the song are skipped. Running this twice gives the
/// same result unless pattern 1 changed in between, since its arpeggios and
/// volume slides depend on the notes already present.
pub fn enhance<O>(mut song: Song, observer: &mut O) -> Song
where
    O: Observer + ?Sized,
{
    for entry in PATTERN_PATCHES {
        let pattern = match song.pattern_mut(entry.pattern) {
            Some(pattern) => pattern,
            None => continue,
        };

        let applied = entry
            .patches
            .iter()
            .filter(|patch| patch.apply(pattern))
            .count();

        observer.notify(&Event::PatternPatched {
            pattern: entry.pattern,
            description: entry.description,
            applied,
            skipped: entry.patches.len() - applied,
        });
    }

    song.sequence[..SEQUENCE.len()].copy_from_slice(&SEQUENCE);
    song.sequence_length = SEQUENCE.len() as u16;
    observer.notify(&Event::SequenceRewritten {
        sequence: song.playback_order(),
    });

    song
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::EffectKind;
    use crate::consts::*;
    use crate::observer::Discard;
    use crate::song::Format;

    fn pitched_pattern_1() -> Song {
        let mut song = Song::default();
        let pattern = song.pattern_mut(1).unwrap();
        for row in (0..ROWS).step_by(8) {
            *pattern.cell_mut(row, 0).unwrap() = PatternCell::new(C4, 1, 63, 0);
            *pattern.cell_mut(row, 1).unwrap() = PatternCell::new(E4, 1, 63, 0);
        }
        song
    }

    #[test]
    fn table_covers_patterns_1_to_10() {
        let patterns: Vec<usize> = PATTERN_PATCHES.iter().map(|entry| entry.pattern).collect();

        assert_eq!(patterns, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn table_coordinates_are_in_range() {
        for patch in PATTERN_PATCHES.iter().flat_map(|entry| entry.patches) {
            let (row, channel) = match *patch {
                Patch::Cell { row, channel, .. }
                | Patch::Effect { row, channel, .. }
                | Patch::Guarded { row, channel, .. } => (row, channel),
            };
            assert!(row < ROWS && channel < CHANNELS, "{:?}", patch);
        }
    }

    #[test]
    fn table_effects_are_known() {
        for patch in PATTERN_PATCHES.iter().flat_map(|entry| entry.patches) {
            let effect = match *patch {
                Patch::Cell { cell, .. } => cell.effect,
                Patch::Effect { effect, .. } | Patch::Guarded { effect, .. } => effect,
            };
            assert!(
                effect == 0 || EffectKind::from_effect(effect).is_some(),
                "{:?}",
                patch
            );
        }
    }

    #[test]
    fn rewrites_sequence() {
        let mut song = Song::default();
        song.sequence[20] = 9;
        song.sequence_length = 200;

        let song = enhance(song, &mut Discard);

        assert_eq!(song.sequence_length, 16);
        assert_eq!(song.playback_order(), &[0, 1, 2, 3, 2, 3, 4, 5, 6, 7, 8, 9, 10, 1, 8, 0]);
        assert_eq!(song.sequence[20], 9);
    }

    #[test]
    fn pattern_1_guards_on_existing_notes() {
        let song = enhance(pitched_pattern_1(), &mut Discard);
        let pattern = song.pattern(1).unwrap();

        for row in (0..ROWS).step_by(8) {
            assert_eq!(pattern.cell(row, 0).unwrap().effect, 0x12C3);
            assert_eq!(pattern.cell(row + 2, 1).unwrap().effect, 0x3130);
            assert_eq!(pattern.cell(row, 1).unwrap().effect, 0);
        }
    }

    #[test]
    fn pattern_1_leaves_empty_and_note_off_alone() {
        let mut song = pitched_pattern_1();
        let pattern = song.pattern_mut(1).unwrap();
        pattern.cell_mut(8, 0).unwrap().note = NOTE_OFF;
        pattern.cell_mut(16, 1).unwrap().note = NOTE_EMPTY;

        let mut skipped = None;
        let song = enhance(song, &mut |event: &Event| {
            if let Event::PatternPatched {
                pattern: 1,
                skipped: s,
                ..
            } = event
            {
                skipped = Some(*s);
            }
        });
        let pattern = song.pattern(1).unwrap();

        assert_eq!(pattern.cell(8, 0).unwrap().effect, 0);
        assert_eq!(pattern.cell(18, 1).unwrap().effect, 0);
        assert_eq!(pattern.cell(0, 0).unwrap().effect, 0x12C3);
        assert_eq!(skipped, Some(2));
    }

    #[test]
    fn effect_patches_keep_notes() {
        let mut song = Song::default();
        *song.pattern_mut(6).unwrap().cell_mut(2, 7).unwrap() = PatternCell::new(G5, 4, 20, 0x1111);

        let song = enhance(song, &mut Discard);

        assert_eq!(
            song.pattern(6).unwrap().cell(2, 7),
            Some(&PatternCell::new(G5, 4, 20, 0x8440))
        );
    }

    #[test]
    fn authored_cells() {
        let song = enhance(Song::default(), &mut Discard);
        let cell = |p: usize, r: usize, c: usize| *song.pattern(p).unwrap().cell(r, c).unwrap();

        assert_eq!(cell(2, 16, 6), PatternCell::new(46, 32, 63, 0));
        assert_eq!(cell(2, 20, 6), PatternCell::new(0, 0, 0, 0x2046));
        assert_eq!(cell(2, 28, 6), PatternCell::EMPTY);
        assert_eq!(cell(3, 24, 7), PatternCell::new(81, 72, 50, 0x4420));
        assert_eq!(cell(4, 10, 8), PatternCell::new(60, 80, 63, 0x5003));
        assert_eq!(cell(5, 28, 6), PatternCell::new(48, 0, 63, 0x1DC3));
        assert_eq!(cell(7, 16, 8), PatternCell::new(67, 96, 63, 0x7006));
        assert_eq!(cell(8, 24, 6), PatternCell::new(46, 32, 63, 0));
        assert_eq!(cell(8, 24, 7), PatternCell::new(78, 72, 50, 0x4420));
        assert_eq!(cell(8, 16, 8), PatternCell::new(60, 80, 40, 0x8440));
        assert_eq!(cell(9, 12, 6), PatternCell::new(43, 32, 50, 0));
        assert_eq!(cell(9, 24, 7), PatternCell::new(0, 0, 0, 0x6030));
        assert_eq!(cell(10, 16, 8), PatternCell::new(79, 80, 10, 0x3020));
        assert_eq!(cell(10, 0, 7), PatternCell::new(60, 80, 10, 0x3020));

        // Untouched patterns
        assert!(song.pattern(0).unwrap().is_empty());
        assert!(song.pattern(1).unwrap().is_empty());
        assert!(song.pattern(11).unwrap().is_empty());
    }

    #[test]
    fn deterministic() {
        let input = pitched_pattern_1();

        let first = enhance(input.clone(), &mut Discard)
            .to_vec(Format::Rpt2, &mut Discard)
            .unwrap();
        let second = enhance(input, &mut Discard)
            .to_vec(Format::Rpt2, &mut Discard)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), RPT2_LENGTH);
    }

    #[test]
    fn skips_missing_patterns() {
        let mut data = b"RPT1\x03\x3f\x01\x00".to_vec();
        data.resize(RPT1_LENGTH, 0);
        let mut song = Song::from_slice(&data, Format::Rpt1, &mut Discard).unwrap();
        song.patterns.truncate(5);

        let mut patched = Vec::new();
        let song = enhance(song, &mut |event: &Event| {
            if let Event::PatternPatched { pattern, .. } = event {
                patched.push(*pattern);
            }
        });

        assert_eq!(patched, [1, 2, 3, 4]);
        assert_eq!(song.patterns().len(), 5);
        assert_eq!(song.sequence_length, 16);
    }
}
