pub const ROWS: usize = 32;
pub const CHANNELS: usize = 9;
pub const CELLS_PER_PATTERN: usize = ROWS * CHANNELS;

pub const RPT1_PATTERNS: usize = 16;
pub const RPT2_PATTERNS: usize = 32;
pub const MAX_PATTERNS: usize = RPT2_PATTERNS;

pub const RPT1_CELL_LENGTH: usize = 4;
pub const RPT2_CELL_LENGTH: usize = 5;

pub const TAG_LENGTH: usize = 4;
pub const METADATA_LENGTH: usize = 4;
pub const HEADER_LENGTH: usize = TAG_LENGTH + METADATA_LENGTH;
pub const SEQUENCE_TABLE_LENGTH: usize = 256;

pub const RPT1_LENGTH: usize =
    HEADER_LENGTH + RPT1_PATTERNS * CELLS_PER_PATTERN * RPT1_CELL_LENGTH + SEQUENCE_TABLE_LENGTH;
pub const RPT2_LENGTH: usize =
    HEADER_LENGTH + RPT2_PATTERNS * CELLS_PER_PATTERN * RPT2_CELL_LENGTH + SEQUENCE_TABLE_LENGTH;

/// Sequence length substituted when a file claims more entries than the
/// table holds. Existing songs rely on this value.
pub const FALLBACK_SEQUENCE_LENGTH: u16 = 64;

pub const NOTE_EMPTY: u8 = 0;
pub const NOTE_OFF: u8 = 255;
