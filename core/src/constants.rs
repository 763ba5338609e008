

/// Magic number for a serialized record blob.
/// "ISR1" = Image Seal Record v1
pub const MAGIC_RECORD: [u8; 4] = *b"ISR1";
pub const RECORD_VERSION: u8 = 1;

/// Magic number for the archive container.
/// "ISA1" = Image Seal Archive v1
pub const MAGIC_ARCHIVE: [u8; 4] = *b"ISA1";
pub const ARCHIVE_VERSION: u8 = 1;

/// AES block size, also the IV width at the front of every envelope.
pub const BLOCK_LEN: usize = 16;
pub const IV_LEN: usize = BLOCK_LEN;

/// Accepted key sizes (AES-128, AES-192, AES-256).
pub const KEY_LENGTHS: &[usize] = &[16, 24, 32];

/// Member names are length-prefixed with a u16.
pub const MAX_MEMBER_NAME_LEN: usize = u16::MAX as usize;

/// Sample type identifiers (one byte on the wire).
pub mod sample_ids {
    pub const U8: u8  = 0x01;
    pub const I8: u8  = 0x02;
    pub const U16: u8 = 0x03;
    pub const I16: u8 = 0x04;
    pub const U32: u8 = 0x05;
    pub const I32: u8 = 0x06;
    pub const F32: u8 = 0x07;
    pub const F64: u8 = 0x08;
}
