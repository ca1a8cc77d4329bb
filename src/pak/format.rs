#![forbid(unsafe_code)]

/// Marker at offset 0 of every file whose body came out of the compressor:
/// "Pak" followed by ESC.
pub const SIGNATURE: [u8; 4] = *b"Pak\x1b";

/// True when `bytes` starts with the pak signature.
pub fn is_packed(bytes: &[u8]) -> bool {
    bytes.starts_with(&SIGNATURE)
}

/// Public view of a matched file (for `list`).
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: std::path::PathBuf,
    pub len: u64,
    pub packed: bool,
    /// Size after expansion; only filled for packed files when requested.
    pub expanded_len: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_bytes() {
        assert_eq!(SIGNATURE, [0x50, 0x61, 0x6B, 0x1B]);
    }

    #[test]
    fn detects_signature_only_at_start() {
        assert!(is_packed(b"Pak\x1bpayload"));
        assert!(is_packed(&SIGNATURE));
        assert!(!is_packed(b"Pak"));
        assert!(!is_packed(b"xPak\x1b"));
        assert!(!is_packed(b""));
    }
}
