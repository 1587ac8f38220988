//! Hex helpers for diagnostics and tests

/// Renders `bytes` as lowercase hex, two digits per byte
pub fn hex_of_bytes(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Parses a string of hex digit pairs, with an optional `0x` prefix
pub fn bytes_of_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}
