//! Running CRC-32 (ISO-HDLC) over byte spans

/// Fold `data` into the running checksum `crc`
///
/// Starting from 0 and folding spans one by one yields the same value as a
/// single CRC over their concatenation.
pub fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(crc);
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        // Standard CRC-32/ISO-HDLC check value
        assert_eq!(crc32_update(0, b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let crc = crc32_update(crc32_update(0, b"1234"), b"56789");
        assert_eq!(crc, crc32fast::hash(b"123456789"));
    }

    #[test]
    fn test_empty_span_is_identity() {
        assert_eq!(crc32_update(0x1234_5678, &[]), 0x1234_5678);
    }
}
