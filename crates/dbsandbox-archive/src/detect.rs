use std::io::{self, Read, Seek};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Peeks at the first bytes of `reader` and rewinds it.
pub fn detect_gzip<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    let mut header = [0u8; 2];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    reader.rewind()?;
    Ok(is_gzip(&header[..filled]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_gzip_header() {
        assert!(is_gzip(&[0x1F, 0x8B, 0x08, 0x00]));
    }

    #[test]
    fn detect_zip_is_not_gzip() {
        assert!(!is_gzip(&[0x50, 0x4B, 0x03, 0x04]));
    }

    #[test]
    fn detect_truncated_header() {
        assert!(!is_gzip(&[0x1F]));
        assert!(!is_gzip(&[]));
    }

    #[test]
    fn detect_from_reader_rewinds() {
        let mut cursor = io::Cursor::new(vec![0x1F, 0x8B, 0x08, 0x00, 0x42]);
        assert!(detect_gzip(&mut cursor).unwrap());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn detect_from_empty_reader() {
        let mut cursor = io::Cursor::new(Vec::new());
        assert!(!detect_gzip(&mut cursor).unwrap());
    }
}
