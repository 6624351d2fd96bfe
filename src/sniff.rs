//! Cheap checks deciding whether a file or stream is worth handing to the
//! full reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::PlyError;

/// `true` when the path ends in `.ply`, in any case.
pub fn has_ply_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ply"))
}

/// Peek at the start of `reader` for the `ply` magic.
///
/// Nothing is consumed, whatever the answer, so the caller can hand the same
/// reader to another format afterwards.
pub fn is_ply<R: BufRead>(reader: &mut R) -> Result<bool, PlyError> {
    let buf = reader.fill_buf()?;
    if buf.len() < 3 || !buf[..3].eq_ignore_ascii_case(b"ply") {
        return Ok(false);
    }
    Ok(buf.get(3).map_or(true, |b| b.is_ascii_whitespace()))
}

/// Extension check followed by a look at the file's magic. Files that can't
/// be opened are not readable.
pub fn can_read_path<P: AsRef<Path>>(path: P) -> bool {
    if !has_ply_extension(&path) {
        return false;
    }
    let Ok(file) = File::open(path.as_ref()) else {
        return false;
    };
    is_ply(&mut BufReader::new(file)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_extension() {
        assert!(has_ply_extension("bunny.ply"));
        assert!(has_ply_extension("dir/BUNNY.PLY"));
        assert!(!has_ply_extension("bunny.obj"));
        assert!(!has_ply_extension("ply"));
    }

    #[test]
    fn test_magic() {
        assert!(is_ply(&mut "ply\nformat ascii 1.0\n".as_bytes()).unwrap());
        assert!(is_ply(&mut "PLY\r\n".as_bytes()).unwrap());
        assert!(is_ply(&mut "ply".as_bytes()).unwrap());
        assert!(!is_ply(&mut "plyx\n".as_bytes()).unwrap());
        assert!(!is_ply(&mut "solid cube\n".as_bytes()).unwrap());
        assert!(!is_ply(&mut "".as_bytes()).unwrap());
    }

    #[test]
    fn test_negative_sniff_keeps_stream() {
        let mut reader = "solid cube\n".as_bytes();
        assert!(!is_ply(&mut reader).unwrap());

        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "solid cube\n");
    }
}
