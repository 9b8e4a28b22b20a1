//! Line segmentation for uploaded review files

/// Split a line-delimited upload into lines
///
/// Follows `splitlines` conventions: `\n` and `\r\n` both end a line, and a
/// trailing newline does not produce an extra empty line. Lines are left as bytes
/// so each one is decoded (and may fail) on its own.
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        lines.pop();
    }
    lines
}
