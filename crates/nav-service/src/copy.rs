//! Copying stored paths into caller buffers.

/// Front-aligned copy of `src` into `out`, truncated to the shorter of the
/// two.  Slots of `out` past the copied prefix are set to `None`.
///
/// Returns the number of nodes written.
pub fn copy_forward<T: Copy>(src: &[Option<T>], out: &mut [Option<T>]) -> usize {
    let n = src.len().min(out.len());
    out[..n].copy_from_slice(&src[..n]);
    out[n..].fill(None);
    out[..n].iter().filter(|slot| slot.is_some()).count()
}

/// Reverse copy: walks `src` from its last entry to its first, appending
/// every `Some` entry to `out` and skipping `None` entries without advancing
/// the output cursor.  Remaining slots of `out` are set to `None`.
///
/// Returns the number of nodes written.
pub fn copy_reversed<T: Copy>(src: &[Option<T>], out: &mut [Option<T>]) -> usize {
    let mut written = 0;
    for node in src.iter().rev().flatten() {
        if written == out.len() {
            break;
        }
        out[written] = Some(*node);
        written += 1;
    }
    out[written..].fill(None);
    written
}
