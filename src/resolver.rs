// Record index resolution
//
// A client-supplied index means "rank in the snapshot at read time". These
// functions only bounds-check it against the snapshot they are given.

use crate::entities::Entry;
use crate::error::{StoreError, StoreResult};

/// Resolve `index` against `snapshot`, returning the position and the entry.
pub fn resolve(snapshot: &[Entry], index: i64) -> StoreResult<(usize, &Entry)> {
    let out_of_range = || StoreError::IndexOutOfRange {
        index,
        len: snapshot.len(),
    };

    let position = usize::try_from(index).map_err(|_| out_of_range())?;
    snapshot
        .get(position)
        .map(|entry| (position, entry))
        .ok_or_else(out_of_range)
}

/// Like [`resolve`], and additionally require the entry at `index` to have the
/// fingerprint the client saw, if one was supplied.
pub fn resolve_expected<'a>(
    snapshot: &'a [Entry],
    index: i64,
    expected: Option<&str>,
) -> StoreResult<(usize, &'a Entry)> {
    let (position, entry) = resolve(snapshot, index)?;
    match expected {
        Some(fingerprint) if entry.fingerprint() != fingerprint => {
            Err(StoreError::StaleIndex { index: position })
        }
        _ => Ok((position, entry)),
    }
}
