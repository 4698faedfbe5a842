//! Key range boundaries for prefix scans
//!
//! Keys compare as raw bytes. For a prefix `p`, every key starting with
//! `p` lies in `[p, successor_bound(p))`, and no other key does.

use std::ops::Bound::{self, Excluded, Included, Unbounded};

/// Shortest byte string sorting after every string that starts with `prefix`.
///
/// Drops trailing `0xFF` bytes and increments the last remaining byte.
/// Returns `None` when no such bound exists (empty or all-`0xFF` input);
/// a scan bounded by it must run to the end of the keyspace.
///
/// - `b"1"` → `Some(b"2")`
/// - `[0x61, 0xFF]` → `Some([0x62])`
/// - `[0xFF, 0xFF]` → `None`
pub fn successor_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let pos = prefix.iter().rposition(|&b| b < u8::MAX)?;
    let mut bound = prefix[..=pos].to_vec();
    bound[pos] += 1;
    Some(bound)
}

/// A half-open range over encoded keys: inclusive start, exclusive stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    pub start: Vec<u8>,
    pub stop: Option<Vec<u8>>,
}

impl KeyRange {
    pub fn new(start: Vec<u8>, stop: Option<Vec<u8>>) -> Self {
        Self { start, stop }
    }

    /// All keys from `start` to the end of the keyspace.
    pub fn starting_at(start: Vec<u8>) -> Self {
        Self { start, stop: None }
    }

    /// All keys starting with `prefix`.
    pub fn prefix(prefix: Vec<u8>) -> Self {
        let stop = successor_bound(&prefix);
        Self {
            start: prefix,
            stop,
        }
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        key >= self.start.as_slice()
            && match &self.stop {
                Some(stop) => key < stop.as_slice(),
                None => true,
            }
    }

    pub fn start_bound(&self) -> Bound<&[u8]> {
        Included(self.start.as_slice())
    }

    pub fn end_bound(&self) -> Bound<&[u8]> {
        match &self.stop {
            Some(stop) => Excluded(stop.as_slice()),
            None => Unbounded,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn all_max(data: &[u8]) -> bool {
        data.iter().all(|&b| b == u8::MAX)
    }

    proptest! {
        #[test]
        fn test_bound_strictly_greater(data: Vec<u8>) {
            prop_assume!(!all_max(&data));

            let bound = successor_bound(&data).unwrap();
            prop_assert!(bound.as_slice() > data.as_slice());
        }

        #[test]
        fn test_bound_exceeds_every_extension(prefix: Vec<u8>, suffix: Vec<u8>) {
            prop_assume!(!all_max(&prefix));

            let bound = successor_bound(&prefix).unwrap();
            let mut extended = prefix.clone();
            extended.extend(&suffix);
            prop_assert!(extended.as_slice() < bound.as_slice());
        }

        #[test]
        fn test_keys_below_bound_share_prefix(prefix: Vec<u8>, key: Vec<u8>) {
            prop_assume!(!all_max(&prefix));

            let range = KeyRange::prefix(prefix.clone());
            prop_assert_eq!(range.contains(&key), key.starts_with(&prefix));
        }

        #[test]
        fn test_all_max_has_no_bound(len in 0usize..16) {
            prop_assert!(successor_bound(&vec![u8::MAX; len]).is_none());
        }
    }

    #[test]
    fn test_increments_last_byte() {
        assert_eq!(successor_bound(b"1").unwrap(), b"2");
        assert_eq!(successor_bound(b"str:1").unwrap(), b"str:2");
        assert_eq!(successor_bound(&[0xFE]).unwrap(), vec![0xFF]);
    }

    #[test]
    fn test_drops_trailing_max_bytes() {
        assert_eq!(successor_bound(&[0x61, 0xFF]).unwrap(), vec![0x62]);
        assert_eq!(successor_bound(&[0x00, 0xFF, 0xFF]).unwrap(), vec![0x01]);
    }

    #[test]
    fn test_none_without_successor() {
        assert!(successor_bound(&[]).is_none());
        assert!(successor_bound(&[0xFF]).is_none());
        assert!(successor_bound(&[0xFF, 0xFF]).is_none());
    }

    #[test]
    fn test_prefix_range_unbounded_for_max_bytes() {
        let range = KeyRange::prefix(vec![0xFF, 0xFF]);
        assert_eq!(range.end_bound(), Unbounded);
        assert!(range.contains(&[0xFF, 0xFF, 0x00]));
        assert!(!range.contains(&[0xFE, 0xFF]));
    }

    #[test]
    fn test_starting_at_has_no_stop() {
        let range = KeyRange::starting_at(b"m".to_vec());
        assert!(range.contains(b"zzz"));
        assert!(!range.contains(b"a"));
        assert_eq!(range.start_bound(), Included(&b"m"[..]));
    }
}
