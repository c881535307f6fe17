// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Half-open index ranges along one axis of the image.

use std::ops::Range;

use error::RenderError;

/// The half-open interval `[start, end)` of pixel indices along one
/// axis.  Once built it never changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelRange {
    start: usize,
    end: usize,
}

impl PixelRange {
    /// Refuses ranges that run backwards.  An empty range is fine.
    pub fn new(start: usize, end: usize) -> Result<PixelRange, RenderError> {
        if start > end {
            return Err(RenderError::InvalidRange { start, end });
        }
        Ok(PixelRange { start, end })
    }

    /// First index inside the range.
    pub fn start(&self) -> usize {
        self.start
    }

    /// First index past the range.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the range covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `index` lies inside the range.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// True when the two ranges share at least one index.
    pub fn overlaps(&self, other: &PixelRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The indices, in increasing order.
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Cuts the range into `parts` consecutive pieces whose lengths
    /// differ by at most one.  Asking for more parts than there are
    /// indices gives one piece per index.
    pub fn split(&self, parts: usize) -> Vec<PixelRange> {
        let parts = parts.max(1).min(self.len().max(1));
        let base = self.len() / parts;
        let extra = self.len() % parts;

        let mut start = self.start;
        (0..parts)
            .map(|i| {
                let end = start + base + if i < extra { 1 } else { 0 };
                let piece = PixelRange { start, end };
                start = end;
                piece
            })
            .collect()
    }
}

impl IntoIterator for PixelRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Range<usize> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backwards_range_is_rejected() {
        assert_eq!(
            PixelRange::new(5, 4).unwrap_err(),
            RenderError::InvalidRange { start: 5, end: 4 }
        );
        assert!(PixelRange::new(4, 4).unwrap().is_empty());
    }

    #[test]
    fn range_is_half_open() {
        let r = PixelRange::new(2, 5).unwrap();
        assert_eq!(r.len(), 3);
        assert!(r.contains(2));
        assert!(!r.contains(5));
        assert_eq!(r.into_iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let a = PixelRange::new(0, 10).unwrap();
        let b = PixelRange::new(10, 20).unwrap();
        let c = PixelRange::new(9, 11).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c) && b.overlaps(&c));
    }

    #[test]
    fn split_covers_the_range_evenly() {
        let r = PixelRange::new(0, 700).unwrap();
        let pieces = r.split(3);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0], PixelRange::new(0, 234).unwrap());
        assert_eq!(pieces[1], PixelRange::new(234, 467).unwrap());
        assert_eq!(pieces[2], PixelRange::new(467, 700).unwrap());
    }

    #[test]
    fn split_into_too_many_parts() {
        let r = PixelRange::new(3, 6).unwrap();
        let pieces = r.split(10);
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|p| p.len() == 1));
        assert_eq!(r.split(0), vec![r]);
    }
}
