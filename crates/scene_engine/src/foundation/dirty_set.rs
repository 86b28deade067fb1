//! Insertion-ordered set of indices backed by a presence bitmap

const WORD_BITS: usize = u64::BITS as usize;

/// Deduplicating, insertion-ordered collection of `u32` indices
///
/// Membership is tracked in a bitmap so `insert` and `contains` are O(1);
/// the item list keeps the order indices were first inserted in.
#[derive(Debug, Clone, Default)]
pub struct DirtySet {
    items: Vec<u32>,
    present: Vec<u64>,
}

impl DirtySet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            present: Vec::new(),
        }
    }

    /// Create an empty set whose bitmap already covers `capacity` indices
    pub fn with_capacity(capacity: usize) -> Self {
        let mut set = Self::new();
        set.ensure_capacity(capacity);
        set
    }

    /// Grow the bitmap to cover at least `capacity` indices
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let words = capacity.div_ceil(WORD_BITS);
        if self.present.len() < words {
            self.present.resize(words, 0);
        }
    }

    /// Insert `index`; returns false if it was already present
    pub fn insert(&mut self, index: u32) -> bool {
        let (word, mask) = Self::locate(index);
        if word >= self.present.len() {
            self.present.resize(word + 1, 0);
        }

        if self.present[word] & mask != 0 {
            return false;
        }

        self.present[word] |= mask;
        self.items.push(index);
        true
    }

    /// Whether `index` is in the set
    pub fn contains(&self, index: u32) -> bool {
        let (word, mask) = Self::locate(index);
        self.present.get(word).is_some_and(|bits| bits & mask != 0)
    }

    /// Remove `index` if present
    ///
    /// Linear in the number of items; not meant for the per-frame path.
    pub fn erase(&mut self, index: u32) {
        let (word, mask) = Self::locate(index);
        match self.present.get_mut(word) {
            Some(bits) if *bits & mask != 0 => *bits &= !mask,
            _ => return,
        }

        if let Some(position) = self.items.iter().position(|&item| item == index) {
            self.items.remove(position);
        }
    }

    /// Remove every item, resetting only the bits that were set
    pub fn clear(&mut self) {
        self.clear_bits();
        self.items.clear();
    }

    /// Items in insertion order
    pub fn items(&self) -> &[u32] {
        &self.items
    }

    /// Iterate items in insertion order
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, u32>> {
        self.items.iter().copied()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the set holds nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Move the items out, leaving the set empty
    ///
    /// The returned buffer can be handed back through [`DirtySet::recycle`]
    /// to keep its allocation.
    pub fn take_items(&mut self) -> Vec<u32> {
        self.clear_bits();
        std::mem::take(&mut self.items)
    }

    /// Return a buffer obtained from [`DirtySet::take_items`]
    pub fn recycle(&mut self, mut buffer: Vec<u32>) {
        if self.items.is_empty() && buffer.capacity() > self.items.capacity() {
            buffer.clear();
            self.items = buffer;
        }
    }

    fn clear_bits(&mut self) {
        for &index in &self.items {
            let (word, mask) = Self::locate(index);
            if let Some(bits) = self.present.get_mut(word) {
                *bits &= !mask;
            }
        }
    }

    const fn locate(index: u32) -> (usize, u64) {
        let index = index as usize;
        (index / WORD_BITS, 1 << (index % WORD_BITS))
    }
}

impl<'a> IntoIterator for &'a DirtySet {
    type Item = u32;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates_and_keeps_order() {
        let mut set = DirtySet::new();
        assert!(set.insert(7));
        assert!(set.insert(2));
        assert!(!set.insert(7));
        assert!(set.insert(130));

        assert_eq!(set.items(), &[7, 2, 130]);
        assert!(set.contains(130));
        assert!(!set.contains(3));
        assert!(!set.contains(10_000));
    }

    #[test]
    fn test_erase() {
        let mut set = DirtySet::with_capacity(16);
        set.insert(1);
        set.insert(4);
        set.insert(9);

        set.erase(4);
        set.erase(5);
        set.erase(100);

        assert_eq!(set.items(), &[1, 9]);
        assert!(!set.contains(4));
        assert!(set.insert(4));
    }

    #[test]
    fn test_clear_leaves_no_stale_bits() {
        let mut set = DirtySet::new();
        for i in [3, 64, 65, 200] {
            set.insert(i);
        }
        set.clear();

        assert!(set.is_empty());
        for i in [3, 64, 65, 200] {
            assert!(!set.contains(i));
            assert!(set.insert(i));
        }
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_take_items_and_recycle() {
        let mut set = DirtySet::new();
        set.insert(5);
        set.insert(6);

        let taken = set.take_items();
        assert_eq!(taken, vec![5, 6]);
        assert!(set.is_empty());
        assert!(!set.contains(5));

        set.recycle(taken);
        assert!(set.is_empty());
        assert!(set.insert(5));
        assert_eq!(set.items(), &[5]);
    }
}
