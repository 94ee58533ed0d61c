//! Files chosen for upload.

/// A file picked by the user, not yet sent.
///
/// Implemented by the browser `File` wrapper in the front end and by
/// in-memory files in tests. The implementing value is itself the handle
/// to the file content.
pub trait LocalFile: Clone {
    fn name(&self) -> String;
    /// Size in bytes.
    fn size(&self) -> u64;
    /// MIME type as reported by the platform, if any.
    fn mime_type(&self) -> Option<String>;
}

/// Ordered set of selected files.
///
/// Insertion order is display order. Duplicate names are allowed; entries
/// are identified by position.
#[derive(Clone, Debug)]
pub struct SelectionSet<F> {
    files: Vec<F>,
    input_generation: u64,
    revision: u64,
}

impl<F: LocalFile> SelectionSet<F> {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            input_generation: 0,
            revision: 0,
        }
    }

    /// Replace the selection wholesale.
    ///
    /// Returns `false` (and keeps the current selection) if `files` is empty.
    pub fn select(&mut self, files: Vec<F>) -> bool {
        if files.is_empty() {
            return false;
        }
        self.files = files;
        self.revision += 1;
        true
    }

    /// Remove the entry at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<F> {
        let removed = (index < self.files.len()).then(|| self.files.remove(index));
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    /// Empty the selection and invalidate the file input control.
    pub fn clear(&mut self) {
        self.files.clear();
        self.input_generation += 1;
        self.revision += 1;
    }

    pub fn files(&self) -> &[F] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all file sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(LocalFile::size).sum()
    }

    /// Number of times the selection was cleared.
    ///
    /// The file input must be reset whenever this changes, otherwise picking
    /// the same file again would not fire a change event.
    pub fn input_generation(&self) -> u64 {
        self.input_generation
    }

    /// Counter bumped by every change to the selection.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl<F: LocalFile> Default for SelectionSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryFile;

    fn names(set: &SelectionSet<MemoryFile>) -> Vec<String> {
        set.files().iter().map(|f| f.name()).collect()
    }

    fn sample() -> SelectionSet<MemoryFile> {
        let mut set = SelectionSet::new();
        set.select(vec![
            MemoryFile::new("a.txt", 10),
            MemoryFile::new("b.png", 20),
            MemoryFile::new("a.txt", 30),
            MemoryFile::new("c.zip", 40),
        ]);
        set
    }

    #[test]
    fn test_select_replaces() {
        let mut set = sample();
        assert!(set.select(vec![MemoryFile::new("z.pdf", 1)]));
        assert_eq!(names(&set), vec!["z.pdf"]);
    }

    #[test]
    fn test_select_empty_is_noop() {
        let mut set = sample();
        assert!(!set.select(Vec::new()));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_remove_at_each_index() {
        for i in 0..4 {
            let mut set = sample();
            let mut expected = names(&set);
            expected.remove(i);

            assert!(set.remove_at(i).is_some());
            assert_eq!(names(&set), expected);
        }
    }

    #[test]
    fn test_remove_duplicate_by_position() {
        let mut set = sample();
        let removed = set.remove_at(2).unwrap();
        assert_eq!(removed.size(), 30);
        assert_eq!(set.files()[0].size(), 10);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut set = sample();
        assert!(set.remove_at(4).is_none());
        assert_eq!(set.len(), 4);

        let mut empty = SelectionSet::<MemoryFile>::new();
        assert!(empty.remove_at(0).is_none());
    }

    #[test]
    fn test_clear() {
        let mut set = sample();
        let generation = set.input_generation();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.input_generation(), generation + 1);

        // clearing an empty set still resets the input
        set.clear();
        assert_eq!(set.input_generation(), generation + 2);
    }

    #[test]
    fn test_total_bytes() {
        assert_eq!(sample().total_bytes(), 100);
        assert_eq!(SelectionSet::<MemoryFile>::new().total_bytes(), 0);
    }

    #[test]
    fn test_revision_tracks_every_change() {
        let mut set = sample();
        let start = set.revision();

        assert!(!set.select(Vec::new()));
        assert!(set.remove_at(9).is_none());
        assert_eq!(set.revision(), start);

        set.remove_at(0);
        assert_eq!(set.revision(), start + 1);
        set.select(vec![MemoryFile::new("d.txt", 5)]);
        assert_eq!(set.revision(), start + 2);
        set.clear();
        assert_eq!(set.revision(), start + 3);
    }
}
