//! The set of files touched during a session.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Deduplicated absolute paths considered modified in a session.
///
/// Paths are kept sorted so iteration (and therefore violation order) is
/// deterministic. The version-control root, when one was discovered, is kept
/// alongside so reports can show repository-relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<PathBuf>,
    vcs_root: Option<PathBuf>,
}

impl ChangeSet {
    /// An empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. Returns `true` if it was not already present.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    /// Union another change set into this one.
    ///
    /// The first known version-control root is kept.
    pub fn merge(&mut self, other: ChangeSet) {
        self.paths.extend(other.paths);
        if self.vcs_root.is_none() {
            self.vcs_root = other.vcs_root;
        }
    }

    /// Record the version-control root the paths were resolved against.
    pub fn set_vcs_root(&mut self, root: impl Into<PathBuf>) {
        self.vcs_root = Some(root.into());
    }

    /// The version-control root, if one was discovered.
    #[must_use]
    pub fn vcs_root(&self) -> Option<&Path> {
        self.vcs_root.as_deref()
    }

    /// Iterate paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
            vcs_root: None,
        }
    }
}

impl<P: Into<PathBuf>> Extend<P> for ChangeSet {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.paths.extend(iter.into_iter().map(Into::into));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_deduplicates() {
        let mut set = ChangeSet::new();
        assert!(set.insert("/p/a.rs"));
        assert!(!set.insert("/p/a.rs"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn merge_is_union() {
        let mut a: ChangeSet = ["/p/a.rs", "/p/b.rs"].into_iter().collect();
        let b: ChangeSet = ["/p/b.rs", "/p/c.rs"].into_iter().collect();
        a.merge(b);
        let paths: Vec<&Path> = a.iter().collect();
        assert_eq!(
            paths,
            vec![Path::new("/p/a.rs"), Path::new("/p/b.rs"), Path::new("/p/c.rs")]
        );
    }

    #[test]
    fn merge_keeps_first_root() {
        let mut a = ChangeSet::new();
        let mut b = ChangeSet::new();
        b.set_vcs_root("/p");
        a.merge(b);
        assert_eq!(a.vcs_root(), Some(Path::new("/p")));

        let mut c = ChangeSet::new();
        c.set_vcs_root("/q");
        a.merge(c);
        assert_eq!(a.vcs_root(), Some(Path::new("/p")));
    }

    #[test]
    fn merge_order_independent() {
        let x: ChangeSet = ["/p/x.py", "/p/y.py"].into_iter().collect();
        let y: ChangeSet = ["/p/z.py", "/p/x.py"].into_iter().collect();
        let mut left = x.clone();
        left.merge(y.clone());
        let mut right = y;
        right.merge(x);
        assert_eq!(left, right);
    }

    #[test]
    fn empty_by_default() {
        let set = ChangeSet::default();
        assert!(set.is_empty());
        assert!(set.vcs_root().is_none());
        assert_eq!(set.iter().count(), 0);
    }
}
