/*!
 * Core types and data structures for the dirdoc application
 */

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::utils::extension_of;

/// Kind of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or a link resolving to one)
    File,
    /// Directory containing other entries
    Directory,
}

/// A filesystem node produced by a single directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Final path component
    pub name: String,
    /// Absolute path
    pub path: PathBuf,
    /// File or directory
    pub kind: EntryKind,
    /// Lower-cased extension with its leading dot, empty if none
    pub extension: String,
}

impl Entry {
    /// Build the entry for `name` inside `parent`
    pub fn new(parent: &Path, name: impl Into<String>, kind: EntryKind) -> Self {
        let name = name.into();
        let path = parent.join(&name);
        let extension = extension_of(&name);
        Self {
            name,
            path,
            kind,
            extension,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Total order used for sibling ordering: code-point order of the name,
    /// then the raw path for names that only differ before lossy decoding.
    pub fn listing_order(a: &Entry, b: &Entry) -> Ordering {
        a.name
            .as_bytes()
            .cmp(b.name.as_bytes())
            .then_with(|| a.path.as_os_str().cmp(b.path.as_os_str()))
    }
}

/// One step of the deterministic walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalEvent {
    /// About to visit the contents of a directory
    DirectoryEntered {
        path: PathBuf,
        name: String,
        depth: usize,
        is_last: bool,
    },
    /// A file leaf
    FileVisited {
        path: PathBuf,
        name: String,
        depth: usize,
        is_last: bool,
    },
    /// All contents of a directory have been visited
    DirectoryExited { path: PathBuf, depth: usize },
}

impl TraversalEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryEntered { path, .. }
            | Self::FileVisited { path, .. }
            | Self::DirectoryExited { path, .. } => path,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::DirectoryEntered { depth, .. }
            | Self::FileVisited { depth, .. }
            | Self::DirectoryExited { depth, .. } => *depth,
        }
    }
}

/// Content extracted for one visited file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Decoded text, invalid UTF-8 replaced
    Text(String),
    /// The file could not be read; holds the reason
    Unreadable(String),
}

/// A visited file ready to be written to the content section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    /// Path relative to the root, `/`-separated
    pub relative_path: String,
    /// Nesting depth, 0 for the root's direct children
    pub depth: usize,
    pub content: FileContent,
}
