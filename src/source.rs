/*!
 * Filesystem access used by the walker and the content renderer
 *
 * The walker never touches the filesystem directly; it goes through a
 * `FileSource` so the same traversal runs against a real directory or an
 * in-memory fixture.
 */

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::types::{Entry, EntryKind};

/// Listing and reading capability
pub trait FileSource {
    /// Direct children of `dir`, in any order.
    ///
    /// Fails when `dir` itself cannot be listed. Children that vanish or
    /// cannot be stat'ed are left out.
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Whole contents of `file`
    fn read(&self, file: &Path) -> io::Result<Vec<u8>>;
}

/// The local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSource;

impl DiskSource {
    /// Classify an entry, following symbolic links
    fn kind_of(entry: &walkdir::DirEntry) -> Option<EntryKind> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return Some(EntryKind::Directory);
        }
        if file_type.is_file() {
            return Some(EntryKind::File);
        }
        if file_type.is_symlink() {
            return match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => Some(EntryKind::File),
                Ok(meta) if meta.is_dir() => {
                    log::debug!(
                        "Not descending into symlinked directory {}",
                        entry.path().display()
                    );
                    None
                }
                Ok(_) => None,
                Err(e) => {
                    log::debug!("Dropping broken link {}: {}", entry.path().display(), e);
                    None
                }
            };
        }
        None
    }
}

impl FileSource for DiskSource {
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();

        for item in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let item = match item {
                Ok(item) => item,
                Err(e) if e.depth() == 0 || e.path() == Some(dir) => return Err(e.into()),
                Err(e) => {
                    log::warn!("Skipping entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if let Some(kind) = Self::kind_of(&item) {
                let name = item.file_name().to_string_lossy().to_string();
                entries.push(Entry::new(dir, name, kind));
            }
        }

        Ok(entries)
    }

    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        fs::read(file)
    }
}

#[derive(Debug, Clone)]
enum MemoryNode {
    Directory { listable: bool },
    File(Option<Vec<u8>>),
}

/// In-memory directory tree
///
/// ```
/// use dirdoc::source::{FileSource, MemorySource};
///
/// let source = MemorySource::new("/repo")
///     .file("a.txt", "hi")
///     .file("src/lib.rs", "");
/// assert_eq!(source.list("/repo".as_ref()).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    root: PathBuf,
    nodes: BTreeMap<PathBuf, MemoryNode>,
}

impl MemorySource {
    /// Empty tree rooted at `root` (an absolute path)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut nodes = BTreeMap::new();
        nodes.insert(root.clone(), MemoryNode::Directory { listable: true });
        Self { root, nodes }
    }

    /// Root of the tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add a file, creating missing parent directories
    pub fn file(self, relative: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(relative, MemoryNode::File(Some(contents.into())))
    }

    /// Add a file whose reads fail
    pub fn unreadable_file(self, relative: &str) -> Self {
        self.insert(relative, MemoryNode::File(None))
    }

    /// Add an empty directory
    pub fn dir(self, relative: &str) -> Self {
        self.insert(relative, MemoryNode::Directory { listable: true })
    }

    /// Add a directory whose listing fails
    pub fn unlistable_dir(self, relative: &str) -> Self {
        self.insert(relative, MemoryNode::Directory { listable: false })
    }

    fn insert(mut self, relative: &str, node: MemoryNode) -> Self {
        let path = self.root.join(relative);
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if !dir.starts_with(&self.root) {
                break;
            }
            self.nodes
                .entry(dir.to_path_buf())
                .or_insert(MemoryNode::Directory { listable: true });
            parent = dir.parent();
        }
        self.nodes.insert(path, node);
        self
    }
}

impl FileSource for MemorySource {
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        match self.nodes.get(dir) {
            Some(MemoryNode::Directory { listable: true }) => {}
            Some(MemoryNode::Directory { listable: false }) => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("cannot list {}", dir.display()),
                ))
            }
            Some(MemoryNode::File(_)) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("not a directory: {}", dir.display()),
                ))
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such directory: {}", dir.display()),
                ))
            }
        }

        // Reverse key order so callers cannot rely on enumeration order
        let entries = self
            .nodes
            .iter()
            .rev()
            .filter(|(path, _)| path.parent() == Some(dir))
            .filter_map(|(path, node)| {
                let name = path.file_name()?.to_string_lossy().to_string();
                let kind = match node {
                    MemoryNode::Directory { .. } => EntryKind::Directory,
                    MemoryNode::File(_) => EntryKind::File,
                };
                Some(Entry::new(dir, name, kind))
            })
            .collect();

        Ok(entries)
    }

    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        match self.nodes.get(file) {
            Some(MemoryNode::File(Some(bytes))) => Ok(bytes.clone()),
            Some(MemoryNode::File(None)) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Permission denied",
            )),
            Some(MemoryNode::Directory { .. }) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", file.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", file.display()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_memory_source_lists_direct_children() {
        let source = MemorySource::new("/repo")
            .file("a.txt", "hi")
            .file("src/lib.rs", "")
            .file("src/nested/deep.rs", "");

        let mut names: Vec<_> = source
            .list(Path::new("/repo"))
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.kind))
            .collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(
            names,
            vec![
                ("a.txt".to_string(), EntryKind::File),
                ("src".to_string(), EntryKind::Directory)
            ]
        );
    }

    #[test]
    fn test_memory_source_failures() {
        let source = MemorySource::new("/repo")
            .unlistable_dir("locked")
            .unreadable_file("secret.txt");

        assert!(source.list(Path::new("/repo/locked")).is_err());
        assert!(source.list(Path::new("/repo/missing")).is_err());
        assert!(source.read(Path::new("/repo/secret.txt")).is_err());
    }

    #[test]
    fn test_disk_source_lists_and_reads() -> io::Result<()> {
        let temp_dir = tempdir()?;
        fs::create_dir(temp_dir.path().join("sub"))?;
        let mut file = File::create(temp_dir.path().join("file.TXT"))?;
        write!(file, "content")?;

        let mut entries = DiskSource.list(temp_dir.path())?;
        entries.sort_by(Entry::listing_order);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "file.TXT");
        assert_eq!(entries[0].extension, ".txt");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].kind, EntryKind::Directory);

        assert_eq!(DiskSource.read(&entries[0].path)?, b"content");
        Ok(())
    }

    #[test]
    fn test_disk_source_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        assert!(DiskSource.list(&temp_dir.path().join("gone")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_disk_source_skips_symlinked_directories() -> io::Result<()> {
        let temp_dir = tempdir()?;
        fs::create_dir(temp_dir.path().join("real"))?;
        File::create(temp_dir.path().join("target.txt"))?;
        std::os::unix::fs::symlink(temp_dir.path().join("real"), temp_dir.path().join("loop"))?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("target.txt"),
            temp_dir.path().join("link.txt"),
        )?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("nowhere"),
            temp_dir.path().join("broken"),
        )?;

        let mut names: Vec<_> = DiskSource
            .list(temp_dir.path())?
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["link.txt", "real", "target.txt"]);
        Ok(())
    }
}
