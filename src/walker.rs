/*!
 * Deterministic traversal of a directory tree
 *
 * The walker lists one directory at a time, sorts the children by name,
 * drops the ones the filter rejects and yields `TraversalEvent`s in
 * depth-first pre-order. Every renderer consumes this one sequence.
 */

use std::path::PathBuf;
use std::vec;

use crate::config::Config;
use crate::error::Result;
use crate::filter;
use crate::source::FileSource;
use crate::types::{Entry, TraversalEvent};

/// A surviving child of a directory, with its own listing resolved if it
/// is a directory
struct Child {
    entry: Entry,
    listing: Option<Vec<Entry>>,
    is_last: bool,
}

/// A directory whose children are being visited
struct Frame {
    path: PathBuf,
    /// Depth of the children of this directory
    depth: usize,
    children: vec::IntoIter<Child>,
}

/// Lazy iterator over the traversal events below `config.root`
pub struct Walker<'a, S: FileSource + ?Sized> {
    source: &'a S,
    config: &'a Config,
    stack: Vec<Frame>,
}

impl<'a, S: FileSource + ?Sized> Walker<'a, S> {
    /// Start a walk at `config.root`. Fails only if the root cannot be listed.
    pub fn new(source: &'a S, config: &'a Config) -> Result<Self> {
        let mut walker = Self {
            source,
            config,
            stack: Vec::new(),
        };
        let root_listing = walker.listing(&config.root)?;
        let root_frame = walker.frame(config.root.clone(), 0, root_listing);
        walker.stack.push(root_frame);
        Ok(walker)
    }

    /// Sorted, filtered children of `dir`
    fn listing(&self, dir: &std::path::Path) -> std::io::Result<Vec<Entry>> {
        let mut entries = self.source.list(dir)?;
        entries.sort_by(Entry::listing_order);
        entries.retain(|entry| filter::included(entry, self.config));
        Ok(entries)
    }

    /// Resolve the listings of child directories up front so that an
    /// unlistable one is dropped before `is_last` is assigned.
    fn frame(&self, path: PathBuf, depth: usize, entries: Vec<Entry>) -> Frame {
        let mut children: Vec<Child> = entries
            .into_iter()
            .filter_map(|entry| {
                if !entry.is_dir() {
                    return Some(Child {
                        entry,
                        listing: None,
                        is_last: false,
                    });
                }
                match self.listing(&entry.path) {
                    Ok(listing) => Some(Child {
                        entry,
                        listing: Some(listing),
                        is_last: false,
                    }),
                    Err(e) => {
                        log::warn!("Skipping directory {}: {}", entry.path.display(), e);
                        None
                    }
                }
            })
            .collect();

        if let Some(last) = children.last_mut() {
            last.is_last = true;
        }

        Frame {
            path,
            depth,
            children: children.into_iter(),
        }
    }
}

impl<S: FileSource + ?Sized> Iterator for Walker<'_, S> {
    type Item = TraversalEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.stack.last_mut()?;
        let depth = frame.depth;

        let Some(child) = frame.children.next() else {
            let finished = self.stack.pop()?;
            // The root frame closes silently
            if self.stack.is_empty() {
                return None;
            }
            return Some(TraversalEvent::DirectoryExited {
                path: finished.path,
                depth: finished.depth - 1,
            });
        };

        let Child {
            entry,
            listing,
            is_last,
        } = child;

        match listing {
            None => Some(TraversalEvent::FileVisited {
                path: entry.path,
                name: entry.name,
                depth,
                is_last,
            }),
            Some(listing) => {
                let frame = self.frame(entry.path.clone(), depth + 1, listing);
                self.stack.push(frame);
                Some(TraversalEvent::DirectoryEntered {
                    path: entry.path,
                    name: entry.name,
                    depth,
                    is_last,
                })
            }
        }
    }
}

/// Walk `config.root` through `source` and collect every event
pub fn walk<S: FileSource + ?Sized>(source: &S, config: &Config) -> Result<Vec<TraversalEvent>> {
    Ok(Walker::new(source, config)?.collect())
}
