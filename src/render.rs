/*!
 * Renderers turning traversal events into tree lines and file blocks
 *
 * Neither renderer filters or orders anything; both are driven by the
 * same event sequence from the walker.
 */

use std::path::Path;

use crate::source::FileSource;
use crate::types::{FileBlock, FileContent, TraversalEvent};
use crate::utils::{display_name, relative_display};

/// Connector for a child that has later siblings
pub const BRANCH: &str = "├── ";
/// Connector for the last child of a directory
pub const CORNER: &str = "└── ";
/// Continuation under an ancestor that has later siblings
pub const PIPE: &str = "│   ";
/// Continuation under an ancestor that was the last child
pub const BLANK: &str = "    ";

/// Draws the box-drawing hierarchy
#[derive(Debug, Default)]
pub struct TreeRenderer {
    /// `is_last` of every open ancestor directory
    ancestors: Vec<bool>,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// First line of the tree: the root directory name with a trailing slash
    pub fn root_line(root: &Path) -> String {
        format!("{}/", display_name(root))
    }

    /// Line for `event`, or `None` for events that draw nothing
    pub fn line(&mut self, event: &TraversalEvent) -> Option<String> {
        match event {
            TraversalEvent::DirectoryEntered {
                name,
                depth,
                is_last,
                ..
            } => {
                let line = self.draw(name, *depth, *is_last);
                self.ancestors.push(*is_last);
                Some(line)
            }
            TraversalEvent::FileVisited {
                name,
                depth,
                is_last,
                ..
            } => Some(self.draw(name, *depth, *is_last)),
            TraversalEvent::DirectoryExited { .. } => {
                self.ancestors.pop();
                None
            }
        }
    }

    fn draw(&mut self, name: &str, depth: usize, is_last: bool) -> String {
        self.ancestors.truncate(depth);
        let mut line = String::new();
        for &ancestor_last in &self.ancestors {
            line.push_str(if ancestor_last { BLANK } else { PIPE });
        }
        line.push_str(if is_last { CORNER } else { BRANCH });
        line.push_str(name);
        line
    }
}

/// Render the whole tree section, root line first
pub fn tree_lines(root: &Path, events: &[TraversalEvent]) -> Vec<String> {
    let mut renderer = TreeRenderer::new();
    std::iter::once(TreeRenderer::root_line(root))
        .chain(events.iter().filter_map(|event| renderer.line(event)))
        .collect()
}

/// Reads the content of every visited file
pub struct ContentRenderer<'a, S: FileSource + ?Sized> {
    source: &'a S,
    root: &'a Path,
}

impl<'a, S: FileSource + ?Sized> ContentRenderer<'a, S> {
    pub fn new(source: &'a S, root: &'a Path) -> Self {
        Self { source, root }
    }

    /// Block for a `FileVisited` event, `None` for anything else
    pub fn block(&self, event: &TraversalEvent) -> Option<FileBlock> {
        match event {
            TraversalEvent::FileVisited { path, depth, .. } => Some(FileBlock {
                relative_path: relative_display(path, self.root),
                depth: *depth,
                content: self.read(path),
            }),
            _ => None,
        }
    }

    /// Decode a file lossily with `\r\n` and `\r` line endings folded to
    /// `\n`; read failures become `Unreadable`
    pub fn read(&self, path: &Path) -> FileContent {
        match self.source.read(path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                FileContent::Text(text.replace("\r\n", "\n").replace('\r', "\n"))
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                FileContent::Unreadable(e.to_string())
            }
        }
    }
}
