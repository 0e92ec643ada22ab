/*!
 * dirdoc - Document a directory tree in a single artifact
 *
 * This library walks a directory deterministically, decides which entries
 * to include and writes a tree view followed by the contents of every
 * included file, as plain text or as a DOCX document.
 */

pub mod config;
pub mod docx;
pub mod error;
pub mod filter;
pub mod render;
pub mod report;
pub mod source;
pub mod types;
pub mod utils;
pub mod walker;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config, OutputFormat, Settings};
pub use docx::DocxWriter;
pub use error::{DirDocError, Result};
pub use filter::{included, Exclusion};
pub use render::{ContentRenderer, TreeRenderer};
pub use report::{FileReportInfo, ReportFormat, Reporter, RunStatistics, ScanReport};
pub use source::{DiskSource, FileSource, MemorySource};
pub use types::{Entry, EntryKind, FileBlock, FileContent, TraversalEvent};
pub use walker::{walk, Walker};
pub use writer::{ArtifactWriter, Assembler, TextWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
