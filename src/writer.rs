/*!
 * Artifact assembly for dirdoc
 *
 * `Assembler` walks the tree once and drives the tree and content renderers
 * into an `ArtifactWriter`, which only decides how each section looks.
 */

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::config::{Config, OutputFormat};
use crate::docx::DocxWriter;
use crate::error::Result;
use crate::render::{tree_lines, ContentRenderer};
use crate::report::RunStatistics;
use crate::source::FileSource;
use crate::types::{FileBlock, FileContent, TraversalEvent};
use crate::walker::walk;

/// Title of every artifact
pub const TITLE: &str = "Repository Documentation";

/// Descriptive preamble, one sentence per line
pub const PREAMBLE: [&str; 7] = [
    "This document provides a comprehensive overview of the repository's structure and contents.",
    "The first section, titled 'Directory/File Tree', displays the repository's hierarchy in a tree format.",
    "In this section, directories and files are listed using tree branches to indicate their structure and relationships.",
    "Following the tree representation, the 'File Content' section details the contents of each file in the repository.",
    "Each file's content is introduced with a '[File Begins]' marker followed by the file's relative path,",
    "and the content is displayed verbatim. The end of each file's content is marked with a '[File Ends]' marker.",
    "This format ensures a clear and orderly presentation of both the structure and the detailed contents of the repository.",
];

pub const TREE_BEGINS: &str = "Directory/File Tree Begins -->";
pub const TREE_ENDS: &str = "<-- Directory/File Tree Ends";
pub const CONTENT_ENDS: &str = "<-- File Content Ends";

/// Output backend for one artifact format
pub trait ArtifactWriter {
    /// Title and descriptive paragraph
    fn preamble(&mut self) -> Result<()>;
    fn begin_tree(&mut self) -> Result<()>;
    /// One rendered tree line, without a line terminator
    fn tree_line(&mut self, line: &str) -> Result<()>;
    fn end_tree(&mut self) -> Result<()>;
    fn begin_contents(&mut self) -> Result<()>;
    fn file_block(&mut self, block: &FileBlock) -> Result<()>;
    fn end_contents(&mut self) -> Result<()>;
    /// Flush everything to the underlying sink
    fn finish(&mut self) -> Result<()>;
}

/// Plain-text artifact with literal section markers
pub struct TextWriter<W: Write> {
    out: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ArtifactWriter for TextWriter<W> {
    fn preamble(&mut self) -> Result<()> {
        writeln!(self.out, "{}", TITLE)?;
        for line in PREAMBLE {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn begin_tree(&mut self) -> Result<()> {
        write!(self.out, "{}\n\n", TREE_BEGINS)?;
        Ok(())
    }

    fn tree_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn end_tree(&mut self) -> Result<()> {
        write!(self.out, "\n{}", TREE_ENDS)?;
        Ok(())
    }

    fn begin_contents(&mut self) -> Result<()> {
        write!(self.out, "\n\nFile Content Begin -->\n")?;
        Ok(())
    }

    fn file_block(&mut self, block: &FileBlock) -> Result<()> {
        let indent = "  ".repeat(block.depth);
        writeln!(self.out, "{}[File Begins] {}", indent, block.relative_path)?;
        match &block.content {
            FileContent::Text(text) => {
                for line in text.split_inclusive('\n') {
                    write!(self.out, "{}{}", indent, line)?;
                }
            }
            FileContent::Unreadable(reason) => {
                writeln!(self.out, "{}Error reading file: {}", indent, reason)?;
            }
        }
        write!(
            self.out,
            "\n{}[File Ends] {}\n\n",
            indent, block.relative_path
        )?;
        Ok(())
    }

    fn end_contents(&mut self) -> Result<()> {
        write!(self.out, "\n{}\n\n", CONTENT_ENDS)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Drives one traversal into an `ArtifactWriter`
pub struct Assembler<'a, S: FileSource + ?Sized> {
    config: &'a Config,
    source: &'a S,
    /// Progress bar advanced once per file block
    pub progress: Arc<ProgressBar>,
}

impl<'a, S: FileSource + ?Sized> Assembler<'a, S> {
    pub fn new(config: &'a Config, source: &'a S, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            source,
            progress,
        }
    }

    /// The single event sequence both sections are rendered from
    pub fn events(&self) -> Result<Vec<TraversalEvent>> {
        walk(self.source, self.config)
    }

    /// Write the full artifact for `events`
    pub fn render<W: ArtifactWriter + ?Sized>(
        &self,
        events: &[TraversalEvent],
        writer: &mut W,
    ) -> Result<RunStatistics> {
        let mut stats = RunStatistics::default();
        let file_count = events
            .iter()
            .filter(|e| matches!(e, TraversalEvent::FileVisited { .. }))
            .count();
        self.progress.set_length(file_count as u64);

        writer.preamble()?;
        writer.begin_tree()?;
        for line in tree_lines(&self.config.root, events) {
            writer.tree_line(&line)?;
        }
        writer.end_tree()?;

        writer.begin_contents()?;
        let contents = ContentRenderer::new(self.source, &self.config.root);
        for event in events {
            if let TraversalEvent::DirectoryEntered { .. } = event {
                stats.directories += 1;
            }
            if let Some(block) = contents.block(event) {
                self.progress
                    .set_message(format!("Current file: {}", block.relative_path));
                stats.record(&block);
                writer.file_block(&block)?;
                self.progress.inc(1);
            }
        }
        writer.end_contents()?;
        writer.finish()?;

        Ok(stats)
    }

    /// Walk the tree and write the artifact to `config.output_file` in the
    /// format its extension selects. The output file is only created once
    /// the root has been listed.
    pub fn write(&self) -> Result<RunStatistics> {
        let events = self.events()?;
        let file = BufWriter::new(File::create(&self.config.output_file)?);

        match self.config.output_format() {
            OutputFormat::Text => self.render(&events, &mut TextWriter::new(file)),
            OutputFormat::Docx => self.render(&events, &mut DocxWriter::new(file)?),
        }
    }
}
