/*!
 * DOCX writer for dirdoc
 *
 * Builds `word/document.xml` with quick-xml while the artifact is rendered
 * and packages it with static styles and relationships into a zip archive
 * on `finish`.
 */

use std::io::{Seek, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::Result;
use crate::types::{FileBlock, FileContent};
use crate::writer::{ArtifactWriter, CONTENT_ENDS, PREAMBLE, TITLE, TREE_BEGINS, TREE_ENDS};

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// Normal is Arial 11pt (sizes are in half-points)
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:eastAsia="Arial" w:cs="Arial"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200"/><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:style></w:styles>"#;

/// Heading shown above the content section in DOCX artifacts
pub const CONTENT_BEGINS: &str = "File Content Begins -->";

/// Word document artifact
pub struct DocxWriter<W: Write + Seek> {
    sink: Option<W>,
    body: Writer<Vec<u8>>,
}

impl<W: Write + Seek> DocxWriter<W> {
    /// Start a document that will be packaged into `sink`
    pub fn new(sink: W) -> Result<Self> {
        let mut body = Writer::new(Vec::new());
        body.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut document = BytesStart::new("w:document");
        document.push_attribute(("xmlns:w", WORDPROCESSING_NS));
        body.write_event(Event::Start(document))?;
        body.write_event(Event::Start(BytesStart::new("w:body")))?;

        Ok(Self {
            sink: Some(sink),
            body,
        })
    }

    fn heading(&mut self, text: &str, level: u8) -> Result<()> {
        self.paragraph(text, Some(&format!("Heading{}", level)), false)
    }

    /// Write one `<w:p>`, optionally styled and left-aligned
    fn paragraph(&mut self, text: &str, style: Option<&str>, align_left: bool) -> Result<()> {
        self.body.write_event(Event::Start(BytesStart::new("w:p")))?;

        if style.is_some() || align_left {
            self.body.write_event(Event::Start(BytesStart::new("w:pPr")))?;
            if let Some(style) = style {
                let mut tag = BytesStart::new("w:pStyle");
                tag.push_attribute(("w:val", style));
                self.body.write_event(Event::Empty(tag))?;
            }
            if align_left {
                let mut tag = BytesStart::new("w:jc");
                tag.push_attribute(("w:val", "left"));
                self.body.write_event(Event::Empty(tag))?;
            }
            self.body.write_event(Event::End(BytesEnd::new("w:pPr")))?;
        }

        self.run(text)?;
        self.body.write_event(Event::End(BytesEnd::new("w:p")))?;
        Ok(())
    }

    /// Write `text` as a run: newlines become breaks, tabs become tab
    /// elements and characters XML cannot carry are dropped.
    fn run(&mut self, text: &str) -> Result<()> {
        self.body.write_event(Event::Start(BytesStart::new("w:r")))?;

        let mut segment = String::new();
        for c in text.chars() {
            match c {
                '\n' => {
                    self.text(&segment)?;
                    segment.clear();
                    self.body.write_event(Event::Empty(BytesStart::new("w:br")))?;
                }
                '\t' => {
                    self.text(&segment)?;
                    segment.clear();
                    self.body.write_event(Event::Empty(BytesStart::new("w:tab")))?;
                }
                c if is_xml_char(c) => segment.push(c),
                _ => {}
            }
        }
        self.text(&segment)?;

        self.body.write_event(Event::End(BytesEnd::new("w:r")))?;
        Ok(())
    }

    fn text(&mut self, segment: &str) -> Result<()> {
        if segment.is_empty() {
            return Ok(());
        }
        let mut tag = BytesStart::new("w:t");
        tag.push_attribute(("xml:space", "preserve"));
        self.body.write_event(Event::Start(tag))?;
        self.body.write_event(Event::Text(BytesText::new(segment)))?;
        self.body.write_event(Event::End(BytesEnd::new("w:t")))?;
        Ok(())
    }
}

/// Characters allowed in XML 1.0 text, minus the line and tab characters
/// handled separately
fn is_xml_char(c: char) -> bool {
    !matches!(c, '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

impl<W: Write + Seek> ArtifactWriter for DocxWriter<W> {
    fn preamble(&mut self) -> Result<()> {
        self.heading(TITLE, 1)?;
        self.paragraph(&PREAMBLE.join(" "), None, false)
    }

    fn begin_tree(&mut self) -> Result<()> {
        self.heading(TREE_BEGINS, 2)
    }

    fn tree_line(&mut self, line: &str) -> Result<()> {
        self.paragraph(line, None, false)
    }

    fn end_tree(&mut self) -> Result<()> {
        self.heading(TREE_ENDS, 2)
    }

    fn begin_contents(&mut self) -> Result<()> {
        self.heading(CONTENT_BEGINS, 2)
    }

    fn file_block(&mut self, block: &FileBlock) -> Result<()> {
        self.heading(&format!("[File Begins] {}", block.relative_path), 3)?;
        match &block.content {
            FileContent::Text(text) => self.paragraph(text, None, true)?,
            FileContent::Unreadable(reason) => {
                self.paragraph(&format!("Error reading file: {}", reason), None, true)?
            }
        }
        self.heading(&format!("[File Ends] {}", block.relative_path), 3)
    }

    fn end_contents(&mut self) -> Result<()> {
        self.heading(CONTENT_ENDS, 2)
    }

    fn finish(&mut self) -> Result<()> {
        let Some(sink) = self.sink.take() else {
            return Ok(());
        };

        self.body.write_event(Event::End(BytesEnd::new("w:body")))?;
        self.body.write_event(Event::End(BytesEnd::new("w:document")))?;
        let document = std::mem::take(self.body.get_mut());

        // Fixed timestamps keep repeated runs byte-identical
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(sink);
        let parts: [(&str, &[u8]); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
            ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
            ("word/styles.xml", STYLES_XML.as_bytes()),
            ("word/document.xml", &document),
        ];
        for (name, bytes) in parts {
            zip.start_file(name, options)?;
            zip.write_all(bytes)?;
        }

        let mut sink = zip.finish()?;
        sink.flush()?;
        Ok(())
    }
}
