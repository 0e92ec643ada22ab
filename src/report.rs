/*!
 * Reporting functionality for dirdoc
 *
 * Collects per-run statistics while the artifact is written and renders
 * them as console tables using the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::config::OutputFormat;
use crate::types::{FileBlock, FileContent};
use crate::utils::format_file_size;

/// Information about a documented file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics gathered while writing one artifact
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    /// Directories drawn in the tree
    pub directories: usize,
    /// Files with a content block
    pub files_documented: usize,
    /// Files whose content could not be read
    pub unreadable_files: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters
    pub total_chars: usize,
    /// Total decoded bytes
    pub total_bytes: u64,
    /// Details for each file, in traversal order
    pub file_details: Vec<(String, FileReportInfo)>,
}

impl RunStatistics {
    /// Account for one written file block
    pub fn record(&mut self, block: &FileBlock) {
        self.files_documented += 1;
        let info = match &block.content {
            FileContent::Text(text) => {
                self.total_bytes += text.len() as u64;
                FileReportInfo {
                    lines: text.lines().count(),
                    chars: text.chars().count(),
                }
            }
            FileContent::Unreadable(_) => {
                self.unreadable_files += 1;
                FileReportInfo::default()
            }
        };
        self.total_lines += info.lines;
        self.total_chars += info.chars;
        self.file_details.push((block.relative_path.clone(), info));
    }
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Artifact format
    pub format: OutputFormat,
    /// Time taken to walk and write
    pub duration: Duration,
    /// Collected statistics
    pub statistics: RunStatistics,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.rsplit('/') {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let format = match report.format {
            OutputFormat::Text => "Plain text",
            OutputFormat::Docx => "DOCX",
        };

        let rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "🧾 Format".to_string(),
                value: format.to_string(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📁 Directories".to_string(),
                value: self.format_number(stats.directories),
            },
            SummaryRow {
                key: "📄 Files Documented".to_string(),
                value: self.format_number(stats.files_documented),
            },
            SummaryRow {
                key: "⚠️ Unreadable Files".to_string(),
                value: self.format_number(stats.unreadable_files),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(stats.total_lines),
            },
            SummaryRow {
                key: "📦 Content Size".to_string(),
                value: format_file_size(stats.total_bytes),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let details = &report.statistics.file_details;

        // Largest first; stable sort keeps traversal order among equals
        let mut files: Vec<_> = details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let files_to_show = if details.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                chars: self.format_number(info.chars),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);
        let summary_title = "✅  DOCUMENTATION COMPLETE";

        if report.statistics.file_details.is_empty() {
            return format!("{}\n{}", summary_title, summary_table);
        }

        let files_table = self.create_files_table(report);
        let files_title = if report.statistics.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  DOCUMENTED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(path: &str, content: FileContent) -> FileBlock {
        FileBlock {
            relative_path: path.to_string(),
            depth: 0,
            content,
        }
    }

    #[test]
    fn test_record_counts_lines_and_failures() {
        let mut stats = RunStatistics::default();
        stats.record(&block("a.txt", FileContent::Text("one\ntwo\n".to_string())));
        stats.record(&block("b.txt", FileContent::Unreadable("denied".to_string())));

        assert_eq!(stats.files_documented, 2);
        assert_eq!(stats.unreadable_files, 1);
        assert_eq!(stats.total_lines, 2);
        assert_eq!(stats.total_chars, 8);
        assert_eq!(stats.file_details[0].0, "a.txt");
    }

    #[test]
    fn test_console_report_lists_files() {
        let mut statistics = RunStatistics::default();
        statistics.record(&block("src/main.rs", FileContent::Text("fn main() {}".into())));
        let report = ScanReport {
            output_file: "out.txt".to_string(),
            format: OutputFormat::Text,
            duration: Duration::from_millis(5),
            statistics,
        };

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);

        assert!(text.contains("src/main.rs"));
        assert!(text.contains("out.txt"));
        assert!(text.contains("Plain text"));
    }

    #[test]
    fn test_format_path_keeps_tail() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_path("a/b.rs", 60), "a/b.rs");
        assert_eq!(
            reporter.format_path("very/long/directory/name/file.rs", 16),
            ".../name/file.rs"
        );
    }
}
