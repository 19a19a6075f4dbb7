//! Input adapter: file formats to the two shapes the parsers understand.
//!
//! # Responsibility
//! - Detect the import format from a file name.
//! - Decode text and simple grid encodings into [`ImportSource`].
//! - Rebuild line breaks from positioned PDF text runs.
//!
//! # Invariants
//! - Format dispatch happens once here; parsers never see file formats.
//! - Binary PDF and Excel payloads are never decoded in core.

use csv::ReaderBuilder;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// File formats accepted by the task importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    PlainText,
    Markdown,
    /// Needs an external text extractor, see [`join_text_runs`].
    Pdf,
    /// JSON array of rows, each an array of cells.
    JsonGrid,
    TabSeparated,
    CommaSeparated,
    /// `.xls`, `.xlsx`, `.ods`; needs an external spreadsheet decoder.
    Spreadsheet,
}

impl ImportFormat {
    /// Detects the format from a file name extension (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "text" => Ok(Self::PlainText),
            "md" | "markdown" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::JsonGrid),
            "tsv" | "tab" => Ok(Self::TabSeparated),
            "csv" => Ok(Self::CommaSeparated),
            "xls" | "xlsx" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Whether this format produces a grid rather than text.
    pub fn is_tabular(self) -> bool {
        matches!(
            self,
            Self::JsonGrid | Self::TabSeparated | Self::CommaSeparated | Self::Spreadsheet
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::JsonGrid => "json_grid",
            Self::TabSeparated => "tsv",
            Self::CommaSeparated => "csv",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

/// Decoding failure at the input boundary.
#[derive(Debug)]
pub enum SourceError {
    UnsupportedFormat(String),
    /// The format is valid but its bytes must be decoded by a collaborator.
    ExternalDecoderRequired(ImportFormat),
    InvalidUtf8(std::str::Utf8Error),
    InvalidGrid(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(name) => write!(f, "unsupported import file `{name}`"),
            Self::ExternalDecoderRequired(format) => write!(
                f,
                "`{}` input must be decoded to text or rows before import",
                format.as_str()
            ),
            Self::InvalidUtf8(err) => write!(f, "import file is not valid UTF-8: {err}"),
            Self::InvalidGrid(message) => write!(f, "invalid grid input: {message}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUtf8(err) => Some(err),
            _ => None,
        }
    }
}

/// Normalized parser input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// Text for the document parser (plain text, Markdown, extracted PDF).
    Text(String),
    /// Rows for the tabular parser, header row included.
    Grid(Vec<Vec<String>>),
}

impl ImportSource {
    /// Decodes raw file bytes for the given format.
    ///
    /// # Errors
    /// - [`SourceError::ExternalDecoderRequired`] for PDF and Excel.
    /// - [`SourceError::InvalidUtf8`] / [`SourceError::InvalidGrid`] for
    ///   malformed payloads.
    pub fn from_bytes(format: ImportFormat, bytes: &[u8]) -> Result<Self, SourceError> {
        match format {
            ImportFormat::PlainText | ImportFormat::Markdown => {
                Ok(Self::Text(decode_utf8(bytes)?.to_string()))
            }
            ImportFormat::JsonGrid => decode_json_grid(bytes).map(Self::Grid),
            ImportFormat::TabSeparated => decode_delimited(bytes, b'\t').map(Self::Grid),
            ImportFormat::CommaSeparated => decode_delimited(bytes, b',').map(Self::Grid),
            ImportFormat::Pdf | ImportFormat::Spreadsheet => {
                Err(SourceError::ExternalDecoderRequired(format))
            }
        }
    }

    /// Builds text input from positioned PDF text runs, one vector per page.
    pub fn from_pdf_pages(pages: &[Vec<TextRun>]) -> Self {
        Self::Text(join_text_runs(pages))
    }
}

/// A run of text placed on a PDF page at vertical position `y`.
///
/// `y` grows upward, as in PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub y: f32,
}

impl TextRun {
    pub fn new(text: impl Into<String>, y: f32) -> Self {
        Self {
            text: text.into(),
            y,
        }
    }
}

/// Reconstructs page text from text runs.
///
/// A line break is inserted whenever a run sits lower on the page than the
/// previous one. Pages are concatenated in order, each starting on a new line.
pub fn join_text_runs(pages: &[Vec<TextRun>]) -> String {
    let mut out = String::new();
    for (page_index, runs) in pages.iter().enumerate() {
        if page_index > 0 {
            out.push('\n');
        }
        let mut previous_y: Option<f32> = None;
        for run in runs {
            if previous_y.is_some_and(|y| run.y < y) {
                out.push('\n');
            }
            out.push_str(&run.text);
            previous_y = Some(run.y);
        }
    }
    out
}

fn decode_utf8(bytes: &[u8]) -> Result<&str, SourceError> {
    let text = std::str::from_utf8(bytes).map_err(SourceError::InvalidUtf8)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Reads delimiter-separated rows. Quoted cells may hold delimiters, line
/// breaks and doubled quotes; rows may have differing lengths.
fn decode_delimited(bytes: &[u8], delimiter: u8) -> Result<Vec<Vec<String>>, SourceError> {
    let text = decode_utf8(bytes)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|err| SourceError::InvalidGrid(format!("row {row_index}: {err}")))?;
        if record.len() == 1 && record.get(0) == Some("") {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn decode_json_grid(bytes: &[u8]) -> Result<Vec<Vec<String>>, SourceError> {
    let rows: Vec<Vec<Value>> = serde_json::from_slice(bytes)
        .map_err(|err| SourceError::InvalidGrid(err.to_string()))?;

    rows.into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            row.into_iter()
                .map(|value| match value {
                    Value::Null => Ok(String::new()),
                    Value::String(text) => Ok(text),
                    Value::Number(number) => Ok(number.to_string()),
                    Value::Bool(flag) => Ok(flag.to_string()),
                    Value::Array(_) | Value::Object(_) => Err(SourceError::InvalidGrid(format!(
                        "row {row_index} contains a nested value"
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{join_text_runs, ImportFormat, ImportSource, SourceError, TextRun};

    #[test]
    fn format_detection_uses_extension() {
        assert_eq!(
            ImportFormat::from_path("plan/Tasks.MD").unwrap(),
            ImportFormat::Markdown
        );
        assert_eq!(ImportFormat::from_path("a.txt").unwrap(), ImportFormat::PlainText);
        assert_eq!(ImportFormat::from_path("a.xlsx").unwrap(), ImportFormat::Spreadsheet);
        assert!(ImportFormat::from_path("a.json").unwrap().is_tabular());
        assert!(matches!(
            ImportFormat::from_path("archive.zip"),
            Err(SourceError::UnsupportedFormat(_))
        ));
        assert!(ImportFormat::from_path("README").is_err());
    }

    #[test]
    fn text_decoding_strips_bom_and_rejects_invalid_utf8() {
        let source =
            ImportSource::from_bytes(ImportFormat::Markdown, b"\xEF\xBB\xBF# Task: A").unwrap();
        assert_eq!(source, ImportSource::Text("# Task: A".to_string()));

        let err =
            ImportSource::from_bytes(ImportFormat::PlainText, &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, SourceError::InvalidUtf8(_)));
    }

    #[test]
    fn binary_formats_need_external_decoder() {
        let err = ImportSource::from_bytes(ImportFormat::Pdf, b"%PDF-1.7").unwrap_err();
        assert!(matches!(
            err,
            SourceError::ExternalDecoderRequired(ImportFormat::Pdf)
        ));
    }

    #[test]
    fn json_grid_stringifies_scalars() {
        let bytes = br#"[["title","priority"],["Pour slab",null,true,42]]"#;
        let source = ImportSource::from_bytes(ImportFormat::JsonGrid, bytes).unwrap();
        assert_eq!(
            source,
            ImportSource::Grid(vec![
                vec!["title".to_string(), "priority".to_string()],
                vec![
                    "Pour slab".to_string(),
                    String::new(),
                    "true".to_string(),
                    "42".to_string()
                ],
            ])
        );

        let err = ImportSource::from_bytes(ImportFormat::JsonGrid, br#"[[{"a":1}]]"#).unwrap_err();
        assert!(matches!(err, SourceError::InvalidGrid(_)));
    }

    #[test]
    fn tsv_keeps_empty_cells_and_skips_blank_lines() {
        let bytes = b"title\tpriority\r\n\r\nWeld\t\tDone\n";
        let source = ImportSource::from_bytes(ImportFormat::TabSeparated, bytes).unwrap();
        assert_eq!(
            source,
            ImportSource::Grid(vec![
                vec!["title".to_string(), "priority".to_string()],
                vec!["Weld".to_string(), String::new(), "Done".to_string()],
            ])
        );
    }

    #[test]
    fn tsv_quoted_cells_keep_line_breaks_and_quotes() {
        let bytes = b"title\tpriority\tstatus\tdescription\n\"Pour slab\"\tHigh\tBacklog\t\"Line one\nLine two\"\n\"6\"\" sleeve\"\tLow\n";
        let source = ImportSource::from_bytes(ImportFormat::TabSeparated, bytes).unwrap();
        let ImportSource::Grid(rows) = source else {
            panic!("expected grid");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "Pour slab");
        assert_eq!(rows[1][3], "Line one\nLine two");
        assert_eq!(rows[2], vec!["6\" sleeve".to_string(), "Low".to_string()]);
    }

    #[test]
    fn csv_is_decoded_in_core() {
        assert_eq!(
            ImportFormat::from_path("export.CSV").unwrap(),
            ImportFormat::CommaSeparated
        );
        let bytes = b"\xEF\xBB\xBFtitle,priority\r\n\"Brace, shore\",High\r\n";
        let source = ImportSource::from_bytes(ImportFormat::CommaSeparated, bytes).unwrap();
        assert_eq!(
            source,
            ImportSource::Grid(vec![
                vec!["title".to_string(), "priority".to_string()],
                vec!["Brace, shore".to_string(), "High".to_string()],
            ])
        );
    }

    #[test]
    fn text_runs_break_lines_when_y_decreases() {
        let pages = vec![
            vec![
                TextRun::new("# Task: ", 700.0),
                TextRun::new("Survey", 700.0),
                TextRun::new("**Priority:** High", 680.0),
            ],
            vec![TextRun::new("---", 720.0), TextRun::new("# Task: Grade", 700.0)],
        ];
        assert_eq!(
            join_text_runs(&pages),
            "# Task: Survey\n**Priority:** High\n---\n# Task: Grade"
        );
        assert_eq!(join_text_runs(&[]), "");
    }
}
