use crate::error::DashboardError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Accepted upload formats. Anything else is rejected before the API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
    Xlsx,
    Xls,
}

impl FileKind {
    pub fn from_name(name: &str) -> Option<FileKind> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "json" => Some(FileKind::Json),
            "xlsx" => Some(FileKind::Xlsx),
            "xls" => Some(FileKind::Xls),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            FileKind::Csv => "text/csv",
            FileKind::Json => "application/json",
            FileKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            FileKind::Xls => "application/vnd.ms-excel",
        }
    }
}

/// A user-selected data file, read once at intake.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub kind: FileKind,
    pub text: String,
}

impl UploadedFile {
    /// "123.45 KB" / "1.20 MB", matching the upload-info line.
    pub fn size_label(&self) -> String {
        let kb = self.size_bytes as f64 / 1024.0;
        if kb > 1024.0 {
            format!("{:.2} MB", kb / 1024.0)
        } else {
            format!("{kb:.2} KB")
        }
    }
}

/// Validate and read a data file. csv/json are text; xlsx/xls bytes are
/// taken lossily (spreadsheet cells are not parsed, the raw content goes to
/// the model as-is).
pub fn read_upload(path: &Path) -> Result<UploadedFile, DashboardError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let kind = FileKind::from_name(&name).ok_or_else(|| {
        DashboardError::validation(
            "Invalid File Type",
            "Please upload a CSV, JSON, or Excel file.",
        )
    })?;

    debug!("Reading {} as {}", name, kind.mime());

    let bytes = fs::read(path).map_err(|e| {
        DashboardError::validation(
            "File Not Ready",
            &format!("Could not read {}: {e}", path.display()),
        )
    })?;

    Ok(UploadedFile {
        name,
        size_bytes: bytes.len() as u64,
        kind,
        text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(FileKind::from_name("metrics.CSV"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_name("export.Json"), Some(FileKind::Json));
        assert_eq!(FileKind::from_name("book.xlsx"), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_name("legacy.XLS"), Some(FileKind::Xls));
        assert_eq!(FileKind::from_name("notes.txt"), None);
        assert_eq!(FileKind::from_name("no_extension"), None);
    }

    #[test]
    fn unsupported_type_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        match read_upload(&path) {
            Err(DashboardError::Validation { title, .. }) => {
                assert_eq!(title, "Invalid File Type")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn csv_reads_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        fs::write(&path, "page,views\n/home,120\n").unwrap();

        let upload = read_upload(&path).unwrap();
        assert_eq!(upload.kind, FileKind::Csv);
        assert_eq!(upload.name, "metrics.csv");
        assert!(upload.text.starts_with("page,views"));
    }

    #[test]
    fn size_label_switches_to_mb() {
        let small = UploadedFile {
            name: "a.csv".into(),
            size_bytes: 2048,
            kind: FileKind::Csv,
            text: String::new(),
        };
        assert_eq!(small.size_label(), "2.00 KB");

        let big = UploadedFile {
            size_bytes: 3 * 1024 * 1024,
            ..small
        };
        assert_eq!(big.size_label(), "3.00 MB");
    }
}
