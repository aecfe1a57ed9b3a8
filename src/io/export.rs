//! Tabular form of the filtered overview, shared by the XLSX and CSV writers.

use crate::model::schema::cell_text;
use crate::model::{ColumnKey, DisplaySchema, ProjectGroup};

/// Default file name offered when saving the spreadsheet.
pub const EXPORT_FILE_NAME: &str = "Task Overview.xlsx";

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    /// Name of the file-dialog filter.
    pub fn filter_name(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "Excel Workbook",
            ExportFormat::Csv => "CSV Files",
        }
    }

    /// File name offered by the save dialog.
    pub fn default_file_name(self) -> String {
        match self {
            ExportFormat::Xlsx => EXPORT_FILE_NAME.to_string(),
            ExportFormat::Csv => EXPORT_FILE_NAME.replace(".xlsx", ".csv"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export: the filtered overview is empty")]
    Empty,
    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("export file error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(i64),
    /// Hidden under a vertical merge starting above.
    Covered,
}

impl SheetCell {
    pub fn as_text(&self) -> String {
        match self {
            SheetCell::Text(s) => s.clone(),
            SheetCell::Number(n) => n.to_string(),
            SheetCell::Covered => String::new(),
        }
    }
}

/// A vertical merge over data rows `first_row..=last_row` of column `col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    pub col: usize,
    pub first_row: usize,
    pub last_row: usize,
}

/// Header, data rows and merges of the export. Row indices exclude the header.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSheet {
    pub headers: Vec<String>,
    /// Column widths in characters.
    pub widths: Vec<f64>,
    pub rows: Vec<Vec<SheetCell>>,
    pub merges: Vec<MergeSpan>,
}

impl ExportSheet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Flatten the filtered projects into one row per task.
///
/// Project-level columns are written on the first row of each project and
/// merged down over its remaining rows. `None` (no search run yet) and an
/// empty set both fail with [`ExportError::Empty`].
pub fn build_sheet(
    projects: Option<&[ProjectGroup]>,
    schema: &DisplaySchema,
) -> Result<ExportSheet, ExportError> {
    let projects = match projects {
        Some(p) if p.iter().any(|g| !g.task_slice.is_empty()) => p,
        _ => return Err(ExportError::Empty),
    };

    let headers = schema
        .columns
        .iter()
        .map(|c| match c.key {
            ColumnKey::State => DisplaySchema::status_legend(&c.label),
            _ => c.label.clone(),
        })
        .collect();
    let widths = schema
        .columns
        .iter()
        .map(|c| (f64::from(c.width) * 120.0).max(10.0))
        .collect();

    let mut rows = Vec::new();
    let mut merges = Vec::new();
    for project in projects {
        let first_row = rows.len();
        for (i, task) in project.task_slice.iter().enumerate() {
            let row = schema
                .columns
                .iter()
                .map(|c| {
                    if c.key.is_project_level() && i > 0 {
                        SheetCell::Covered
                    } else if c.key == ColumnKey::State {
                        SheetCell::Number(task.state.code())
                    } else {
                        SheetCell::Text(cell_text(c.key, project, task))
                    }
                })
                .collect();
            rows.push(row);
        }
        let span = project.row_span();
        if span > 1 {
            for (col, column) in schema.columns.iter().enumerate() {
                if column.key.is_project_level() {
                    merges.push(MergeSpan {
                        col,
                        first_row,
                        last_row: first_row + span - 1,
                    });
                }
            }
        }
    }

    Ok(ExportSheet {
        headers,
        widths,
        rows,
        merges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::two_projects;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_names_follow_the_format() {
        assert_eq!(ExportFormat::Xlsx.default_file_name(), "Task Overview.xlsx");
        assert_eq!(ExportFormat::Csv.default_file_name(), "Task Overview.csv");
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }

    #[test]
    fn empty_or_missing_set_is_refused() {
        let schema = DisplaySchema::default();
        assert!(matches!(build_sheet(None, &schema), Err(ExportError::Empty)));
        assert!(matches!(build_sheet(Some(&[]), &schema), Err(ExportError::Empty)));
    }

    #[test]
    fn one_row_per_task_with_project_columns_merged() {
        let projects = two_projects();
        let sheet = build_sheet(Some(&projects), &DisplaySchema::default()).unwrap();

        assert_eq!(sheet.row_count(), 5);
        assert_eq!(
            sheet.merges,
            vec![
                MergeSpan { col: 0, first_row: 0, last_row: 2 },
                MergeSpan { col: 1, first_row: 0, last_row: 2 },
                MergeSpan { col: 2, first_row: 0, last_row: 2 },
                MergeSpan { col: 0, first_row: 3, last_row: 4 },
                MergeSpan { col: 1, first_row: 3, last_row: 4 },
                MergeSpan { col: 2, first_row: 3, last_row: 4 },
            ]
        );
        assert_eq!(sheet.rows[0][0], SheetCell::Text("Apollo".into()));
        assert_eq!(sheet.rows[1][0], SheetCell::Covered);
        assert_eq!(sheet.rows[3][2], SheetCell::Text("Bob".into()));
        assert_eq!(sheet.rows[1][3], SheetCell::Text("Task number 11".into()));
        assert_eq!(sheet.rows[2][7], SheetCell::Number(3));
    }

    #[test]
    fn status_header_documents_codes() {
        let sheet = build_sheet(Some(&two_projects()), &DisplaySchema::default()).unwrap();
        assert_eq!(
            sheet.headers.last().map(String::as_str),
            Some("Status (0=pending, 1=in progress, 2=testing, 3=done)")
        );
        assert_eq!(sheet.headers.len(), sheet.widths.len());
    }

    #[test]
    fn exporting_twice_gives_identical_layout() {
        let projects = two_projects();
        let schema = DisplaySchema::default();
        let a = build_sheet(Some(&projects), &schema).unwrap();
        let b = build_sheet(Some(&projects), &schema).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_task_projects_need_no_merge() {
        let mut projects = two_projects();
        projects[1].task_slice.truncate(1);
        let sheet = build_sheet(Some(&projects[1..]), &DisplaySchema::default()).unwrap();
        assert_eq!(sheet.row_count(), 1);
        assert!(sheet.merges.is_empty());
    }
}
