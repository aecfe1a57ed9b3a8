use std::path::Path;

use super::export::{ExportError, ExportSheet};

/// Export the sheet to a semicolon-delimited CSV file.
///
/// CSV has no merged cells: project columns appear on the first row of
/// each project and stay empty below it. Returns the number of rows
/// written, header excluded.
pub fn write_csv(sheet: &ExportSheet, path: &Path) -> Result<usize, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        wtr.write_record(row.iter().map(|cell| cell.as_text()))?;
    }

    wtr.flush()?;
    tracing::info!(path = %path.display(), rows = sheet.row_count(), "exported overview CSV");
    Ok(sheet.row_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::export::build_sheet;
    use crate::layout::tests::two_projects;
    use crate::model::DisplaySchema;

    #[test]
    fn covered_cells_are_left_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overview.csv");
        let sheet = build_sheet(Some(&two_projects()), &DisplaySchema::default()).unwrap();
        assert_eq!(write_csv(&sheet, &path).unwrap(), 5);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Project;Deadline;Leader;Task;"));
        assert!(lines[1].starts_with("Apollo;2024-03-31;Ann，Cid;Task number 10;"));
        assert!(lines[2].starts_with(";;;Task number 11;"));
        assert!(lines[1].ends_with(";0"));
    }
}
