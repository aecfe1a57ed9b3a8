use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use super::export::{ExportError, ExportSheet, SheetCell};

const SHEET_NAME: &str = "Overview";

/// Write the sheet as an `.xlsx` workbook.
///
/// Row 0 holds the headers; data rows follow. Returns the number of data
/// rows written.
pub fn write_xlsx(sheet: &ExportSheet, path: &Path) -> Result<usize, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let body = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();

    for (col, (title, width)) in sheet.headers.iter().zip(&sheet.widths).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, title, &header)?;
        worksheet.set_column_width(col, *width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (r, row) in sheet.rows.iter().enumerate() {
        let xl_row = r as u32 + 1;
        for (c, cell) in row.iter().enumerate() {
            let col = c as u16;
            match cell {
                SheetCell::Text(text) => {
                    worksheet.write_string_with_format(xl_row, col, text, &body)?;
                }
                SheetCell::Number(n) => {
                    worksheet.write_number_with_format(xl_row, col, *n as f64, &body)?;
                }
                SheetCell::Covered => {}
            }
        }
    }

    for merge in &sheet.merges {
        let text = sheet.rows[merge.first_row][merge.col].as_text();
        worksheet.merge_range(
            merge.first_row as u32 + 1,
            merge.col as u16,
            merge.last_row as u32 + 1,
            merge.col as u16,
            &text,
            &body,
        )?;
    }

    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = sheet.row_count(), "exported overview spreadsheet");
    Ok(sheet.row_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::export::build_sheet;
    use crate::layout::tests::two_projects;
    use crate::model::DisplaySchema;

    #[test]
    fn writes_a_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overview.xlsx");
        let sheet = build_sheet(Some(&two_projects()), &DisplaySchema::default()).unwrap();

        assert_eq!(write_xlsx(&sheet, &path).unwrap(), 5);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
