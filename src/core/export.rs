// Pickup Tracker - core/export.rs
//
// Export of the current record set as XLSX (primary), CSV or JSON.
// Core layer: writes to any Write trait object; opening the destination
// file is the caller's job.
//
// Every format is a direct projection of the records: no filtering and no
// reformatting (dates are written as the stored ISO string).

use crate::core::model::Record;
use crate::util::constants;
use crate::util::error::ExportError;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::Write;
use std::path::Path;

/// Column widths (characters) for the XLSX sheet, in header order.
const XLSX_COLUMN_WIDTHS: [f64; 5] = [20.0, 28.0, 28.0, 18.0, 12.0];

/// Output format, chosen from the destination file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// Format for `path` by extension. Unknown extensions export as XLSX.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => ExportFormat::Csv,
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Xlsx,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "XLSX",
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Export `records` in `format`. Returns the number of records written.
pub fn export<W: Write>(
    format: ExportFormat,
    records: &[Record],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    if records.len() > constants::MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count: records.len(),
            max: constants::MAX_EXPORT_RECORDS,
        });
    }
    match format {
        ExportFormat::Xlsx => export_xlsx(records, writer, export_path),
        ExportFormat::Csv => export_csv(records, writer, export_path),
        ExportFormat::Json => export_json(records, writer, export_path),
    }
}

/// The exported cells of one record, in header order.
fn project(record: &Record) -> [&str; 5] {
    [
        &record.reference,
        &record.last_event,
        record.last_event_date.as_deref().unwrap_or(""),
        &record.invoice_value,
        record.status.label(),
    ]
}

/// Export records to a single-sheet XLSX workbook.
pub fn export_xlsx<W: Write>(
    records: &[Record],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let xlsx_err = |source: XlsxError| ExportError::Xlsx {
        path: export_path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(constants::EXPORT_SHEET_NAME)
        .map_err(xlsx_err)?;

    for (col, (label, width)) in constants::EXPORT_HEADERS
        .iter()
        .zip(XLSX_COLUMN_WIDTHS)
        .enumerate()
    {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, *label, &header_format)
            .map_err(xlsx_err)?;
        sheet.set_column_width(col, width).map_err(xlsx_err)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, value) in project(record).iter().enumerate() {
            sheet
                .write_string(row, col as u16, *value)
                .map_err(xlsx_err)?;
        }
    }

    let buffer = workbook.save_to_buffer().map_err(xlsx_err)?;
    writer
        .write_all(&buffer)
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    tracing::debug!(records = records.len(), bytes = buffer.len(), "XLSX written");
    Ok(records.len())
}

/// Export records to CSV with the same header and projection as XLSX.
pub fn export_csv<W: Write>(
    records: &[Record],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |source: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(constants::EXPORT_HEADERS)
        .map_err(csv_err)?;

    for record in records {
        csv_writer.write_record(project(record)).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Export records to JSON (array of objects).
pub fn export_json<W: Write>(
    records: &[Record],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Status;
    use std::path::PathBuf;

    fn make_record(reference: &str, status: Status) -> Record {
        Record {
            reference: reference.to_string(),
            last_event: "Coletado".to_string(),
            last_event_date: Some("2023-03-15T03:00:00.000Z".to_string()),
            service_type: "MR Coleta".to_string(),
            invoice_value: "R$\u{a0}123,45".to_string(),
            status,
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("a.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("a.xlsx")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("noext")), ExportFormat::Xlsx);
    }

    #[test]
    fn test_csv_export() {
        let records = vec![
            make_record("REF1", Status::Pending),
            make_record("REF2", Status::Lost),
        ];
        let mut buf = Vec::new();
        let count = export_csv(&records, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("Reference,Last Event,Last Event Date,Invoice Value,Status")
        );
        // The currency text contains a comma, so it is quoted.
        assert_eq!(
            lines.next(),
            Some("REF1,Coletado,2023-03-15T03:00:00.000Z,\"R$\u{a0}123,45\",Pending")
        );
        assert!(output.contains("REF2"));
        assert!(output.contains("Lost"));
    }

    #[test]
    fn test_csv_missing_date_is_empty_cell() {
        let mut record = make_record("REF1", Status::Pending);
        record.last_event_date = None;
        let mut buf = Vec::new();
        export_csv(&[record], &mut buf, &PathBuf::from("out.csv")).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("REF1,Coletado,,"));
    }

    #[test]
    fn test_json_export() {
        let records = vec![make_record("REF1", Status::Resolved)];
        let mut buf = Vec::new();
        let count = export_json(&records, &mut buf, &PathBuf::from("out.json")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("\"reference\": \"REF1\""));
        assert!(output.contains("\"status\": \"Resolved\""));
        assert!(!output.contains("service_type"));
    }

    #[test]
    fn test_xlsx_export_produces_zip_container() {
        let records = vec![make_record("REF1", Status::Pending)];
        let mut buf = Vec::new();
        let count = export_xlsx(&records, &mut buf, &PathBuf::from("out.xlsx")).unwrap();
        assert_eq!(count, 1);
        assert!(buf.starts_with(b"PK"), "xlsx must be a zip archive");
    }

    #[test]
    fn test_export_does_not_touch_records() {
        let records = vec![make_record("REF1", Status::Lost)];
        let before = records.clone();
        let mut buf = Vec::new();
        export(ExportFormat::Xlsx, &records, &mut buf, Path::new("out.xlsx")).unwrap();
        assert_eq!(records, before);
    }
}
