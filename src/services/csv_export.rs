use chrono::{DateTime, Local, Utc};
use csv::{Terminator, WriterBuilder};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Time zone used to render `datetime` columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvTimeZone {
    /// The server process's local zone.
    #[default]
    Local,
    Utc,
}

impl std::str::FromStr for CsvTimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(CsvTimeZone::Local),
            "utc" => Ok(CsvTimeZone::Utc),
            other => Err(format!("unknown CSV time zone '{}', expected 'local' or 'utc'", other)),
        }
    }
}

impl CsvTimeZone {
    /// `YYYY-MM-DD HH:MM` in this zone.
    pub fn format_minutes(&self, ts: &DateTime<Utc>) -> String {
        const FORMAT: &str = "%Y-%m-%d %H:%M";
        match self {
            CsvTimeZone::Local => ts.with_timezone(&Local).format(FORMAT).to_string(),
            CsvTimeZone::Utc => ts.format(FORMAT).to_string(),
        }
    }
}

/// Writes a header and rows with standard CSV quoting, `\n` line endings.
pub fn write_csv<I>(header: &[&str], rows: I) -> Result<String, CsvExportError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
