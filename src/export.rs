use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::ResultItem;

/// Writes `items` to a new CSV file at `path`, one row per item with the
/// fields `title, url, repository_url`. Every field is quoted and there is no
/// header row. Refuses to touch an existing file.
pub fn export_csv<'a, P, I>(path: P, items: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a ResultItem>,
{
    let path = path.as_ref();
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => Error::OutputExists(path.to_path_buf()),
            _ => Error::Io(e),
        })?;

    let mut writer = BufWriter::new(file);
    let mut rows = 0;
    for item in items {
        write_row(
            &mut writer,
            &[
                item.title.as_str(),
                item.url.as_str(),
                item.repository_url.as_str(),
            ],
        )?;
        rows += 1;
    }
    writer.flush()?;

    tracing::info!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}

fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let row: Vec<String> = fields.iter().map(|f| quote(f)).collect();
    write!(writer, "{}\r\n", row.join(","))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
