use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::model::{Attributes, IndexRecord, SessionDescriptor};
use crate::writer::attribute_names;

use super::MetadataError;

/// Key column of every dataset-level index
pub const ID_COLUMN: &str = "id";

/// Row of a dataset-level index
pub trait IndexRow {
    /// Row key
    fn id(&self) -> i64;
    /// All other fields
    fn attributes(&self) -> &Attributes;
}

impl IndexRow for IndexRecord {
    fn id(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl IndexRow for SessionDescriptor {
    fn id(&self) -> i64 {
        self.session_id
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Write an index as CSV: `id` first, then every attribute name in sorted order.
///
/// Missing cells are left empty.
pub fn write_index_csv<W: Write, R: IndexRow>(writer: W, rows: &[R]) -> Result<(), MetadataError> {
    let names = attribute_names(rows.iter().map(|r| r.attributes()), &[ID_COLUMN]);
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![ID_COLUMN.to_string()];
    header.extend(names.iter().cloned());
    csv_writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.id().to_string()];
        for name in &names {
            record.push(match row.attributes().get(name) {
                Some(v) if !v.is_missing() => v.to_string(),
                _ => String::new(),
            });
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write an index to a CSV file
pub fn write_index_csv_file<P: AsRef<Path>, R: IndexRow>(
    path: P,
    rows: &[R],
) -> Result<(), MetadataError> {
    write_index_csv(File::create(path)?, rows)
}

/// Read the `id` column of a CSV index
pub fn read_index_ids<R: Read>(reader: R) -> Result<Vec<i64>, MetadataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let id_index = csv_reader
        .headers()?
        .iter()
        .position(|h| h.trim() == ID_COLUMN)
        .ok_or_else(|| MetadataError::MissingColumn(ID_COLUMN.to_string()))?;

    let mut ids = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let raw = record.get(id_index).unwrap_or("").trim();
        let id = raw.parse().map_err(|_| {
            MetadataError::InvalidFormat(format!("row {}: invalid id {:?}", line + 1, raw))
        })?;
        ids.push(id);
    }
    Ok(ids)
}

/// Read the `id` column of a CSV index file
pub fn read_index_ids_file<P: AsRef<Path>>(path: P) -> Result<Vec<i64>, MetadataError> {
    read_index_ids(BufReader::new(File::open(path)?))
}
