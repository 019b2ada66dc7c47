//! Tabular batch ingestion
//!
//! Parses a delimited batch submission into `PartyRecord`s. Headers are
//! matched case-insensitively against a synonym table so exports from
//! different registers land on the same columns; quoted fields (including
//! doubled-quote escaping) are handled by the csv reader.

use crate::error::{Result, ServiceError};
use screening_core::{PartyRecord, PartyType};
use std::io;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    id: Option<usize>,
    name: Option<usize>,
    party_type: Option<usize>,
    dob: Option<usize>,
    country: Option<usize>,
}

// Lowercase with spaces/underscores/hyphens removed, so "Full Name",
// "full_name" and "fullname" all land on the same key
fn canonical_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect()
}

fn map_columns(headers: &csv::StringRecord) -> Result<ColumnMap> {
    let mut map = ColumnMap::default();
    for (position, raw) in headers.iter().enumerate() {
        match canonical_header(raw).as_str() {
            "id" | "recordid" | "reference" => map.id.get_or_insert(position),
            "name" | "fullname" => map.name.get_or_insert(position),
            "type" | "entitytype" => map.party_type.get_or_insert(position),
            "dob" | "dateofbirth" | "birthdate" => map.dob.get_or_insert(position),
            "country" | "nationality" | "jurisdiction" => map.country.get_or_insert(position),
            other => {
                debug!("Ignoring unrecognized column: {other}");
                continue;
            }
        };
    }

    if map.name.is_none() {
        return Err(ServiceError::Format(
            "missing required column: name (or 'full name')".to_string(),
        ));
    }
    Ok(map)
}

fn parse_party_type(raw: &str) -> PartyType {
    match canonical_header(raw).as_str() {
        "company" => PartyType::Company,
        // "individual" and anything unrecognized fall back to the default
        _ => PartyType::Individual,
    }
}

fn field(row: &csv::StringRecord, position: Option<usize>) -> Option<&str> {
    position
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Parse a batch submission into party records
///
/// Rows with blank names are filtered out (with a warning); a submission
/// with no header row, no data rows, or no valid rows at all is a format
/// error. When no id column is present, ids default to the 1-based data-row
/// number.
pub fn parse_batch<R: io::Read>(reader: R) -> Result<Vec<PartyRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ServiceError::Format(format!("unreadable header row: {e}")))?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ServiceError::Format(
            "expected a header row and at least one data row".to_string(),
        ));
    }

    let columns = map_columns(&headers)?;
    let mut records = Vec::new();
    let mut rows = 0usize;

    for (index, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| ServiceError::Format(format!("malformed row: {e}")))?;
        rows += 1;

        let name = match field(&row, columns.name) {
            Some(name) => name.to_string(),
            None => {
                warn!("Skipping row {} with blank name", index + 1);
                continue;
            }
        };

        let id = field(&row, columns.id)
            .map(str::to_string)
            .unwrap_or_else(|| (index + 1).to_string());

        records.push(PartyRecord {
            id,
            name,
            party_type: field(&row, columns.party_type)
                .map(parse_party_type)
                .unwrap_or_default(),
            dob: field(&row, columns.dob).map(str::to_string),
            country: field(&row, columns.country).map(str::to_string),
        });
    }

    if rows == 0 {
        return Err(ServiceError::Format(
            "expected a header row and at least one data row".to_string(),
        ));
    }
    if records.is_empty() {
        return Err(ServiceError::Format(
            "no valid records: every row has a blank name".to_string(),
        ));
    }

    Ok(records)
}
