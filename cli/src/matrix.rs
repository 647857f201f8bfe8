//! Reads an adjacency matrix (CSV or XLSX) into a set of [`Link`]s.
//!
//! Format: a header row of target concept names starting at column 2, a header column of source
//! concept names starting at row 2, and interior cells holding `+1`/`-1` polarities (or "no
//! edge"). File type is selected by extension; sheet selection (`--sheet`) only applies to XLSX.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, DataType, Reader};
use cld_core::cell::{parse_numeric_cell, parse_string_cell, Cell};
use cld_core::{ConceptRegistry, Error, Influence, Link};

/// Which worksheet to read from an XLSX workbook.
#[derive(Debug, Clone)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl SheetSelector {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(raw.to_owned()),
        }
    }
}

/// Reads `path` (CSV or XLSX, by extension) into a deduplicated set of [`Link`]s, registering
/// concept names in `registry` as they're encountered.
pub fn load(
    path: &Path,
    sheet: &SheetSelector,
    registry: &mut ConceptRegistry,
) -> Result<HashSet<Link>, Error> {
    if !path.exists() {
        return Err(Error::InputMissing {
            path: path.display().to_string(),
        });
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_csv(path, registry),
        Some("xlsx") | Some("xlsm") | Some("xls") => load_xlsx(path, sheet, registry),
        other => Err(Error::InputFormat {
            detail: format!("unsupported file extension: {other:?}"),
        }),
    }
}

fn load_csv(path: &Path, registry: &mut ConceptRegistry) -> Result<HashSet<Link>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::InputFormat {
            detail: e.to_string(),
        })?;

    let mut records = reader.records();
    let header = records
        .next()
        .ok_or_else(|| Error::InputFormat {
            detail: "empty file, expected a header row".to_owned(),
        })?
        .map_err(|e| Error::InputFormat {
            detail: e.to_string(),
        })?;
    let target_names: Vec<String> = header.iter().skip(1).map(|s| s.trim().to_owned()).collect();
    if target_names.is_empty() {
        return Err(Error::InputFormat {
            detail: "header row has no target columns".to_owned(),
        });
    }

    let mut links = HashSet::new();
    for record in records {
        let record = record.map_err(|e| Error::InputFormat {
            detail: e.to_string(),
        })?;
        let mut fields = record.iter();
        let source_name = fields
            .next()
            .ok_or_else(|| Error::InputFormat {
                detail: "row missing a source name column".to_owned(),
            })?
            .trim()
            .to_owned();
        for (target_name, raw) in target_names.iter().zip(fields) {
            match parse_string_cell(raw) {
                Ok(Cell::NoEdge) => continue,
                Ok(Cell::Edge(polarity)) => {
                    insert_link(&mut links, registry, &source_name, target_name, polarity);
                }
                Err(e) => {
                    log::warn!(
                        "invalid polarity {raw:?} for {source_name} -> {target_name}: {e}"
                    );
                }
            }
        }
    }
    log::info!("loaded {} links from {}", links.len(), path.display());
    Ok(links)
}

fn load_xlsx(
    path: &Path,
    sheet: &SheetSelector,
    registry: &mut ConceptRegistry,
) -> Result<HashSet<Link>, Error> {
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::InputFormat {
        detail: e.to_string(),
    })?;
    let sheet_name = match sheet {
        SheetSelector::Name(name) => name.clone(),
        SheetSelector::Index(index) => workbook
            .sheet_names()
            .get(*index)
            .cloned()
            .ok_or_else(|| Error::InputFormat {
                detail: format!("no sheet at index {index}"),
            })?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| Error::InputFormat {
            detail: format!("sheet {sheet_name:?} not found"),
        })?
        .map_err(|e| Error::InputFormat {
            detail: e.to_string(),
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| Error::InputFormat {
        detail: "empty sheet, expected a header row".to_owned(),
    })?;
    let target_names: Vec<String> = header
        .iter()
        .skip(1)
        .map(|cell| cell.to_string().trim().to_owned())
        .collect();
    if target_names.is_empty() {
        return Err(Error::InputFormat {
            detail: "header row has no target columns".to_owned(),
        });
    }

    let mut links = HashSet::new();
    for row in rows {
        let Some((source_cell, rest)) = row.split_first() else {
            continue;
        };
        let source_name = source_cell.to_string().trim().to_owned();
        for (target_name, cell) in target_names.iter().zip(rest) {
            let parsed = match cell {
                DataType::Int(n) => parse_numeric_cell(*n as f64),
                DataType::Float(n) => parse_numeric_cell(*n),
                DataType::String(s) => parse_string_cell(s),
                DataType::Empty => Ok(Cell::NoEdge),
                other => parse_string_cell(&other.to_string()),
            };
            match parsed {
                Ok(Cell::NoEdge) => continue,
                Ok(Cell::Edge(polarity)) => {
                    insert_link(&mut links, registry, &source_name, target_name, polarity);
                }
                Err(e) => {
                    log::warn!(
                        "invalid polarity {cell:?} for {source_name} -> {target_name}: {e}"
                    );
                }
            }
        }
    }
    log::info!(
        "loaded {} links from {} (sheet {sheet_name:?})",
        links.len(),
        path.display()
    );
    Ok(links)
}

fn insert_link(
    links: &mut HashSet<Link>,
    registry: &mut ConceptRegistry,
    source_name: &str,
    target_name: &str,
    polarity: i64,
) {
    let source = registry.get_or_create(source_name);
    let target = registry.get_or_create(target_name);
    links.insert(Link::new(source, Influence::from_polarity(polarity), target));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_with_mixed_cell_formats() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, ",B,C").unwrap();
        writeln!(file, "A,1,").unwrap();
        writeln!(file, "B,,- 1").unwrap();
        file.flush().unwrap();

        let mut registry = ConceptRegistry::new();
        let links = load_csv(file.path(), &mut registry).unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn missing_file_is_input_missing() {
        let mut registry = ConceptRegistry::new();
        let err = load(
            Path::new("/no/such/file.csv"),
            &SheetSelector::Index(0),
            &mut registry,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InputMissing { .. }));
    }

    #[test]
    fn sheet_selector_parses_index_or_name() {
        assert!(matches!(SheetSelector::parse("0"), SheetSelector::Index(0)));
        assert!(matches!(SheetSelector::parse("Sheet1"), SheetSelector::Name(_)));
    }
}
