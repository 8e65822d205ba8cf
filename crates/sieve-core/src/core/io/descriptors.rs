//! Reader for the auxiliary physicochemical descriptor table.
//!
//! The table is a CSV export from a descriptor service, so the column names
//! vary by source and version ("Molecule" vs "name", "#Heavy atoms" vs
//! "heavy_atom_count"). Headers are matched through normalized alias sets
//! rather than exact spellings; columns that match nothing are ignored.

use std::io::Read;

use phf::{Set, phf_set};
use thiserror::Error;

use crate::core::models::descriptor::{DescriptorRow, DescriptorTable};
use crate::core::utils::keys::normalize_key;

static KEY_COLUMNS: Set<&'static str> = phf_set! {
    "molecule", "name", "ligand", "compound", "moleculename", "ligandname",
};

static HEAVY_ATOM_COLUMNS: Set<&'static str> = phf_set! {
    "heavyatoms", "heavyatomcount", "numheavyatoms", "hac",
};

static TPSA_COLUMNS: Set<&'static str> = phf_set! {
    "tpsa", "topologicalpolarsurfacearea",
};

static CONSENSUS_LOGP_COLUMNS: Set<&'static str> = phf_set! {
    "consensuslogp", "logpconsensus",
};

static XLOGP3_COLUMNS: Set<&'static str> = phf_set! { "xlogp3" };
static WLOGP_COLUMNS: Set<&'static str> = phf_set! { "wlogp" };
static MLOGP_COLUMNS: Set<&'static str> = phf_set! { "mlogp" };

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "no ligand-name column among headers [{headers}] (recognized: molecule, name, ligand, compound)"
    )]
    MissingKeyColumn { headers: String },
}

/// Column positions resolved once from the header row; cells are then
/// fetched by index, so a record shorter than the header simply has the
/// trailing cells absent.
#[derive(Debug, Default)]
struct ColumnMap {
    key: usize,
    heavy_atoms: Option<usize>,
    tpsa: Option<usize>,
    consensus_logp: Option<usize>,
    xlogp3: Option<usize>,
    wlogp: Option<usize>,
    mlogp: Option<usize>,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnMap, DescriptorError> {
    let mut key = None;
    let mut columns = ColumnMap::default();

    // First matching header wins for each role.
    for (idx, header) in headers.iter().enumerate() {
        let normalized = normalize_key(header);
        let slot = if KEY_COLUMNS.contains(normalized.as_str()) {
            &mut key
        } else if HEAVY_ATOM_COLUMNS.contains(normalized.as_str()) {
            &mut columns.heavy_atoms
        } else if TPSA_COLUMNS.contains(normalized.as_str()) {
            &mut columns.tpsa
        } else if CONSENSUS_LOGP_COLUMNS.contains(normalized.as_str()) {
            &mut columns.consensus_logp
        } else if XLOGP3_COLUMNS.contains(normalized.as_str()) {
            &mut columns.xlogp3
        } else if WLOGP_COLUMNS.contains(normalized.as_str()) {
            &mut columns.wlogp
        } else if MLOGP_COLUMNS.contains(normalized.as_str()) {
            &mut columns.mlogp
        } else {
            continue;
        };
        if slot.is_none() {
            *slot = Some(idx);
        }
    }

    match key {
        Some(key) => Ok(ColumnMap { key, ..columns }),
        None => Err(DescriptorError::MissingKeyColumn {
            headers: headers.iter().collect::<Vec<_>>().join(", "),
        }),
    }
}

fn numeric_cell(record: &csv::StringRecord, column: Option<usize>) -> Option<f64> {
    let cell = record.get(column?)?.trim();
    if cell.is_empty() {
        return None;
    }
    match cell.to_ascii_lowercase().as_str() {
        "na" | "n/a" | "nan" | "-" => None,
        _ => cell.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Reads the table and collapses duplicate normalized keys (median numeric
/// fields, first-seen name). Rows with a blank name cell are skipped.
pub fn read_descriptor_table(reader: impl Read) -> Result<DescriptorTable, DescriptorError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = resolve_columns(csv_reader.headers()?)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let name = match record.get(columns.key) {
            Some(cell) if !cell.trim().is_empty() => cell.trim().to_string(),
            _ => continue,
        };
        rows.push(DescriptorRow {
            name,
            heavy_atoms: numeric_cell(&record, columns.heavy_atoms),
            tpsa: numeric_cell(&record, columns.tpsa),
            consensus_logp: numeric_cell(&record, columns.consensus_logp),
            xlogp3: numeric_cell(&record, columns.xlogp3),
            wlogp: numeric_cell(&record, columns.wlogp),
            mlogp: numeric_cell(&record, columns.mlogp),
        });
    }

    Ok(DescriptorTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_descriptor_service_headers() {
        let csv_text = "\
Molecule,MW,#Heavy atoms,TPSA,iLOGP,XLOGP3,WLOGP,MLOGP,Consensus Log P
DrugA,341.4,24,78.5,2.9,3.1,2.8,2.2,2.75
DrugB,198.2,14,120.3,,0.5,,1.1,0.8
";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let a = table.lookup("DrugA").unwrap();
        assert_eq!(a.heavy_atoms, Some(24.0));
        assert_eq!(a.tpsa, Some(78.5));
        assert_eq!(a.consensus_logp, Some(2.75));
        assert_eq!(a.xlogp3, Some(3.1));
        assert_eq!(a.wlogp, Some(2.8));
        assert_eq!(a.mlogp, Some(2.2));

        let b = table.lookup("DrugB").unwrap();
        assert_eq!(b.wlogp, None);
    }

    #[test]
    fn snake_case_headers_match_the_same_aliases() {
        let csv_text = "name,heavy_atom_count,tpsa\nx,20,90.0\n";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        let row = table.lookup("x").unwrap();
        assert_eq!(row.heavy_atoms, Some(20.0));
        assert_eq!(row.tpsa, Some(90.0));
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let result = read_descriptor_table("tpsa,wlogp\n90.0,2.0\n".as_bytes());
        assert!(matches!(
            result,
            Err(DescriptorError::MissingKeyColumn { .. })
        ));
    }

    #[test]
    fn na_spellings_and_junk_become_absent() {
        let csv_text = "name,tpsa,wlogp,mlogp\nx,NA,n/a,not-a-number\n";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        let row = table.lookup("x").unwrap();
        assert_eq!(row.tpsa, None);
        assert_eq!(row.wlogp, None);
        assert_eq!(row.mlogp, None);
    }

    #[test]
    fn blank_name_rows_are_skipped() {
        let csv_text = "name,tpsa\n,90.0\nreal,45.0\n";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_names_collapse_through_the_normalized_key() {
        let csv_text = "name,tpsa\nDrug-A,80\ndrug a,90\n";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("druga").unwrap().tpsa, Some(85.0));
    }

    #[test]
    fn unrelated_columns_are_ignored() {
        let csv_text = "name,smiles,tpsa\nx,CCO,33.0\n";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        assert_eq!(table.lookup("x").unwrap().tpsa, Some(33.0));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv_text = "name,tpsa,wlogp\nx,50.0\n";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        let row = table.lookup("x").unwrap();
        assert_eq!(row.tpsa, Some(50.0));
        assert_eq!(row.wlogp, None);
    }

    #[test]
    fn overlong_rows_ignore_the_extra_cells() {
        let csv_text = "name,tpsa\nx,40.0,stray,cells\n";
        let table = read_descriptor_table(csv_text.as_bytes()).unwrap();
        assert_eq!(table.lookup("x").unwrap().tpsa, Some(40.0));
    }
}
