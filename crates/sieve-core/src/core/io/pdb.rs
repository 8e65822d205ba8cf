//! Minimal PDB/PDBQT reader for centroid computation.
//!
//! Only `ATOM` records are consumed, and of those only the residue sequence
//! number, atom name, and coordinates. The fixed column offsets follow the
//! PDB format specification: atom name in columns 13-16, residue sequence
//! number in columns 23-26, coordinates in columns 31-38 / 39-46 / 47-54.
//! PDBQT files share these columns, so the same reader covers both.

use std::io::{self, BufRead};

use nalgebra::Point3;
use thiserror::Error;

/// One reference-atom observation from the receptor structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAtom {
    /// Residue sequence number the atom belongs to.
    pub residue_id: i64,
    pub position: Point3<f64>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// Collects every `ATOM` record whose trimmed atom name equals
/// `reference_atom` (conventionally `CA`). Non-`ATOM` lines, including
/// `HETATM`, are ignored; a malformed `ATOM` line is fatal because a
/// receptor structure that does not parse cannot anchor a docking box.
pub fn read_reference_atoms(
    reader: &mut impl BufRead,
    reference_atom: &str,
) -> Result<Vec<ReferenceAtom>, PdbError> {
    let mut atoms = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        if slice_and_trim(&line, 0, 6) != "ATOM" {
            continue;
        }
        if slice_and_trim(&line, 12, 16) != reference_atom {
            continue;
        }

        let res_id_str = slice_and_trim(&line, 22, 26);
        let residue_id: i64 = res_id_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26".into(),
                value: res_id_str.into(),
            },
        })?;

        let mut coords = [0.0_f64; 3];
        for (i, (start, end)) in [(30, 38), (38, 46), (46, 54)].into_iter().enumerate() {
            let value = slice_and_trim(&line, start, end);
            coords[i] = value.parse().map_err(|_| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::InvalidFloat {
                    columns: format!("{}-{}", start + 1, end),
                    value: value.into(),
                },
            })?;
        }

        atoms.push(ReferenceAtom {
            residue_id,
            position: Point3::new(coords[0], coords[1], coords[2]),
        });
    }

    Ok(atoms)
}
