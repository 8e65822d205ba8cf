//! Writers for the per-protein result tables.
//!
//! Four artifacts per protein: the extracted pockets, every parsed per-pocket
//! result, the annotated efficiency table, and the top-N ranking. All floats
//! are formatted through the same helpers so that re-running the pipeline on
//! unchanged inputs reproduces the output files byte for byte.

use std::io::Write;

use crate::core::models::pocket::Pocket;
use crate::core::models::record::{EfficiencyRecord, ResultRecord};

/// Shortest round-trip formatting; empty string for absent values.
fn opt_f64(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Exponential notation, used for Kd where fixed-point would be unreadable.
fn exp_f64(v: f64) -> String {
    format!("{:e}", v)
}

fn opt_bool(v: Option<bool>) -> String {
    match v {
        Some(true) => "true".to_string(),
        Some(false) => "false".to_string(),
        None => String::new(),
    }
}

/// Writes `<protein>_pockets.csv`: one row per extracted pocket with its
/// residue span, size, centroid (structure precision), and whether the
/// centroid is degraded.
pub fn write_pockets(writer: impl Write, pockets: &[Pocket]) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record([
        "pocket",
        "first_residue",
        "last_residue",
        "residues",
        "center_x",
        "center_y",
        "center_z",
        "degraded",
    ])?;
    for pocket in pockets {
        let (first, last) = pocket.span().unwrap_or((0, 0));
        let center = pocket
            .centroid
            .map(|c| [format!("{:.3}", c.x), format!("{:.3}", c.y), format!("{:.3}", c.z)])
            .unwrap_or_default();
        w.write_record([
            pocket.label(),
            first.to_string(),
            last.to_string(),
            pocket.len().to_string(),
            center[0].clone(),
            center[1].clone(),
            center[2].clone(),
            pocket.degraded_centroid.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Writes `<protein>_affinities.csv`: every parsed result, including rows
/// whose log carried no affinity (blank cell) so failed runs stay auditable.
pub fn write_affinities(writer: impl Write, records: &[ResultRecord]) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["protein", "ligand", "pocket", "affinity"])?;
    for record in records {
        w.write_record([
            record.protein.clone(),
            record.ligand.clone(),
            record.pocket.clone().unwrap_or_default(),
            opt_f64(record.affinity),
        ])?;
    }
    w.flush()?;
    Ok(())
}

const EFFICIENCY_HEADER: [&str; 15] = [
    "protein",
    "ligand",
    "affinity",
    "kd",
    "pkd",
    "heavy_atoms",
    "le",
    "logp",
    "logp_source",
    "wlogp",
    "lle",
    "fq",
    "tpsa",
    "hia",
    "bbb",
];

fn efficiency_row(record: &EfficiencyRecord) -> [String; 15] {
    [
        record.protein.clone(),
        record.ligand.clone(),
        record.affinity.to_string(),
        exp_f64(record.kd),
        record.pkd.to_string(),
        opt_f64(record.heavy_atoms),
        opt_f64(record.le),
        opt_f64(record.logp),
        record.logp_source.map(|s| s.as_str()).unwrap_or("").to_string(),
        opt_f64(record.wlogp),
        opt_f64(record.lle),
        opt_f64(record.fq),
        opt_f64(record.tpsa),
        opt_bool(record.hia),
        opt_bool(record.bbb),
    ]
}

/// Writes `<protein>_efficiency.csv` in input (aggregation) order.
pub fn write_efficiency(writer: impl Write, records: &[EfficiencyRecord]) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(EFFICIENCY_HEADER)?;
    for record in records {
        w.write_record(efficiency_row(record))?;
    }
    w.flush()?;
    Ok(())
}

/// Writes `<protein>_ranked.csv`: the caller-sorted top slice with an
/// explicit 1-based rank column prepended to the efficiency columns.
pub fn write_ranked(writer: impl Write, records: &[&EfficiencyRecord]) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    let mut header = vec!["rank"];
    header.extend(EFFICIENCY_HEADER);
    w.write_record(&header)?;
    for (idx, record) in records.iter().enumerate() {
        let mut row = vec![(idx + 1).to_string()];
        row.extend(efficiency_row(record));
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}
