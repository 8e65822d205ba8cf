//! Docking-engine interface formats.
//!
//! Three touch points with the engine, all text: the key/value configuration
//! file it consumes, the filename convention that encodes job identity, and
//! the ranked-pose log it produces. The engine itself is a black box; this
//! module only speaks its formats.

use std::io::{self, BufRead, Write};
use std::path::Path;

use nalgebra::Point3;

/// Everything a docking configuration file embeds for one job.
#[derive(Debug, Clone)]
pub struct ConfigParams<'a> {
    pub receptor: &'a Path,
    pub ligand: &'a Path,
    /// Search-box center, the pocket centroid.
    pub center: Point3<f64>,
    /// Search-box edge lengths.
    pub size: [f64; 3],
    pub num_modes: u32,
    pub exhaustiveness: u32,
    pub energy_range: f64,
    /// Docked-pose output path.
    pub out: &'a Path,
}

/// Writes one `key = value` assignment per line, in the order the engine
/// documents them. Box center coordinates keep three decimals (structure
/// file precision); everything else prints as given.
pub fn write_config(writer: &mut impl Write, params: &ConfigParams) -> io::Result<()> {
    writeln!(writer, "receptor = {}", params.receptor.display())?;
    writeln!(writer, "ligand = {}", params.ligand.display())?;
    writeln!(writer, "center_x = {:.3}", params.center.x)?;
    writeln!(writer, "center_y = {:.3}", params.center.y)?;
    writeln!(writer, "center_z = {:.3}", params.center.z)?;
    writeln!(writer, "size_x = {}", params.size[0])?;
    writeln!(writer, "size_y = {}", params.size[1])?;
    writeln!(writer, "size_z = {}", params.size[2])?;
    writeln!(writer, "num_modes = {}", params.num_modes)?;
    writeln!(writer, "exhaustiveness = {}", params.exhaustiveness)?;
    writeln!(writer, "energy_range = {}", params.energy_range)?;
    writeln!(writer, "out = {}", params.out.display())?;
    Ok(())
}

/// Job identity decoded from a log filename stem.
///
/// `protein` can come out empty (a pocket-suffixed stem with a single-token
/// prefix has nowhere to put one) and `ligand` absent; callers treat either
/// as an unparsable identity. `ambiguous` marks a positional decode of a
/// stem with more than three tokens, where the documented conventions
/// cannot say which underscores belong to which identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LogIdentity {
    pub protein: String,
    pub ligand: Option<String>,
    pub pocket: Option<String>,
    pub ambiguous: bool,
}

/// Decodes a filename stem, trying the two naming conventions in order.
///
/// 1. Pocket-suffixed: `<prefix>_pocket<digits>`. The last `_`-token of the
///    prefix is the ligand, the preceding tokens rejoined with `_` are the
///    protein, and the pocket is `pocket<digits>`.
/// 2. Positional: split the whole stem on `_`; token 0 is the protein,
///    token 1 the ligand, token 2 the pocket, missing tokens absent.
pub fn parse_log_stem(stem: &str) -> LogIdentity {
    if let Some(idx) = stem.rfind("_pocket") {
        let digits = &stem[idx + "_pocket".len()..];
        if idx > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let prefix = &stem[..idx];
            let mut tokens: Vec<&str> = prefix.split('_').collect();
            let last = tokens.pop().unwrap_or("");
            return LogIdentity {
                protein: tokens.join("_"),
                ligand: (!last.is_empty()).then(|| last.to_string()),
                pocket: Some(format!("pocket{}", digits)),
                ambiguous: false,
            };
        }
    }

    let tokens: Vec<&str> = stem.split('_').collect();
    LogIdentity {
        protein: tokens.first().copied().unwrap_or("").to_string(),
        ligand: tokens.get(1).filter(|s| !s.is_empty()).map(|s| s.to_string()),
        pocket: tokens.get(2).filter(|s| !s.is_empty()).map(|s| s.to_string()),
        ambiguous: tokens.len() > 3,
    }
}

/// Scans a ranked-pose log for the rank-1 row: the first line whose first
/// whitespace token is literally `1`. Its second token is the affinity.
///
/// The engine pre-sorts its pose table, so the first rank-1 row is the best
/// pose; later lines are never consulted. A log without such a row (or with
/// an unreadable second token on it) yields `None`.
pub fn scan_affinity(reader: &mut impl BufRead) -> io::Result<Option<f64>> {
    for line_res in reader.lines() {
        let line = line_res?;
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("1") {
            return Ok(tokens.next().and_then(|t| t.parse::<f64>().ok()));
        }
    }
    Ok(None)
}
