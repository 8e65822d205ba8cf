//! Reader for the per-residue pocket-likelihood stream.
//!
//! The scoring tool emits whitespace-delimited lines with the residue id in
//! column 1 and the likelihood score in column 3. `#`-prefixed comment lines
//! and blank lines are skipped. Malformed data lines are tolerated and
//! counted rather than failing the protein: the stream comes from an
//! external tool whose trailing status chatter is not worth a hard error.

use std::io::{self, BufRead};

use crate::core::models::pocket::ResidueScore;

/// The parsed score stream, in input order, plus the 1-based numbers of the
/// data lines that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreStream {
    pub records: Vec<ResidueScore>,
    pub skipped_lines: Vec<usize>,
}

impl ScoreStream {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads the full stream. Only I/O failures are fatal; malformed lines land
/// in [`ScoreStream::skipped_lines`].
pub fn read_scores(reader: &mut impl BufRead) -> io::Result<ScoreStream> {
    let mut stream = ScoreStream::default();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let residue_id = fields.next().and_then(|f| f.parse::<i64>().ok());
        let score = fields.nth(1).and_then(|f| f.parse::<f64>().ok());

        match (residue_id, score) {
            (Some(residue_id), Some(score)) => {
                stream.records.push(ResidueScore { residue_id, score });
            }
            _ => stream.skipped_lines.push(line_num),
        }
    }

    Ok(stream)
}
