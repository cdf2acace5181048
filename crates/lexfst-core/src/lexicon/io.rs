use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::{LexiconEntry, LexiconError};
use crate::symbol::Symbol;

/// Read `word probability symbol...` lines. Weight is `-ln(probability)`.
pub fn read_lexicon(reader: impl BufRead) -> Result<Vec<LexiconEntry>, LexiconError> {
    let mut lexicon = Vec::new();
    let mut blank = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            blank += 1;
            continue;
        }
        if fields.len() < 3 {
            return Err(LexiconError::Parse {
                line: line_no,
                reason: format!("unexpected line: {}", line.trim()),
            });
        }
        let prob: f64 = fields[1].parse().map_err(|_| LexiconError::Parse {
            line: line_no,
            reason: format!("invalid probability '{}'", fields[1]),
        })?;
        if prob.is_nan() || prob <= 0.0 {
            return Err(LexiconError::Parse {
                line: line_no,
                reason: format!("probability must be positive, got {prob}"),
            });
        }
        let symbols = fields[2..]
            .iter()
            .map(|s| Symbol::from_encoded(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LexiconError::Parse {
                line: line_no,
                reason: e.to_string(),
            })?;
        lexicon.push(LexiconEntry {
            word: fields[0].to_string(),
            symbols,
            weight: -prob.ln() as f32,
        });
    }
    if blank > 0 {
        warn!(blank, "skipped blank lexicon lines");
    }
    debug!(entries = lexicon.len(), "lexicon read");
    Ok(lexicon)
}

pub fn read_lexicon_file(path: &Path) -> Result<Vec<LexiconEntry>, LexiconError> {
    let file = File::open(path)?;
    read_lexicon(BufReader::new(file))
}

/// Write `word probability symbol...` lines, probability `exp(-weight)`.
pub fn write_lexicon(lexicon: &[LexiconEntry], mut writer: impl Write) -> Result<(), LexiconError> {
    for entry in lexicon {
        let prob = (-(entry.weight as f64)).exp();
        write!(writer, "{} {}", entry.word, prob)?;
        for symbol in &entry.symbols {
            write!(writer, " {symbol}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Append a single-symbol entry `(s, [s], max_weight - ln(factor))` for
/// every text input symbol that does not already have one, in sorted order.
///
/// `max_weight` is the largest entry weight (0 for an empty lexicon), so an
/// identity entry always costs more than any real word.
pub fn add_ilabel_selfloops(lexicon: &[LexiconEntry], factor: f64) -> Vec<LexiconEntry> {
    let singles: HashSet<&str> = lexicon
        .iter()
        .filter_map(|e| match e.symbols.as_slice() {
            [Symbol::Text(s)] => Some(s.as_str()),
            _ => None,
        })
        .collect();

    let missing: BTreeSet<&str> = lexicon
        .iter()
        .flat_map(|e| e.symbols.iter())
        .filter_map(|s| match s {
            Symbol::Text(s) if !singles.contains(s.as_str()) => Some(s.as_str()),
            _ => None,
        })
        .collect();

    let max_weight = lexicon
        .iter()
        .map(|e| e.weight as f64)
        .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))))
        .unwrap_or(0.0);
    let weight = (max_weight - factor.ln()) as f32;
    let mut out = lexicon.to_vec();
    out.extend(
        missing
            .into_iter()
            .map(|s| LexiconEntry::new(s, vec![Symbol::Text(s.to_string())], weight)),
    );
    out
}
