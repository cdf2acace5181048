//! Subcommand implementations for `fsttool`.
//!
//! Each command prints its result to stdout and exits with status 1 after
//! printing to stderr on failure.

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod config_ops;
pub mod decode_ops;
pub mod fst_ops;
pub mod grammar_ops;
pub mod lexicon_ops;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use lexfst_core::fst::{Fst, FstError, SymbolTable};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Fst { path: PathBuf, source: FstError },
}

fn open(path: &Path) -> Result<BufReader<File>, InputError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn fst_err(path: &Path) -> impl FnOnce(FstError) -> InputError + '_ {
    move |source| InputError::Fst {
        path: path.to_path_buf(),
        source,
    }
}

pub fn read_symbol_table(path: &Path) -> Result<SymbolTable, InputError> {
    SymbolTable::read_text(open(path)?).map_err(fst_err(path))
}

/// Symbol tables of a text-form FST.
pub struct TextSymbols<'a> {
    pub isyms: &'a Path,
    pub osyms: &'a Path,
}

/// Load an FST: text form when symbol tables are given, otherwise LXFS or
/// JSON detected by the magic bytes.
pub fn load_fst(path: &Path, symbols: Option<TextSymbols<'_>>) -> Result<Fst, InputError> {
    if let Some(TextSymbols { isyms, osyms }) = symbols {
        return Fst::from_text(open(isyms)?, open(osyms)?, open(path)?).map_err(fst_err(path));
    }

    let bytes = fs::read(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "loading FST");
    if bytes.starts_with(b"LXFS") {
        Fst::from_bytes(&bytes).map_err(fst_err(path))
    } else {
        Fst::from_json(bytes.as_slice()).map_err(fst_err(path))
    }
}

/// `(isyms, osyms)` flags into [`TextSymbols`]; both or neither.
pub fn text_symbols<'a>(
    isyms: Option<&'a str>,
    osyms: Option<&'a str>,
) -> Option<TextSymbols<'a>> {
    match (isyms, osyms) {
        (Some(i), Some(o)) => Some(TextSymbols {
            isyms: Path::new(i),
            osyms: Path::new(o),
        }),
        (None, None) => None,
        _ => {
            eprintln!("Error: --isyms and --osyms must be given together");
            std::process::exit(1);
        }
    }
}
