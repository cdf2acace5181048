//! LXFS binary snapshot.
//!
//! Layout: `MAGIC (4) | VERSION (1) | crc32(body) LE (4) | body`, where the
//! body is a bincode-encoded [`FstSnapshot`]. The snapshot is a flat arc
//! list rather than the JSON document, whose id-or-name outputs bincode
//! cannot decode.

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document::check_isymbol_dict;
use super::{Fst, FstArc, FstError, SymbolTable};

const MAGIC: &[u8; 4] = b"LXFS";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 9;

/// Flat serialization format for bincode.
#[derive(Serialize, Deserialize)]
struct FstSnapshot {
    /// (src, encoded ilabel, dest, olabel, weight)
    arcs: Vec<(u32, String, u32, u32, f32)>,
    /// Length of the arc table: one past the last state with outgoing arcs.
    num_states: u32,
    final_weights: Vec<(u32, f32)>,
    isymbols: Vec<(String, u32)>,
    osymbols: Vec<String>,
}

fn frame(body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&crc32fast::hash(body).to_le_bytes());
    buf.extend_from_slice(body);
    buf
}

impl Fst {
    /// Serialize to bytes (LXFS format).
    pub fn to_bytes(&self) -> Result<Vec<u8>, FstError> {
        let mut arcs = Vec::new();
        for (state, label, list) in self.labels() {
            for arc in list {
                arcs.push((state, label.to_string(), arc.dest, arc.olabel, arc.weight));
            }
        }
        let mut isymbols: Vec<(String, u32)> =
            self.isymbols.iter().map(|(k, &v)| (k.clone(), v)).collect();
        isymbols.sort_by_key(|&(_, id)| id);

        let num_states = self
            .graph
            .iter()
            .rposition(|labels| labels.values().any(|arcs| !arcs.is_empty()))
            .map_or(0, |last| last as u32 + 1);
        let snapshot = FstSnapshot {
            arcs,
            num_states,
            final_weights: self.final_states(),
            isymbols,
            osymbols: self.osymbols.dense_names(),
        };
        let body = bincode::serialize(&snapshot).map_err(FstError::Serialize)?;
        Ok(frame(&body))
    }

    /// Deserialize from bytes (LXFS format).
    pub fn from_bytes(data: &[u8]) -> Result<Fst, FstError> {
        if data.len() < 5 {
            return Err(FstError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(FstError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(FstError::UnsupportedVersion(data[4] as u32));
        }
        if data.len() < HEADER_SIZE {
            return Err(FstError::InvalidHeader);
        }

        let mut crc = [0u8; 4];
        crc.copy_from_slice(&data[5..HEADER_SIZE]);
        let body = &data[HEADER_SIZE..];
        if crc32fast::hash(body) != u32::from_le_bytes(crc) {
            return Err(FstError::Checksum);
        }

        let snapshot: FstSnapshot = bincode::deserialize(body).map_err(FstError::Deserialize)?;
        Fst::from_snapshot(snapshot)
    }

    fn from_snapshot(snapshot: FstSnapshot) -> Result<Fst, FstError> {
        let isymbols: HashMap<String, u32> = snapshot.isymbols.into_iter().collect();
        check_isymbol_dict(&isymbols)?;
        let osymbols = SymbolTable::from_dense_names(&snapshot.osymbols)?;

        // bounds the allocation below by the arcs actually present
        let sources = snapshot
            .arcs
            .iter()
            .map(|&(src, ..)| src as u64 + 1)
            .max()
            .unwrap_or(0);
        if snapshot.num_states as u64 > sources {
            return Err(FstError::Document(format!(
                "state count {} exceeds the last arc source ({sources} states)",
                snapshot.num_states
            )));
        }

        let mut graph: Vec<HashMap<String, Vec<FstArc>>> =
            vec![HashMap::new(); snapshot.num_states as usize];
        for (src, label, dest, olabel, weight) in snapshot.arcs {
            if osymbols.symbol(olabel).is_none() {
                return Err(FstError::Document(format!(
                    "state {src}: output id {olabel} not in osymbols"
                )));
            }
            let Some(labels) = graph.get_mut(src as usize) else {
                return Err(FstError::Document(format!(
                    "arc source {src} beyond state count {}",
                    snapshot.num_states
                )));
            };
            labels.entry(label).or_default().push(FstArc {
                dest,
                olabel,
                weight,
            });
        }

        Ok(Fst::from_parts(
            graph,
            snapshot.final_weights.into_iter().collect(),
            isymbols,
            osymbols,
        ))
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), FstError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "FST saved");
        Ok(())
    }

    /// Open an LXFS file through a read-only memory map.
    pub fn open(path: &Path) -> Result<Fst, FstError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is dropped
        // before this function returns; nothing borrows from it afterwards.
        let mmap = unsafe { Mmap::map(&file)? };
        let fst = Fst::from_bytes(&mmap)?;
        debug!(path = %path.display(), states = fst.graph.len(), "FST opened");
        Ok(fst)
    }
}
