//! Celo Plumo contributions over BW6-761.
//!
//! The powers are split over a fixed number of chunks, and every chunk may have
//! many contribution files named `<round>.<chunk>.<contribution>.<contributor>`.
//! Each file starts with a 64-byte hash. What follows depends on the chunk:
//!
//! ```text
//! lower half:  [τ·G1 x n][τ·G2 ...][α·G1 ...][β·G1 ...][β·G2]   n = data / (4 * point)
//! upper half:  [τ·G1 x n][β·G2]                               n = data / point - 1
//! ```
//!
//! Chunk 0 always has the lower-half layout, even when there are too few
//! chunks for it to be in the lower half. It starts at τ⁰ and its τ·G2 region
//! opens with `[G2, τ·G2]`.
//! Every G1 point is checked for curve membership.
use super::{list_files, TranscriptFormat};
use crate::{
    curve::is_valid_point,
    decode::{point_len, Encoding},
    CeremonyCurve, SetupError, SetupResult, SetupWarning, SourceFile, SrsBuilder,
};
use ark_bw6_761::{g1, g2, BW6_761};
use std::{collections::BTreeMap, path::Path};
use tracing::{debug, info};

/// Size of the hash at the start of every chunk file
pub const HASH_SIZE: u64 = 64;

/// Reader for a directory of Celo chunk contributions
#[derive(Clone, Debug)]
pub struct ChunkedContributions {
    /// Number of chunks the powers are split over
    pub total_chunks: usize,
}

impl Default for ChunkedContributions {
    fn default() -> Self {
        Self { total_chunks: 256 }
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts the chunk index from a `<round>.<chunk>.<rest>` file name
pub(crate) fn chunk_index(name: &str) -> Option<usize> {
    let mut parts = name.splitn(3, '.');
    let round = parts.next()?;
    let chunk = parts.next()?;
    let rest = parts.next()?;
    if rest.is_empty() || !is_decimal(round) || !is_decimal(chunk) {
        return None;
    }
    chunk.parse().ok()
}

/// Picks one file per chunk: the lexicographically greatest name, which is
/// taken to be the latest contribution. Names without a chunk index, or with
/// an index of `total_chunks` or more, are skipped.
pub(crate) fn select_chunks<'a, I>(names: I, total_chunks: usize) -> BTreeMap<usize, &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut selected = BTreeMap::new();
    for name in names {
        let chunk = match chunk_index(name) {
            Some(chunk) if chunk < total_chunks => chunk,
            Some(chunk) => {
                debug!("Skipping {}: chunk {} is out of range", name, chunk);
                continue;
            }
            None => {
                debug!("Skipping {}: not a chunk file", name);
                continue;
            }
        };
        let entry = selected.entry(chunk).or_insert(name);
        if name > *entry {
            *entry = name;
        }
    }
    selected
}

/// Number of τ·G1 points in a chunk file of `file_len` bytes, or `None` if
/// the file is too short for its layout
pub(crate) fn g1_points_in_chunk(chunk: usize, file_len: u64, total_chunks: usize) -> Option<u64> {
    let point_size = point_len::<g1::Config>() as u64;
    let data = file_len.checked_sub(HASH_SIZE)?;
    if chunk == 0 || chunk < total_chunks / 2 {
        Some(data / (4 * point_size))
    } else {
        (data / point_size).checked_sub(1)
    }
}

impl ChunkedContributions {
    fn read_chunk(
        &self,
        chunk: usize,
        path: &Path,
        builder: &mut SrsBuilder<BW6_761>,
    ) -> SetupResult<()> {
        let mut source = SourceFile::open(path)?;
        let num_points = g1_points_in_chunk(chunk, source.len(), self.total_chunks)
            .ok_or_else(|| {
                SetupError::header(
                    path,
                    format!("{} bytes is too short for chunk {}", source.len(), chunk),
                )
            })?;

        let hash = source.read_bytes(HASH_SIZE as usize)?;
        debug!("Chunk {} hash {}..", chunk, hex::encode(&hash[..8]));

        let mut added = 0;
        for index in 0..num_points {
            let offset = source.offset();
            let point = source.read_point::<g1::Config>(Encoding::LittleEndian)?;
            if !is_valid_point(&point) {
                return Err(SetupError::OffCurveOrIdentityPoint {
                    path: path.to_path_buf(),
                    index,
                    offset,
                });
            }

            // τ⁰ is already seeded
            if chunk == 0 && index == 0 {
                if point != *builder.g1_generator() {
                    builder.warn(SetupWarning::GeneratorMismatch {
                        path: path.to_path_buf(),
                        group: "G1",
                    });
                }
                continue;
            }

            builder.push_g1(point);
            added += 1;
        }

        if chunk == 0 {
            let (_, expected) = BW6_761::generators();
            let generator = source.read_point::<g2::Config>(Encoding::LittleEndian)?;
            if !generator.is_on_curve() || generator != expected {
                builder.warn(SetupWarning::GeneratorMismatch {
                    path: path.to_path_buf(),
                    group: "G2",
                });
            }

            let offset = source.offset();
            let tau_g2 = source.read_point::<g2::Config>(Encoding::LittleEndian)?;
            if !is_valid_point(&tau_g2) {
                return Err(SetupError::OffCurveOrIdentityPoint {
                    path: path.to_path_buf(),
                    index: num_points + 1,
                    offset,
                });
            }
            builder.set_tau_g2(tau_g2, path)?;
        }

        info!(
            "Chunk {}: processed {} points, added {}",
            chunk, num_points, added
        );
        Ok(())
    }
}

impl TranscriptFormat for ChunkedContributions {
    type Curve = BW6_761;

    fn name(&self) -> &'static str {
        "celo"
    }

    fn read(
        &self,
        dir: &Path,
        mut builder: SrsBuilder<BW6_761>,
    ) -> SetupResult<SrsBuilder<BW6_761>> {
        let files = list_files(dir)?;
        let names = files.iter().map(|(name, _)| name.as_str());
        let selected = select_chunks(names, self.total_chunks);
        info!("Found {} chunk files", selected.len());

        if let Some(missing) = (0..self.total_chunks).find(|c| !selected.contains_key(c)) {
            return Err(SetupError::MissingChunk(missing));
        }

        for (chunk, name) in selected {
            info!("Processing chunk {} from file {}", chunk, name);
            self.read_chunk(chunk, &dir.join(name), &mut builder)?;
        }
        Ok(builder)
    }
}
