//! Aztec Ignition transcripts over BN254.
//!
//! Each transcript file is laid out as
//!
//! ```text
//! [28-byte header: 7 x big-endian i32]
//! [num_g1_points x G1]        starting at τ^(start_from + 1)
//! [z·G2][τ·G2]                first transcript only
//! [64-byte checksum]          not read
//! ```
//!
//! Coordinates use [`Encoding::WordSwapped`].
use super::{list_files, TranscriptFormat};
use crate::{
    decode::{point_len, Encoding},
    SetupError, SetupResult, SetupWarning, SourceFile, SrsBuilder,
};
use ark_bn254::{g1, g2, Bn254};
use std::{collections::BTreeSet, path::Path};
use tracing::{debug, info};

/// Size of the transcript header in bytes
pub const HEADER_LEN: u64 = 28;

/// Metadata record at the start of every transcript
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptHeader {
    pub transcript_number: u32,
    pub total_transcripts: u32,
    pub total_g1_points: u32,
    pub total_g2_points: u32,
    pub num_g1_points: u64,
    pub num_g2_points: u64,
    /// Power of the point preceding this transcript's first G1 point
    pub start_from: u64,
}

impl TranscriptHeader {
    pub fn read(source: &mut SourceFile) -> SetupResult<Self> {
        let transcript_number = source.read_u32_be("transcript_number")?;
        let total_transcripts = source.read_u32_be("total_transcripts")?;
        let total_g1_points = source.read_u32_be("total_g1_points")?;
        let total_g2_points = source.read_u32_be("total_g2_points")?;
        let num_g1_points = read_count(source, "num_g1_points")?;
        let num_g2_points = read_count(source, "num_g2_points")?;
        let start_from = read_count(source, "start_from")?;

        Ok(Self {
            transcript_number,
            total_transcripts,
            total_g1_points,
            total_g2_points,
            num_g1_points,
            num_g2_points,
            start_from,
        })
    }

    /// Bytes of point data that must follow the header
    fn points_len(&self) -> u64 {
        let g1_len = point_len::<g1::Config>() as u64;
        let g2_len = point_len::<g2::Config>() as u64;
        let g2_region = if self.num_g2_points != 0 { 2 * g2_len } else { 0 };
        self.num_g1_points
            .saturating_mul(g1_len)
            .saturating_add(g2_region)
    }
}

// Fields are signed on disk, so a set top bit is a negative count
fn read_count(source: &mut SourceFile, field: &str) -> SetupResult<u64> {
    let value = source.read_u32_be(field)? as i32;
    if value < 0 {
        return Err(SetupError::header(
            source.path(),
            format!("`{}` is negative ({})", field, value),
        ));
    }
    Ok(value as u64)
}

/// Reader for a directory of Aztec Ignition transcripts
#[derive(Clone, Debug)]
pub struct SequentialTranscripts {
    /// Number of transcripts the directory should hold. Any other number is
    /// only a warning.
    pub expected_files: usize,
}

impl Default for SequentialTranscripts {
    fn default() -> Self {
        Self { expected_files: 20 }
    }
}

impl SequentialTranscripts {
    fn read_transcript(
        &self,
        path: &Path,
        builder: &mut SrsBuilder<Bn254>,
    ) -> SetupResult<TranscriptHeader> {
        let mut source = SourceFile::open(path)?;
        let header = TranscriptHeader::read(&mut source)?;
        debug!("{}: {:?}", path.display(), header);

        if header.points_len() > source.remaining() {
            return Err(SetupError::header(
                path,
                format!(
                    "{} G1 and {} G2 points need {} bytes, but only {} remain",
                    header.num_g1_points,
                    header.num_g2_points,
                    header.points_len(),
                    source.remaining()
                ),
            ));
        }

        let appended_at = builder.len() as u64;
        if header.start_from + 1 != appended_at {
            builder.warn(SetupWarning::StartIndexMismatch {
                path: path.to_path_buf(),
                expected: appended_at,
                found: header.start_from + 1,
            });
        }

        for _ in 0..header.num_g1_points {
            builder.push_g1(source.read_point::<g1::Config>(Encoding::WordSwapped)?);
        }

        if header.num_g2_points != 0 {
            // z·G2 from the previous participant
            source.skip(point_len::<g2::Config>() as u64)?;
            let tau_g2 = source.read_point::<g2::Config>(Encoding::WordSwapped)?;
            builder.set_tau_g2(tau_g2, path)?;
        }

        Ok(header)
    }
}

impl TranscriptFormat for SequentialTranscripts {
    type Curve = Bn254;

    fn name(&self) -> &'static str {
        "aztec"
    }

    fn read(&self, dir: &Path, mut builder: SrsBuilder<Bn254>) -> SetupResult<SrsBuilder<Bn254>> {
        let mut files = list_files(dir)?;
        files.sort();

        let mut seen = BTreeSet::new();
        let mut total_transcripts = 0;
        for (i, (name, path)) in files.iter().enumerate() {
            info!("Processing file {}", name);
            let header = self.read_transcript(path, &mut builder)?;
            seen.insert(header.transcript_number);
            total_transcripts = total_transcripts.max(header.total_transcripts);
            info!("Processed setup files {}/{}", i + 1, files.len());
        }

        if files.len() != self.expected_files {
            builder.warn(SetupWarning::CountMismatch {
                expected: self.expected_files,
                found: files.len(),
            });
        }

        let missing: Vec<u32> = (0..total_transcripts)
            .filter(|n| !seen.contains(n))
            .collect();
        if !missing.is_empty() {
            builder.warn(SetupWarning::MissingTranscripts { missing });
        }

        Ok(builder)
    }
}
