//! Aleo setup files over BLS12-377.
//!
//! G1 files hold a little-endian `u64` count followed by that many points. A
//! file whose name contains `g2` (in any case) holds the single τ·G2 point,
//! sometimes behind the same kind of count. All coordinates are plain
//! little-endian.
use super::{list_files, TranscriptFormat};
use crate::{
    decode::{point_len, Encoding},
    SetupError, SetupResult, SourceFile, SrsBuilder,
};
use ark_bls12_377::{g1, g2, Bls12_377};
use std::path::Path;
use tracing::{debug, info};

const G2_MARKER: &str = "g2";
const COUNT_LEN: u64 = 8;

/// Reader for a directory of Aleo G1/G2 setup files
#[derive(Clone, Debug, Default)]
pub struct TaggedFiles;

/// Returns true if the file holds the τ·G2 point
pub(crate) fn is_g2_file(name: &str) -> bool {
    name.to_lowercase().contains(G2_MARKER)
}

fn read_g1_file(path: &Path, builder: &mut SrsBuilder<Bls12_377>) -> SetupResult<()> {
    let mut source = SourceFile::open(path)?;
    let count = source.read_u64_le("point count")?;

    let needed = count.saturating_mul(point_len::<g1::Config>() as u64);
    if needed > source.remaining() {
        return Err(SetupError::header(
            path,
            format!(
                "{} points need {} bytes, but only {} remain",
                count,
                needed,
                source.remaining()
            ),
        ));
    }

    for _ in 0..count {
        builder.push_g1(source.read_point::<g1::Config>(Encoding::LittleEndian)?);
    }
    Ok(())
}

fn read_g2_file(path: &Path, builder: &mut SrsBuilder<Bls12_377>) -> SetupResult<()> {
    let mut source = SourceFile::open(path)?;
    let g2_len = point_len::<g2::Config>() as u64;

    match source.len() {
        len if len == g2_len => {}
        len if len == g2_len + COUNT_LEN => {
            let count = source.read_u64_le("point count")?;
            debug!("Ignoring point count {} in {}", count, path.display());
        }
        len => {
            return Err(SetupError::header(
                path,
                format!(
                    "a G2 file holds {} or {} bytes, found {}",
                    g2_len,
                    g2_len + COUNT_LEN,
                    len
                ),
            ))
        }
    }

    let tau_g2 = source.read_point::<g2::Config>(Encoding::LittleEndian)?;
    builder.set_tau_g2(tau_g2, path)
}

impl TranscriptFormat for TaggedFiles {
    type Curve = Bls12_377;

    fn name(&self) -> &'static str {
        "aleo"
    }

    fn read(
        &self,
        dir: &Path,
        mut builder: SrsBuilder<Bls12_377>,
    ) -> SetupResult<SrsBuilder<Bls12_377>> {
        let mut files = list_files(dir)?;
        files.sort_by(|(a, _), (b, _)| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));

        let mut found_g2 = false;
        for (i, (name, path)) in files.iter().enumerate() {
            info!("Processing file {}", name);
            if is_g2_file(name) {
                read_g2_file(path, &mut builder)?;
                found_g2 = true;
            } else {
                read_g1_file(path, &mut builder)?;
            }
            info!("Processed setup files {}/{}", i + 1, files.len());
        }

        if !found_g2 {
            return Err(SetupError::MissingFile {
                dir: dir.to_path_buf(),
                what: "G2 point file",
            });
        }
        Ok(builder)
    }
}
