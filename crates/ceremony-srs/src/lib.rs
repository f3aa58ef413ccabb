//! # Ceremony SRS
//!
//! Reconstructs a KZG structured reference string from the raw output of a
//! powers-of-tau ceremony. Three ceremonies are supported, each over its own
//! curve:
//!
//! | ceremony | curve     | layout                                              |
//! |----------|-----------|-----------------------------------------------------|
//! | `aztec`  | BN254     | [sequential transcripts](SequentialTranscripts)     |
//! | `aleo`   | BLS12-377 | [tagged G1/G2 files](TaggedFiles)                   |
//! | `celo`   | BW6-761   | [chunked contributions](ChunkedContributions)       |
//!
//! The resulting SRS holds `[τ^i]G1` for `i = 0..n`, the pair `[G2, τG2]` and
//! the pairing lines of both G2 points. Checksums and contribution proofs in
//! the source files are not verified.
//!
//! ```no_run
//! use ceremony_srs::{translate, Ceremony, Curve};
//!
//! let srs = translate(Ceremony::Aztec, Curve::Bn254, "./transcripts".as_ref())?;
//! println!("{} points", srs.num_points());
//! # Ok::<(), ceremony_srs::SetupError>(())
//! ```

/// Byte-level decoding of field elements and points
pub mod decode;

mod source;
pub use source::SourceFile;

mod curve;
pub use curve::{is_valid_point, CeremonyCurve};

mod srs;
pub use srs::KzgSrs;

mod builder;
pub use builder::{SetupWarning, SrsBuilder, Translation};

/// Readers for the ceremony file layouts
pub mod readers;
pub use readers::{ChunkedContributions, SequentialTranscripts, TaggedFiles, TranscriptFormat};

mod error;
pub use error::{SetupError, SetupResult};

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
mod fixtures;

use ark_bls12_377::Bls12_377;
use ark_bn254::Bn254;
use ark_bw6_761::BW6_761;
use ark_serialize::{CanonicalSerialize, Compress};
use std::{fmt, io::Write, path::Path, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The trusted-setup ceremonies whose output can be read
pub enum Ceremony {
    Aztec,
    Aleo,
    Celo,
}

impl fmt::Display for Ceremony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ceremony::Aztec => "aztec",
            Ceremony::Aleo => "aleo",
            Ceremony::Celo => "celo",
        };
        f.write_str(name)
    }
}

impl FromStr for Ceremony {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aztec" => Ok(Ceremony::Aztec),
            "aleo" => Ok(Ceremony::Aleo),
            "celo" => Ok(Ceremony::Celo),
            _ => Err(SetupError::UnknownCeremony(s.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The pairing-friendly curves an SRS can be built over
pub enum Curve {
    Bn254,
    Bls12_377,
    Bw6_761,
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Curve::Bn254 => Bn254::NAME,
            Curve::Bls12_377 => Bls12_377::NAME,
            Curve::Bw6_761 => BW6_761::NAME,
        };
        f.write_str(name)
    }
}

impl FromStr for Curve {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bn254" => Ok(Curve::Bn254),
            "bls12377" => Ok(Curve::Bls12_377),
            "bw6761" => Ok(Curve::Bw6_761),
            _ => Err(SetupError::UnknownCurve(s.to_owned())),
        }
    }
}

/// Every ceremony together with the curve its output lives on
pub const SUPPORTED: [(Ceremony, Curve); 3] = [
    (Ceremony::Aztec, Curve::Bn254),
    (Ceremony::Aleo, Curve::Bls12_377),
    (Ceremony::Celo, Curve::Bw6_761),
];

/// A translation over whichever curve the ceremony uses
#[derive(Clone, Debug)]
pub enum CeremonySrs {
    Bn254(Translation<Bn254>),
    Bls12_377(Translation<Bls12_377>),
    Bw6_761(Translation<BW6_761>),
}

impl CeremonySrs {
    pub fn curve(&self) -> Curve {
        match self {
            CeremonySrs::Bn254(_) => Curve::Bn254,
            CeremonySrs::Bls12_377(_) => Curve::Bls12_377,
            CeremonySrs::Bw6_761(_) => Curve::Bw6_761,
        }
    }

    /// Number of G1 powers, including the generator
    pub fn num_points(&self) -> usize {
        match self {
            CeremonySrs::Bn254(t) => t.num_points,
            CeremonySrs::Bls12_377(t) => t.num_points,
            CeremonySrs::Bw6_761(t) => t.num_points,
        }
    }

    pub fn warnings(&self) -> &[SetupWarning] {
        match self {
            CeremonySrs::Bn254(t) => &t.warnings,
            CeremonySrs::Bls12_377(t) => &t.warnings,
            CeremonySrs::Bw6_761(t) => &t.warnings,
        }
    }

    /// Writes the SRS in its canonical arkworks encoding
    pub fn serialize_with_mode<W: Write>(&self, writer: W, compress: Compress) -> SetupResult<()> {
        match self {
            CeremonySrs::Bn254(t) => t.srs.serialize_with_mode(writer, compress)?,
            CeremonySrs::Bls12_377(t) => t.srs.serialize_with_mode(writer, compress)?,
            CeremonySrs::Bw6_761(t) => t.srs.serialize_with_mode(writer, compress)?,
        }
        Ok(())
    }
}

/// Reads the ceremony files in `dir` and builds the SRS over `curve`.
///
/// Fails with [`SetupError::Unsupported`] unless the pair is one of
/// [`SUPPORTED`]. Any error aborts the whole ceremony.
pub fn translate(ceremony: Ceremony, curve: Curve, dir: &Path) -> SetupResult<CeremonySrs> {
    match (ceremony, curve) {
        (Ceremony::Aztec, Curve::Bn254) => SequentialTranscripts::default()
            .translate(dir)
            .map(CeremonySrs::Bn254),
        (Ceremony::Aleo, Curve::Bls12_377) => {
            TaggedFiles.translate(dir).map(CeremonySrs::Bls12_377)
        }
        (Ceremony::Celo, Curve::Bw6_761) => ChunkedContributions::default()
            .translate(dir)
            .map(CeremonySrs::Bw6_761),
        _ => Err(SetupError::Unsupported { ceremony, curve }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for (ceremony, curve) in SUPPORTED.iter() {
            assert_eq!(ceremony.to_string().parse::<Ceremony>().unwrap(), *ceremony);
            assert_eq!(curve.to_string().parse::<Curve>().unwrap(), *curve);
        }
        assert_eq!("BLS12377".parse::<Curve>().unwrap(), Curve::Bls12_377);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            "zcash".parse::<Ceremony>(),
            Err(SetupError::UnknownCeremony(name)) if name == "zcash"
        ));
        assert!(matches!(
            "secp256k1".parse::<Curve>(),
            Err(SetupError::UnknownCurve(_))
        ));
    }

    #[test]
    fn mismatched_pair_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            translate(Ceremony::Aztec, Curve::Bw6_761, dir.path()),
            Err(SetupError::Unsupported {
                ceremony: Ceremony::Aztec,
                curve: Curve::Bw6_761
            })
        ));
    }
}
