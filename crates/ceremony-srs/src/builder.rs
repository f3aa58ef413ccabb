use crate::{CeremonyCurve, KzgSrs, SetupError, SetupResult};
use std::{fmt, path::PathBuf};
use tracing::{info, warn};

/// Non-fatal conditions found while reading a ceremony. They are logged and
/// handed back with the finished SRS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupWarning {
    /// Fewer (or more) source files than the ceremony nominally has
    CountMismatch { expected: usize, found: usize },
    /// Transcript numbers that never showed up in any header
    MissingTranscripts { missing: Vec<u32> },
    /// A file whose declared start power is not where it got appended
    StartIndexMismatch {
        path: PathBuf,
        expected: u64,
        found: u64,
    },
    /// A generator stored in the file differs from the canonical one
    GeneratorMismatch { path: PathBuf, group: &'static str },
}

impl fmt::Display for SetupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupWarning::CountMismatch { expected, found } => {
                write!(f, "expected {} setup files, but got {}", expected, found)
            }
            SetupWarning::MissingTranscripts { missing } => {
                write!(f, "transcripts {:?} were never seen", missing)
            }
            SetupWarning::StartIndexMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "{} starts at power {}, but was appended at power {}",
                path.display(),
                found,
                expected
            ),
            SetupWarning::GeneratorMismatch { path, group } => write!(
                f,
                "{} generator in {} doesn't match the expected generator",
                group,
                path.display()
            ),
        }
    }
}

/// A finished translation: the SRS, its G1 point count and the warnings
/// raised along the way
#[derive(Clone, Debug)]
pub struct Translation<E: CeremonyCurve> {
    pub srs: KzgSrs<E>,
    pub num_points: usize,
    pub warnings: Vec<SetupWarning>,
}

/// Owns the SRS while a reader streams points into it.
///
/// The G1 sequence starts with the canonical generator (power 0) and only
/// ever grows at the end, in the order points are pushed. The τ·G2 slot can
/// be written once.
#[derive(Debug)]
pub struct SrsBuilder<E: CeremonyCurve> {
    g1: Vec<E::G1Affine>,
    tau_g2: Option<E::G2Affine>,
    warnings: Vec<SetupWarning>,
}

impl<E: CeremonyCurve> Default for SrsBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CeremonyCurve> SrsBuilder<E> {
    /// Creates a builder seeded with the G1 generator at power 0
    pub fn new() -> Self {
        let (g1, _) = E::generators();
        Self {
            g1: vec![g1],
            tau_g2: None,
            warnings: vec![],
        }
    }

    /// Appends the next power of τ
    pub fn push_g1(&mut self, point: E::G1Affine) {
        self.g1.push(point);
        if self.g1.len() == 2 {
            info!("τ·G1: {}", point);
        }
    }

    /// Number of G1 points so far, including the generator
    pub fn len(&self) -> usize {
        self.g1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.g1.is_empty()
    }

    pub fn g1_generator(&self) -> &E::G1Affine {
        &self.g1[0]
    }

    pub fn tau_g2(&self) -> Option<&E::G2Affine> {
        self.tau_g2.as_ref()
    }

    /// Sets τ·G2. `source` names the file it came from.
    pub fn set_tau_g2(
        &mut self,
        point: E::G2Affine,
        source: impl Into<PathBuf>,
    ) -> SetupResult<()> {
        if self.tau_g2.is_some() {
            return Err(SetupError::DuplicateTauG2 {
                path: source.into(),
            });
        }
        info!("τ·G2: {}", point);
        self.tau_g2 = Some(point);
        Ok(())
    }

    /// Logs a warning and keeps it for the caller
    pub fn warn(&mut self, warning: SetupWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[SetupWarning] {
        &self.warnings
    }

    /// Seals the SRS: fills `G2[0]` with the generator and precomputes the
    /// pairing lines of both G2 points.
    pub fn finalize(self) -> SetupResult<Translation<E>> {
        let tau_g2 = self.tau_g2.ok_or(SetupError::MissingTauG2)?;
        let (_, g2) = E::generators();

        let num_points = self.g1.len();
        info!(
            "Assembled {} SRS with {} G1 points (max degree {})",
            E::NAME,
            num_points,
            num_points - 1
        );

        Ok(Translation {
            srs: KzgSrs::new(self.g1, [g2, tau_g2]),
            num_points,
            warnings: self.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{powers_of, rng};
    use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
    use ark_ec::AffineRepr;
    use ark_ff::UniformRand;

    #[test]
    fn seeds_generator_and_keeps_push_order() {
        let tau = Fr::rand(&mut rng());
        let powers = powers_of::<G1Affine>(tau, 1..6);

        let mut builder = SrsBuilder::<Bn254>::new();
        assert_eq!(builder.len(), 1);
        assert_eq!(*builder.g1_generator(), G1Affine::generator());
        for point in powers.iter() {
            builder.push_g1(*point);
        }
        builder
            .set_tau_g2(powers_of::<G2Affine>(tau, 1..2)[0], "g2")
            .unwrap();

        let translation = builder.finalize().unwrap();
        assert_eq!(translation.num_points, 6);
        assert_eq!(translation.srs.powers_of_g1()[0], G1Affine::generator());
        assert_eq!(&translation.srs.powers_of_g1()[1..], &powers[..]);
        assert_eq!(translation.srs.g2()[0], G2Affine::generator());
    }

    #[test]
    fn tau_g2_is_write_once() {
        let mut builder = SrsBuilder::<Bn254>::new();
        builder.set_tau_g2(G2Affine::generator(), "first").unwrap();
        assert!(matches!(
            builder.set_tau_g2(G2Affine::generator(), "second"),
            Err(SetupError::DuplicateTauG2 { .. })
        ));
    }

    #[test]
    fn finalize_requires_tau_g2() {
        let builder = SrsBuilder::<Bn254>::new();
        assert!(matches!(
            builder.finalize(),
            Err(SetupError::MissingTauG2)
        ));
    }

    #[test]
    fn warnings_are_returned() {
        let mut builder = SrsBuilder::<Bn254>::new();
        builder.warn(SetupWarning::CountMismatch {
            expected: 20,
            found: 3,
        });
        builder.set_tau_g2(G2Affine::generator(), "g2").unwrap();
        let translation = builder.finalize().unwrap();
        assert_eq!(
            translation.warnings,
            vec![SetupWarning::CountMismatch {
                expected: 20,
                found: 3
            }]
        );
    }
}
