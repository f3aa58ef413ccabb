use crate::CeremonyCurve;
use ark_ec::pairing::Pairing;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::io::{Read, Write};

/// A KZG structured reference string.
///
/// `powers_of_g1[i]` is `[τ^i]G1`, so the first entry is always the G1
/// generator. `g2` holds `[G2, τG2]` and `prepared_g2` their pairing lines.
#[derive(Clone, Debug)]
pub struct KzgSrs<E: Pairing> {
    powers_of_g1: Vec<E::G1Affine>,
    g2: [E::G2Affine; 2],
    prepared_g2: [E::G2Prepared; 2],
}

impl<E: CeremonyCurve> KzgSrs<E> {
    /// Assembles the SRS and precomputes the pairing lines of both G2 points
    pub fn new(powers_of_g1: Vec<E::G1Affine>, g2: [E::G2Affine; 2]) -> Self {
        let prepared_g2 = [E::precompute_lines(g2[0]), E::precompute_lines(g2[1])];
        Self {
            powers_of_g1,
            g2,
            prepared_g2,
        }
    }
}

impl<E: Pairing> KzgSrs<E> {
    pub fn powers_of_g1(&self) -> &[E::G1Affine] {
        &self.powers_of_g1
    }

    pub fn g2(&self) -> &[E::G2Affine; 2] {
        &self.g2
    }

    pub fn prepared_g2(&self) -> &[E::G2Prepared; 2] {
        &self.prepared_g2
    }

    /// Number of G1 powers, including the generator
    pub fn num_points(&self) -> usize {
        self.powers_of_g1.len()
    }

    /// Largest polynomial degree this SRS can commit to
    pub fn max_degree(&self) -> usize {
        self.powers_of_g1.len().saturating_sub(1)
    }
}

impl<E: Pairing> CanonicalSerialize for KzgSrs<E> {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        self.powers_of_g1.serialize_with_mode(&mut writer, compress)?;
        for point in self.g2.iter() {
            point.serialize_with_mode(&mut writer, compress)?;
        }
        for prepared in self.prepared_g2.iter() {
            prepared.serialize_with_mode(&mut writer, compress)?;
        }
        Ok(())
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        self.powers_of_g1.serialized_size(compress)
            + self
                .g2
                .iter()
                .map(|p| p.serialized_size(compress))
                .sum::<usize>()
            + self
                .prepared_g2
                .iter()
                .map(|p| p.serialized_size(compress))
                .sum::<usize>()
    }
}

impl<E: Pairing> Valid for KzgSrs<E> {
    fn check(&self) -> Result<(), SerializationError> {
        self.powers_of_g1.check()?;
        for point in self.g2.iter() {
            point.check()?;
        }
        for prepared in self.prepared_g2.iter() {
            prepared.check()?;
        }
        Ok(())
    }
}

impl<E: Pairing> CanonicalDeserialize for KzgSrs<E> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let powers_of_g1 =
            Vec::<E::G1Affine>::deserialize_with_mode(&mut reader, compress, validate)?;
        let g2 = [
            E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?,
            E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?,
        ];
        let prepared_g2 = [
            E::G2Prepared::deserialize_with_mode(&mut reader, compress, validate)?,
            E::G2Prepared::deserialize_with_mode(&mut reader, compress, validate)?,
        ];
        Ok(Self {
            powers_of_g1,
            g2,
            prepared_g2,
        })
    }
}
