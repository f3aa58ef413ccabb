//! Byte-exact decoding of ceremony field elements and curve points.
//!
//! Ceremony files store every coordinate as a fixed-width integer whose width
//! is the byte size of the base field modulus (32 bytes for BN254, 48 bytes for
//! BLS12-377, 96 bytes for BW6-761). Two layouts are in use:
//!
//! - [`Encoding::LittleEndian`]: the whole buffer is one little-endian integer.
//! - [`Encoding::WordSwapped`]: the buffer is a `uint64_t[]` with the least
//!   significant word first, each word written big-endian.
//!
//! Decoding never reduces: a value at or above the modulus is an error.
use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use ark_ff::{Field, Fp, FpConfig, PrimeField, QuadExtConfig, QuadExtField, Zero};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::borrow::Cow;
use thiserror::Error;

/// Size of a word in the [`Encoding::WordSwapped`] layout
pub const WORD_SIZE: usize = 8;

/// On-disk layout of a single field element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Plain little-endian integer
    LittleEndian,
    /// Little-endian order of 64-bit words, each word big-endian
    WordSwapped,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
/// Failure to turn a byte buffer into a field element
pub enum DecodeError {
    #[error("expected {expected} bytes, got {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("{0} bytes cannot be split into 64-bit words")]
    UnalignedWords(usize),
    #[error("value is not below the field modulus")]
    OutOfRange,
    #[error("input ends before the element is complete")]
    Truncated,
}

/// Number of bytes used to store one element of `F`
pub fn element_width<F: PrimeField>() -> usize {
    ((F::MODULUS_BIT_SIZE + 7) / 8) as usize
}

/// Decodes exactly `element_width::<F>()` bytes into an element of `F`.
pub fn decode_element<F: PrimeField>(bytes: &[u8], encoding: Encoding) -> Result<F, DecodeError> {
    check_len(bytes, element_width::<F>())?;

    let le = match encoding {
        Encoding::LittleEndian => Cow::Borrowed(bytes),
        Encoding::WordSwapped => Cow::Owned(words_to_le(bytes)?),
    };

    F::deserialize_uncompressed(&le[..]).map_err(|_| DecodeError::OutOfRange)
}

/// Rewrites a word-swapped buffer as a plain little-endian one.
///
/// Words stay in place and only the bytes inside each word are reversed, which
/// is the same as reading the words in reverse order (`w3 w2 w1 w0`) as a
/// big-endian integer.
pub fn words_to_le(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if bytes.len() % WORD_SIZE != 0 {
        return Err(DecodeError::UnalignedWords(bytes.len()));
    }

    let mut le = vec![0u8; bytes.len()];
    for (src, dst) in bytes
        .chunks_exact(WORD_SIZE)
        .zip(le.chunks_exact_mut(WORD_SIZE))
    {
        LittleEndian::write_u64(dst, BigEndian::read_u64(src));
    }
    Ok(le)
}

fn check_len(bytes: &[u8], expected: usize) -> Result<(), DecodeError> {
    if bytes.len() != expected {
        return Err(DecodeError::WrongLength {
            expected,
            found: bytes.len(),
        });
    }
    Ok(())
}

/// A field which can appear as a point coordinate in a ceremony file
pub trait CoordinateDecode: Field {
    /// Bytes occupied by one coordinate
    fn encoded_len() -> usize;

    /// Decodes one coordinate from exactly `encoded_len()` bytes
    fn decode(bytes: &[u8], encoding: Encoding) -> Result<Self, DecodeError>;
}

impl<P: FpConfig<N>, const N: usize> CoordinateDecode for Fp<P, N> {
    fn encoded_len() -> usize {
        element_width::<Self>()
    }

    fn decode(bytes: &[u8], encoding: Encoding) -> Result<Self, DecodeError> {
        decode_element(bytes, encoding)
    }
}

/// Extension coordinates are stored as `c0` followed by `c1`.
impl<P: QuadExtConfig> CoordinateDecode for QuadExtField<P>
where
    P::BaseField: CoordinateDecode,
{
    fn encoded_len() -> usize {
        2 * P::BaseField::encoded_len()
    }

    fn decode(bytes: &[u8], encoding: Encoding) -> Result<Self, DecodeError> {
        check_len(bytes, Self::encoded_len())?;
        let (c0, c1) = bytes.split_at(P::BaseField::encoded_len());
        Ok(QuadExtField::new(
            P::BaseField::decode(c0, encoding)?,
            P::BaseField::decode(c1, encoding)?,
        ))
    }
}

/// Bytes occupied by an uncompressed affine point of the curve `P`
pub fn point_len<P: SWCurveConfig>() -> usize
where
    P::BaseField: CoordinateDecode,
{
    2 * P::BaseField::encoded_len()
}

/// Builds an affine point from raw coordinates without any curve checks.
/// `(0, 0)` is the ceremonies' encoding of the point at infinity.
pub fn point_from_coordinates<P: SWCurveConfig>(x: P::BaseField, y: P::BaseField) -> Affine<P> {
    if x.is_zero() && y.is_zero() {
        Affine::identity()
    } else {
        Affine::new_unchecked(x, y)
    }
}

/// Decodes an `x || y` point buffer.
pub fn decode_point<P: SWCurveConfig>(
    bytes: &[u8],
    encoding: Encoding,
) -> Result<Affine<P>, DecodeError>
where
    P::BaseField: CoordinateDecode,
{
    check_len(bytes, point_len::<P>())?;
    let (x, y) = bytes.split_at(P::BaseField::encoded_len());
    Ok(point_from_coordinates(
        P::BaseField::decode(x, encoding)?,
        P::BaseField::decode(y, encoding)?,
    ))
}
