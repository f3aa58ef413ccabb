use ark_ec::{
    pairing::Pairing,
    short_weierstrass::{Affine, SWCurveConfig},
    AffineRepr,
};

/// What the translation needs from a pairing-friendly curve beyond `Pairing`
/// itself: its canonical generators and the G2 line precomputation.
pub trait CeremonyCurve: Pairing {
    /// Short name used in logs and output file names
    const NAME: &'static str;

    /// The canonical `(G1, G2)` generators
    fn generators() -> (Self::G1Affine, Self::G2Affine) {
        (Self::G1Affine::generator(), Self::G2Affine::generator())
    }

    /// Precomputes the Miller loop line coefficients for a fixed G2 point
    fn precompute_lines(point: Self::G2Affine) -> Self::G2Prepared {
        point.into()
    }
}

impl CeremonyCurve for ark_bn254::Bn254 {
    const NAME: &'static str = "bn254";
}

impl CeremonyCurve for ark_bls12_377::Bls12_377 {
    const NAME: &'static str = "bls12377";
}

impl CeremonyCurve for ark_bw6_761::BW6_761 {
    const NAME: &'static str = "bw6761";
}

/// Returns true if the point is on the curve and is not the identity
pub fn is_valid_point<P: SWCurveConfig>(point: &Affine<P>) -> bool {
    !point.is_zero() && point.is_on_curve()
}
