
use ark_ec::AffineRepr;
use ark_ff::UniformRand;
use ark_serialize::{CanonicalDeserialize, Compress, Validate};
use ceremony_srs::{
    translate, Ceremony, CeremonySrs, Curve, KzgSrs, SetupError, SetupWarning, SUPPORTED,
};
use fixtures::{
    powers_of, rng, write_aleo_g1_file, write_aleo_g2_file, write_aztec_transcript,
    write_celo_chunk,
};

#[test]
fn aztec_transcripts_to_srs() {
    use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};

    let rng = &mut rng();
    let tau = Fr::rand(rng);
    let z = Fr::rand(rng);
    let powers = powers_of::<G1Affine>(tau, 1..6);
    let tau_g2 = powers_of::<G2Affine>(tau, 1..2)[0];
    let z_g2 = powers_of::<G2Affine>(z, 1..2)[0];

    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();
    write_aztec_transcript(
        &dir.join("transcript00.dat"),
        0,
        3,
        0,
        &powers[..2],
        Some([z_g2, tau_g2]),
    );
    write_aztec_transcript(&dir.join("transcript01.dat"), 1, 3, 2, &powers[2..], None);
    write_aztec_transcript(&dir.join("transcript02.dat"), 2, 3, 5, &[], None);

    let srs = translate(Ceremony::Aztec, Curve::Bn254, dir).unwrap();
    assert_eq!(srs.curve(), Curve::Bn254);
    assert_eq!(srs.num_points(), 1 + 2 + 3 + 0);
    // only three of the nominal twenty transcripts
    assert_eq!(
        srs.warnings(),
        &[SetupWarning::CountMismatch {
            expected: 20,
            found: 3
        }]
    );

    let translation = match srs {
        CeremonySrs::Bn254(t) => t,
        other => panic!("wrong curve: {}", other.curve()),
    };
    let g1 = translation.srs.powers_of_g1();
    assert_eq!(g1[0], G1Affine::generator());
    assert_eq!(&g1[1..], &powers[..]);
    assert_eq!(translation.srs.g2(), &[G2Affine::generator(), tau_g2]);

    // written with the canonical encoding, it reads back as the same SRS
    let mut bytes = vec![];
    CeremonySrs::Bn254(translation.clone())
        .serialize_with_mode(&mut bytes, Compress::Yes)
        .unwrap();
    let back = KzgSrs::<Bn254>::deserialize_with_mode(&bytes[..], Compress::Yes, Validate::Yes)
        .unwrap();
    assert_eq!(back.powers_of_g1(), translation.srs.powers_of_g1());
    assert_eq!(back.g2(), translation.srs.g2());
    assert_eq!(back.max_degree(), 5);
}

#[test]
fn aleo_files_to_srs() {
    use ark_bls12_377::{Fr, G1Affine, G2Affine};

    let tau = Fr::rand(&mut rng());
    let powers = powers_of::<G1Affine>(tau, 1..9);
    let tau_g2 = powers_of::<G2Affine>(tau, 1..2)[0];

    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();
    write_aleo_g1_file(&dir.join("powers_of_g1_0"), &powers[..4]);
    write_aleo_g1_file(&dir.join("powers_of_g1_1"), &powers[4..]);
    write_aleo_g2_file(&dir.join("powers_of_G2"), &tau_g2, true);

    let srs = translate(Ceremony::Aleo, Curve::Bls12_377, dir).unwrap();
    assert_eq!(srs.num_points(), 9);
    assert!(srs.warnings().is_empty());

    match srs {
        CeremonySrs::Bls12_377(t) => {
            assert_eq!(&t.srs.powers_of_g1()[1..], &powers[..]);
            assert_eq!(t.srs.g2()[1], tau_g2);
        }
        other => panic!("wrong curve: {}", other.curve()),
    }
}

#[test]
fn celo_chunks_to_srs() {
    use ark_bw6_761::{Fr, G1Affine, G2Affine};

    const CHUNKS: usize = 256;
    let tau = Fr::rand(&mut rng());
    let powers = powers_of::<G1Affine>(tau, 0..CHUNKS as u64);
    let tau_g2 = powers_of::<G2Affine>(tau, 1..2)[0];

    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();
    for chunk in 0..CHUNKS {
        let g2 = if chunk == 0 {
            Some([G2Affine::generator(), tau_g2])
        } else {
            None
        };
        write_celo_chunk(
            &dir.join(format!("0.{}.0.contributor", chunk)),
            chunk,
            CHUNKS,
            &powers[chunk..chunk + 1],
            g2,
        );
    }

    let srs = translate(Ceremony::Celo, Curve::Bw6_761, dir).unwrap();
    assert_eq!(srs.num_points(), CHUNKS);
    match srs {
        CeremonySrs::Bw6_761(t) => {
            assert_eq!(t.srs.powers_of_g1(), &powers[..]);
            assert_eq!(t.srs.g2(), &[G2Affine::generator(), tau_g2]);
        }
        other => panic!("wrong curve: {}", other.curve()),
    }
}

#[test]
fn only_matching_pairs_are_supported() {
    let dir = tempfile::tempdir().unwrap();
    for ceremony in [Ceremony::Aztec, Ceremony::Aleo, Ceremony::Celo] {
        for curve in [Curve::Bn254, Curve::Bls12_377, Curve::Bw6_761] {
            let result = translate(ceremony, curve, dir.path());
            if SUPPORTED.contains(&(ceremony, curve)) {
                // supported, but the directory is empty
                assert!(!matches!(result, Err(SetupError::Unsupported { .. })));
            } else {
                assert!(matches!(result, Err(SetupError::Unsupported { .. })));
            }
        }
    }
}
