use ark_serialize::Compress;
use ceremony_srs::{translate, Ceremony, Curve, SUPPORTED};
use clap::{App, Arg, ArgMatches};
use eyre::{bail, WrapErr};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
    process,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = App::new("srs-translate")
        .about("Builds a KZG SRS from the output files of a powers-of-tau ceremony")
        .arg(
            Arg::with_name("ceremony")
                .value_name("CEREMONY")
                .help("Ceremony the files come from: aztec, aleo or celo")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("curve")
                .value_name("CURVE")
                .help("Curve of the ceremony: bn254, bls12377 or bw6761")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("setup-dir")
                .value_name("SETUP_DIR")
                .help("Directory holding the ceremony files")
                .required(true)
                .index(3),
        )
        .arg(
            Arg::with_name("output-dir")
                .long("output-dir")
                .short("o")
                .value_name("DIR")
                .help("Where to write the SRS")
                .default_value("."),
        )
        .arg(
            Arg::with_name("compressed")
                .long("compressed")
                .help("Write points in compressed form"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        error!("{:?}", err);
        process::exit(1);
    }
}

fn log_supported() {
    error!("Supported pairs:");
    for (ceremony, curve) in SUPPORTED.iter() {
        error!("  {} {}", ceremony, curve);
    }
}

/// Parses the ceremony and curve names, listing the supported pairs when
/// either name is unknown or the pair does not exist
fn parse_pair(ceremony: &str, curve: &str) -> eyre::Result<(Ceremony, Curve)> {
    let parsed = ceremony
        .parse::<Ceremony>()
        .and_then(|ceremony| curve.parse::<Curve>().map(|curve| (ceremony, curve)));
    let (ceremony, curve) = match parsed {
        Ok(pair) => pair,
        Err(err) => {
            log_supported();
            return Err(err.into());
        }
    };

    if !SUPPORTED.contains(&(ceremony, curve)) {
        error!("{} is not run over {}", ceremony, curve);
        log_supported();
        bail!("unsupported ceremony/curve pair: {} {}", ceremony, curve);
    }
    Ok((ceremony, curve))
}

fn run(matches: &ArgMatches) -> eyre::Result<()> {
    // all three are required, so clap has already checked they are present
    let (ceremony, curve) = parse_pair(
        matches.value_of("ceremony").unwrap_or_default(),
        matches.value_of("curve").unwrap_or_default(),
    )?;
    let setup_dir = Path::new(matches.value_of("setup-dir").unwrap_or_default());
    let output_dir = Path::new(matches.value_of("output-dir").unwrap_or("."));
    let compress = if matches.is_present("compressed") {
        Compress::Yes
    } else {
        Compress::No
    };

    let srs = translate(ceremony, curve, setup_dir)
        .wrap_err_with(|| format!("failed to translate {}", setup_dir.display()))?;
    if !srs.warnings().is_empty() {
        warn!("Finished with {} warning(s)", srs.warnings().len());
    }

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("failed to create {}", output_dir.display()))?;
    let path = output_dir.join(format!(
        "kzg_srs_canonical_{}_{}_{}.bin",
        srs.num_points() - 1,
        curve,
        ceremony
    ));

    info!("Writing SRS to {}", path.display());
    let file =
        File::create(&path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    srs.serialize_with_mode(&mut writer, compress)?;
    writer.flush()?;

    info!(
        "Wrote SRS of degree {} for {} over {}",
        srs.num_points() - 1,
        ceremony,
        curve
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceremony_srs::SetupError;

    #[test]
    fn parses_supported_pairs() {
        assert_eq!(
            parse_pair("Aztec", "bn254").unwrap(),
            (Ceremony::Aztec, Curve::Bn254)
        );
        assert_eq!(
            parse_pair("celo", "BW6761").unwrap(),
            (Ceremony::Celo, Curve::Bw6_761)
        );
    }

    #[test]
    fn rejects_unknown_names_and_mismatched_pairs() {
        let err = parse_pair("zcash", "bn254").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::UnknownCeremony(_))
        ));

        let err = parse_pair("aleo", "secp256k1").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::UnknownCurve(_))
        ));

        let err = parse_pair("aztec", "bw6761").unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }
}
