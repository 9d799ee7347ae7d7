//! Shared command-line parsing for the `tess*` binaries: `-R`, `-B`, `-Z`,
//! `-O` and `-A`, one model file positional argument. Grounded on the
//! reference `cmd.h` flag grammar (`-R<W/E/S/N>`, `-B<nLon/nLat>`,
//! `-Z<height>`, `-O<lonO/latO/rO>`, `-A<2D|3D>`), reworked as idiomatic
//! `Result`-returning parsers instead of out-parameters and a success bool.

use crate::error::{CliError, CliResult};
use crate::kernel::Algorithm;

/// Parsed arguments common to every `tess*` binary.
#[derive(Clone, Debug)]
pub struct Args {
    pub model_file: String,
    pub w: f64,
    pub e: f64,
    pub s: f64,
    pub n: f64,
    pub nlon: usize,
    pub nlat: usize,
    pub height: f64,
    pub lon_order: usize,
    pub lat_order: usize,
    pub r_order: usize,
    pub algorithm: Algorithm,
}

/// Parse `args` (excluding argv[0]) into [`Args`]. `-O` and `-A` are
/// optional, defaulting to `5/5/5` and `2D` respectively; everything else is
/// mandatory. Exactly one positional (non-flag) argument is accepted, the
/// model file name.
pub fn parse(args: &[String]) -> CliResult<Args> {
    let mut model_file: Option<String> = None;
    let mut region: Option<(f64, f64, f64, f64)> = None;
    let mut dims: Option<(usize, usize)> = None;
    let mut height: Option<f64> = None;
    let mut orders: (usize, usize, usize) = (5, 5, 5);
    let mut algorithm = Algorithm::TwoD;
    let mut orders_set = false;
    let mut algorithm_set = false;

    for arg in args {
        if let Some(rest) = arg.strip_prefix("-R") {
            if region.is_some() {
                return Err(CliError::DuplicatedFlag("-R".to_string()));
            }
            region = Some(parse_region(rest)?);
        } else if let Some(rest) = arg.strip_prefix("-B") {
            if dims.is_some() {
                return Err(CliError::DuplicatedFlag("-B".to_string()));
            }
            dims = Some(parse_dims(rest)?);
        } else if let Some(rest) = arg.strip_prefix("-Z") {
            if height.is_some() {
                return Err(CliError::DuplicatedFlag("-Z".to_string()));
            }
            height = Some(parse_height(rest)?);
        } else if let Some(rest) = arg.strip_prefix("-O") {
            if orders_set {
                return Err(CliError::DuplicatedFlag("-O".to_string()));
            }
            orders_set = true;
            orders = parse_orders(rest)?;
        } else if let Some(rest) = arg.strip_prefix("-A") {
            if algorithm_set {
                return Err(CliError::DuplicatedFlag("-A".to_string()));
            }
            algorithm_set = true;
            algorithm = parse_algorithm(rest)?;
        } else if let Some(flag) = arg.strip_prefix('-') {
            return Err(CliError::UnrecognizedFlag(format!("-{flag}")));
        } else if model_file.is_some() {
            return Err(CliError::DuplicatedFlag("model file".to_string()));
        } else {
            model_file = Some(arg.clone());
        }
    }

    let model_file = model_file.ok_or_else(|| CliError::MissingFlag("model file".to_string()))?;
    let (w, e, s, n) = region.ok_or_else(|| CliError::MissingFlag("-R".to_string()))?;
    let (nlon, nlat) = dims.ok_or_else(|| CliError::MissingFlag("-B".to_string()))?;
    let height = height.ok_or_else(|| CliError::MissingFlag("-Z".to_string()))?;

    Ok(Args {
        model_file,
        w,
        e,
        s,
        n,
        nlon,
        nlat,
        height,
        lon_order: orders.0,
        lat_order: orders.1,
        r_order: orders.2,
        algorithm,
    })
}

fn malformed(flag: &str, value: &str) -> CliError {
    CliError::MalformedValue {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}

fn parse_region(arg: &str) -> CliResult<(f64, f64, f64, f64)> {
    let parts: Vec<&str> = arg.split('/').collect();
    if parts.len() != 4 {
        return Err(malformed("-R", arg));
    }
    let mut values = [0.0; 4];
    for (v, p) in values.iter_mut().zip(parts.iter()) {
        *v = p.parse::<f64>().map_err(|_| malformed("-R", arg))?;
    }
    Ok((values[0], values[1], values[2], values[3]))
}

fn parse_dims(arg: &str) -> CliResult<(usize, usize)> {
    let parts: Vec<&str> = arg.split('/').collect();
    if parts.len() != 2 {
        return Err(malformed("-B", arg));
    }
    let nlon = parts[0].parse::<usize>().map_err(|_| malformed("-B", arg))?;
    let nlat = parts[1].parse::<usize>().map_err(|_| malformed("-B", arg))?;
    if nlon == 0 || nlat == 0 {
        return Err(malformed("-B", arg));
    }
    Ok((nlon, nlat))
}

fn parse_height(arg: &str) -> CliResult<f64> {
    arg.parse::<f64>().map_err(|_| malformed("-Z", arg))
}

fn parse_orders(arg: &str) -> CliResult<(usize, usize, usize)> {
    let parts: Vec<&str> = arg.split('/').collect();
    if parts.len() != 3 {
        return Err(malformed("-O", arg));
    }
    let mut values = [0usize; 3];
    for (v, p) in values.iter_mut().zip(parts.iter()) {
        *v = p.parse::<usize>().map_err(|_| malformed("-O", arg))?;
        if *v == 0 {
            return Err(malformed("-O", arg));
        }
    }
    Ok((values[0], values[1], values[2]))
}

fn parse_algorithm(arg: &str) -> CliResult<Algorithm> {
    match arg {
        "2D" => Ok(Algorithm::TwoD),
        "3D" => Ok(Algorithm::ThreeD),
        _ => Err(malformed("-A", arg)),
    }
}

/// The shared usage text, printed by every `tess*` binary when invoked with
/// no arguments, grounded on the reference tools' synopsis/arguments layout.
pub fn usage(program: &str, one_line_description: &str) -> String {
    format!(
        "\n  This is {program}:\n      - {one_line_description}\n\n\
\n  Synopsis:\n\n   {program} model_file -R<W/E/S/N> -B<nLon/nLat> -Z<height> -O<lonO/latO/rO> -A<type>\n\n\
\n  Mandatory arguments:\n\n      model_file : The model input file name.\
\n      -R : The output data grid boundaries in degrees.\
\n      -B : The dimensions of the grid. nLon and nLat must be integers > 0.\
\n      -Z : The height of calculation, in metres, positive upwards.\n\
\n  Optional arguments:\n\n      -O : The GLQ orders in the longitude, latitude and radial directions.\
\n           Must be integers > 0 <DEFAULT=5/5/5>.\
\n      -A : The algorithm to use, '2D' (analytic radial integral) or '3D' (direct GLQ) <DEFAULT=2D>.\n\
\n  Output:\n\n      'lon lat value', one row per grid node, blank line between latitude rows.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_a_full_valid_invocation() {
        let parsed = parse(&args(&[
            "model.txt",
            "-R-10/10/-10/10",
            "-B50/50",
            "-Z1000",
            "-O3/3/3",
            "-A3D",
        ]))
        .unwrap();
        assert_eq!(parsed.model_file, "model.txt");
        assert_eq!((parsed.w, parsed.e, parsed.s, parsed.n), (-10.0, 10.0, -10.0, 10.0));
        assert_eq!((parsed.nlon, parsed.nlat), (50, 50));
        assert_eq!(parsed.height, 1000.0);
        assert_eq!((parsed.lon_order, parsed.lat_order, parsed.r_order), (3, 3, 3));
        assert_eq!(parsed.algorithm, Algorithm::ThreeD);
    }

    #[test]
    fn defaults_orders_and_algorithm_when_omitted() {
        let parsed = parse(&args(&["model.txt", "-R-1/1/-1/1", "-B2/2", "-Z0"])).unwrap();
        assert_eq!((parsed.lon_order, parsed.lat_order, parsed.r_order), (5, 5, 5));
        assert_eq!(parsed.algorithm, Algorithm::TwoD);
    }

    #[test]
    fn rejects_missing_mandatory_flag() {
        assert!(matches!(
            parse(&args(&["model.txt", "-B2/2", "-Z0"])),
            Err(CliError::MissingFlag(_))
        ));
    }

    #[test]
    fn rejects_duplicated_flag() {
        assert!(matches!(
            parse(&args(&["model.txt", "-R-1/1/-1/1", "-R-1/1/-1/1", "-B2/2", "-Z0"])),
            Err(CliError::DuplicatedFlag(_))
        ));
    }

    #[test]
    fn rejects_unrecognized_flag() {
        assert!(matches!(
            parse(&args(&["model.txt", "-Q123"])),
            Err(CliError::UnrecognizedFlag(_))
        ));
    }

    #[test]
    fn rejects_malformed_region() {
        assert!(matches!(
            parse(&args(&["model.txt", "-R1/2/3", "-B2/2", "-Z0"])),
            Err(CliError::MalformedValue { .. })
        ));
    }
}
