//! tessdivmod: subdivide every tesseroid in a model file into a finer grid
//! of sub-tesseroids, writing the result to stdout in the same 7-field
//! format as the model loader reads, preceded by a provenance comment
//! header recording the source file and the subdivision order used.

use log::info;
use tesseroids::subdivision::subdivide;
use tesseroids::Model;

fn usage() -> String {
    "\n  This is TessDivMod:\n      - Subdivide every tesseroid of a model into n_lon x n_lat x n_r sub-tesseroids\n\n\
\n  Synopsis:\n\n   tessdivmod model_file -O<nLon/nLat/nR>\n\n\
\n  Mandatory arguments:\n\n      model_file : The model input file name.\
\n      -O : The number of subdivisions in longitude, latitude and radial direction.\
\n           Must be integers > 0.\n\
\n  Output:\n\n      The subdivided model, in the same 7-field format as the input,\
\n      printed to stdout with a provenance comment header.\n"
        .to_string()
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprint!("{}", usage());
        return;
    }
    if let Err(err) = run(&args) {
        eprintln!("\nERROR! {err}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let (model_file, n_lon, n_lat, n_r) = parse_args(args)?;
    info!("loading model from {model_file}");
    let model = Model::load_file(&model_file)?;
    info!("{} tesseroids loaded", model.len());

    println!("# tessdivmod: subdivision of {model_file}");
    println!("# subdivision order: {n_lon}/{n_lat}/{n_r} (lon/lat/r)");
    println!("# original tesseroid count: {}", model.len());
    let mut total = 0usize;
    for tess in model.tesseroids() {
        let parts = subdivide(tess, n_lon, n_lat, n_r)?;
        total += parts.len();
        for p in parts {
            println!(
                "{} {} {} {} {} {} {}",
                p.w.to_degrees(),
                p.e.to_degrees(),
                p.s.to_degrees(),
                p.n.to_degrees(),
                p.top,
                p.bottom,
                p.density
            );
        }
    }
    println!("# subdivided tesseroid count: {total}");

    Ok(())
}

fn parse_args(args: &[String]) -> Result<(String, usize, usize, usize), Box<dyn std::error::Error>> {
    let mut model_file: Option<String> = None;
    let mut orders: Option<(usize, usize, usize)> = None;

    for arg in args {
        if let Some(rest) = arg.strip_prefix("-O") {
            if orders.is_some() {
                return Err("more than one -O parameter was given".into());
            }
            let parts: Vec<&str> = rest.split('/').collect();
            if parts.len() != 3 {
                return Err(format!("-O must be <nLon/nLat/nR>, got '{arg}'").into());
            }
            let mut values = [0usize; 3];
            for (v, p) in values.iter_mut().zip(parts.iter()) {
                *v = p.parse::<usize>().map_err(|_| format!("invalid integer in -O: '{arg}'"))?;
                if *v == 0 {
                    return Err(format!("-O values must be > 0: '{arg}'").into());
                }
            }
            orders = Some((values[0], values[1], values[2]));
        } else if arg.starts_with('-') {
            return Err(format!("unrecognized flag: {arg}").into());
        } else if model_file.is_some() {
            return Err("more than one model file name was given".into());
        } else {
            model_file = Some(arg.clone());
        }
    }

    let model_file = model_file.ok_or("input model file name not given")?;
    let orders = orders.ok_or("subdivision order -O not given")?;
    Ok((model_file, orders.0, orders.1, orders.2))
}
