//! tessv: Calculate the gravitational potential <V> of a tesseroid model.

use log::info;
use tesseroids::{evaluate, Component, GridSpec, Model, Orders};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprint!(
            "{}",
            tesseroids::cli::usage("tessv", "Calculate the gravitational potential <V> of a tesseroid model")
        );
        return;
    }
    if let Err(err) = run(&args) {
        eprintln!("\nERROR! {err}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = tesseroids::cli::parse(args)?;
    info!("loading model from {}", parsed.model_file);
    let model = Model::load_file(&parsed.model_file)?;
    info!("{} tesseroids loaded", model.len());

    let grid = GridSpec::new(parsed.w, parsed.e, parsed.s, parsed.n, parsed.nlon, parsed.nlat, parsed.height)?;
    let orders = Orders {
        lat: parsed.lat_order,
        lon: parsed.lon_order,
        r: parsed.r_order,
    };

    info!("calculating field using {:?} GLQ", parsed.algorithm);
    let result = evaluate(&model, &grid, Component::V, parsed.algorithm, orders)?;

    for row in result.rows() {
        for node in row {
            println!("{} {} {}", node.lon, node.lat, node.value);
        }
        println!();
    }

    Ok(())
}
