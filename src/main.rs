use clap::Parser;

use galaxy_populator::defaults::DEFAULT_LUMINOSITY_THRESHOLD;
use galaxy_populator::export;
use galaxy_populator::halos::{generate_fake_sim, FakeSimConfig};
use galaxy_populator::options::FeatureOptions;
use galaxy_populator::zheng07::zheng07_model;

#[derive(Parser, Debug)]
#[command(name = "galaxy_populator")]
#[command(about = "Populate a halo catalog with mock galaxies using a Zheng07 HOD model")]
struct Args {
    /// Luminosity threshold of the galaxy sample (r-band absolute magnitude)
    #[arg(short, long, default_value_t = DEFAULT_LUMINOSITY_THRESHOLD, allow_hyphen_values = true)]
    threshold: f64,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of halos in the fake simulation
    #[arg(short = 'n', long, default_value = "10000")]
    num_halos: usize,

    /// Periodic box side length in Mpc/h
    #[arg(short, long, default_value = "250.0")]
    box_size: f64,

    /// Redshift of the snapshot
    #[arg(short, long, default_value = "0.0")]
    redshift: f64,

    /// Multiply the satellite occupation by the central mean occupation
    #[arg(long)]
    modulate_with_cenocc: bool,

    /// Override a model parameter, e.g. --param alpha=1.2 (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, f64)>,

    /// Export the full galaxy catalog to JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Export the galaxy table to CSV
    #[arg(long)]
    export_csv: Option<String>,

    /// Export the catalog summary to JSON
    #[arg(long)]
    export_summary: Option<String>,

    /// Export the projected galaxy density to PNG
    #[arg(long)]
    export_density: Option<String>,

    /// Side length of the density image in pixels
    #[arg(long, default_value = "512")]
    density_bins: usize,
}

fn parse_param(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    let value: f64 = value.parse().map_err(|e| format!("bad value for '{}': {}", name, e))?;
    Ok((name.to_string(), value))
}

fn main() {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Populating mock with seed: {}", seed);
    println!("Luminosity threshold: {:.1}", args.threshold);

    // Build the composite model
    let mut options = FeatureOptions::default().with_redshift(args.redshift);
    if args.modulate_with_cenocc {
        options = options.with_cenocc_modulation();
    }
    for (name, value) in &args.params {
        options = options.with_param(name, *value);
        println!("Parameter override: {} = {}", name, value);
    }

    let model = match zheng07_model(args.threshold, &options) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };
    println!("Composite model parameters:");
    for (name, value) in model.param_dict() {
        println!("  {} = {}", name, value);
    }

    // Generate the fake halo catalog
    println!("Generating fake simulation ({} halos, {:.0} Mpc/h box)...", args.num_halos, args.box_size);
    let sim_config = FakeSimConfig {
        num_halos: args.num_halos,
        box_size: args.box_size,
        redshift: args.redshift,
        ..Default::default()
    };
    let catalog = generate_fake_sim(&sim_config, seed);
    println!(
        "Catalog ready: {} halos, {} above 1e13 Msun/h",
        catalog.halos.len(),
        catalog.count_above(1.0e13)
    );

    // Populate
    println!("Populating mock catalog...");
    let mock = model.populate_mock(&catalog, seed);
    let summary = mock.summary();
    println!("Placed {} galaxies", summary.total_galaxies);
    for (population, count) in &summary.counts {
        println!("  {}: {}", population, count);
    }
    println!("Satellite fraction: {:.3}", summary.satellite_fraction);
    println!("Number density: {:.3e} (h/Mpc)^3", summary.number_density);

    // Exports
    if let Some(path) = &args.export_json {
        match export::export_mock_json(&mock, path) {
            Ok(()) => println!("Wrote galaxy catalog to {}", path),
            Err(err) => eprintln!("JSON export failed: {}", err),
        }
    }
    if let Some(path) = &args.export_csv {
        match export::export_mock_csv(&mock, path) {
            Ok(()) => println!("Wrote galaxy table to {}", path),
            Err(err) => eprintln!("CSV export failed: {}", err),
        }
    }
    if let Some(path) = &args.export_summary {
        match export::export_summary_json(&mock, path) {
            Ok(()) => println!("Wrote summary to {}", path),
            Err(err) => eprintln!("Summary export failed: {}", err),
        }
    }
    if let Some(path) = &args.export_density {
        match export::export_density_map(&mock, args.density_bins, path) {
            Ok(()) => println!("Wrote density map to {}", path),
            Err(err) => eprintln!("Density export failed: {}", err),
        }
    }
}
