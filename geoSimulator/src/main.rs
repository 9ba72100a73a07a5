use std::error::Error;

use anyhow::Context;
use clap::Parser;

use geophires::analysis::reporting::print_summary;
use geophires::cli::cli::Args;
use geophires::config::parameters::ModelParameters;
use geophires::core::simulation::run_simulation;
use geophires::data::parameters_loader::{default_parameters_json, load_parameters};
use geophires::utils::csv_export::CsvExporter;
use geophires::utils::logging;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    if args.print_default_config() {
        println!("{}", default_parameters_json()?);
        return Ok(());
    }

    logging::init_logging(args.enable_timing(), args.debug_logging())?;

    let mut params = match args.config() {
        Some(path) => load_parameters(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => ModelParameters::default(),
    };
    if let Some(profile) = args.profile() {
        params.subsurface.reservoir_profile_file = Some(profile.to_path_buf());
    }

    let results = run_simulation(&params)?;
    print_summary(&params, &results);

    if args.enable_csv_export() {
        let exporter = CsvExporter::new(args.output_dir(), args.debug_logging())
            .with_context(|| format!("creating output directory under {}", args.output_dir()))?;
        exporter.export_simulation_results(&params, &results)?;
        println!("Results written to {}", exporter.output_dir().display());
    }

    logging::print_timing_report();
    Ok(())
}
