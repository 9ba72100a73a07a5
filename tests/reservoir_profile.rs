use std::io::Write;

use geophires::config::options::ReservoirModel;
use geophires::core::error::SimulationError;
use geophires::data::temperature_profile_loader::TemperatureProfileError;
use geophires::{run_simulation, run_simulation_with_profile, ModelParameters};

fn profile_params() -> ModelParameters {
    let mut params = ModelParameters::default();
    params.subsurface.reservoir_model = ReservoirModel::UserProfile;
    params.financial.plant_lifetime = 10;
    params
}

fn write_profile(lines: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..lines {
        writeln!(file, "{},{}", i, 160.0 - 0.1 * i as f64).unwrap();
    }
    file
}

#[test]
fn profile_file_drives_reservoir_temperature() {
    let mut params = profile_params();
    let file = write_profile(params.time_steps());
    params.subsurface.reservoir_profile_file = Some(file.path().to_path_buf());

    let results = run_simulation(&params).unwrap();
    assert_eq!(results.reservoir_temperature.len(), params.time_steps());
    assert_eq!(results.reservoir_temperature[0], 160.0);
    assert_eq!(results.wellbore.redrill_count, 0);
    assert!(results.economics.price.is_finite());
}

#[test]
fn profile_with_wrong_length_is_rejected() {
    let mut params = profile_params();
    let file = write_profile(params.time_steps() - 1);
    params.subsurface.reservoir_profile_file = Some(file.path().to_path_buf());

    let err = run_simulation(&params).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::ReservoirProfile(TemperatureProfileError::LengthMismatch { .. })
    ));
}

#[test]
fn in_memory_profile_must_match_time_steps() {
    let params = profile_params();
    let profile = vec![150.0; params.time_steps() + 3];
    let err = run_simulation_with_profile(&params, &profile).unwrap_err();
    assert!(matches!(err, SimulationError::ReservoirProfile(_)));

    let profile = vec![150.0; params.time_steps()];
    let results = run_simulation_with_profile(&params, &profile).unwrap();
    assert!(results.reservoir_temperature.iter().all(|&t| t == 150.0));
}

#[test]
fn missing_profile_file_is_a_configuration_error() {
    let params = profile_params();
    let err = run_simulation(&params).unwrap_err();
    assert!(matches!(err, SimulationError::Configuration(_)));
}

#[test]
fn external_simulator_is_unsupported() {
    let mut params = ModelParameters::default();
    params.subsurface.reservoir_model = ReservoirModel::ExternalSimulator;
    let err = run_simulation(&params).unwrap_err();
    assert!(matches!(err, SimulationError::Unsupported(_)));
}
