//! Reservoir thermal-decline models producing the reservoir outlet temperature
//! at every time step.

use num_complex::Complex64;
use tracing::debug;

use crate::config::const_funcs::{density_water, erf, heat_capacity_water};
use crate::config::constants::{
    EFFECTIVE_RADIUS_FACTOR, HEAT_TRANSFER_COEFFICIENT, ROCK_SHAPE_FACTOR, SECONDS_PER_YEAR,
};
use crate::config::options::ReservoirModel;
use crate::config::parameters::{ModelParameters, ReservoirGeometry};
use crate::core::error::SimulationError;
use crate::core::results::{ReservoirFluid, SimulationWarning, WarningLog};
use crate::models::laplace::{inversion_for, LaplaceInversion};

/// Inputs shared by the reservoir models beyond the static parameters.
pub struct ReservoirState<'a> {
    pub rock_temperature: f64,
    pub fluid: &'a ReservoirFluid,
    pub geometry: &'a ReservoirGeometry,
    pub time: &'a [f64],
}

/// Water properties at a representative reservoir temperature, weighted
/// toward the injection side. The injection temperature returned includes the
/// injection-well gain.
pub fn reservoir_fluid(params: &ModelParameters, rock_temperature: f64) -> ReservoirFluid {
    let sub = &params.subsurface;
    let injection = sub.injection_temperature;
    let average = injection * 0.5 + (rock_temperature * 0.9 + injection * 0.1) * 0.5;
    ReservoirFluid {
        heat_capacity: heat_capacity_water(average),
        density: density_water(average),
        injection_temperature: injection + sub.injection_temperature_gain,
    }
}

pub fn reservoir_temperatures(
    params: &ModelParameters,
    state: &ReservoirState<'_>,
    profile: Option<&[f64]>,
    warnings: &mut WarningLog,
) -> Result<Vec<f64>, SimulationError> {
    let model = params.subsurface.reservoir_model;
    debug!("Evaluating reservoir model {:?}", model);
    let inversion = inversion_for(params.simulation.laplace_inversion);
    let t_inj = state.fluid.injection_temperature;
    let t_rock = state.rock_temperature;
    let mut output = match model {
        ReservoirModel::MultipleParallelFractures => {
            multiple_parallel_fractures(params, state, inversion.as_ref())
        }
        ReservoirModel::LinearHeatSweep => {
            let mut output = linear_heat_sweep(params, state, inversion.as_ref());
            reset_to_rock_temperature(&mut output, t_inj, t_rock, warnings);
            output
        }
        ReservoirModel::SingleFracture => single_fracture_drawdown(params, state),
        ReservoirModel::LinearDrawdown => linear_drawdown(params, state),
        ReservoirModel::UserProfile => {
            let profile = profile.ok_or_else(|| {
                SimulationError::Configuration("Reservoir model 5 requires a temperature profile".to_string())
            })?;
            if profile.len() != state.time.len() {
                return Err(SimulationError::ReservoirProfile(
                    crate::data::temperature_profile_loader::TemperatureProfileError::LengthMismatch {
                        expected: state.time.len(),
                        found: profile.len(),
                    },
                ));
            }
            profile.to_vec()
        }
        ReservoirModel::ExternalSimulator => {
            return Err(SimulationError::Unsupported(
                "Reservoir model 6 (external TOUGH2 simulator) is not available".to_string(),
            ))
        }
    };
    clamp_to_bounds(&mut output, t_inj, t_rock, warnings);
    Ok(output)
}

/// Heat-sweep points that are NaN or outside `[t_inj, t_rock]` fall back to
/// the rock temperature.
fn reset_to_rock_temperature(output: &mut [f64], t_inj: f64, t_rock: f64, warnings: &mut WarningLog) {
    let mut clamped = 0;
    for temperature in output.iter_mut() {
        if temperature.is_nan() || *temperature > t_rock || *temperature < t_inj {
            clamped += 1;
            *temperature = t_rock;
        }
    }
    if clamped > 0 {
        warnings.record(SimulationWarning::ReservoirTemperatureClamped { points: clamped });
    }
}

/// Holds every reservoir temperature inside `[t_inj, t_rock]`. NaN becomes the
/// rock temperature.
fn clamp_to_bounds(output: &mut [f64], t_inj: f64, t_rock: f64, warnings: &mut WarningLog) {
    let mut clamped = 0;
    for temperature in output.iter_mut() {
        let bounded = if temperature.is_nan() { t_rock } else { temperature.max(t_inj).min(t_rock) };
        if bounded != *temperature {
            clamped += 1;
            *temperature = bounded;
        }
    }
    if clamped > 0 {
        warnings.record(SimulationWarning::ReservoirTemperatureClamped { points: clamped });
    }
}

/// Inverts a non-dimensional response on every positive time; index 0 is left for the caller.
fn invert_non_dimensional(
    inversion: &dyn LaplaceInversion,
    f: &(dyn Fn(Complex64) -> Complex64 + Sync),
    time: &[f64],
    time_scale: f64,
) -> Vec<f64> {
    let td: Vec<f64> = time.iter().skip(1).map(|t| t * time_scale).collect();
    inversion.invert(f, &td)
}

/// Model 1: heat conducted into the walls of equally spaced parallel fractures.
fn multiple_parallel_fractures(
    params: &ModelParameters,
    state: &ReservoirState<'_>,
    inversion: &dyn LaplaceInversion,
) -> Vec<f64> {
    let sub = &params.subsurface;
    let geo = state.geometry;
    let rho_cp = state.fluid.density * state.fluid.heat_capacity;
    let q = sub.production_wells as f64 * sub.flow_rate_per_well / state.fluid.density;

    let spacing = rho_cp * (q / geo.fracture_count / geo.fracture_width) * (geo.fracture_separation / 2.0)
        / (2.0 * sub.rock_thermal_conductivity * geo.fracture_height);
    let f = move |s: Complex64| {
        let root = s.sqrt();
        (1.0 / s) * (-root * (spacing * root).tanh()).exp()
    };

    let time_scale = rho_cp.powi(2)
        / (4.0 * sub.rock_thermal_conductivity * sub.rock_density * sub.rock_heat_capacity)
        * (q / geo.fracture_count / geo.fracture_width / geo.fracture_height).powi(2)
        * SECONDS_PER_YEAR;

    let t_rock = state.rock_temperature;
    let t_inj = state.fluid.injection_temperature;
    let mut output = Vec::with_capacity(state.time.len());
    output.push(t_rock);
    output.extend(
        invert_non_dimensional(inversion, &f, state.time, time_scale)
            .into_iter()
            .map(|twnd| t_rock - twnd * (t_rock - t_inj)),
    );
    output
}

/// Model 2: one-dimensional linear heat sweep through a volumetric rock block.
fn linear_heat_sweep(
    params: &ModelParameters,
    state: &ReservoirState<'_>,
    inversion: &dyn LaplaceInversion,
) -> Vec<f64> {
    let sub = &params.subsurface;
    let geo = state.geometry;
    let phi = sub.rock_porosity;
    let rock_rho_cp = sub.rock_density * sub.rock_heat_capacity;
    let alpha = sub.rock_thermal_conductivity / rock_rho_cp;
    let gamma = state.fluid.density * state.fluid.heat_capacity * phi / (rock_rho_cp * (1.0 - phi));

    let effective_radius = EFFECTIVE_RADIUS_FACTOR
        * (0.75 * (geo.fracture_separation * geo.fracture_height * geo.fracture_width)
            / std::f64::consts::PI)
            .powf(1.0 / 3.0);
    let biot = HEAT_TRANSFER_COEFFICIENT * effective_radius / sub.rock_thermal_conductivity;
    let tau = effective_radius.powi(2) * (ROCK_SHAPE_FACTOR + 1.0 / biot) / (3.0 * alpha);

    let sweep_area = (geo.fracture_count - 1.0) * geo.fracture_separation * geo.fracture_width;
    let velocity = sub.production_wells as f64 * sub.flow_rate_per_well / (state.fluid.density * sweep_area);
    let residence_time = geo.fracture_height * phi / velocity;
    let ntu = residence_time / tau;

    let f = move |s: Complex64| (1.0 / s) * (1.0 - (-(1.0 + ntu / (gamma * (s + ntu))) * s).exp());

    let t_rock = state.rock_temperature;
    let t_inj = state.fluid.injection_temperature;
    let mut output = Vec::with_capacity(state.time.len());
    output.push(t_rock);
    output.extend(
        invert_non_dimensional(inversion, &f, state.time, SECONDS_PER_YEAR / residence_time)
            .into_iter()
            .map(|twnd| twnd * (t_rock - t_inj) + t_inj),
    );
    output
}

/// Model 3: single fracture with a mass-loading (m/A) drawdown parameter.
fn single_fracture_drawdown(params: &ModelParameters, state: &ReservoirState<'_>) -> Vec<f64> {
    let sub = &params.subsurface;
    let t_rock = state.rock_temperature;
    let t_inj = state.fluid.injection_temperature;
    let rock = sub.rock_thermal_conductivity * sub.rock_density * sub.rock_heat_capacity;
    state
        .time
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            if i == 0 {
                return t_rock;
            }
            let x = 1.0 / sub.drawdown_parameter / state.fluid.heat_capacity
                * (rock / t / SECONDS_PER_YEAR).sqrt();
            erf(x) * (t_rock - t_inj) + t_inj
        })
        .collect()
}

/// Model 4: fixed percentage of the initial temperature difference lost per year.
fn linear_drawdown(params: &ModelParameters, state: &ReservoirState<'_>) -> Vec<f64> {
    let t_rock = state.rock_temperature;
    let t_inj = state.fluid.injection_temperature;
    let drawdown = params.subsurface.drawdown_parameter;
    state
        .time
        .iter()
        .map(|t| (1.0 - drawdown * t) * (t_rock - t_inj) + t_inj)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::config::const_funcs::linspace;

    fn fluid() -> ReservoirFluid {
        ReservoirFluid {
            heat_capacity: 4200.0,
            density: 950.0,
            injection_temperature: 70.0,
        }
    }

    fn run(params: &ModelParameters, warnings: &mut WarningLog) -> Vec<f64> {
        let fluid = fluid();
        let geometry = params.reservoir_geometry();
        let time = linspace(0.0, 30.0, params.time_steps());
        let state = ReservoirState {
            rock_temperature: 200.0,
            fluid: &fluid,
            geometry: &geometry,
            time: &time,
        };
        reservoir_temperatures(params, &state, None, warnings).unwrap()
    }

    #[test]
    fn linear_drawdown_is_exact() {
        let params = ModelParameters::default();
        let temps = run(&params, &mut WarningLog::default());
        assert_eq!(temps.len(), 121);
        assert_abs_diff_eq!(temps[0], 200.0);
        assert_abs_diff_eq!(temps[120], (1.0 - 0.005 * 30.0) * 130.0 + 70.0, epsilon = 1e-9);
    }

    #[test]
    fn steep_linear_drawdown_stops_at_injection_temperature() {
        let mut params = ModelParameters::default();
        params.subsurface.drawdown_parameter = 0.05;
        let mut warnings = WarningLog::default();
        let temps = run(&params, &mut warnings);
        // (1 - 0.05 t) goes negative after year 20: 40 quarter-year points
        assert_eq!(temps[120], 70.0);
        assert!(temps.iter().all(|t| *t >= 70.0 && *t <= 200.0));
        assert!(matches!(
            warnings.as_slice(),
            [SimulationWarning::ReservoirTemperatureClamped { points: 40 }]
        ));
    }

    #[test]
    fn profile_values_are_held_between_injection_and_rock() {
        let params = ModelParameters {
            subsurface: crate::config::parameters::SubsurfaceParameters {
                reservoir_model: ReservoirModel::UserProfile,
                ..Default::default()
            },
            ..Default::default()
        };
        let fluid = fluid();
        let geometry = params.reservoir_geometry();
        let time = linspace(0.0, 1.0, 4);
        let state = ReservoirState { rock_temperature: 200.0, fluid: &fluid, geometry: &geometry, time: &time };
        let mut warnings = WarningLog::default();
        let temps =
            reservoir_temperatures(&params, &state, Some(&[210.0, 150.0, f64::NAN, 60.0]), &mut warnings).unwrap();
        assert_eq!(temps, vec![200.0, 150.0, 200.0, 70.0]);
        assert!(matches!(
            warnings.as_slice(),
            [SimulationWarning::ReservoirTemperatureClamped { points: 3 }]
        ));
    }

    #[test]
    fn heat_sweep_reset_replaces_nan_and_out_of_range_points() {
        let mut output = vec![200.0, f64::NAN, 250.0, 50.0, 120.0];
        let mut warnings = WarningLog::default();
        reset_to_rock_temperature(&mut output, 70.0, 200.0, &mut warnings);
        assert_eq!(output, vec![200.0, 200.0, 200.0, 200.0, 120.0]);
        assert!(matches!(
            warnings.as_slice(),
            [SimulationWarning::ReservoirTemperatureClamped { points: 3 }]
        ));
    }

    #[test]
    fn single_fracture_declines_from_rock_temperature() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_model = ReservoirModel::SingleFracture;
        params.subsurface.drawdown_parameter = 0.0001;
        let temps = run(&params, &mut WarningLog::default());
        assert_abs_diff_eq!(temps[0], 200.0);
        assert!(temps.windows(2).skip(1).all(|w| w[1] <= w[0]));
        assert!(temps.iter().all(|t| *t >= 70.0 && *t <= 200.0));
    }

    #[test]
    fn parallel_fractures_stay_between_injection_and_rock() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_model = ReservoirModel::MultipleParallelFractures;
        let temps = run(&params, &mut WarningLog::default());
        assert_abs_diff_eq!(temps[0], 200.0);
        assert!(temps.iter().all(|t| *t > 69.9 && *t < 200.1));
        assert!(temps[120] < temps[4]);
    }

    #[test]
    fn heat_sweep_is_clamped_to_rock_temperature() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_model = ReservoirModel::LinearHeatSweep;
        let mut warnings = WarningLog::default();
        let temps = run(&params, &mut warnings);
        assert!(temps.iter().all(|t| t.is_finite() && *t >= 70.0 && *t <= 200.0));
    }

    #[test]
    fn stehfest_and_talbot_agree_for_parallel_fractures() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_model = ReservoirModel::MultipleParallelFractures;
        let talbot = run(&params, &mut WarningLog::default());
        params.simulation.laplace_inversion = crate::config::options::LaplaceInversionMethod::Stehfest;
        let stehfest = run(&params, &mut WarningLog::default());
        for (a, b) in talbot.iter().zip(&stehfest) {
            assert_abs_diff_eq!(a, b, epsilon = 1.0);
        }
    }

    #[test]
    fn external_simulator_is_unsupported() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_model = ReservoirModel::ExternalSimulator;
        let fluid = fluid();
        let geometry = params.reservoir_geometry();
        let time = linspace(0.0, 30.0, params.time_steps());
        let state = ReservoirState { rock_temperature: 200.0, fluid: &fluid, geometry: &geometry, time: &time };
        let err = reservoir_temperatures(&params, &state, None, &mut WarningLog::default()).unwrap_err();
        assert!(matches!(err, SimulationError::Unsupported(_)));
    }

    #[test]
    fn fluid_properties_include_injection_gain() {
        let mut params = ModelParameters::default();
        params.subsurface.injection_temperature_gain = 3.0;
        let fluid = reservoir_fluid(&params, 165.0);
        assert_eq!(fluid.injection_temperature, 73.0);
        let average = 70.0 * 0.5 + (165.0 * 0.9 + 70.0 * 0.1) * 0.5;
        assert_eq!(fluid.heat_capacity, heat_capacity_water(average));
        assert_eq!(fluid.density, density_water(average));
    }
}
