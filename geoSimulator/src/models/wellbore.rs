use std::f64::consts::PI;

use crate::config::constants::{RAMEY_OFFSET, RAMEY_RADIUS_FACTOR, SECONDS_PER_YEAR};
use crate::config::parameters::ModelParameters;
use crate::core::results::{GeologyOutput, WellboreOutput};

/// Production wellbore temperature drop per time step (C).
pub fn temperature_drop(
    params: &ModelParameters,
    geology: &GeologyOutput,
    heat_capacity: f64,
    reservoir_temperature: &[f64],
    time: &[f64],
) -> Vec<f64> {
    let sub = &params.subsurface;
    if !sub.ramey_wellbore_model {
        return vec![sub.production_temperature_drop; reservoir_temperature.len()];
    }

    let alpha = sub.rock_thermal_conductivity / (sub.rock_density * sub.rock_heat_capacity);
    let radius = RAMEY_RADIUS_FACTOR * (sub.production_well_diameter / 2.0);
    let diffusion = 4.0 * alpha * SECONDS_PER_YEAR * params.surface.utilization_factor;
    let ramey_f = |t: f64| -(radius / (t * diffusion).sqrt()).ln() - RAMEY_OFFSET;
    // f is undefined at t = 0, so the first step reuses the second time
    let first_time = time.get(1).copied().unwrap_or(0.0);

    let t_rock = geology.rock_temperature;
    let gradient = geology.average_gradient;
    let depth = geology.depth;
    reservoir_temperature
        .iter()
        .zip(time)
        .enumerate()
        .map(|(i, (&t_res, &t))| {
            let f = ramey_f(if i == 0 { first_time } else { t });
            let a = sub.flow_rate_per_well * heat_capacity * f / (2.0 * PI * sub.rock_thermal_conductivity);
            -((t_rock - t_res) - gradient * (depth - a)
                + (t_res - gradient * a - t_rock) * (-depth / a).exp())
        })
        .collect()
}

/// Retiles the pre-breakthrough part of the series when the drawdown limit is
/// crossed. Returns the series and the number of redrillings.
pub fn apply_redrilling(produced: Vec<f64>, max_drawdown: f64) -> (Vec<f64>, usize) {
    let Some(&initial) = produced.first() else {
        return (produced, 0);
    };
    let threshold = (1.0 - max_drawdown) * initial;
    match produced.iter().position(|&t| t < threshold) {
        Some(index) if index > 0 => {
            let len = produced.len();
            let redrills = len / index;
            let retiled = produced[..index]
                .iter()
                .copied()
                .cycle()
                .take(len)
                .collect();
            (retiled, redrills)
        }
        _ => (produced, 0),
    }
}

pub fn wellbore_output(
    params: &ModelParameters,
    geology: &GeologyOutput,
    heat_capacity: f64,
    reservoir_temperature: &[f64],
    time: &[f64],
) -> WellboreOutput {
    let temperature_drop = temperature_drop(params, geology, heat_capacity, reservoir_temperature, time);
    let produced: Vec<f64> = reservoir_temperature
        .iter()
        .zip(&temperature_drop)
        .map(|(t, drop)| t - drop)
        .collect();

    let (produced_temperature, redrill_count) = if params.subsurface.reservoir_model.supports_redrilling() {
        apply_redrilling(produced, params.subsurface.max_drawdown)
    } else {
        (produced, 0)
    };

    WellboreOutput {
        temperature_drop,
        produced_temperature,
        redrill_count,
    }
}
