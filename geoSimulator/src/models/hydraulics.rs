//! Wellbore friction, pressure drops and pumping power.

use std::f64::consts::PI;
use tracing::debug;

use crate::config::const_funcs::{
    average, density_water, hydrostatic_pressure, max_value, vapor_pressure_water, viscosity_water,
};
use crate::config::constants::{
    COLEBROOK_ITERATIONS, GRAVITY, INDEX_UNIT_FACTOR, LAMINAR_REYNOLDS_LIMIT, MAX_PLAUSIBLE_PUMP_DEPTH,
    PIPE_ROUGHNESS, PLANT_OUTLET_DROP, VAPOR_PRESSURE_MARGIN,
};
use crate::config::parameters::ModelParameters;
use crate::core::results::{GeologyOutput, HydraulicsOutput, SimulationWarning, WarningLog};

/// Darcy friction factor for turbulent pipe flow: Swamee-Jain estimate refined
/// by a fixed number of Colebrook-White substitutions.
pub fn colebrook_friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    let seed = -2.0 * (relative_roughness / 3.7 + 5.74 / reynolds.powf(0.9)).log10();
    let mut f = 1.0 / seed.powi(2);
    for _ in 0..COLEBROOK_ITERATIONS {
        let x = -2.0 * (relative_roughness / 3.7 + 2.51 / (reynolds * f.sqrt())).log10();
        f = 1.0 / x.powi(2);
    }
    f
}

/// Friction factors for a series of Reynolds numbers in one pipe. The flow
/// regime is decided once from the average Reynolds number.
pub fn friction_factors(reynolds: &[f64], diameter: f64) -> Vec<f64> {
    if average(reynolds) < LAMINAR_REYNOLDS_LIMIT {
        reynolds.iter().map(|re| 64.0 / re).collect()
    } else {
        let roughness = PIPE_ROUGHNESS / diameter;
        reynolds.iter().map(|&re| colebrook_friction_factor(re, roughness)).collect()
    }
}

fn pipe_area(diameter: f64) -> f64 {
    PI / 4.0 * diameter.powi(2)
}

/// Friction pressure loss (kPa) over the well length.
fn friction_loss(friction: f64, density: f64, velocity: f64, depth: f64, diameter: f64) -> f64 {
    friction * density * velocity.powi(2) / 2.0 * (depth / diameter) / 1e3
}

/// Fluid state of both well legs, shared by the two pressure sub-models.
struct WellLegs {
    depth: f64,
    rho_prod: Vec<f64>,
    v_prod: Vec<f64>,
    f_prod: Vec<f64>,
    production_friction: Vec<f64>,
    rho_inj: f64,
    injection_friction: f64,
}

pub fn pressure_drops_and_pumping_power(
    params: &ModelParameters,
    geology: &GeologyOutput,
    reservoir_temperature: &[f64],
    temperature_drop: &[f64],
    injection_temperature: f64,
    warnings: &mut WarningLog,
) -> HydraulicsOutput {
    let sub = &params.subsurface;
    let setup = params.hydraulic_setup();
    let n = reservoir_temperature.len();
    let depth = geology.depth;
    let flow = sub.flow_rate_per_well;

    // production leg at the average wellbore temperature
    let production_average: Vec<f64> = reservoir_temperature
        .iter()
        .zip(temperature_drop)
        .map(|(t, drop)| t - drop / 4.0)
        .collect();
    let rho_prod: Vec<f64> = production_average.iter().map(|&t| density_water(t)).collect();
    let v_prod: Vec<f64> = rho_prod
        .iter()
        .map(|rho| flow / rho / pipe_area(sub.production_well_diameter))
        .collect();
    let re_prod: Vec<f64> = production_average
        .iter()
        .map(|&t| 4.0 * flow / (viscosity_water(t) * PI * sub.production_well_diameter))
        .collect();
    let f_prod = friction_factors(&re_prod, sub.production_well_diameter);
    let production_friction: Vec<f64> = (0..n)
        .map(|i| friction_loss(f_prod[i], rho_prod[i], v_prod[i], depth, sub.production_well_diameter))
        .collect();

    // injection leg at the injection temperature
    let injection_flow = sub.production_wells as f64 / sub.injection_wells as f64
        * flow
        * (1.0 + sub.water_loss_fraction);
    let rho_inj = density_water(injection_temperature);
    let v_inj = injection_flow / rho_inj / pipe_area(sub.injection_well_diameter);
    let re_inj = 4.0 * injection_flow
        / (viscosity_water(injection_temperature) * PI * sub.injection_well_diameter);
    let f_inj = friction_factors(&[re_inj], sub.injection_well_diameter)[0];
    let injection_friction = friction_loss(f_inj, rho_inj, v_inj, depth, sub.injection_well_diameter);

    let legs = WellLegs {
        depth,
        rho_prod,
        v_prod,
        f_prod,
        production_friction,
        rho_inj,
        injection_friction,
    };

    let mut output = HydraulicsOutput {
        setup,
        production_reynolds: re_prod,
        injection_reynolds: re_inj,
        production_friction_factor: legs.f_prod.clone(),
        injection_friction_factor: f_inj,
        total_pressure_drop: vec![0.0; n],
        injection_pressure_drop: vec![0.0; n],
        reservoir_pressure_drop: vec![0.0; n],
        production_pressure_drop: vec![0.0; n],
        buoyancy_pressure_drop: vec![0.0; n],
        pumping_power: vec![0.0; n],
        production_pumping_power: vec![0.0; n],
        injection_pumping_power: vec![0.0; n],
        pump_depth: vec![0.0; n],
        max_pump_depth: 0.0,
        hydrostatic_pressure: None,
        production_wellhead_pressure: None,
        injection_wellhead_pressure: None,
        plant_outlet_pressure: None,
    };

    match setup.impedance {
        Some(impedance) => {
            debug!("Using reservoir impedance model");
            impedance_model(params, reservoir_temperature, injection_temperature, impedance, &legs, &mut output);
        }
        None => {
            debug!("Using production and injection pump model");
            pump_model(params, geology, &legs, &mut output, warnings);
        }
    }

    debug!("Peak pumping power {:.3} MWe", max_value(&output.pumping_power));
    output
}

fn impedance_model(
    params: &ModelParameters,
    reservoir_temperature: &[f64],
    injection_temperature: f64,
    impedance: f64,
    legs: &WellLegs,
    output: &mut HydraulicsOutput,
) {
    let sub = &params.subsurface;
    let nprod = sub.production_wells as f64;
    let flow = sub.flow_rate_per_well;
    let total_flow = nprod * flow * (1.0 + sub.water_loss_fraction);

    for (i, &t_res) in reservoir_temperature.iter().enumerate() {
        let rho_reservoir = density_water(0.1 * injection_temperature + 0.9 * t_res);
        let injection = legs.injection_friction;
        let reservoir = impedance * nprod * flow * 1000.0 / rho_reservoir;
        let production = legs.production_friction[i];
        let buoyancy = (legs.rho_prod[i] - legs.rho_inj) * legs.depth * GRAVITY / 1e3;
        let total = injection + reservoir + production + buoyancy;

        output.injection_pressure_drop[i] = injection;
        output.reservoir_pressure_drop[i] = reservoir;
        output.production_pressure_drop[i] = production;
        output.buoyancy_pressure_drop[i] = buoyancy;
        output.total_pressure_drop[i] = total;
        output.pumping_power[i] =
            (total * total_flow / legs.rho_inj / params.surface.pump_efficiency / 1e3).max(0.0);
    }
}

fn pump_model(
    params: &ModelParameters,
    geology: &GeologyOutput,
    legs: &WellLegs,
    output: &mut HydraulicsOutput,
    warnings: &mut WarningLog,
) {
    let sub = &params.subsurface;
    let setup = output.setup;
    let nprod = sub.production_wells as f64;
    let ninj = sub.injection_wells as f64;
    let flow = sub.flow_rate_per_well;
    let loss = sub.water_loss_fraction;
    let pump_efficiency = params.surface.pump_efficiency;
    let depth = legs.depth;
    let n = legs.rho_prod.len();

    let hydrostatic = sub.hydrostatic_pressure.unwrap_or_else(|| {
        hydrostatic_pressure(
            params.surface.surface_temperature,
            geology.rock_temperature,
            geology.average_gradient,
            depth,
        )
    });
    output.hydrostatic_pressure = Some(hydrostatic);

    let mut production_wellhead = 0.0;
    if setup.production_well_pumping {
        let minimum = vapor_pressure_water(geology.rock_temperature) + VAPOR_PRESSURE_MARGIN;
        production_wellhead = match sub.production_wellhead_pressure {
            Some(requested) if requested < minimum => {
                warnings.record(SimulationWarning::WellheadPressureRaised { requested, minimum });
                minimum
            }
            Some(requested) => requested,
            None => minimum,
        };
        output.production_wellhead_pressure = Some(production_wellhead);

        let pi_kpa = sub.productivity_index / INDEX_UNIT_FACTOR;
        for i in 0..n {
            let rho = legs.rho_prod[i];
            let friction_gradient =
                legs.f_prod[i] * rho * legs.v_prod[i].powi(2) / 2.0 / sub.production_well_diameter / 1e3;
            output.pump_depth[i] =
                depth + (minimum - hydrostatic + flow / pi_kpa) / (rho * GRAVITY / 1e3 + friction_gradient);

            let bottomhole = hydrostatic - flow / pi_kpa - rho * GRAVITY * depth / 1e3 - legs.production_friction[i];
            let pump_pressure = production_wellhead - bottomhole;
            output.production_pressure_drop[i] = pump_pressure;
            output.production_pumping_power[i] =
                (pump_pressure * nprod * flow / rho / pump_efficiency / 1e3).max(0.0);
        }

        let deepest = max_value(&output.pump_depth);
        output.max_pump_depth = if deepest < 0.0 {
            warnings.record(SimulationWarning::PumpDepthNegative { depth: deepest });
            0.0
        } else {
            if deepest > MAX_PLAUSIBLE_PUMP_DEPTH {
                warnings.record(SimulationWarning::PumpDepthExcessive { depth: deepest });
            }
            deepest
        };
    }

    let ii_kpa = sub.injectivity_index / INDEX_UNIT_FACTOR;
    let injection_wellhead = hydrostatic + flow * (1.0 + loss) * nprod / ninj / ii_kpa
        - legs.rho_inj * GRAVITY * depth / 1e3
        + legs.injection_friction;
    let plant_outlet = setup
        .plant_outlet_pressure
        .unwrap_or(production_wellhead - PLANT_OUTLET_DROP);
    output.injection_wellhead_pressure = Some(injection_wellhead);
    output.plant_outlet_pressure = Some(plant_outlet);

    let injection_pump_pressure = injection_wellhead - plant_outlet;
    let injection_power = (injection_pump_pressure * nprod * flow * (1.0 + loss)
        / legs.rho_inj
        / pump_efficiency
        / 1e3)
        .max(0.0);

    for i in 0..n {
        output.injection_pressure_drop[i] = injection_pump_pressure;
        output.injection_pumping_power[i] = injection_power;
        let production = if setup.production_well_pumping {
            output.production_pumping_power[i]
        } else {
            0.0
        };
        output.pumping_power[i] = (injection_power + production).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Colebrook root by bisection on 1/sqrt(f).
    fn colebrook_root(reynolds: f64, relative_roughness: f64) -> f64 {
        let residual = |x: f64| x + 2.0 * (relative_roughness / 3.7 + 2.51 * x / reynolds).log10();
        let (mut lo, mut hi) = (1.0, 20.0);
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if residual(mid) > 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        let x = 0.5 * (lo + hi);
        1.0 / (x * x)
    }

    fn geology() -> GeologyOutput {
        GeologyOutput {
            depth: 3000.0,
            max_depth: 7700.0,
            rock_temperature: 165.0,
            average_gradient: 0.05,
        }
    }

    #[test]
    fn laminar_friction_is_exact() {
        let re = [500.0, 1000.0, 2000.0];
        let f = friction_factors(&re, 0.2);
        for (re, f) in re.iter().zip(f) {
            assert_eq!(f, 64.0 / re);
        }
    }

    #[test]
    fn turbulent_friction_matches_colebrook_root() {
        for &(re, diameter) in &[(5.0e3, 0.2), (1.0e5, 0.2032), (1.0e6, 0.1), (3.0e6, 0.3)] {
            let roughness = PIPE_ROUGHNESS / diameter;
            let expected = colebrook_root(re, roughness);
            assert_relative_eq!(colebrook_friction_factor(re, roughness), expected, max_relative = 0.01);
        }
    }

    #[test]
    fn pump_model_yields_positive_power() {
        let params = ModelParameters::default();
        let n = 121;
        let reservoir = vec![165.0; n];
        let drop = vec![5.0; n];
        let mut warnings = WarningLog::default();
        let output = pressure_drops_and_pumping_power(&params, &geology(), &reservoir, &drop, 70.0, &mut warnings);
        assert_eq!(output.pumping_power.len(), n);
        assert!(output.pumping_power.iter().all(|p| *p >= 0.0));
        assert!(output.hydrostatic_pressure.unwrap() > 25_000.0);
        assert_abs_diff_eq!(
            output.plant_outlet_pressure.unwrap(),
            output.production_wellhead_pressure.unwrap() - PLANT_OUTLET_DROP,
            epsilon = 1e-9
        );
    }

    #[test]
    fn low_wellhead_pressure_is_raised_with_warning() {
        let mut params = ModelParameters::default();
        params.subsurface.production_wellhead_pressure = Some(10.0);
        let reservoir = vec![165.0; 5];
        let drop = vec![5.0; 5];
        let mut warnings = WarningLog::default();
        let output = pressure_drops_and_pumping_power(&params, &geology(), &reservoir, &drop, 70.0, &mut warnings);
        assert!(output.production_wellhead_pressure.unwrap() > 10.0);
        assert!(warnings
            .as_slice()
            .iter()
            .any(|w| matches!(w, SimulationWarning::WellheadPressureRaised { .. })));
    }

    #[test]
    fn overpressured_reservoir_needs_no_production_pump() {
        let mut params = ModelParameters::default();
        params.subsurface.hydrostatic_pressure = Some(60_000.0);
        let reservoir = vec![165.0; 5];
        let drop = vec![5.0; 5];
        let mut warnings = WarningLog::default();
        let output = pressure_drops_and_pumping_power(&params, &geology(), &reservoir, &drop, 70.0, &mut warnings);
        assert_eq!(output.max_pump_depth, 0.0);
        assert!(output.production_pumping_power.iter().all(|p| *p == 0.0));
        assert!(warnings
            .as_slice()
            .iter()
            .any(|w| matches!(w, SimulationWarning::PumpDepthNegative { .. })));
    }

    #[test]
    fn underpressured_reservoir_sets_pump_below_plausible_depth() {
        let mut params = ModelParameters::default();
        params.subsurface.hydrostatic_pressure = Some(1_000.0);
        let reservoir = vec![165.0; 5];
        let drop = vec![5.0; 5];
        let mut warnings = WarningLog::default();
        let output = pressure_drops_and_pumping_power(&params, &geology(), &reservoir, &drop, 70.0, &mut warnings);
        assert!(output.max_pump_depth > MAX_PLAUSIBLE_PUMP_DEPTH);
        assert!(warnings
            .as_slice()
            .iter()
            .any(|w| matches!(w, SimulationWarning::PumpDepthExcessive { depth } if *depth == output.max_pump_depth)));
    }

    #[test]
    fn impedance_model_sums_pressure_components() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_impedance = Some(0.1);
        let reservoir = vec![165.0; 3];
        let drop = vec![5.0; 3];
        let mut warnings = WarningLog::default();
        let output = pressure_drops_and_pumping_power(&params, &geology(), &reservoir, &drop, 70.0, &mut warnings);
        let i = 1;
        assert_abs_diff_eq!(
            output.total_pressure_drop[i],
            output.injection_pressure_drop[i]
                + output.reservoir_pressure_drop[i]
                + output.production_pressure_drop[i]
                + output.buoyancy_pressure_drop[i],
            epsilon = 1e-9
        );
        assert!(output.buoyancy_pressure_drop[i] < 0.0);
        assert!(output.pumping_power[i] > 0.0);
        assert!(warnings.as_slice().is_empty());
    }
}
