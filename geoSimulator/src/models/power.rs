//! Conversion of produced geofluid into electricity and useful heat.

use tracing::debug;

use crate::config::const_funcs::{availability, min_value};
use crate::config::options::{CogenArrangement, EndUseOption, PowerPlantType};
use crate::config::parameters::ModelParameters;
use crate::core::results::{PowerOutput, SimulationWarning, WarningLog};

/// `c2 * T^2 + c1 * T + c0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic(pub f64, pub f64, pub f64);

impl Quadratic {
    pub fn at(&self, t: f64) -> f64 {
        self.0 * t * t + self.1 * t + self.2
    }
}

/// Correlations tabulated at two ambient temperatures 10 C apart, linearly
/// interpolated by `fraction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientBracket {
    pub lower: Quadratic,
    pub upper: Quadratic,
    pub fraction: f64,
}

impl AmbientBracket {
    fn new(ambient: f64, cold: (Quadratic, Quadratic), warm: (Quadratic, Quadratic)) -> Self {
        let ((lower, upper), fraction) = if ambient < 15.0 {
            (cold, (ambient - 5.0) / 10.0)
        } else {
            (warm, (ambient - 15.0) / 10.0)
        };
        Self { lower, upper, fraction }
    }

    pub fn at(&self, t: f64) -> f64 {
        (1.0 - self.fraction) * self.lower.at(t) + self.fraction * self.upper.at(t)
    }
}

/// Fraction of the geofluid availability converted to electricity.
pub fn utilization_efficiency(plant: PowerPlantType, ambient: f64) -> AmbientBracket {
    match plant {
        PowerPlantType::SubcriticalOrc => AmbientBracket::new(
            ambient,
            (Quadratic(0.0, 2.746e-3, -8.3806e-2), Quadratic(0.0, 2.713e-3, -9.1841e-2)),
            (Quadratic(0.0, 2.713e-3, -9.1841e-2), Quadratic(0.0, 2.676e-3, -1.012e-1)),
        ),
        PowerPlantType::SupercriticalOrc => AmbientBracket::new(
            ambient,
            (
                Quadratic(-1.55e-5, 7.604e-3, -3.78e-1),
                Quadratic(-1.499e-5, 7.4268e-3, -3.7915e-1),
            ),
            (
                Quadratic(-1.499e-5, 7.4268e-3, -3.7915e-1),
                Quadratic(-1.55e-5, 7.55136e-3, -4.041e-1),
            ),
        ),
        PowerPlantType::SingleFlash => AmbientBracket::new(
            ambient,
            (
                Quadratic(-4.27318e-7, 8.65629e-4, 1.78931e-1),
                Quadratic(-5.85412e-7, 9.68352e-4, 1.58056e-1),
            ),
            (
                Quadratic(-5.85412e-7, 9.68352e-4, 1.58056e-1),
                Quadratic(-7.78996e-7, 1.09230e-3, 1.33708e-1),
            ),
        ),
        PowerPlantType::DoubleFlash => AmbientBracket::new(
            ambient,
            (
                Quadratic(-1.200e-6, 1.22731e-3, 2.26956e-1),
                Quadratic(-1.42165e-6, 1.37050e-3, 1.99847e-1),
            ),
            (
                Quadratic(-1.42165e-6, 1.37050e-3, 1.99847e-1),
                Quadratic(-1.66771e-6, 1.53079e-3, 1.69439e-1),
            ),
        ),
    }
}

/// Plant outlet (reinjection) temperature as a function of entering temperature.
pub fn reinjection_temperature(plant: PowerPlantType, ambient: f64) -> AmbientBracket {
    match plant {
        PowerPlantType::SubcriticalOrc => AmbientBracket::new(
            ambient,
            (Quadratic(0.0, 0.0894, 55.6), Quadratic(0.0, 0.0894, 62.6)),
            (Quadratic(0.0, 0.0894, 62.6), Quadratic(0.0, 0.0894, 69.6)),
        ),
        PowerPlantType::SupercriticalOrc => AmbientBracket::new(
            ambient,
            (Quadratic(0.0, 0.02, 49.26), Quadratic(0.0, 0.02, 56.26)),
            (Quadratic(0.0, 0.02, 56.26), Quadratic(0.0, 0.02, 63.26)),
        ),
        PowerPlantType::SingleFlash => AmbientBracket::new(
            ambient,
            (
                Quadratic(-1.11519e-3, 7.79126e-1, -10.2242),
                Quadratic(-1.10232e-3, 7.83893e-1, -5.17039),
            ),
            (
                Quadratic(-1.10232e-3, 7.83893e-1, -5.17039),
                Quadratic(-1.08914e-3, 7.88562e-1, -1.89707e-1),
            ),
        ),
        PowerPlantType::DoubleFlash => AmbientBracket::new(
            ambient,
            (
                Quadratic(-7.70928e-4, 5.02466e-1, 5.22091),
                Quadratic(-7.69455e-4, 5.09406e-1, 11.6859),
            ),
            (
                Quadratic(-7.69455e-4, 5.09406e-1, 11.6859),
                Quadratic(-7.67751e-4, 5.16356e-1, 18.0798),
            ),
        ),
    }
}

pub fn energy_extracted_and_produced(
    params: &ModelParameters,
    produced_temperature: &[f64],
    pumping_power: &[f64],
    injection_temperature: f64,
    heat_capacity: f64,
    warnings: &mut WarningLog,
) -> PowerOutput {
    let sub = &params.subsurface;
    let surface = &params.surface;
    let n = produced_temperature.len();
    let mass_flow = sub.production_wells as f64 * sub.flow_rate_per_well;
    let thermal_power = |delta_t: f64| mass_flow * heat_capacity * delta_t / 1e6;

    let end_use = params.simulation.end_use;
    if end_use == EndUseOption::DirectUseHeat {
        let heat_extracted: Vec<f64> = produced_temperature
            .iter()
            .map(|t| thermal_power(t - injection_temperature))
            .collect();
        let heat_produced = heat_extracted.iter().map(|h| h * surface.end_use_efficiency).collect();
        return PowerOutput {
            injection_temperature,
            entering_temperature: produced_temperature.to_vec(),
            availability: vec![0.0; n],
            utilization_efficiency: vec![0.0; n],
            reinjection_temperature: vec![injection_temperature; n],
            heat_extracted,
            heat_extracted_toward_electricity: vec![0.0; n],
            heat_produced,
            electricity_produced: vec![0.0; n],
            net_electricity_produced: vec![0.0; n],
            first_law_efficiency: vec![0.0; n],
        };
    }

    let arrangement = end_use.arrangement();
    let entering_temperature = if arrangement == Some(CogenArrangement::Bottoming) {
        vec![surface.chp_bottoming_temperature; n]
    } else {
        produced_temperature.to_vec()
    };

    let plant = params.simulation.power_plant;
    let ambient = surface.ambient_temperature;
    let efficiency_curve = utilization_efficiency(plant, ambient);
    let reinjection_curve = reinjection_temperature(plant, ambient);
    let exergy: Vec<f64> = entering_temperature.iter().map(|&t| availability(t, ambient)).collect();
    let utilization: Vec<f64> = entering_temperature.iter().map(|&t| efficiency_curve.at(t)).collect();
    let reinjection: Vec<f64> = entering_temperature.iter().map(|&t| reinjection_curve.at(t)).collect();

    let min_reinjection = min_value(&reinjection);
    let mut t_inj = injection_temperature;
    if min_reinjection < t_inj {
        if arrangement == Some(CogenArrangement::Bottoming) {
            warnings.record(SimulationWarning::InjectionTemperatureAboveReinjection {
                injection: t_inj,
                reinjection: min_reinjection,
            });
        } else {
            warnings.record(SimulationWarning::InjectionTemperatureLowered {
                from: t_inj,
                to: min_reinjection,
            });
            t_inj = min_reinjection;
        }
    }

    let gross: Vec<f64> = exergy
        .iter()
        .zip(&utilization)
        .map(|(a, eta)| a * eta * mass_flow)
        .collect();
    let heat_extracted: Vec<f64> = produced_temperature.iter().map(|t| thermal_power(t - t_inj)).collect();
    let efficiency = surface.end_use_efficiency;
    let chp = surface.chp_fraction;
    let bottoming = surface.chp_bottoming_temperature;

    let (electricity_produced, heat_produced, toward_electricity): (Vec<f64>, Vec<f64>, Vec<f64>) =
        match arrangement {
            None => (gross, vec![0.0; n], heat_extracted.clone()),
            Some(CogenArrangement::Topping) => (
                gross,
                reinjection.iter().map(|r| efficiency * thermal_power(r - t_inj)).collect(),
                produced_temperature
                    .iter()
                    .zip(&reinjection)
                    .map(|(t, r)| thermal_power(t - r))
                    .collect(),
            ),
            Some(CogenArrangement::Bottoming) => (
                gross,
                produced_temperature
                    .iter()
                    .map(|t| efficiency * thermal_power(t - bottoming))
                    .collect(),
                vec![thermal_power(bottoming - t_inj); n],
            ),
            Some(CogenArrangement::Parallel) => (
                gross.iter().map(|e| e * (1.0 - chp)).collect(),
                produced_temperature
                    .iter()
                    .map(|t| efficiency * chp * thermal_power(t - t_inj))
                    .collect(),
                produced_temperature
                    .iter()
                    .map(|t| (1.0 - chp) * thermal_power(t - t_inj))
                    .collect(),
            ),
        };

    let net_electricity_produced: Vec<f64> = electricity_produced
        .iter()
        .zip(pumping_power)
        .map(|(e, p)| e - p)
        .collect();
    let first_law_efficiency = net_electricity_produced
        .iter()
        .zip(&toward_electricity)
        .map(|(net, heat)| if *heat != 0.0 { net / heat } else { 0.0 })
        .collect();

    debug!(
        "Plant {:?}: initial gross {:.2} MWe, net {:.2} MWe",
        plant,
        electricity_produced.first().copied().unwrap_or(0.0),
        net_electricity_produced.first().copied().unwrap_or(0.0)
    );

    PowerOutput {
        injection_temperature: t_inj,
        entering_temperature,
        availability: exergy,
        utilization_efficiency: utilization,
        reinjection_temperature: reinjection,
        heat_extracted,
        heat_extracted_toward_electricity: toward_electricity,
        heat_produced,
        electricity_produced,
        net_electricity_produced,
        first_law_efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn run(params: &ModelParameters, produced: &[f64], warnings: &mut WarningLog) -> PowerOutput {
        let pumping = vec![0.5; produced.len()];
        energy_extracted_and_produced(params, produced, &pumping, 70.0, 4200.0, warnings)
    }

    #[test]
    fn ambient_bracket_interpolates_between_tables() {
        let at_15 = utilization_efficiency(PowerPlantType::SubcriticalOrc, 15.0).at(150.0);
        assert_abs_diff_eq!(at_15, 2.713e-3 * 150.0 - 9.1841e-2, epsilon = 1e-12);
        let at_10 = utilization_efficiency(PowerPlantType::SubcriticalOrc, 10.0).at(150.0);
        let expected = 0.5 * (2.746e-3 * 150.0 - 8.3806e-2) + 0.5 * (2.713e-3 * 150.0 - 9.1841e-2);
        assert_abs_diff_eq!(at_10, expected, epsilon = 1e-12);
    }

    #[test]
    fn electricity_is_availability_times_efficiency_times_flow() {
        let params = ModelParameters::default();
        let out = run(&params, &[160.0, 150.0], &mut WarningLog::default());
        let expected = availability(160.0, 15.0) * (2.713e-3 * 160.0 - 9.1841e-2) * 100.0;
        assert_abs_diff_eq!(out.electricity_produced[0], expected, epsilon = 1e-9);
        assert_abs_diff_eq!(out.net_electricity_produced[0], expected - 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(out.heat_extracted[0], 100.0 * 4200.0 * 90.0 / 1e6, epsilon = 1e-9);
    }

    #[test]
    fn low_reinjection_lowers_injection_temperature() {
        let mut params = ModelParameters::default();
        params.simulation.power_plant = PowerPlantType::SupercriticalOrc;
        let mut warnings = WarningLog::default();
        let out = run(&params, &[100.0, 95.0], &mut warnings);
        assert_abs_diff_eq!(out.injection_temperature, 0.02 * 95.0 + 56.26, epsilon = 1e-9);
        assert!(matches!(warnings.as_slice()[0], SimulationWarning::InjectionTemperatureLowered { .. }));
    }

    #[test]
    fn parallel_cogeneration_splits_flow() {
        let mut params = ModelParameters::default();
        params.simulation.end_use = EndUseOption::try_from(51).unwrap();
        let out = run(&params, &[180.0], &mut WarningLog::default());
        let total = 100.0 * 4200.0 * 110.0 / 1e6;
        assert_abs_diff_eq!(out.heat_extracted_toward_electricity[0], 0.5 * total, epsilon = 1e-9);
        assert_abs_diff_eq!(out.heat_produced[0], 0.9 * 0.5 * total, epsilon = 1e-9);
    }

    #[test]
    fn topping_cycle_heat_uses_reinjection_temperature() {
        let mut params = ModelParameters::default();
        params.simulation.end_use = EndUseOption::try_from(31).unwrap();
        let out = run(&params, &[180.0], &mut WarningLog::default());
        let reinjection = 0.0894 * 180.0 + 62.6;
        assert_abs_diff_eq!(
            out.heat_produced[0] + 0.9 * out.heat_extracted_toward_electricity[0],
            0.9 * out.heat_extracted[0],
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(out.reinjection_temperature[0], reinjection, epsilon = 1e-12);
    }

    #[test]
    fn bottoming_cycle_keeps_injection_temperature() {
        let mut params = ModelParameters::default();
        params.simulation.end_use = EndUseOption::try_from(42).unwrap();
        params.surface.chp_bottoming_temperature = 80.0;
        let mut warnings = WarningLog::default();
        let out = run(&params, &[180.0], &mut warnings);
        assert_abs_diff_eq!(out.injection_temperature, 70.0);
        assert_abs_diff_eq!(out.entering_temperature[0], 80.0);
        assert!(matches!(
            warnings.as_slice()[0],
            SimulationWarning::InjectionTemperatureAboveReinjection { .. }
        ));
    }

    #[test]
    fn direct_use_delivers_fraction_of_extracted_heat() {
        let mut params = ModelParameters::default();
        params.simulation.end_use = EndUseOption::DirectUseHeat;
        let out = run(&params, &[120.0], &mut WarningLog::default());
        assert_abs_diff_eq!(out.heat_produced[0], 0.9 * out.heat_extracted[0], epsilon = 1e-12);
        assert_eq!(out.electricity_produced[0], 0.0);
    }
}
