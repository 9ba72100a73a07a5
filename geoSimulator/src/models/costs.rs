//! Capital and operating cost correlations (M$ and M$/year).

use tracing::debug;

use crate::config::const_funcs::{max_value, well_cost_correlation};
use crate::config::constants::*;
use crate::config::options::{EndUseOption, PowerPlantType};
use crate::config::parameters::ModelParameters;
use crate::core::results::{
    CapitalCosts, HydraulicsOutput, OperatingCosts, PowerOutput, SimulationWarning, WarningLog,
};

const DIRECT_COST_MARKUP: f64 = CONTINGENCY_FACTOR * INDIRECT_PLANT_FACTOR;

/// Cost of a bank of surface pumps ($) sized to `horsepower`, split into units of at most 2000 hp.
fn surface_pump_cost(horsepower: f64) -> f64 {
    let pumps = (horsepower / MAX_PUMP_HP).ceil();
    if pumps <= 0.0 {
        return 0.0;
    }
    let per_pump = horsepower / pumps;
    pumps * 1.5 * (1750.0 * per_pump.powf(0.7)) * 3.0 * per_pump.powf(-0.11)
}

/// Cost of line-shaft production pumps ($), one per production well.
fn production_pump_cost(production_wells: f64, max_power: f64, max_pump_depth: f64) -> f64 {
    let hp = max_power / production_wells * HP_PER_MW;
    production_wells
        * 1.5
        * (1750.0 * hp.powf(0.7) + 5750.0 * hp.powf(0.2) + 10_000.0 + max_pump_depth * 50.0 * 3.281)
}

/// Specific ORC plant cost ($/kWe) as a function of the maximum entering temperature.
fn orc_specific_cost(max_temperature: f64) -> f64 {
    if max_temperature < 150.0 {
        -1.458333e-3 * max_temperature.powi(3) + 7.6875e-1 * max_temperature.powi(2)
            - 1.347917e2 * max_temperature
            + 1.0075e4
    } else {
        2231.0 - 2.0 * (max_temperature - 150.0)
    }
}

/// Flash plant correlation (M$), interpolated in log space between tabulated plant sizes.
fn flash_plant_cost(max_temperature: f64, max_electricity: f64) -> f64 {
    let ((c2, c1, c0), (d2, d1, d0), lower_size, upper_size): ((f64, f64, f64), (f64, f64, f64), f64, f64) = if max_electricity < 10.0 {
        ((4.8472e-2, -35.2186, 8.4474e3), (4.0604e-2, -29.3817, 6.9911e3), 5.0, 10.0)
    } else if max_electricity < 25.0 {
        ((4.0604e-2, -29.3817, 6.9911e3), (3.2773e-2, -23.5519, 5.5263e3), 10.0, 25.0)
    } else if max_electricity < 50.0 {
        ((3.2773e-2, -23.5519, 5.5263e3), (3.4716e-2, -23.8139, 5.1787e3), 25.0, 50.0)
    } else if max_electricity < 75.0 {
        ((3.4716e-2, -23.8139, 5.1787e3), (3.5271e-2, -24.3962, 5.1972e3), 50.0, 75.0)
    } else {
        ((3.5271e-2, -24.3962, 5.1972e3), (3.3908e-2, -23.4890, 5.0238e3), 75.0, 100.0)
    };
    let lower_cost = c2 * max_temperature.powi(2) + c1 * max_temperature + c0;
    let upper_cost = d2 * max_temperature.powi(2) + d1 * max_temperature + d0;
    let exponent = (upper_cost / lower_cost).ln() / (upper_size / lower_size).ln();
    let scale = upper_cost / upper_size.powf(exponent);
    scale * max_electricity.powf(exponent) * max_electricity * 1000.0 / 1e6
}

fn power_plant_correlation(plant: PowerPlantType, power: &PowerOutput) -> f64 {
    let max_temperature = max_value(&power.entering_temperature);
    let max_electricity = max_value(&power.electricity_produced);
    let orc = || {
        orc_specific_cost(max_temperature) * (max_electricity / 15.0).powf(-0.06) * max_electricity * 1000.0
            / 1e6
    };
    match plant {
        PowerPlantType::SubcriticalOrc => orc(),
        PowerPlantType::SupercriticalOrc => SUPERCRITICAL_COST_FACTOR * orc(),
        PowerPlantType::SingleFlash => {
            SINGLE_FLASH_COST_FACTOR * flash_plant_cost(max_temperature, max_electricity)
        }
        PowerPlantType::DoubleFlash => flash_plant_cost(max_temperature, max_electricity),
    }
}

pub fn capital_costs(
    params: &ModelParameters,
    depth: f64,
    hydraulics: &HydraulicsOutput,
    power: &PowerOutput,
    warnings: &mut WarningLog,
) -> CapitalCosts {
    let costs = &params.costs;
    let sub = &params.subsurface;
    let production_wells = sub.production_wells as f64;
    let well_count = production_wells + sub.injection_wells as f64;

    let (cost_per_well, wells) = match costs.wells.fixed {
        Some(per_well) => (per_well, per_well * well_count),
        None => {
            if !(WELL_DEPTH_LOWER_LIMIT..=WELL_DEPTH_UPPER_LIMIT).contains(&depth) {
                warnings.record(SimulationWarning::WellDepthOutsideCorrelation { depth });
            }
            let per_well =
                costs.wells.adjustment_factor * well_cost_correlation(costs.well_correlation, depth) * 1e-6;
            (per_well, INDIRECT_COST_FACTOR * per_well * well_count)
        }
    };

    let stimulation = costs.stimulation.resolve(|| {
        INDIRECT_COST_FACTOR * CONTINGENCY_FACTOR * sub.injection_wells as f64 * STIMULATION_COST_PER_WELL
    });

    let gathering = costs.gathering.resolve(|| {
        let pumps = if hydraulics.setup.impedance.is_some() {
            surface_pump_cost(max_value(&hydraulics.pumping_power) * HP_PER_MW)
        } else {
            let production = if hydraulics.setup.production_well_pumping {
                production_pump_cost(
                    production_wells,
                    max_value(&hydraulics.production_pumping_power),
                    hydraulics.max_pump_depth,
                )
            } else {
                0.0
            };
            production + surface_pump_cost(max_value(&hydraulics.injection_pumping_power) * HP_PER_MW)
        };
        DIRECT_COST_MARKUP * (well_count * GATHERING_PIPE_COST_PER_WELL + pumps) / 1e6
    });

    let end_use = params.simulation.end_use;
    let direct_use_plant = |peak_heat: f64| DIRECT_COST_MARKUP * DIRECT_USE_PLANT_COST * peak_heat * 1000.0;
    let surface_plant = match costs.surface_plant.fixed {
        Some(value) => value,
        None => {
            let factor = costs.surface_plant.adjustment_factor;
            let base = if end_use == EndUseOption::DirectUseHeat {
                factor * direct_use_plant(max_value(&power.heat_extracted))
            } else {
                factor
                    * DIRECT_COST_MARKUP
                    * PLANT_EQUIPMENT_FACTOR
                    * power_plant_correlation(params.simulation.power_plant, power)
            };
            let heat_increment = if end_use.arrangement().is_some() {
                let peak_heat = max_value(&power.heat_produced) / params.surface.end_use_efficiency;
                factor * direct_use_plant(peak_heat)
            } else {
                0.0
            };
            base + heat_increment
        }
    };

    let (exploration, piping, total) = match costs.total_capital_cost {
        Some(total) => (0.0, 0.0, total),
        None => {
            let exploration = costs.exploration.resolve(|| {
                DIRECT_COST_MARKUP * (1.0 + cost_per_well * EXPLORATION_WELL_FRACTION)
            });
            let piping = PIPING_COST_PER_KM * costs.piping_length;
            let total = exploration + wells + stimulation + gathering + surface_plant + piping;
            (exploration, piping, total)
        }
    };

    debug!(
        "Capital costs: wells {:.2}, stimulation {:.2}, gathering {:.2}, plant {:.2}, total {:.2} M$",
        wells, stimulation, gathering, surface_plant, total
    );

    CapitalCosts {
        wells,
        cost_per_well,
        stimulation,
        gathering,
        surface_plant,
        exploration,
        piping,
        total,
    }
}

/// Annual labor cost (M$/year), driven by peak electricity or, for heat-only
/// and cogeneration plants, by an electricity-equivalent of peak heat.
fn labor_cost(params: &ModelParameters, power: &PowerOutput) -> f64 {
    let peak = if params.simulation.end_use == EndUseOption::Electricity {
        max_value(&power.electricity_produced)
    } else {
        max_value(&power.heat_extracted) / 5.0
    };
    let correlation = if peak < 2.5 {
        MIN_LABOR_COST
    } else {
        (589.0 * peak.ln() - 304.0) / 1e3
    };
    correlation * LABOR_OVERHEAD
}

pub fn operating_costs(
    params: &ModelParameters,
    capital: &CapitalCosts,
    power: &PowerOutput,
    redrill_count: usize,
) -> OperatingCosts {
    let costs = &params.costs;
    let sub = &params.subsurface;

    let (labor, plant, wellfield, water, base_total) = match costs.total_om {
        Some(total) => (0.0, 0.0, 0.0, 0.0, total),
        None => {
            let labor = labor_cost(params, power);
            let plant = costs
                .plant_om
                .resolve(|| 1.5 / 100.0 * capital.surface_plant + 0.75 * labor);
            let wellfield = costs
                .wellfield_om
                .resolve(|| 1.0 / 100.0 * (capital.wells + capital.gathering) + 0.25 * labor);
            let water = costs.water_om.resolve(|| {
                sub.production_wells as f64
                    * sub.flow_rate_per_well
                    * sub.water_loss_fraction
                    * params.surface.utilization_factor
                    * SECONDS_PER_YEAR
                    / 1e6
                    * WATER_COST_PER_TONNE
                    / 1e6
            });
            (labor, plant, wellfield, water, plant + wellfield + water)
        }
    };

    let redrilling = if redrill_count > 0 {
        (capital.wells + capital.stimulation) * redrill_count as f64 / params.financial.plant_lifetime as f64
    } else {
        0.0
    };

    OperatingCosts {
        labor,
        plant,
        wellfield,
        water,
        redrilling,
        total: base_total + redrilling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parameters::HydraulicSetup;
    use approx::assert_abs_diff_eq;

    fn hydraulics(setup: HydraulicSetup, pumping: f64) -> HydraulicsOutput {
        HydraulicsOutput {
            setup,
            production_reynolds: vec![1e5],
            injection_reynolds: 1e5,
            production_friction_factor: vec![0.02],
            injection_friction_factor: 0.02,
            total_pressure_drop: vec![0.0],
            injection_pressure_drop: vec![0.0],
            reservoir_pressure_drop: vec![0.0],
            production_pressure_drop: vec![0.0],
            buoyancy_pressure_drop: vec![0.0],
            pumping_power: vec![pumping],
            production_pumping_power: vec![pumping / 2.0],
            injection_pumping_power: vec![pumping / 2.0],
            pump_depth: vec![200.0],
            max_pump_depth: 200.0,
            hydrostatic_pressure: Some(30_000.0),
            production_wellhead_pressure: Some(1_000.0),
            injection_wellhead_pressure: Some(500.0),
            plant_outlet_pressure: Some(800.0),
        }
    }

    fn pump_setup() -> HydraulicSetup {
        HydraulicSetup {
            impedance: None,
            production_well_pumping: true,
            plant_outlet_pressure: None,
        }
    }

    fn power(electricity: f64, heat: f64) -> PowerOutput {
        PowerOutput {
            injection_temperature: 70.0,
            entering_temperature: vec![180.0, 170.0],
            availability: vec![0.2, 0.18],
            utilization_efficiency: vec![0.4, 0.37],
            reinjection_temperature: vec![78.7, 77.8],
            heat_extracted: vec![heat, heat * 0.9],
            heat_extracted_toward_electricity: vec![heat, heat * 0.9],
            heat_produced: vec![0.0, 0.0],
            electricity_produced: vec![electricity, electricity * 0.9],
            net_electricity_produced: vec![electricity - 1.0, electricity * 0.9 - 1.0],
            first_law_efficiency: vec![0.1, 0.1],
        }
    }

    #[test]
    fn well_costs_follow_drilling_correlation() {
        let params = ModelParameters::default();
        let mut warnings = WarningLog::default();
        let costs = capital_costs(&params, 3000.0, &hydraulics(pump_setup(), 1.0), &power(8.0, 46.0), &mut warnings);
        let per_well = (0.3021 * 9e6 + 584.9112 * 3000.0 + 751_368.0) * 1e-6;
        assert_abs_diff_eq!(costs.cost_per_well, per_well, epsilon = 1e-12);
        assert_abs_diff_eq!(costs.wells, 1.05 * per_well * 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(costs.stimulation, 1.05 * 1.15 * 2.0 * 1.25, epsilon = 1e-12);
        assert!(warnings.as_slice().is_empty());
        let sum = costs.exploration + costs.wells + costs.stimulation + costs.gathering + costs.surface_plant;
        assert_abs_diff_eq!(costs.total, sum, epsilon = 1e-12);
    }

    #[test]
    fn shallow_well_warns_about_extrapolation() {
        let params = ModelParameters::default();
        let mut warnings = WarningLog::default();
        capital_costs(&params, 400.0, &hydraulics(pump_setup(), 1.0), &power(8.0, 46.0), &mut warnings);
        assert_eq!(
            warnings.as_slice(),
            &[SimulationWarning::WellDepthOutsideCorrelation { depth: 400.0 }]
        );
    }

    #[test]
    fn direct_use_plant_scales_with_peak_heat() {
        let mut params = ModelParameters::default();
        params.simulation.end_use = EndUseOption::DirectUseHeat;
        let costs = capital_costs(
            &params,
            3000.0,
            &hydraulics(pump_setup(), 1.0),
            &power(0.0, 40.0),
            &mut WarningLog::default(),
        );
        assert_abs_diff_eq!(costs.surface_plant, 1.12 * 1.15 * 250e-6 * 40.0 * 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn fixed_total_overrides_correlations() {
        let mut params = ModelParameters::default();
        params.costs.total_capital_cost = Some(42.0);
        params.costs.wells.fixed = Some(3.0);
        let costs = capital_costs(
            &params,
            3000.0,
            &hydraulics(pump_setup(), 1.0),
            &power(8.0, 46.0),
            &mut WarningLog::default(),
        );
        assert_eq!(costs.total, 42.0);
        assert_eq!(costs.wells, 12.0);
        assert_eq!(costs.exploration, 0.0);
    }

    #[test]
    fn flash_plants_cost_more_per_kw_at_small_sizes() {
        let small = flash_plant_cost(200.0, 6.0) / 6.0;
        let large = flash_plant_cost(200.0, 60.0) / 60.0;
        assert!(small > large);
        assert_abs_diff_eq!(
            SINGLE_FLASH_COST_FACTOR * flash_plant_cost(200.0, 30.0),
            power_plant_correlation(PowerPlantType::SingleFlash, &PowerOutput {
                entering_temperature: vec![200.0],
                electricity_produced: vec![30.0],
                ..power(30.0, 100.0)
            }),
            epsilon = 1e-12
        );
    }

    #[test]
    fn impedance_model_gathering_uses_total_pumping_power() {
        let setup = HydraulicSetup {
            impedance: Some(0.1),
            production_well_pumping: false,
            plant_outlet_pressure: None,
        };
        let params = ModelParameters::default();
        let costs = capital_costs(&params, 3000.0, &hydraulics(setup, 2.0), &power(8.0, 46.0), &mut WarningLog::default());
        let expected = 1.15 * 1.12 * (4.0 * 750.0 * 500.0 + surface_pump_cost(2.0 * 1341.0)) / 1e6;
        assert_abs_diff_eq!(costs.gathering, expected, epsilon = 1e-12);
    }

    #[test]
    fn small_plants_pay_minimum_labor() {
        let params = ModelParameters::default();
        let capital = capital_costs(
            &params,
            3000.0,
            &hydraulics(pump_setup(), 1.0),
            &power(2.0, 20.0),
            &mut WarningLog::default(),
        );
        let om = operating_costs(&params, &capital, &power(2.0, 20.0), 0);
        assert_abs_diff_eq!(om.labor, 0.236 * 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(om.total, om.plant + om.wellfield + om.water, epsilon = 1e-12);
        assert_eq!(om.redrilling, 0.0);
    }

    #[test]
    fn redrilling_amortizes_wells_and_stimulation() {
        let mut params = ModelParameters::default();
        params.costs.total_om = Some(1.0);
        let capital = capital_costs(
            &params,
            3000.0,
            &hydraulics(pump_setup(), 1.0),
            &power(8.0, 46.0),
            &mut WarningLog::default(),
        );
        let om = operating_costs(&params, &capital, &power(8.0, 46.0), 3);
        let expected = (capital.wells + capital.stimulation) * 3.0 / 30.0;
        assert_abs_diff_eq!(om.redrilling, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(om.total, 1.0 + expected, epsilon = 1e-12);
    }
}
