//! Per-year integration of the instantaneous series and reservoir heat content.

use crate::config::constants::{HOURS_PER_YEAR, PETAJOULE};
use crate::config::parameters::{ModelParameters, ReservoirGeometry};
use crate::core::results::{AnnualEnergy, HeatContent, PowerOutput};

/// Per-year views over a series sampled `steps_per_year` times a year plus a
/// final point. Consecutive windows share their boundary sample.
pub struct YearlyWindows<'a> {
    series: &'a [f64],
    steps_per_year: usize,
}

impl<'a> YearlyWindows<'a> {
    pub fn new(series: &'a [f64], steps_per_year: usize) -> Self {
        Self { series, steps_per_year }
    }

    pub fn years(&self) -> usize {
        if self.steps_per_year == 0 || self.series.len() <= self.steps_per_year {
            return 0;
        }
        (self.series.len() - 1) / self.steps_per_year
    }

    /// Samples of plant-year `year`, both ends included, or `None` past the end.
    pub fn year(&self, year: usize) -> Option<&'a [f64]> {
        let start = year.checked_mul(self.steps_per_year)?;
        let end = start.checked_add(self.steps_per_year + 1)?;
        self.series.get(start..end)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [f64]> + '_ {
        (0..self.years()).filter_map(move |year| self.year(year))
    }
}

pub fn trapezoid(values: &[f64], dx: f64) -> f64 {
    values.windows(2).map(|pair| (pair[0] + pair[1]) * 0.5 * dx).sum()
}

/// Integrates each year of `series` (MW) into kWh, derated by the utilization factor.
pub fn annual_kwh(series: &[f64], steps_per_year: usize, utilization_factor: f64) -> Vec<f64> {
    let dx = HOURS_PER_YEAR / steps_per_year as f64;
    YearlyWindows::new(series, steps_per_year)
        .iter()
        .map(|year| trapezoid(year, dx) * 1000.0 * utilization_factor)
        .collect()
}

pub fn annual_energy(params: &ModelParameters, pumping_power: &[f64], power: &PowerOutput) -> AnnualEnergy {
    let steps = params.simulation.timesteps_per_year;
    let util = params.surface.utilization_factor;
    let integrate = |series: &[f64]| annual_kwh(series, steps, util);
    AnnualEnergy {
        heat_extracted: integrate(&power.heat_extracted),
        pumping: integrate(pumping_power),
        electricity_produced: integrate(&power.electricity_produced),
        net_electricity_produced: integrate(&power.net_electricity_produced),
        heat_produced: integrate(&power.heat_produced),
    }
}

/// Rock heat content above the injection temperature, drawn down by the
/// cumulative heat extracted at the end of each year.
pub fn reservoir_heat_content(
    params: &ModelParameters,
    geometry: &ReservoirGeometry,
    rock_temperature: f64,
    injection_temperature: f64,
    annual_heat_extracted: &[f64],
) -> HeatContent {
    let sub = &params.subsurface;
    let initial = geometry.volume * sub.rock_density * sub.rock_heat_capacity
        * (rock_temperature - injection_temperature)
        / PETAJOULE;
    let remaining = annual_heat_extracted
        .iter()
        .scan(0.0, |cumulative, kwh| {
            *cumulative += kwh;
            Some(initial - *cumulative * 3600.0 * 1e3 / PETAJOULE)
        })
        .collect();
    HeatContent { initial, remaining }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn windows_share_year_boundaries() {
        let series: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let windows = YearlyWindows::new(&series, 4);
        assert_eq!(windows.years(), 2);
        assert_eq!(windows.year(0), Some(&series[0..5]));
        assert_eq!(windows.year(1), Some(&series[4..9]));
        assert_eq!(windows.year(2), None);
    }

    #[test]
    fn constant_series_integrates_exactly() {
        for steps in [1usize, 4, 12] {
            let series = vec![7.5; 30 * steps + 1];
            let annual = annual_kwh(&series, steps, 0.9);
            assert_eq!(annual.len(), 30);
            for year in annual {
                assert_abs_diff_eq!(year, 7.5 * 8760.0 * 1000.0 * 0.9, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn heat_content_decreases_by_extracted_energy() {
        let params = ModelParameters::default();
        let geometry = params.reservoir_geometry();
        let annual = vec![1e8, 1e8];
        let content = reservoir_heat_content(&params, &geometry, 165.0, 70.0, &annual);
        let expected = geometry.volume * 2700.0 * 1000.0 * 95.0 / 1e15;
        assert_abs_diff_eq!(content.initial, expected, epsilon = 1e-9);
        assert_abs_diff_eq!(content.initial - content.remaining[1], 2e8 * 3.6e6 / 1e15, epsilon = 1e-9);
    }
}
