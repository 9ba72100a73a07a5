use crate::config::options::WellDrillingCorrelation;
use crate::config::constants::{
    AVAILABILITY_A, AVAILABILITY_B, AVAILABILITY_C, BTU_PER_LB_TO_MJ_PER_KG, CELSIUS_TO_KELVIN,
    HYDROSTATIC_COMPRESSIBILITY, HYDROSTATIC_EXPANSION_EXPONENT, HYDROSTATIC_EXPANSION_NUMERATOR,
    HYDROSTATIC_EXPANSION_SCALE, GRAVITY, WATER_MOLAR_MASS,
};

/// Specific heat capacity of water (J/kg/K) from the Shomate equation.
pub fn heat_capacity_water(temperature: f64) -> f64 {
    let t = (temperature + CELSIUS_TO_KELVIN) / 1000.0;
    let a = -203.606;
    let b = 1523.29;
    let c = -3196.413;
    let d = 2474.455;
    let e = 3.855326;
    (a + b * t + c * t.powi(2) + d * t.powi(3) + e / t.powi(2)) / WATER_MOLAR_MASS * 1000.0
}

/// Density of liquid water (kg/m3), quadratic in absolute temperature.
pub fn density_water(temperature: f64) -> f64 {
    let t = temperature + CELSIUS_TO_KELVIN;
    (0.7983223 + (0.00150896 - 2.9104e-6 * t) * t) * 1000.0
}

/// Dynamic viscosity of water (Pa.s).
pub fn viscosity_water(temperature: f64) -> f64 {
    2.414e-5 * 10f64.powf(247.8 / (temperature + CELSIUS_TO_KELVIN - 140.0))
}

/// Saturated vapor pressure of water (kPa) from the Antoine equation.
pub fn vapor_pressure_water(temperature: f64) -> f64 {
    let (a, b, c) = if temperature < 100.0 {
        (8.07131, 1730.63, 233.426)
    } else {
        (8.14019, 1810.94, 244.485)
    };
    133.322 * 10f64.powf(a - b / (c + temperature)) / 1000.0
}

/// Error function, Abramowitz and Stegun 7.1.26 (|error| < 1.5e-7).
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - ((((a5 * t + a4) * t + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

/// Geofluid availability (MJ/kg) between the entering and ambient temperatures.
pub fn availability(entering_temperature: f64, ambient_temperature: f64) -> f64 {
    let t0 = ambient_temperature + CELSIUS_TO_KELVIN;
    let t1 = entering_temperature + CELSIUS_TO_KELVIN;
    let (a, b, c) = (AVAILABILITY_A, AVAILABILITY_B, AVAILABILITY_C);
    ((a - b * t0) * (t1 - t0)
        + (b - c * t0) / 2.0 * (t1.powi(2) - t0.powi(2))
        + c / 3.0 * (t1.powi(3) - t0.powi(3))
        - a * t0 * (t1 / t0).ln())
        * BTU_PER_LB_TO_MJ_PER_KG
}

/// Hydrostatic reservoir pressure (kPa) corrected for water compressibility and
/// thermal expansion along the average gradient.
pub fn hydrostatic_pressure(
    surface_temperature: f64,
    rock_temperature: f64,
    average_gradient: f64,
    depth: f64,
) -> f64 {
    let cp = HYDROSTATIC_COMPRESSIBILITY;
    let ct = HYDROSTATIC_EXPANSION_NUMERATOR
        / (HYDROSTATIC_EXPANSION_SCALE * rock_temperature.powf(HYDROSTATIC_EXPANSION_EXPONENT));
    let rho = density_water(surface_temperature);
    1.0 / cp
        * ((rho * GRAVITY * cp / 1000.0 * (depth - ct / 2.0 * average_gradient * depth.powi(2)))
            .exp()
            - 1.0)
}

/// Drilling and completion cost of one well ($) for each drilling method,
/// quadratic in measured depth (m).
pub fn well_cost_correlation(correlation: WellDrillingCorrelation, depth: f64) -> f64 {
    let (a, b, c) = match correlation {
        WellDrillingCorrelation::VerticalSmall => (0.3021, 584.9112, 751_368.0),
        WellDrillingCorrelation::DeviatedSmall => (0.2898, 822.1507, 680_563.0),
        WellDrillingCorrelation::VerticalLarge => (0.2818, 1275.5213, 632_315.0),
        WellDrillingCorrelation::DeviatedLarge => (0.2553, 1716.7157, 500_867.0),
    };
    a * depth.powi(2) + b * depth + c
}

/// Evenly spaced values over [start, end], inclusive of both ends.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn min_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn water_properties_match_tabulated_values() {
        assert_abs_diff_eq!(density_water(20.0), 990.6, epsilon = 1.0);
        assert_abs_diff_eq!(density_water(100.0), 958.0, epsilon = 5.0);
        assert_abs_diff_eq!(heat_capacity_water(50.0), 4181.0, epsilon = 15.0);
        assert_abs_diff_eq!(viscosity_water(20.0), 1.0e-3, epsilon = 5e-5);
        assert_abs_diff_eq!(vapor_pressure_water(100.0), 101.3, epsilon = 1.0);
    }

    #[test]
    fn erf_is_odd_and_bounded() {
        assert_abs_diff_eq!(erf(0.0), 0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(erf(1.0), 0.8427007929, epsilon = 2e-7);
        assert_abs_diff_eq!(erf(-1.0), -erf(1.0), epsilon = 1e-15);
        assert!(erf(6.0) <= 1.0);
    }

    #[test]
    fn availability_vanishes_at_ambient() {
        assert_abs_diff_eq!(availability(15.0, 15.0), 0.0, epsilon = 1e-12);
        assert!(availability(180.0, 15.0) > availability(120.0, 15.0));
    }

    #[test]
    fn linspace_includes_both_ends() {
        let values = linspace(0.0, 30.0, 121);
        assert_eq!(values.len(), 121);
        assert_abs_diff_eq!(values[0], 0.0);
        assert_abs_diff_eq!(values[120], 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(values[4], 1.0, epsilon = 1e-12);
    }
}
