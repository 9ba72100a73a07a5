use std::f64::consts::PI;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::config::constants::{FLASH_PLANT_OUTLET_PRESSURE, INCH_TO_METER, MAX_GRADIENT_SEGMENTS};
use crate::config::options::{
    CogenArrangement, EconomicModel, EndUseOption, FractureShape, LaplaceInversionMethod,
    PowerPlantType, ReservoirModel, ReservoirVolumeOption, WellDrillingCorrelation,
};
use crate::core::error::SimulationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub timesteps_per_year: usize,
    pub end_use: EndUseOption,
    pub power_plant: PowerPlantType,
    pub laplace_inversion: LaplaceInversionMethod,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            timesteps_per_year: 4,
            end_use: EndUseOption::Electricity,
            power_plant: PowerPlantType::SubcriticalOrc,
            laplace_inversion: LaplaceInversionMethod::Talbot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsurfaceParameters {
    pub reservoir_model: ReservoirModel,
    /// Model 3: m/A drawdown parameter (kg/s/m2). Model 4: fractional drawdown per year.
    pub drawdown_parameter: f64,
    pub reservoir_profile_file: Option<PathBuf>,
    pub depth: f64,                          // m
    pub gradients: Vec<f64>,                 // C/m, top segment first
    pub layer_thicknesses: Vec<f64>,         // m, one fewer than gradients
    pub max_temperature: f64,                // C
    pub production_wells: u32,
    pub injection_wells: u32,
    pub production_well_diameter: f64,       // m
    pub injection_well_diameter: f64,        // m
    pub ramey_wellbore_model: bool,
    pub production_temperature_drop: f64,    // C, used when Ramey is off
    pub injection_temperature_gain: f64,     // C
    pub flow_rate_per_well: f64,             // kg/s
    pub fracture_shape: FractureShape,
    pub fracture_area: f64,                  // m2
    pub fracture_height: f64,                // m
    pub fracture_width: f64,                 // m
    pub volume_option: Option<ReservoirVolumeOption>,
    pub fracture_count: u32,
    pub fracture_separation: f64,            // m
    pub reservoir_volume: f64,               // m3
    pub water_loss_fraction: f64,
    pub reservoir_impedance: Option<f64>,    // GPa.s/m3
    pub hydrostatic_pressure: Option<f64>,   // kPa
    pub productivity_index: f64,             // kg/s/bar
    pub injectivity_index: f64,              // kg/s/bar
    pub production_wellhead_pressure: Option<f64>, // kPa
    pub plant_outlet_pressure: Option<f64>,  // kPa
    pub injection_temperature: f64,         // C
    pub max_drawdown: f64,
    pub rock_heat_capacity: f64,             // J/kg/K
    pub rock_density: f64,                   // kg/m3
    pub rock_thermal_conductivity: f64,      // W/m/K
    pub rock_porosity: f64,
}

impl Default for SubsurfaceParameters {
    fn default() -> Self {
        Self {
            reservoir_model: ReservoirModel::LinearDrawdown,
            drawdown_parameter: 0.005,
            reservoir_profile_file: None,
            depth: 3000.0,
            gradients: vec![0.05],
            layer_thicknesses: Vec::new(),
            max_temperature: 400.0,
            production_wells: 2,
            injection_wells: 2,
            production_well_diameter: 8.0 * INCH_TO_METER,
            injection_well_diameter: 8.0 * INCH_TO_METER,
            ramey_wellbore_model: true,
            production_temperature_drop: 5.0,
            injection_temperature_gain: 0.0,
            flow_rate_per_well: 50.0,
            fracture_shape: FractureShape::CircularByArea,
            fracture_area: 250_000.0,
            fracture_height: 500.0,
            fracture_width: 500.0,
            volume_option: None,
            fracture_count: 10,
            fracture_separation: 50.0,
            reservoir_volume: 500.0 * 500.0 * 500.0,
            water_loss_fraction: 0.0,
            reservoir_impedance: None,
            hydrostatic_pressure: None,
            productivity_index: 10.0,
            injectivity_index: 10.0,
            production_wellhead_pressure: None,
            plant_outlet_pressure: None,
            injection_temperature: 70.0,
            max_drawdown: 1.0,
            rock_heat_capacity: 1000.0,
            rock_density: 2700.0,
            rock_thermal_conductivity: 3.0,
            rock_porosity: 0.04,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParameters {
    pub pump_efficiency: f64,
    pub utilization_factor: f64,
    pub end_use_efficiency: f64,
    pub chp_fraction: f64,
    pub chp_bottoming_temperature: f64,      // C
    pub surface_temperature: f64,            // C
    pub ambient_temperature: f64,            // C
}

impl Default for SurfaceParameters {
    fn default() -> Self {
        Self {
            pump_efficiency: 0.75,
            utilization_factor: 0.9,
            end_use_efficiency: 0.9,
            chp_fraction: 0.5,
            chp_bottoming_temperature: 150.0,
            surface_temperature: 15.0,
            ambient_temperature: 15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialParameters {
    pub plant_lifetime: usize,               // years
    pub economic_model: EconomicModel,
    pub fixed_charge_rate: f64,
    pub discount_rate: f64,
    pub bond_fraction: f64,
    pub bond_interest_rate: f64,
    pub equity_interest_rate: f64,
    pub inflation_rate: f64,
    pub income_tax_rate: f64,
    pub gross_revenue_tax_rate: f64,
    pub investment_tax_credit_rate: f64,
    pub property_tax_rate: f64,
    pub construction_inflation_rate: f64,
}

impl Default for FinancialParameters {
    fn default() -> Self {
        Self {
            plant_lifetime: 30,
            economic_model: EconomicModel::StandardLevelized,
            fixed_charge_rate: 0.1,
            discount_rate: 0.07,
            bond_fraction: 0.5,
            bond_interest_rate: 0.05,
            equity_interest_rate: 0.1,
            inflation_rate: 0.02,
            income_tax_rate: 0.3,
            gross_revenue_tax_rate: 0.0,
            investment_tax_credit_rate: 0.0,
            property_tax_rate: 0.0,
            construction_inflation_rate: 0.0,
        }
    }
}

/// A cost category: either a user-fixed value (M$ or M$/year) or a correlation
/// scaled by an adjustment factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostItem {
    pub fixed: Option<f64>,
    pub adjustment_factor: f64,
}

impl Default for CostItem {
    fn default() -> Self {
        Self {
            fixed: None,
            adjustment_factor: 1.0,
        }
    }
}

impl CostItem {
    /// User-fixed value when present, otherwise the correlation scaled by the adjustment factor.
    pub fn resolve(&self, correlation: impl FnOnce() -> f64) -> f64 {
        match self.fixed {
            Some(value) => value,
            None => self.adjustment_factor * correlation(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    pub total_capital_cost: Option<f64>,
    /// Fixed value is per well.
    pub wells: CostItem,
    pub well_correlation: WellDrillingCorrelation,
    pub stimulation: CostItem,
    pub surface_plant: CostItem,
    pub gathering: CostItem,
    pub exploration: CostItem,
    pub piping_length: f64,                  // km
    pub total_om: Option<f64>,
    pub wellfield_om: CostItem,
    pub plant_om: CostItem,
    pub water_om: CostItem,
    pub electricity_price: f64,              // $/kWh
    pub heat_price: f64,                     // $/kWh
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            total_capital_cost: None,
            wells: CostItem::default(),
            well_correlation: WellDrillingCorrelation::default(),
            stimulation: CostItem::default(),
            surface_plant: CostItem::default(),
            gathering: CostItem::default(),
            exploration: CostItem::default(),
            piping_length: 0.0,
            total_om: None,
            wellfield_om: CostItem::default(),
            plant_om: CostItem::default(),
            water_om: CostItem::default(),
            electricity_price: 0.07,
            heat_price: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub simulation: SimulationParameters,
    pub subsurface: SubsurfaceParameters,
    pub surface: SurfaceParameters,
    pub financial: FinancialParameters,
    pub costs: CostParameters,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            simulation: SimulationParameters::default(),
            subsurface: SubsurfaceParameters::default(),
            surface: SurfaceParameters::default(),
            financial: FinancialParameters::default(),
            costs: CostParameters::default(),
        }
    }
}

/// Fracture and rock-mass geometry after resolving shape and volume options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReservoirGeometry {
    pub fracture_area: f64,
    pub fracture_height: f64,
    pub fracture_width: f64,
    pub fracture_count: f64,
    pub fracture_separation: f64,
    pub volume: f64,
}

/// Pressure-accounting setup implied by plant type, end use and impedance input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HydraulicSetup {
    /// kPa/(kg/s), converted from GPa.s/m3 at unit density.
    pub impedance: Option<f64>,
    pub production_well_pumping: bool,
    pub plant_outlet_pressure: Option<f64>,
}

impl ModelParameters {
    pub fn time_steps(&self) -> usize {
        self.financial.plant_lifetime * self.simulation.timesteps_per_year + 1
    }

    pub fn volume_option(&self) -> ReservoirVolumeOption {
        let fracture_model = matches!(
            self.subsurface.reservoir_model,
            ReservoirModel::MultipleParallelFractures | ReservoirModel::LinearHeatSweep
        );
        match self.subsurface.volume_option {
            Some(ReservoirVolumeOption::VolumeOnly) if fracture_model => {
                ReservoirVolumeOption::VolumeAndFractureCount
            }
            Some(option) => option,
            None if fracture_model => ReservoirVolumeOption::VolumeAndFractureCount,
            None => ReservoirVolumeOption::VolumeOnly,
        }
    }

    pub fn reservoir_geometry(&self) -> ReservoirGeometry {
        let sub = &self.subsurface;
        let (fracture_area, fracture_height, fracture_width) = match sub.fracture_shape {
            FractureShape::CircularByArea => {
                let diameter = (4.0 / PI * sub.fracture_area).sqrt();
                (sub.fracture_area, diameter, diameter)
            }
            FractureShape::CircularByDiameter => (
                PI / 4.0 * sub.fracture_height.powi(2),
                sub.fracture_height,
                sub.fracture_height,
            ),
            FractureShape::Square => (
                sub.fracture_height.powi(2),
                sub.fracture_height,
                sub.fracture_height,
            ),
            FractureShape::Rectangular => (
                sub.fracture_height * sub.fracture_width,
                sub.fracture_height,
                sub.fracture_width,
            ),
        };

        let mut count = sub.fracture_count as f64;
        let mut separation = sub.fracture_separation;
        let mut volume = sub.reservoir_volume;
        match self.volume_option() {
            ReservoirVolumeOption::FractureCountAndSeparation => {
                volume = (count - 1.0) * fracture_area * separation;
            }
            ReservoirVolumeOption::VolumeAndSeparation => {
                count = volume / fracture_area / separation + 1.0;
            }
            ReservoirVolumeOption::VolumeAndFractureCount => {
                separation = volume / fracture_area / (count - 1.0);
            }
            ReservoirVolumeOption::VolumeOnly => {}
        }

        ReservoirGeometry {
            fracture_area,
            fracture_height,
            fracture_width,
            fracture_count: count,
            fracture_separation: separation,
            volume,
        }
    }

    pub fn hydraulic_setup(&self) -> HydraulicSetup {
        let flash = self.simulation.power_plant.is_flash();
        let arrangement = self.simulation.end_use.arrangement();
        let no_production_pumping = flash
            && match self.simulation.end_use {
                EndUseOption::Electricity => true,
                EndUseOption::Cogeneration { .. } => arrangement == Some(CogenArrangement::Topping),
                EndUseOption::DirectUseHeat => false,
            };
        let fixed_injection_pressure = flash && self.simulation.end_use.produces_electricity();
        let impedance_allowed = !fixed_injection_pressure;

        let impedance = if impedance_allowed {
            self.subsurface
                .reservoir_impedance
                .map(|value| value * crate::config::constants::IMPEDANCE_UNIT_FACTOR)
        } else {
            None
        };

        let plant_outlet_pressure = match self.subsurface.plant_outlet_pressure {
            Some(pressure) => Some(pressure),
            None if fixed_injection_pressure => Some(FLASH_PLANT_OUTLET_PRESSURE),
            None => None,
        };

        HydraulicSetup {
            impedance,
            production_well_pumping: !no_production_pumping,
            plant_outlet_pressure,
        }
    }

    /// Checks documented allowable ranges and option combinations.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let sim = &self.simulation;
        let sub = &self.subsurface;
        let surf = &self.surface;
        let fin = &self.financial;

        check_range("timesteps per year", sim.timesteps_per_year as f64, 1.0, 100.0)?;
        check_range("plant lifetime", fin.plant_lifetime as f64, 1.0, 100.0)?;
        check_range("reservoir depth", sub.depth, 100.0, 15_000.0)?;
        check_range("maximum temperature", sub.max_temperature, 50.0, 1000.0)?;
        check_range("production wells", sub.production_wells as f64, 1.0, 50.0)?;
        check_range("injection wells", sub.injection_wells as f64, 1.0, 50.0)?;
        check_range("production well diameter", sub.production_well_diameter, 0.0254, 1.0)?;
        check_range("injection well diameter", sub.injection_well_diameter, 0.0254, 1.0)?;
        check_range("flow rate per well", sub.flow_rate_per_well, 1.0, 500.0)?;
        check_range("injection temperature", sub.injection_temperature, 0.0, 200.0)?;
        check_range("maximum drawdown", sub.max_drawdown, 0.0, 1.0)?;
        check_range("water loss fraction", sub.water_loss_fraction, 0.0, 0.99)?;
        check_range("rock heat capacity", sub.rock_heat_capacity, 100.0, 10_000.0)?;
        check_range("rock density", sub.rock_density, 100.0, 10_000.0)?;
        check_range("rock thermal conductivity", sub.rock_thermal_conductivity, 0.01, 100.0)?;
        check_range("rock porosity", sub.rock_porosity, 0.001, 0.99)?;
        check_range("productivity index", sub.productivity_index, 1e-4, 1e4)?;
        check_range("injectivity index", sub.injectivity_index, 1e-4, 1e4)?;
        check_range("pump efficiency", surf.pump_efficiency, 0.1, 1.0)?;
        check_range("utilization factor", surf.utilization_factor, 0.1, 1.0)?;
        check_range("end-use efficiency", surf.end_use_efficiency, 0.1, 1.0)?;
        check_range("CHP fraction", surf.chp_fraction, 0.0001, 0.9999)?;
        check_range("fixed charge rate", fin.fixed_charge_rate, 0.0, 1.0)?;
        check_range("discount rate", fin.discount_rate, 0.0, 1.0)?;
        check_range("income tax rate", fin.income_tax_rate, 0.0, 0.99)?;
        check_range("gross revenue tax rate", fin.gross_revenue_tax_rate, 0.0, 0.99)?;

        if sub.gradients.is_empty() || sub.gradients.len() > MAX_GRADIENT_SEGMENTS {
            return Err(SimulationError::Configuration(format!(
                "Expected 1 to {} gradient segments, found {}",
                MAX_GRADIENT_SEGMENTS,
                sub.gradients.len()
            )));
        }
        if sub.layer_thicknesses.len() + 1 != sub.gradients.len() {
            return Err(SimulationError::Configuration(format!(
                "{} gradient segments need {} layer thicknesses, found {}",
                sub.gradients.len(),
                sub.gradients.len() - 1,
                sub.layer_thicknesses.len()
            )));
        }
        for gradient in &sub.gradients {
            check_range("geothermal gradient", *gradient, 0.0, 0.5)?;
        }
        for thickness in &sub.layer_thicknesses {
            check_range("layer thickness", *thickness, 10.0, 100_000.0)?;
        }

        if self.volume_option() != ReservoirVolumeOption::VolumeOnly {
            check_range("number of fractures", sub.fracture_count as f64, 1.0, 20.0)?;
            if self.volume_option() == ReservoirVolumeOption::VolumeAndFractureCount
                && sub.fracture_count < 2
            {
                return Err(SimulationError::Configuration(
                    "At least 2 fractures are needed to derive the fracture separation".to_string(),
                ));
            }
        }
        let geometry = self.reservoir_geometry();
        if !(geometry.volume > 0.0 && geometry.volume.is_finite()) {
            return Err(SimulationError::Configuration(format!(
                "Reservoir volume must be positive, found {}",
                geometry.volume
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SimulationError::Configuration(format!(
            "{} = {} is outside [{}, {}]",
            name, value, min, max
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(ModelParameters::default().validate().is_ok());
        assert_eq!(ModelParameters::default().time_steps(), 121);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "subsurface": { "depth": 4000.0 }, "simulation": { "end_use": 2 } }"#;
        let params: ModelParameters = serde_json::from_str(json).unwrap();
        assert_abs_diff_eq!(params.subsurface.depth, 4000.0);
        assert_eq!(params.simulation.end_use, EndUseOption::DirectUseHeat);
        assert_eq!(params.subsurface.production_wells, 2);
        assert_abs_diff_eq!(params.costs.electricity_price, 0.07);
    }

    #[test]
    fn mismatched_layers_are_rejected() {
        let mut params = ModelParameters::default();
        params.subsurface.gradients = vec![0.05, 0.04];
        assert!(matches!(params.validate(), Err(SimulationError::Configuration(_))));
        params.subsurface.layer_thicknesses = vec![2000.0];
        assert!(params.validate().is_ok());
    }

    #[test]
    fn fracture_models_derive_separation_from_volume() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_model = ReservoirModel::MultipleParallelFractures;
        let geometry = params.reservoir_geometry();
        assert_eq!(params.volume_option(), ReservoirVolumeOption::VolumeAndFractureCount);
        assert_abs_diff_eq!(geometry.fracture_separation, 1.25e8 / 250_000.0 / 9.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geometry.fracture_height, (4.0 / PI * 250_000.0f64).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn volume_from_fracture_count_and_separation() {
        let mut params = ModelParameters::default();
        params.subsurface.volume_option = Some(ReservoirVolumeOption::FractureCountAndSeparation);
        params.subsurface.fracture_shape = FractureShape::Rectangular;
        params.subsurface.fracture_height = 400.0;
        params.subsurface.fracture_width = 300.0;
        let geometry = params.reservoir_geometry();
        assert_abs_diff_eq!(geometry.volume, 9.0 * 120_000.0 * 50.0, epsilon = 1e-6);
    }

    #[test]
    fn flash_electricity_plants_disable_impedance_and_production_pumps() {
        let mut params = ModelParameters::default();
        params.subsurface.reservoir_impedance = Some(0.1);
        assert_abs_diff_eq!(params.hydraulic_setup().impedance.unwrap(), 100.0, epsilon = 1e-9);

        params.simulation.power_plant = PowerPlantType::DoubleFlash;
        let setup = params.hydraulic_setup();
        assert!(setup.impedance.is_none());
        assert!(!setup.production_well_pumping);
        assert_eq!(setup.plant_outlet_pressure, Some(FLASH_PLANT_OUTLET_PRESSURE));
    }
}
