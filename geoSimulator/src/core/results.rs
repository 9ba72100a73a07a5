use std::fmt;
use serde::Serialize;
use tracing::warn;

use crate::config::parameters::{HydraulicSetup, ReservoirGeometry};

/// Non-fatal plausibility findings. The run continues with the corrected value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationWarning {
    DepthCapped { requested: f64, capped: f64 },
    ReservoirTemperatureClamped { points: usize },
    WellheadPressureRaised { requested: f64, minimum: f64 },
    PumpDepthNegative { depth: f64 },
    PumpDepthExcessive { depth: f64 },
    InjectionTemperatureLowered { from: f64, to: f64 },
    InjectionTemperatureAboveReinjection { injection: f64, reinjection: f64 },
    WellDepthOutsideCorrelation { depth: f64 },
}

impl fmt::Display for SimulationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationWarning::DepthCapped { requested, capped } => write!(
                f,
                "Depth {:.0} m exceeds the maximum temperature depth; using {:.0} m",
                requested, capped
            ),
            SimulationWarning::ReservoirTemperatureClamped { points } => write!(
                f,
                "{} reservoir temperature points were out of range or NaN and were clamped",
                points
            ),
            SimulationWarning::WellheadPressureRaised { requested, minimum } => write!(
                f,
                "Production wellhead pressure {:.1} kPa is below the minimum {:.1} kPa; using the minimum",
                requested, minimum
            ),
            SimulationWarning::PumpDepthNegative { depth } => write!(
                f,
                "Calculated maximum pump depth is negative ({:.0} m); assuming no production pumps",
                depth
            ),
            SimulationWarning::PumpDepthExcessive { depth } => write!(
                f,
                "Calculated maximum pump depth {:.0} m exceeds 600 m; pumping may not be feasible",
                depth
            ),
            SimulationWarning::InjectionTemperatureLowered { from, to } => write!(
                f,
                "Injection temperature lowered from {:.1} C to the plant reinjection temperature {:.1} C",
                from, to
            ),
            SimulationWarning::InjectionTemperatureAboveReinjection { injection, reinjection } => write!(
                f,
                "Plant reinjection temperature {:.1} C is below the injection temperature {:.1} C, which cannot be lowered for a bottoming cycle",
                reinjection, injection
            ),
            SimulationWarning::WellDepthOutsideCorrelation { depth } => write!(
                f,
                "Well depth {:.0} m is outside the 500-7000 m range of the drilling cost correlation",
                depth
            ),
        }
    }
}

/// Ordered collector that logs each warning as it is recorded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WarningLog(Vec<SimulationWarning>);

impl WarningLog {
    pub fn record(&mut self, warning: SimulationWarning) {
        warn!("{}", warning);
        self.0.push(warning);
    }

    pub fn as_slice(&self) -> &[SimulationWarning] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<SimulationWarning> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeologyOutput {
    pub depth: f64,                    // m, after capping
    pub max_depth: f64,                // m
    pub rock_temperature: f64,         // C
    pub average_gradient: f64,         // C/m
}

/// Water properties at the average reservoir temperature and the injection
/// temperature after the injection-well gain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservoirFluid {
    pub heat_capacity: f64,            // J/kg/K
    pub density: f64,                  // kg/m3
    pub injection_temperature: f64,    // C
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellboreOutput {
    pub temperature_drop: Vec<f64>,
    pub produced_temperature: Vec<f64>,
    pub redrill_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydraulicsOutput {
    pub setup: HydraulicSetup,
    pub production_reynolds: Vec<f64>,
    pub injection_reynolds: f64,
    pub production_friction_factor: Vec<f64>,
    pub injection_friction_factor: f64,
    /// Pressure drops (kPa); only the impedance model fills `total`, `reservoir` and `buoyancy`.
    pub total_pressure_drop: Vec<f64>,
    pub injection_pressure_drop: Vec<f64>,
    pub reservoir_pressure_drop: Vec<f64>,
    pub production_pressure_drop: Vec<f64>,
    pub buoyancy_pressure_drop: Vec<f64>,
    pub pumping_power: Vec<f64>,            // MWe
    pub production_pumping_power: Vec<f64>, // MWe
    pub injection_pumping_power: Vec<f64>,  // MWe
    pub pump_depth: Vec<f64>,               // m
    pub max_pump_depth: f64,                // m, after clamping at zero
    pub hydrostatic_pressure: Option<f64>,  // kPa
    pub production_wellhead_pressure: Option<f64>, // kPa
    pub injection_wellhead_pressure: Option<f64>,  // kPa
    pub plant_outlet_pressure: Option<f64>, // kPa
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerOutput {
    pub injection_temperature: f64,         // C, possibly lowered to the reinjection temperature
    pub entering_temperature: Vec<f64>,     // C
    pub availability: Vec<f64>,             // MJ/kg
    pub utilization_efficiency: Vec<f64>,
    pub reinjection_temperature: Vec<f64>,  // C
    pub heat_extracted: Vec<f64>,           // MWth
    pub heat_extracted_toward_electricity: Vec<f64>, // MWth
    pub heat_produced: Vec<f64>,            // MWth
    pub electricity_produced: Vec<f64>,     // MWe
    pub net_electricity_produced: Vec<f64>, // MWe
    pub first_law_efficiency: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalCosts {
    pub wells: f64,                    // M$
    pub cost_per_well: f64,            // M$
    pub stimulation: f64,
    pub gathering: f64,
    pub surface_plant: f64,
    pub exploration: f64,
    pub piping: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatingCosts {
    pub labor: f64,                    // M$/year
    pub plant: f64,
    pub wellfield: f64,
    pub water: f64,
    pub redrilling: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualEnergy {
    pub heat_extracted: Vec<f64>,      // kWh/year
    pub pumping: Vec<f64>,
    pub electricity_produced: Vec<f64>,
    pub net_electricity_produced: Vec<f64>,
    pub heat_produced: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatContent {
    pub initial: f64,                  // 1e15 J
    pub remaining: Vec<f64>,           // 1e15 J, end of each year
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicOutput {
    /// cents/kWh when electricity is primary, $/MMBTU when heat is primary.
    pub price: f64,
    pub average_annual_pumping_cost: f64, // M$/year
}

/// Everything a run derives, assembled once the last stage completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatedResults {
    pub time: Vec<f64>,                // years
    pub geology: GeologyOutput,
    pub geometry: ReservoirGeometry,
    pub fluid: ReservoirFluid,
    pub reservoir_temperature: Vec<f64>,
    pub wellbore: WellboreOutput,
    pub hydraulics: HydraulicsOutput,
    pub power: PowerOutput,
    pub capital_costs: CapitalCosts,
    pub operating_costs: OperatingCosts,
    pub annual: AnnualEnergy,
    pub heat_content: HeatContent,
    pub economics: EconomicOutput,
    pub warnings: Vec<SimulationWarning>,
}
