use crate::data::temperature_profile_loader::TemperatureProfileError;

#[derive(Debug)]
pub enum SimulationError {
    Configuration(String),
    ReservoirProfile(TemperatureProfileError),
    Unsupported(String),
    ZeroEnergyDenominator(&'static str),
    NonFiniteResult(String),
}

impl From<TemperatureProfileError> for SimulationError {
    fn from(err: TemperatureProfileError) -> Self {
        SimulationError::ReservoirProfile(err)
    }
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Configuration(s) => write!(f, "Configuration error: {}", s),
            SimulationError::ReservoirProfile(e) => write!(f, "Reservoir output profile error: {}", e),
            SimulationError::Unsupported(s) => write!(f, "Unsupported configuration: {}", s),
            SimulationError::ZeroEnergyDenominator(s) => {
                write!(f, "Levelized cost undefined: discounted {} is zero", s)
            }
            SimulationError::NonFiniteResult(s) => write!(f, "Non-finite result: {}", s),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::ReservoirProfile(e) => Some(e),
            _ => None,
        }
    }
}
