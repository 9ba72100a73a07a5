use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::constants::MIN_GRADIENT;
use crate::config::parameters::ModelParameters;
use crate::utils::logging::{self, FileIOType, OperationCategory};

#[derive(Debug)]
pub enum ParameterLoadError {
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ParameterLoadError {
    fn from(err: std::io::Error) -> Self {
        ParameterLoadError::IoError(err)
    }
}

impl From<serde_json::Error> for ParameterLoadError {
    fn from(err: serde_json::Error) -> Self {
        ParameterLoadError::JsonError(err)
    }
}

impl std::fmt::Display for ParameterLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLoadError::IoError(e) => write!(f, "IO error: {}", e),
            ParameterLoadError::JsonError(e) => write!(f, "JSON error: {}", e),
            ParameterLoadError::Invalid(s) => write!(f, "Invalid parameters: {}", s),
        }
    }
}

impl std::error::Error for ParameterLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParameterLoadError::IoError(e) => Some(e),
            ParameterLoadError::JsonError(e) => Some(e),
            ParameterLoadError::Invalid(_) => None,
        }
    }
}

/// Loads a JSON parameter file. Any omitted field keeps its default.
pub fn load_parameters(path: impl AsRef<Path>) -> Result<ModelParameters, ParameterLoadError> {
    let _timing = logging::start_timing(
        "load_parameters",
        OperationCategory::FileIO { subcategory: FileIOType::ParameterLoad },
    );

    let mut file = File::open(path.as_ref())?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    let params = parse_parameters(&content)?;
    info!("Loaded parameters from {}", path.as_ref().display());
    Ok(params)
}

pub fn parse_parameters(content: &str) -> Result<ModelParameters, ParameterLoadError> {
    let mut params: ModelParameters = serde_json::from_str(content)?;

    for gradient in params.subsurface.gradients.iter_mut() {
        if *gradient == 0.0 {
            debug!("Replacing zero geothermal gradient with {} C/m", MIN_GRADIENT);
            *gradient = MIN_GRADIENT;
        }
    }

    params
        .validate()
        .map_err(|e| ParameterLoadError::Invalid(e.to_string()))?;
    Ok(params)
}

pub fn default_parameters_json() -> Result<String, ParameterLoadError> {
    Ok(serde_json::to_string_pretty(&ModelParameters::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::{EconomicModel, EndUseOption, PowerPlantType};
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let json = r#"{
            "simulation": { "power_plant": 2, "end_use": 31 },
            "financial": { "economic_model": 3 },
            "costs": { "piping_length": 2.5 }
        }"#;
        let params = parse_parameters(json).unwrap();
        assert_eq!(params.simulation.power_plant, PowerPlantType::SupercriticalOrc);
        assert!(matches!(params.simulation.end_use, EndUseOption::Cogeneration { .. }));
        assert_eq!(params.financial.economic_model, EconomicModel::Bicycle);
        assert_eq!(params.costs.piping_length, 2.5);
        assert_eq!(params.costs.electricity_price, 0.07);
        assert_eq!(params.subsurface.depth, 3000.0);
    }

    #[test]
    fn default_json_round_trips() {
        let json = default_parameters_json().unwrap();
        let params = parse_parameters(&json).unwrap();
        assert_eq!(serde_json::to_string_pretty(&params).unwrap(), json);
    }

    #[test]
    fn zero_gradient_is_replaced() {
        let params = parse_parameters(r#"{ "subsurface": { "gradients": [0.0] } }"#).unwrap();
        assert_eq!(params.subsurface.gradients, vec![MIN_GRADIENT]);
    }

    #[test]
    fn unknown_option_code_is_rejected() {
        let err = parse_parameters(r#"{ "simulation": { "end_use": 7 } }"#).unwrap_err();
        assert!(matches!(err, ParameterLoadError::JsonError(_)));
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        let err = parse_parameters(r#"{ "simulation": { "timesteps_per_year": 0 } }"#).unwrap_err();
        assert!(matches!(err, ParameterLoadError::Invalid(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "subsurface": {{ "production_wells": 3 }} }}"#).unwrap();
        let params = load_parameters(file.path()).unwrap();
        assert_eq!(params.subsurface.production_wells, 3);
    }
}
