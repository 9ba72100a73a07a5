// Module declarations for the geothermal simulator

// Pipeline orchestration, results and errors
pub mod core {
    pub mod simulation;
    pub mod results;
    pub mod error;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod const_funcs;
    pub mod options;
    pub mod parameters;
}

// Physical and economic models
pub mod models {
    pub mod laplace;
    pub mod geology;
    pub mod reservoir;
    pub mod wellbore;
    pub mod hydraulics;
    pub mod power;
    pub mod costs;
    pub mod economics;
}

// Data loaders
pub mod data {
    pub mod parameters_loader;
    pub mod temperature_profile_loader;
}

// Yearly aggregation and reporting
pub mod analysis {
    pub mod annualization;
    pub mod reporting;
}

// Utility functions
pub mod utils {
    pub mod logging;
    pub mod csv_export;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used items
pub use crate::config::parameters::ModelParameters;
pub use crate::core::error::SimulationError;
pub use crate::core::results::CalculatedResults;
pub use crate::core::simulation::{run_simulation, run_simulation_with_profile};
