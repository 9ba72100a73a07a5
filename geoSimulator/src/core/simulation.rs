use tracing::info;

use crate::analysis::annualization::{annual_energy, reservoir_heat_content};
use crate::config::const_funcs::linspace;
use crate::config::options::ReservoirModel;
use crate::config::parameters::ModelParameters;
use crate::core::error::SimulationError;
use crate::core::results::{CalculatedResults, WarningLog};
use crate::data::temperature_profile_loader::load_temperature_profile;
use crate::models::costs::{capital_costs, operating_costs};
use crate::models::economics::levelized_cost;
use crate::models::geology::resolve_geology;
use crate::models::hydraulics::pressure_drops_and_pumping_power;
use crate::models::power::energy_extracted_and_produced;
use crate::models::reservoir::{reservoir_fluid, reservoir_temperatures, ReservoirState};
use crate::models::wellbore::wellbore_output;
use crate::utils::logging::{self, EconomicsType, OperationCategory, SubsurfaceType};

/// Runs the full pipeline. For the user-profile reservoir model the profile is
/// read from `subsurface.reservoir_profile_file`.
pub fn run_simulation(params: &ModelParameters) -> Result<CalculatedResults, SimulationError> {
    params.validate()?;
    let profile = if params.subsurface.reservoir_model == ReservoirModel::UserProfile {
        let path = params.subsurface.reservoir_profile_file.as_ref().ok_or_else(|| {
            SimulationError::Configuration(
                "reservoir model 5 requires a reservoir output profile file".to_string(),
            )
        })?;
        Some(load_temperature_profile(path, params.time_steps())?)
    } else {
        None
    };
    simulate(params, profile.as_deref())
}

/// Runs the full pipeline with an already loaded reservoir output profile,
/// used by the user-profile reservoir model.
pub fn run_simulation_with_profile(
    params: &ModelParameters,
    profile: &[f64],
) -> Result<CalculatedResults, SimulationError> {
    params.validate()?;
    simulate(params, Some(profile))
}

fn simulate(params: &ModelParameters, profile: Option<&[f64]>) -> Result<CalculatedResults, SimulationError> {
    let _timing = logging::start_timing("run_simulation", OperationCategory::Simulation);
    let mut warnings = WarningLog::default();

    let geology = resolve_geology(params, &mut warnings);
    let time = linspace(0.0, params.financial.plant_lifetime as f64, params.time_steps());
    let fluid = reservoir_fluid(params, geology.rock_temperature);
    let geometry = params.reservoir_geometry();
    info!(
        "Rock temperature {:.1} C at {:.0} m, {} time steps",
        geology.rock_temperature,
        geology.depth,
        time.len()
    );

    let reservoir_temperature = {
        let _timing = logging::start_timing(
            "reservoir_temperatures",
            OperationCategory::Subsurface { subcategory: SubsurfaceType::Reservoir },
        );
        let state = ReservoirState {
            rock_temperature: geology.rock_temperature,
            fluid: &fluid,
            geometry: &geometry,
            time: &time,
        };
        reservoir_temperatures(params, &state, profile, &mut warnings)?
    };

    let wellbore = {
        let _timing = logging::start_timing(
            "wellbore_output",
            OperationCategory::Subsurface { subcategory: SubsurfaceType::Wellbore },
        );
        wellbore_output(params, &geology, fluid.heat_capacity, &reservoir_temperature, &time)
    };

    let hydraulics = {
        let _timing = logging::start_timing(
            "pressure_drops_and_pumping_power",
            OperationCategory::Subsurface { subcategory: SubsurfaceType::Hydraulics },
        );
        pressure_drops_and_pumping_power(
            params,
            &geology,
            &reservoir_temperature,
            &wellbore.temperature_drop,
            fluid.injection_temperature,
            &mut warnings,
        )
    };

    let power = {
        let _timing = logging::start_timing("energy_extracted_and_produced", OperationCategory::SurfacePlant);
        energy_extracted_and_produced(
            params,
            &wellbore.produced_temperature,
            &hydraulics.pumping_power,
            fluid.injection_temperature,
            fluid.heat_capacity,
            &mut warnings,
        )
    };

    let (capital, operating) = {
        let _timing = logging::start_timing(
            "capital_and_operating_costs",
            OperationCategory::Economics { subcategory: EconomicsType::Costs },
        );
        let capital = capital_costs(params, geology.depth, &hydraulics, &power, &mut warnings);
        let operating = operating_costs(params, &capital, &power, wellbore.redrill_count);
        (capital, operating)
    };

    let (annual, heat_content) = {
        let _timing = logging::start_timing(
            "annual_energy",
            OperationCategory::Economics { subcategory: EconomicsType::Annualization },
        );
        let annual = annual_energy(params, &hydraulics.pumping_power, &power);
        let heat_content = reservoir_heat_content(
            params,
            &geometry,
            geology.rock_temperature,
            power.injection_temperature,
            &annual.heat_extracted,
        );
        (annual, heat_content)
    };

    let economics = {
        let _timing = logging::start_timing(
            "levelized_cost",
            OperationCategory::Economics { subcategory: EconomicsType::Levelized },
        );
        levelized_cost(params, capital.total, operating.total, &annual)?
    };

    info!(
        "Capital cost {:.2} M$, O&M {:.2} M$/year, price {:.3}",
        capital.total, operating.total, economics.price
    );

    Ok(CalculatedResults {
        time,
        geology,
        geometry,
        fluid,
        reservoir_temperature,
        wellbore,
        hydraulics,
        power,
        capital_costs: capital,
        operating_costs: operating,
        annual,
        heat_content,
        economics,
        warnings: warnings.into_vec(),
    })
}
