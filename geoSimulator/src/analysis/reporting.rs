use crate::config::options::{EndUseOption, PrimaryProduct};
use crate::config::parameters::ModelParameters;
use crate::core::results::CalculatedResults;

fn first_and_last(values: &[f64]) -> (f64, f64) {
    (
        values.first().copied().unwrap_or(0.0),
        values.last().copied().unwrap_or(0.0),
    )
}

pub fn print_summary(params: &ModelParameters, results: &CalculatedResults) {
    let end_use = params.simulation.end_use;
    println!("\nGeothermal Plant Summary");
    println!("----------------------------------------");
    println!("End use: {}", u8::from(end_use));
    println!("Reservoir model: {}", u8::from(params.subsurface.reservoir_model));
    println!("Economic model: {}", u8::from(params.financial.economic_model));
    println!("Resource:");
    println!("  Well depth: {:.0} m", results.geology.depth);
    println!("  Rock temperature: {:.1} C", results.geology.rock_temperature);
    println!("  Average gradient: {:.1} C/km", results.geology.average_gradient * 1000.0);
    println!("  Reservoir volume: {:.3e} m3", results.geometry.volume);
    println!("  Injection temperature: {:.1} C", results.power.injection_temperature);

    let (first_t, last_t) = first_and_last(&results.wellbore.produced_temperature);
    println!("  Produced temperature: {:.1} C initially, {:.1} C at end of life", first_t, last_t);
    if results.wellbore.redrill_count > 0 {
        println!("  Redrilling events: {}", results.wellbore.redrill_count);
    }

    println!("Output:");
    if end_use.produces_electricity() {
        let (first, last) = first_and_last(&results.power.net_electricity_produced);
        println!("  Net electricity: {:.2} MWe initially, {:.2} MWe at end of life", first, last);
    }
    if end_use.produces_heat() {
        let (first, last) = first_and_last(&results.power.heat_produced);
        println!("  Heat produced: {:.2} MWth initially, {:.2} MWth at end of life", first, last);
    }
    let (pumping, _) = first_and_last(&results.hydraulics.pumping_power);
    println!("  Initial pumping power: {:.2} MWe", pumping);

    println!("Costs:");
    let capital = &results.capital_costs;
    println!("  Wells: {:.2} M$", capital.wells);
    println!("  Stimulation: {:.2} M$", capital.stimulation);
    println!("  Gathering: {:.2} M$", capital.gathering);
    println!("  Surface plant: {:.2} M$", capital.surface_plant);
    println!("  Exploration: {:.2} M$", capital.exploration);
    println!("  Total capital cost: {:.2} M$", capital.total);
    println!("  Total O&M: {:.2} M$/year", results.operating_costs.total);

    let unit = match end_use {
        EndUseOption::DirectUseHeat => "$/MMBTU",
        other if other.primary_product() == PrimaryProduct::Heat => "$/MMBTU",
        _ => "cents/kWh",
    };
    println!("Levelized cost: {:.3} {}", results.economics.price, unit);
    if end_use == EndUseOption::DirectUseHeat {
        println!("Average annual pumping cost: {:.3} M$/year", results.economics.average_annual_pumping_cost);
    }

    if !results.warnings.is_empty() {
        println!("Warnings:");
        for warning in &results.warnings {
            println!("  {}", warning);
        }
    }
    println!("----------------------------------------");
}
