//! Tracing setup and per-stage wall-clock timing for pipeline runs.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, Level};
use tracing_subscriber::{prelude::*, EnvFilter};
use tracing_timing::{Builder, Histogram};

// Nanosecond histograms up to one minute per stage call
const HISTOGRAM_MAX_NS: u64 = 60_000_000_000;
const HISTOGRAM_SIGFIG: u8 = 3;

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub enum OperationCategory {
    Simulation,
    Subsurface { subcategory: SubsurfaceType },
    SurfacePlant,
    Economics { subcategory: EconomicsType },
    FileIO { subcategory: FileIOType },
}

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub enum SubsurfaceType {
    Reservoir,
    Wellbore,
    Hydraulics,
}

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub enum EconomicsType {
    Costs,
    Annualization,
    Levelized,
}

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub enum FileIOType {
    ParameterLoad,
    ProfileLoad,
    ResultsSave,
}

impl OperationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCategory::Simulation => "Simulation",
            OperationCategory::Subsurface { subcategory } => match subcategory {
                SubsurfaceType::Reservoir => "Subsurface - Reservoir",
                SubsurfaceType::Wellbore => "Subsurface - Wellbore",
                SubsurfaceType::Hydraulics => "Subsurface - Hydraulics",
            },
            OperationCategory::SurfacePlant => "Surface Plant",
            OperationCategory::Economics { subcategory } => match subcategory {
                EconomicsType::Costs => "Economics - Costs",
                EconomicsType::Annualization => "Economics - Annualization",
                EconomicsType::Levelized => "Economics - Levelized Cost",
            },
            OperationCategory::FileIO { subcategory } => match subcategory {
                FileIOType::ParameterLoad => "File I/O - Parameter Load",
                FileIOType::ProfileLoad => "File I/O - Profile Load",
                FileIOType::ResultsSave => "File I/O - Results Save",
            },
        }
    }
}

/// Call durations collected for one category, with the operations seen under it.
struct StageTimings {
    durations: Histogram<u64>,
    operations: Vec<&'static str>,
}

lazy_static! {
    static ref TIMING_ENABLED: AtomicBool = AtomicBool::new(false);
    static ref STAGE_TIMINGS: RwLock<HashMap<OperationCategory, StageTimings>> = RwLock::new(HashMap::new());
}

/// Records the elapsed time of one pipeline operation when dropped.
pub struct TimingGuard {
    operation: &'static str,
    category: OperationCategory,
    start: Instant,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if is_timing_enabled() {
            let nanos = (self.start.elapsed().as_nanos() as u64).max(1);
            record(self.operation, self.category, nanos);
        }
    }
}

pub fn start_timing(operation: &'static str, category: OperationCategory) -> TimingGuard {
    TimingGuard {
        operation,
        category,
        start: Instant::now(),
    }
}

fn record(operation: &'static str, category: OperationCategory, nanos: u64) {
    let mut timings = STAGE_TIMINGS.write();
    if !timings.contains_key(&category) {
        match Histogram::<u64>::new_with_bounds(1, HISTOGRAM_MAX_NS, HISTOGRAM_SIGFIG) {
            Ok(durations) => {
                timings.insert(category, StageTimings { durations, operations: Vec::new() });
            }
            Err(e) => {
                debug!("Timing histogram unavailable for {}: {}", category.as_str(), e);
                return;
            }
        }
    }
    if let Some(stage) = timings.get_mut(&category) {
        let _ = stage.durations.record(nanos.min(HISTOGRAM_MAX_NS));
        if !stage.operations.contains(&operation) {
            stage.operations.push(operation);
        }
    }
}

pub fn init_logging(enable_timing: bool, debug: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
    TIMING_ENABLED.store(enable_timing, Ordering::SeqCst);

    let crate_level = if debug { "geophires=debug" } else { "geophires=info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(Level::INFO.into())
        .add_directive(crate_level.parse()?);
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    if enable_timing {
        // Span timings from tracing_timing sit beside the stage histograms
        let template = Histogram::<u64>::new_with_bounds(1, HISTOGRAM_MAX_NS, HISTOGRAM_SIGFIG)?;
        let timing_layer = Builder::default().layer(move || template.clone());
        tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(env_filter).with(fmt_layer).with(timing_layer),
        )?;
    } else {
        tracing::subscriber::set_global_default(tracing_subscriber::registry().with(env_filter).with(fmt_layer))?;
    }
    Ok(())
}

pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::SeqCst)
}

/// Total, mean and p95 wall time per pipeline stage, largest total first.
pub fn print_timing_report() {
    if !is_timing_enabled() {
        return;
    }

    let timings = STAGE_TIMINGS.read();
    let mut stages: Vec<_> = timings
        .iter()
        .map(|(category, stage)| (category, stage, stage.durations.mean() * stage.durations.len() as f64))
        .collect();
    stages.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    // Simulation wraps every stage
    let stage_total: f64 = stages
        .iter()
        .filter(|(category, _, _)| **category != OperationCategory::Simulation)
        .map(|(_, _, total)| total)
        .sum();

    println!("\nStage timings");
    println!("-------------");
    for (category, stage, total) in stages {
        let share = if *category == OperationCategory::Simulation || stage_total == 0.0 {
            String::from("   -  ")
        } else {
            format!("{:5.1}%", total / stage_total * 100.0)
        };
        println!(
            "{:<28} {} total={:.3}ms mean={:.3}ms p95={:.3}ms calls={} [{}]",
            category.as_str(),
            share,
            total / 1e6,
            stage.durations.mean() / 1e6,
            stage.durations.value_at_quantile(0.95) as f64 / 1e6,
            stage.durations.len(),
            stage.operations.join(", "),
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_name_the_stage() {
        let category = OperationCategory::Subsurface { subcategory: SubsurfaceType::Hydraulics };
        assert_eq!(category.as_str(), "Subsurface - Hydraulics");
        let category = OperationCategory::Economics { subcategory: EconomicsType::Levelized };
        assert_eq!(category.as_str(), "Economics - Levelized Cost");
    }

    #[test]
    fn recorded_calls_accumulate_per_category() {
        let category = OperationCategory::Economics { subcategory: EconomicsType::Annualization };
        record("annual_energy", category, 2_000);
        record("reservoir_heat_content", category, 4_000);
        record("annual_energy", category, 3_000);

        let timings = STAGE_TIMINGS.read();
        let stage = &timings[&category];
        assert!(stage.durations.len() >= 3);
        assert!(stage.operations.contains(&"annual_energy"));
        assert!(stage.operations.contains(&"reservoir_heat_content"));
        assert_eq!(stage.operations.iter().filter(|op| **op == "annual_energy").count(), 1);
    }
}
