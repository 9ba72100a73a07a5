use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::Local;
use tracing::info;

use crate::config::parameters::ModelParameters;
use crate::core::results::CalculatedResults;
use crate::utils::logging::{self, FileIOType, OperationCategory};

/// Writes a run's results as CSV into a timestamped subdirectory.
pub struct CsvExporter {
    output_dir: PathBuf,
    timestamp: String,
    verbose_logging: bool,
}

impl CsvExporter {
    pub fn new(output_dir: impl AsRef<Path>, verbose_logging: bool) -> std::io::Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(&timestamp);
        std::fs::create_dir_all(&full_path)?;

        Ok(Self {
            output_dir: full_path,
            timestamp,
            verbose_logging,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn export_simulation_results(
        &self,
        params: &ModelParameters,
        results: &CalculatedResults,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let _timing = logging::start_timing(
            "export_simulation_results",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave },
        );

        self.export_time_series(results)?;
        self.export_annual(results)?;
        self.export_summary(results)?;

        let params_file = File::create(self.output_dir.join("parameters.json"))?;
        serde_json::to_writer_pretty(params_file, params)?;

        if self.verbose_logging {
            info!("CSV export completed to: {}", self.output_dir.display());
        }
        Ok(())
    }

    /// One row per time step.
    pub fn export_time_series(&self, results: &CalculatedResults) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut writer = csv::Writer::from_path(self.output_dir.join("time_series.csv"))?;
        writer.write_record([
            "Time (years)",
            "Reservoir Temperature (C)",
            "Produced Temperature (C)",
            "Wellbore Temperature Drop (C)",
            "Pumping Power (MWe)",
            "Heat Extracted (MWth)",
            "Heat Produced (MWth)",
            "Electricity Produced (MWe)",
            "Net Electricity Produced (MWe)",
            "First Law Efficiency",
        ])?;

        let power = &results.power;
        for i in 0..results.time.len() {
            let row = [
                results.time[i],
                results.reservoir_temperature[i],
                results.wellbore.produced_temperature[i],
                results.wellbore.temperature_drop[i],
                results.hydraulics.pumping_power[i],
                power.heat_extracted[i],
                power.heat_produced[i],
                power.electricity_produced[i],
                power.net_electricity_produced[i],
                power.first_law_efficiency[i],
            ];
            writer.write_record(row.iter().map(|v| format!("{:.6}", v)))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// One row per plant-year.
    pub fn export_annual(&self, results: &CalculatedResults) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut writer = csv::Writer::from_path(self.output_dir.join("annual.csv"))?;
        writer.write_record([
            "Year",
            "Heat Extracted (kWh)",
            "Pumping (kWh)",
            "Electricity Produced (kWh)",
            "Net Electricity Produced (kWh)",
            "Heat Produced (kWh)",
            "Remaining Heat Content (1e15 J)",
        ])?;

        let annual = &results.annual;
        for (year, remaining) in results.heat_content.remaining.iter().enumerate() {
            writer.write_record(&[
                (year + 1).to_string(),
                format!("{:.2}", annual.heat_extracted[year]),
                format!("{:.2}", annual.pumping[year]),
                format!("{:.2}", annual.electricity_produced[year]),
                format!("{:.2}", annual.net_electricity_produced[year]),
                format!("{:.2}", annual.heat_produced[year]),
                format!("{:.6}", remaining),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Scalar results and warnings as `Metric,Value` pairs.
    pub fn export_summary(&self, results: &CalculatedResults) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut file = File::create(self.output_dir.join("summary.csv"))?;
        writeln!(file, "Metric,Value")?;

        let capital = &results.capital_costs;
        let operating = &results.operating_costs;
        let rows = [
            ("Well Depth (m)", results.geology.depth),
            ("Rock Temperature (C)", results.geology.rock_temperature),
            ("Average Gradient (C/m)", results.geology.average_gradient),
            ("Injection Temperature (C)", results.power.injection_temperature),
            ("Reservoir Volume (m3)", results.geometry.volume),
            ("Redrill Count", results.wellbore.redrill_count as f64),
            ("Well Cost (M$)", capital.wells),
            ("Stimulation Cost (M$)", capital.stimulation),
            ("Gathering Cost (M$)", capital.gathering),
            ("Surface Plant Cost (M$)", capital.surface_plant),
            ("Exploration Cost (M$)", capital.exploration),
            ("Piping Cost (M$)", capital.piping),
            ("Total Capital Cost (M$)", capital.total),
            ("Wellfield O&M (M$/year)", operating.wellfield),
            ("Plant O&M (M$/year)", operating.plant),
            ("Water O&M (M$/year)", operating.water),
            ("Redrilling O&M (M$/year)", operating.redrilling),
            ("Total O&M (M$/year)", operating.total),
            ("Initial Heat Content (1e15 J)", results.heat_content.initial),
            ("Price", results.economics.price),
            ("Average Annual Pumping Cost (M$/year)", results.economics.average_annual_pumping_cost),
        ];
        for (name, value) in rows {
            writeln!(file, "{},{:.6}", name, value)?;
        }
        for warning in &results.warnings {
            writeln!(file, "Warning,\"{}\"", warning.to_string().replace('"', "'"))?;
        }
        Ok(())
    }
}
