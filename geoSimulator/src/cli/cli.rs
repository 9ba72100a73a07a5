use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Geothermal techno-economic simulator", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "JSON parameter file; omitted fields keep their defaults")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Reservoir output profile for reservoir model 5")]
    profile: Option<PathBuf>,

    #[arg(short, long, default_value = "results")]
    output_dir: String,

    #[arg(long, default_value_t = false)]
    enable_csv_export: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = false)]
    debug_logging: bool,

    #[arg(long, help = "Print the default parameter file and exit", default_value_t = false)]
    print_default_config: bool,
}

impl Args {
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn profile(&self) -> Option<&Path> {
        self.profile.as_deref()
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn enable_csv_export(&self) -> bool {
        self.enable_csv_export
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    pub fn print_default_config(&self) -> bool {
        self.print_default_config
    }
}
