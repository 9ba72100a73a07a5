// Time Constants
pub const SECONDS_PER_YEAR: f64 = 3.1536e7;        // 365 * 24 * 3600
pub const HOURS_PER_YEAR: f64 = 8760.0;

// Physical Constants
pub const GRAVITY: f64 = 9.81;                     // m/s2
pub const CELSIUS_TO_KELVIN: f64 = 273.15;
pub const INCH_TO_METER: f64 = 0.0254;
pub const WATER_MOLAR_MASS: f64 = 18.02;           // g/mol

// Geology
pub const MIN_GRADIENT: f64 = 1e-6;                // C/m, replaces zero gradients
pub const MAX_GRADIENT_SEGMENTS: usize = 4;

// Laplace Inversion
pub const STEHFEST_TERMS: usize = 16;
pub const TALBOT_NODES: usize = 128;
pub const TALBOT_C1: f64 = 0.5017;
pub const TALBOT_C2: f64 = 0.6407;
pub const TALBOT_C3: f64 = 0.6122;
pub const TALBOT_C4: f64 = 0.2645;                 // imaginary coefficient

// Reservoir Model 2
pub const HEAT_TRANSFER_COEFFICIENT: f64 = 500.0;  // W/m2/K
pub const ROCK_SHAPE_FACTOR: f64 = 0.2;
pub const EFFECTIVE_RADIUS_FACTOR: f64 = 0.83;

// Ramey Wellbore Model
pub const RAMEY_RADIUS_FACTOR: f64 = 1.1;
pub const RAMEY_OFFSET: f64 = 0.29;

// Hydraulics
pub const LAMINAR_REYNOLDS_LIMIT: f64 = 2300.0;
pub const PIPE_ROUGHNESS: f64 = 1e-4;              // m
pub const COLEBROOK_ITERATIONS: usize = 6;
pub const IMPEDANCE_UNIT_FACTOR: f64 = 1e6 / 1e3;  // GPa.s/m3 -> MPa.s/m3
pub const INDEX_UNIT_FACTOR: f64 = 100.0;          // kg/s/bar -> kg/s/kPa
pub const VAPOR_PRESSURE_MARGIN: f64 = 344.7;      // kPa, 50 psi
pub const PLANT_OUTLET_DROP: f64 = 68.95;          // kPa, 10 psi
pub const FLASH_PLANT_OUTLET_PRESSURE: f64 = 100.0; // kPa
pub const HYDROSTATIC_COMPRESSIBILITY: f64 = 4.64e-7;
pub const HYDROSTATIC_EXPANSION_NUMERATOR: f64 = 9e-4;
pub const HYDROSTATIC_EXPANSION_SCALE: f64 = 30.796;
pub const HYDROSTATIC_EXPANSION_EXPONENT: f64 = -0.552;
pub const MAX_PLAUSIBLE_PUMP_DEPTH: f64 = 600.0;   // m

// Availability Polynomial
pub const AVAILABILITY_A: f64 = 4.041650;
pub const AVAILABILITY_B: f64 = -1.204e-2;
pub const AVAILABILITY_C: f64 = 1.60500e-5;
pub const BTU_PER_LB_TO_MJ_PER_KG: f64 = 2.2046 / 947.83;

// Cost Correlations
pub const INDIRECT_COST_FACTOR: f64 = 1.05;
pub const CONTINGENCY_FACTOR: f64 = 1.15;
pub const INDIRECT_PLANT_FACTOR: f64 = 1.12;
pub const STIMULATION_COST_PER_WELL: f64 = 1.25;   // M$
pub const HP_PER_MW: f64 = 1341.0;
pub const MAX_PUMP_HP: f64 = 2000.0;
pub const GATHERING_PIPE_COST_PER_WELL: f64 = 750.0 * 500.0; // $
pub const PIPING_COST_PER_KM: f64 = 0.75;          // M$/km
pub const DIRECT_USE_PLANT_COST: f64 = 250e-6;     // M$/kWth
pub const PLANT_EQUIPMENT_FACTOR: f64 = 1.02;
pub const SUPERCRITICAL_COST_FACTOR: f64 = 1.1;
pub const SINGLE_FLASH_COST_FACTOR: f64 = 0.8;
pub const EXPLORATION_WELL_FRACTION: f64 = 0.6;
pub const WATER_COST_PER_TONNE: f64 = 925.0;       // $/1000 tonne
pub const MIN_LABOR_COST: f64 = 0.236;             // M$/year
pub const LABOR_OVERHEAD: f64 = 1.1;
pub const WELL_DEPTH_LOWER_LIMIT: f64 = 500.0;     // m
pub const WELL_DEPTH_UPPER_LIMIT: f64 = 7000.0;    // m

// Economics
pub const DOLLARS_TO_CENTS_PER_KWH: f64 = 1e8;     // M$/kWh -> cents/kWh
pub const CENTS_PER_KWH_TO_DOLLARS_PER_MMBTU: f64 = 2.931;
pub const PETAJOULE: f64 = 1e15;
