use std::fmt;
use serde::{Deserialize, Serialize};

/// Raised when a numeric option code has no matching variant.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidOptionCode {
    pub option: &'static str,
    pub code: u8,
}

impl fmt::Display for InvalidOptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} code: {}", self.option, self.code)
    }
}

impl std::error::Error for InvalidOptionCode {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CogenArrangement {
    Topping,
    Bottoming,
    Parallel,
}

/// Which commodity the levelized price is quoted for; the other one earns income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryProduct {
    Electricity,
    Heat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EndUseOption {
    Electricity,
    DirectUseHeat,
    Cogeneration {
        arrangement: CogenArrangement,
        primary: PrimaryProduct,
    },
}

impl EndUseOption {
    pub fn produces_electricity(&self) -> bool {
        !matches!(self, EndUseOption::DirectUseHeat)
    }

    pub fn produces_heat(&self) -> bool {
        !matches!(self, EndUseOption::Electricity)
    }

    pub fn arrangement(&self) -> Option<CogenArrangement> {
        match self {
            EndUseOption::Cogeneration { arrangement, .. } => Some(*arrangement),
            _ => None,
        }
    }

    pub fn primary_product(&self) -> PrimaryProduct {
        match self {
            EndUseOption::Electricity => PrimaryProduct::Electricity,
            EndUseOption::DirectUseHeat => PrimaryProduct::Heat,
            EndUseOption::Cogeneration { primary, .. } => *primary,
        }
    }
}

impl Default for EndUseOption {
    fn default() -> Self {
        EndUseOption::Electricity
    }
}

impl TryFrom<u8> for EndUseOption {
    type Error = InvalidOptionCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        let arrangement = match code / 10 {
            3 => CogenArrangement::Topping,
            4 => CogenArrangement::Bottoming,
            5 => CogenArrangement::Parallel,
            _ => {
                return match code {
                    1 => Ok(EndUseOption::Electricity),
                    2 => Ok(EndUseOption::DirectUseHeat),
                    _ => Err(InvalidOptionCode { option: "end-use", code }),
                }
            }
        };
        let primary = match code % 10 {
            1 => PrimaryProduct::Electricity,
            2 => PrimaryProduct::Heat,
            _ => return Err(InvalidOptionCode { option: "end-use", code }),
        };
        Ok(EndUseOption::Cogeneration { arrangement, primary })
    }
}

impl From<EndUseOption> for u8 {
    fn from(option: EndUseOption) -> u8 {
        match option {
            EndUseOption::Electricity => 1,
            EndUseOption::DirectUseHeat => 2,
            EndUseOption::Cogeneration { arrangement, primary } => {
                let tens = match arrangement {
                    CogenArrangement::Topping => 30,
                    CogenArrangement::Bottoming => 40,
                    CogenArrangement::Parallel => 50,
                };
                tens + match primary {
                    PrimaryProduct::Electricity => 1,
                    PrimaryProduct::Heat => 2,
                }
            }
        }
    }
}

/// Declares a fieldless option enum that (de)serializes as its numeric code.
macro_rules! coded_option {
    ($(#[$meta:meta])* $name:ident, $label:expr, default = $default:ident, { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl TryFrom<u8> for $name {
            type Error = InvalidOptionCode;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(InvalidOptionCode { option: $label, code }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                match value {
                    $($name::$variant => $code),+
                }
            }
        }
    };
}

coded_option!(
    PowerPlantType, "power plant type", default = SubcriticalOrc, {
        SubcriticalOrc = 1,
        SupercriticalOrc = 2,
        SingleFlash = 3,
        DoubleFlash = 4,
    }
);

impl PowerPlantType {
    pub fn is_flash(&self) -> bool {
        matches!(self, PowerPlantType::SingleFlash | PowerPlantType::DoubleFlash)
    }
}

coded_option!(
    /// Reservoir thermal-decline model.
    ReservoirModel, "reservoir model", default = LinearDrawdown, {
        MultipleParallelFractures = 1,
        LinearHeatSweep = 2,
        SingleFracture = 3,
        LinearDrawdown = 4,
        UserProfile = 5,
        ExternalSimulator = 6,
    }
);

impl ReservoirModel {
    /// Analytical models whose output may be retiled on thermal breakthrough.
    pub fn supports_redrilling(&self) -> bool {
        matches!(
            self,
            ReservoirModel::MultipleParallelFractures
                | ReservoirModel::LinearHeatSweep
                | ReservoirModel::SingleFracture
                | ReservoirModel::LinearDrawdown
        )
    }
}

coded_option!(
    /// Drilling method for the well cost correlation.
    WellDrillingCorrelation, "well drilling cost correlation", default = VerticalSmall, {
        VerticalSmall = 1,
        DeviatedSmall = 2,
        VerticalLarge = 3,
        DeviatedLarge = 4,
    }
);

coded_option!(
    EconomicModel, "economic model", default = StandardLevelized, {
        FixedChargeRate = 1,
        StandardLevelized = 2,
        Bicycle = 3,
    }
);

coded_option!(
    /// Which two of fracture count, separation and volume are given.
    ReservoirVolumeOption, "reservoir volume option", default = VolumeAndFractureCount, {
        FractureCountAndSeparation = 1,
        VolumeAndSeparation = 2,
        VolumeAndFractureCount = 3,
        VolumeOnly = 4,
    }
);

coded_option!(
    FractureShape, "fracture shape", default = CircularByArea, {
        CircularByArea = 1,
        CircularByDiameter = 2,
        Square = 3,
        Rectangular = 4,
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaplaceInversionMethod {
    Talbot,
    Stehfest,
}

impl Default for LaplaceInversionMethod {
    fn default() -> Self {
        LaplaceInversionMethod::Talbot
    }
}
