//! Body measurement units
//!
//! Profiles keep height and weight in the unit the user entered them in.
//! Conversions to SI happen only where a calculation needs them (BMI,
//! range validation).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit as entered on the health profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    const KG_PER_LB: f64 = 0.453592;

    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * Self::KG_PER_LB,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / Self::KG_PER_LB,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit as entered on the health profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Inches,
    Cm,
}

impl HeightUnit {
    const CM_PER_INCH: f64 = 2.54;

    /// Convert from this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value,
            HeightUnit::Inches => value * Self::CM_PER_INCH,
        }
    }

    /// Convert from centimeters to this unit
    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            HeightUnit::Cm => cm,
            HeightUnit::Inches => cm / Self::CM_PER_INCH,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Inches => "in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "in" | "inch" | "inches" => Ok(HeightUnit::Inches),
            _ => Err(format!("Unknown height unit: {}", s)),
        }
    }
}

/// Body mass index from a height and weight in any supported unit
///
/// Returns `None` when height is not positive.
pub fn bmi(height: f64, height_unit: HeightUnit, weight: f64, weight_unit: WeightUnit) -> Option<f64> {
    let height_m = height_unit.to_cm(height) / 100.0;
    if height_m <= 0.0 {
        return None;
    }
    let value = weight_unit.to_kg(weight) / (height_m * height_m);
    Some((value * 10.0).round() / 10.0)
}
