//! The fixed registry of model output variables.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::VariableError;

/// How a variable's value array is indexed by element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeClass {
    /// `[rows, cols, t]`, looked up through the numbering grid.
    Grid,
    /// `[n_land, (layers,) t]`, row `number - 1`.
    Land,
    /// `[n_river, (faces,) t]`, row `number - n_land - 1`.
    River,
}

/// How several values for one element and time step become one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    First,
    Max,
}

impl Reduction {
    pub fn apply(self, values: impl IntoIterator<Item = f64>) -> f64 {
        let mut values = values.into_iter();
        match self {
            Reduction::First => values.next().unwrap_or(f64::NAN),
            Reduction::Max => values.fold(f64::NAN, f64::max),
        }
    }
}

/// Static description of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableSpec {
    pub id: VariableId,
    /// Short identifier used on the command line and in output.
    pub name: &'static str,
    /// Variable group name in the store (after the ordinal prefix).
    pub storage_name: &'static str,
    /// Axis label with units.
    pub label: &'static str,
    pub shape_class: ShapeClass,
    /// Whether the value array carries a layer/face axis before time.
    pub layered: bool,
    pub reduction: Reduction,
    /// Values grow downwards (depths), so plots should invert the axis.
    pub inverted_axis: bool,
    /// Set for variables computed from another one.
    pub derived_from: Option<VariableId>,
}

impl VariableSpec {
    pub fn is_river(&self) -> bool {
        self.shape_class == ShapeClass::River
    }
}

/// Every variable hydroscope knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableId {
    NetRain,
    PhreaticDepth,
    SoilMoisture,
    OverlandFlow,
    SurfaceDepth,
    SnowDepth,
    WaterTableElevation,
}

impl VariableId {
    /// Registry order; derived variables follow their base.
    pub const ALL: [VariableId; 7] = [
        VariableId::NetRain,
        VariableId::PhreaticDepth,
        VariableId::SoilMoisture,
        VariableId::OverlandFlow,
        VariableId::SurfaceDepth,
        VariableId::SnowDepth,
        VariableId::WaterTableElevation,
    ];

    pub fn spec(self) -> VariableSpec {
        let base = VariableSpec {
            id: self,
            name: "",
            storage_name: "",
            label: "",
            shape_class: ShapeClass::Land,
            layered: false,
            reduction: Reduction::First,
            inverted_axis: false,
            derived_from: None,
        };
        match self {
            VariableId::NetRain => VariableSpec {
                name: "net_rain",
                storage_name: "net_rain",
                label: "Net Rainfall (mm/hr)",
                shape_class: ShapeClass::Grid,
                ..base
            },
            VariableId::PhreaticDepth => VariableSpec {
                name: "ph_depth",
                storage_name: "ph_depth",
                label: "Phreatic Depth (m)",
                inverted_axis: true,
                ..base
            },
            VariableId::SoilMoisture => VariableSpec {
                name: "theta",
                storage_name: "theta",
                label: "Soil Moisture Content (m3/m3)",
                layered: true,
                ..base
            },
            VariableId::OverlandFlow => VariableSpec {
                name: "ovr_flow",
                storage_name: "ovr_flow",
                label: "Overland Flow (m3/s)",
                shape_class: ShapeClass::River,
                layered: true,
                reduction: Reduction::Max,
                ..base
            },
            VariableId::SurfaceDepth => VariableSpec {
                name: "srf_dep",
                storage_name: "srf_dep",
                label: "Surface Water Depth (m)",
                shape_class: ShapeClass::River,
                ..base
            },
            VariableId::SnowDepth => VariableSpec {
                name: "snow_dep",
                storage_name: "snow_dep",
                label: "Snow Depth (m)",
                ..base
            },
            VariableId::WaterTableElevation => VariableSpec {
                name: "table_elev",
                storage_name: "ph_depth",
                label: "Water Table Elevation (m)",
                derived_from: Some(VariableId::PhreaticDepth),
                ..base
            },
        }
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

impl FromStr for VariableId {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VariableId::ALL
            .into_iter()
            .find(|id| id.spec().name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| VariableError::NotFound {
                what: format!("variable '{wanted}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = VariableId::ALL.iter().map(|id| id.spec().name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), VariableId::ALL.len());
    }

    #[test]
    fn parse_round_trips_through_display() {
        for id in VariableId::ALL {
            assert_eq!(id.to_string().parse::<VariableId>().unwrap(), id);
        }
        assert_eq!("PH_DEPTH".parse::<VariableId>().unwrap(), VariableId::PhreaticDepth);
        assert!("discharge".parse::<VariableId>().is_err());
    }

    #[test]
    fn domains() {
        assert!(VariableId::OverlandFlow.spec().is_river());
        assert!(VariableId::SurfaceDepth.spec().is_river());
        assert!(!VariableId::WaterTableElevation.spec().is_river());
        assert_eq!(VariableId::NetRain.spec().shape_class, ShapeClass::Grid);
        assert!(VariableId::PhreaticDepth.spec().inverted_axis);
        assert_eq!(
            VariableId::WaterTableElevation.spec().derived_from,
            Some(VariableId::PhreaticDepth)
        );
    }

    #[test]
    fn reductions() {
        assert_eq!(Reduction::First.apply([3.0, 5.0]), 3.0);
        assert_eq!(Reduction::Max.apply([3.0, f64::NAN, 5.0]), 5.0);
        assert!(Reduction::Max.apply([f64::NAN]).is_nan());
        assert!(Reduction::First.apply(std::iter::empty()).is_nan());
    }
}
