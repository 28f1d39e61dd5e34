//! Defines the gridded kriging models served by the FMI timeseries endpoint and
//! the fields each of them is fetched with.

use std::fmt;

/// A numeric field requested from a grid timeseries query.
///
/// `source` is the parameter name used in the query and as the JSON key in the
/// response; `column` is the name the values get in the resulting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridField {
    pub source: &'static str,
    pub column: &'static str,
}

impl GridField {
    /// A field whose output column keeps the FMI parameter name.
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            column: source,
        }
    }

    /// A field renamed on output.
    pub const fn renamed(source: &'static str, column: &'static str) -> Self {
        Self { source, column }
    }
}

const SNOW_FIELDS: &[GridField] = &[GridField::renamed(
    "WaterEquivalentOfSnow",
    "snow_water_equivalent",
)];

const DAILY_FIELDS: &[GridField] = &[
    GridField::new("Precipitation24h"),
    GridField::new("MaximumTemperature24h"),
    GridField::new("MinimumTemperature24h"),
    GridField::new("MaximumWind"),
    GridField::new("DailyMeanTemperature"),
    GridField::new("MinimumGroundTemperature06"),
    GridField::new("DailyGlobalRadiation"),
    GridField::new("VolumetricSoilWaterLayer1"),
];

const GROWING_SEASON_FIELDS: &[GridField] = &[GridField::new("EffectiveTemperatureSum")];

/// The kriging interpolation models producing FMI's gridded Finnish datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KrigingModel {
    /// Snow water equivalent. FMI keeps this data for roughly ten days only.
    Snow,
    /// Daily precipitation, temperature extremes, wind, radiation and soil moisture.
    Daily,
    /// Growing-season effective temperature sum.
    GrowingSeason,
}

impl KrigingModel {
    pub(crate) fn model_id(&self) -> &'static str {
        match self {
            KrigingModel::Snow => "kriging_suomi_snow",
            KrigingModel::Daily => "kriging_suomi_daily",
            KrigingModel::GrowingSeason => "kriging_suomi_kasvukausi",
        }
    }

    /// The fields fetched for this model, in output column order.
    pub fn fields(&self) -> &'static [GridField] {
        match self {
            KrigingModel::Snow => SNOW_FIELDS,
            KrigingModel::Daily => DAILY_FIELDS,
            KrigingModel::GrowingSeason => GROWING_SEASON_FIELDS,
        }
    }
}

/// Formats a `KrigingModel` as its FMI model id.
///
/// # Examples
///
/// ```
/// use fmi_timeseries::KrigingModel;
///
/// assert_eq!(KrigingModel::Snow.to_string(), "kriging_suomi_snow");
/// assert_eq!(format!("{}", KrigingModel::GrowingSeason), "kriging_suomi_kasvukausi");
/// ```
impl fmt::Display for KrigingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.model_id())
    }
}
