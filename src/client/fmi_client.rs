//! The main entry point: one operation per FMI product, each issuing a single
//! request and returning a lazily filterable table.

use crate::client::fetch::{Fetch, HttpFetcher};
use crate::client::query::QueryBuilder;
use crate::config::FmiConfig;
use crate::error::FmiError;
use crate::frames::daily_frame::DailyFrame;
use crate::frames::grid_frame::GridFrame;
use crate::parsing::forecast::ForecastParser;
use crate::parsing::grid::GridTimeseriesParser;
use crate::parsing::point::PointTimeseriesParser;
use crate::parsing::policy::FailurePolicy;
use crate::parsing::xml::namespaces::NamespaceMap;
use crate::parsing::xml::observations::ObservationParser;
use crate::parsing::xml::tree::XmlDocument;
use crate::resample::{daily_table, resample_daily};
use crate::types::geo::{BoundingBox, LatLon};
use crate::types::kriging_model::{GridField, KrigingModel};
use crate::types::records::PointObservation;
use bon::bon;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::BTreeSet;

pub const COL_TEMPERATURE_SUM: &str = "tempSum";
pub const COL_AVERAGE_TEMPERATURE: &str = "avgTemp";

const TEMPERATURE_PARAMETER: &str = "Temperature";

/// Client for the FMI timeseries and WFS services.
///
/// Create one with [`FmiClient::new`] (API key only), [`FmiClient::from_env`],
/// or [`FmiClient::with_config`] for full control. [`FmiClient::with_fetcher`]
/// swaps the HTTP transport for any [`Fetch`] implementation.
///
/// # Examples
///
/// ```no_run
/// # use fmi_timeseries::{BoundingBox, FmiClient, FmiError};
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FmiClient::from_env()?;
/// let snow = client
///     .snow_depth()
///     .bbox(BoundingBox::new(24.5, 60.1, 25.3, 60.4))
///     .start(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
///     .call()
///     .await?;
/// println!("{}", snow.frame.collect()?);
/// # Ok(())
/// # }
/// ```
pub struct FmiClient<F: Fetch = HttpFetcher> {
    fetcher: F,
    api_key: String,
    base_url: String,
    policy: FailurePolicy,
    namespaces: NamespaceMap,
}

impl FmiClient<HttpFetcher> {
    /// A client with default settings talking to `data.fmi.fi`.
    pub fn new(api_key: impl Into<String>) -> Result<Self, FmiError> {
        Self::with_config(FmiConfig::builder().api_key(api_key).build())
    }

    /// Configured from `FMI_API_KEY` and `FMI_BASE_URL`.
    pub fn from_env() -> Result<Self, FmiError> {
        Self::with_config(FmiConfig::from_env()?)
    }

    pub fn with_config(config: FmiConfig) -> Result<Self, FmiError> {
        let fetcher = HttpFetcher::new(config.timeout)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

#[bon]
impl<F: Fetch> FmiClient<F> {
    /// Uses `fetcher` for every request. `config.timeout` is left to the fetcher.
    pub fn with_fetcher(config: FmiConfig, fetcher: F) -> Self {
        Self {
            fetcher,
            api_key: config.api_key,
            base_url: config.base_url,
            policy: config.failure_policy,
            namespaces: config.namespaces,
        }
    }

    fn queries(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.base_url, &self.api_key)
    }

    async fn fetch_grid(
        &self,
        model: KrigingModel,
        fields: &[GridField],
        bbox: BoundingBox,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GridFrame, FmiError> {
        let query = self.queries().grid(model, fields, bbox, start, end)?;
        let payload = self.fetcher.get_json(&query).await?;
        let parsed = GridTimeseriesParser::new(fields)
            .with_policy(self.policy)
            .parse(&payload)?;
        debug!(
            "{} grid: {} rows, {} entries skipped",
            model,
            parsed.data.height(),
            parsed.diagnostics.len()
        );
        Ok(GridFrame::new(parsed.data))
    }

    /// Fetches any kriging grid.
    ///
    /// # Arguments
    ///
    /// * `.model(KrigingModel)`: **Required.** The kriging model to query.
    /// * `.fields(Vec<GridField>)`: Optional. Parameters to request and their output
    ///   column names. Defaults to [`KrigingModel::fields`].
    /// * `.bbox(BoundingBox)`: **Required.** Area to cover.
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: **Required.** Midnight UTC of each day.
    #[builder]
    pub async fn grid(
        &self,
        model: KrigingModel,
        fields: Option<Vec<GridField>>,
        bbox: BoundingBox,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GridFrame, FmiError> {
        match fields {
            Some(fields) => self.fetch_grid(model, &fields, bbox, start, end).await,
            None => self.fetch_grid(model, model.fields(), bbox, start, end).await,
        }
    }

    /// Snow water equivalent grid (`snow_water_equivalent`, mm).
    #[builder]
    pub async fn snow_depth(
        &self,
        bbox: BoundingBox,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GridFrame, FmiError> {
        let model = KrigingModel::Snow;
        self.fetch_grid(model, model.fields(), bbox, start, end).await
    }

    /// Daily weather grid: precipitation, temperature extremes and mean, wind,
    /// ground temperature, radiation and soil water.
    #[builder]
    pub async fn daily_weather(
        &self,
        bbox: BoundingBox,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GridFrame, FmiError> {
        let model = KrigingModel::Daily;
        self.fetch_grid(model, model.fields(), bbox, start, end).await
    }

    /// Effective temperature sum grid for the growing season.
    #[builder]
    pub async fn temperature_sum(
        &self,
        bbox: BoundingBox,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GridFrame, FmiError> {
        let model = KrigingModel::GrowingSeason;
        self.fetch_grid(model, model.fields(), bbox, start, end).await
    }

    /// Effective temperature sum at a single location, one row per day (`date`, `tempSum`).
    #[builder]
    pub async fn temperature_sum_point(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyFrame, FmiError> {
        let query = self.queries().temperature_sum_point(location, start, end)?;
        let payload = self.fetcher.get_json(&query).await?;
        let source = KrigingModel::GrowingSeason.fields()[0].source;
        let parsed = PointTimeseriesParser::new(source, COL_TEMPERATURE_SUM)
            .with_policy(self.policy)
            .parse(&payload)?;
        debug!(
            "Temperature sum at {}: {} rows, {} entries skipped",
            location,
            parsed.data.height(),
            parsed.diagnostics.len()
        );
        Ok(DailyFrame::new(parsed.data))
    }

    /// Parameter names the HARMONIE point forecast offers at a location.
    #[builder]
    pub async fn available_parameters(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeSet<String>, FmiError> {
        let query = self.queries().harmonie_forecast(location, start, end, None)?;
        let body = self.fetcher.get_bytes(&query).await?;
        let document = XmlDocument::parse(&body)?;
        let parameters = ObservationParser::new(self.namespaces.clone()).observed_properties(&document)?;

        info!("Available observed parameters at {}:", location);
        for parameter in &parameters {
            info!(" - {}", parameter);
        }
        Ok(parameters)
    }

    /// HARMONIE temperature forecast resampled to daily means (`date`, `avgTemp`).
    #[builder]
    pub async fn temperature_forecast(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyFrame, FmiError> {
        let query = self
            .queries()
            .harmonie_forecast(location, start, end, Some(TEMPERATURE_PARAMETER))?;
        let body = self.fetcher.get_bytes(&query).await?;
        let document = XmlDocument::parse(&body)?;
        let parsed = ObservationParser::new(self.namespaces.clone())
            .with_policy(self.policy)
            .points(&document)?;
        debug!(
            "HARMONIE forecast at {}: {} points, {} skipped",
            location,
            parsed.data.len(),
            parsed.diagnostics.len()
        );
        if parsed.data.is_empty() {
            warn!("No forecast data returned for {}", location);
        }
        daily_frame(&parsed.data)
    }

    /// Road weather model (`virenwc`) temperature forecast resampled to daily means
    /// (`date`, `avgTemp`).
    #[builder]
    pub async fn road_weather_forecast(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailyFrame, FmiError> {
        let query = self.queries().road_weather_forecast(location, start, end)?;
        let payload = self.fetcher.get_json(&query).await?;
        let parsed = ForecastParser::new(TEMPERATURE_PARAMETER)
            .with_policy(self.policy)
            .parse(&payload)?;
        debug!(
            "Road weather forecast at {}: {} points, {} skipped",
            location,
            parsed.data.len(),
            parsed.diagnostics.len()
        );
        daily_frame(&parsed.data)
    }
}

fn daily_frame(observations: &[PointObservation]) -> Result<DailyFrame, FmiError> {
    let df = daily_table(&resample_daily(observations), COL_AVERAGE_TEMPERATURE)?;
    Ok(DailyFrame::new(df))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::TransportError;
    use crate::client::query::{FmiQuery, Service};
    use crate::parsing::error::ParseError;
    use serde_json::Value;
    use std::sync::Mutex;

    const SNOW: &str = include_str!("../../testdata/grid_snow.json");
    const TEMPSUM: &str = include_str!("../../testdata/tempsum_point.json");
    const VIRENWC: &str = include_str!("../../testdata/virenwc_forecast.json");
    const HARMONIE: &str = include_str!("../../testdata/harmonie_temperature.xml");

    /// Serves one canned body per service and records every query it sees.
    struct StaticFetcher {
        json: &'static str,
        xml: &'static str,
        seen: Mutex<Vec<FmiQuery>>,
    }

    impl StaticFetcher {
        fn new(json: &'static str, xml: &'static str) -> Self {
            Self {
                json,
                xml,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, query: &FmiQuery) {
            self.seen.lock().unwrap().push(query.clone());
        }
    }

    impl Fetch for StaticFetcher {
        async fn get_json(&self, query: &FmiQuery) -> Result<Value, TransportError> {
            self.record(query);
            assert_eq!(query.service(), Service::Timeseries);
            Ok(serde_json::from_str(self.json).unwrap())
        }

        async fn get_bytes(&self, query: &FmiQuery) -> Result<Vec<u8>, TransportError> {
            self.record(query);
            assert_eq!(query.service(), Service::Wfs);
            Ok(self.xml.as_bytes().to_vec())
        }
    }

    struct FailingFetcher;

    impl Fetch for FailingFetcher {
        async fn get_json(&self, query: &FmiQuery) -> Result<Value, TransportError> {
            Err(TransportError::InvalidUrl {
                url: query.label(),
                reason: "unreachable".to_string(),
            })
        }

        async fn get_bytes(&self, query: &FmiQuery) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::InvalidUrl {
                url: query.label(),
                reason: "unreachable".to_string(),
            })
        }
    }

    fn client(json: &'static str, xml: &'static str) -> FmiClient<StaticFetcher> {
        FmiClient::with_fetcher(
            FmiConfig::builder().api_key("test-key").build(),
            StaticFetcher::new(json, xml),
        )
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn helsinki() -> LatLon {
        LatLon(60.17, 24.94)
    }

    #[tokio::test]
    async fn test_snow_depth() -> Result<(), Box<dyn std::error::Error>> {
        let client = client(SNOW, "");
        let frame = client
            .snow_depth()
            .bbox(BoundingBox::new(24.0, 60.0, 26.0, 63.0))
            .start(day(3, 1))
            .end(day(3, 2))
            .call()
            .await?;
        let df = frame.frame.collect()?;
        assert_eq!(df.height(), 6);
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["timestamp", "latitude", "longitude", "snow_water_equivalent"]
        );

        let seen = client.fetcher.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].param("model").as_deref(), Some("kriging_suomi_snow"));
        Ok(())
    }

    #[tokio::test]
    async fn test_grid_with_custom_fields() -> Result<(), Box<dyn std::error::Error>> {
        let client = client(SNOW, "");
        let frame = client
            .grid()
            .model(KrigingModel::Snow)
            .fields(vec![GridField::renamed("WaterEquivalentOfSnow", "swe")])
            .bbox(BoundingBox::new(24.0, 60.0, 26.0, 63.0))
            .start(day(3, 1))
            .end(day(3, 2))
            .call()
            .await?;
        let df = frame.frame.collect()?;
        assert_eq!(df.column("swe")?.f64()?.get(0), Some(12.5));
        Ok(())
    }

    #[tokio::test]
    async fn test_daily_weather_with_unexpected_payload() -> Result<(), Box<dyn std::error::Error>> {
        // A snow payload lacks every daily field; each entry is skipped
        let client = client(SNOW, "");
        let frame = client
            .daily_weather()
            .bbox(BoundingBox::new(24.0, 60.0, 26.0, 63.0))
            .start(day(3, 1))
            .end(day(3, 2))
            .call()
            .await?;
        assert!(frame.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_strict_policy_surfaces_parse_errors() {
        let client = FmiClient::with_fetcher(
            FmiConfig::builder()
                .api_key("test-key")
                .failure_policy(FailurePolicy::Strict)
                .build(),
            StaticFetcher::new(SNOW, ""),
        );
        let result = client
            .temperature_sum()
            .bbox(BoundingBox::new(24.0, 60.0, 26.0, 63.0))
            .start(day(3, 1))
            .end(day(3, 2))
            .call()
            .await;
        assert!(matches!(
            result,
            Err(FmiError::Parse(ParseError::MissingField(_)))
        ));
    }

    #[tokio::test]
    async fn test_temperature_sum_point() -> Result<(), Box<dyn std::error::Error>> {
        let client = client(TEMPSUM, "");
        let frame = client
            .temperature_sum_point()
            .location(helsinki())
            .start(day(6, 1))
            .end(day(6, 3))
            .call()
            .await?;
        let df = frame.get_at(day(6, 2)).frame.collect()?;
        assert_eq!(df.column("tempSum")?.f64()?.get(0), Some(321.9));
        Ok(())
    }

    #[tokio::test]
    async fn test_temperature_forecast() -> Result<(), Box<dyn std::error::Error>> {
        let client = client("[]", HARMONIE);
        let frame = client
            .temperature_forecast()
            .location(helsinki())
            .start(day(6, 1))
            .end(day(6, 2))
            .call()
            .await?;
        let df = frame.frame.collect()?;
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["date", "avgTemp"]);
        let temps = df.column("avgTemp")?.f64()?;
        assert_eq!(temps.get(0), Some(15.0));
        assert_eq!(temps.get(1), Some(5.5));

        let seen = client.fetcher.seen.lock().unwrap();
        assert_eq!(seen[0].param("parameters").as_deref(), Some("Temperature"));
        Ok(())
    }

    #[tokio::test]
    async fn test_available_parameters() -> Result<(), Box<dyn std::error::Error>> {
        let client = client("[]", HARMONIE);
        let parameters = client
            .available_parameters()
            .location(helsinki())
            .start(day(6, 1))
            .end(day(6, 2))
            .call()
            .await?;
        assert_eq!(
            parameters.into_iter().collect::<Vec<_>>(),
            vec!["Temperature".to_string(), "WindSpeedMS".to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_road_weather_forecast() -> Result<(), Box<dyn std::error::Error>> {
        let client = client(VIRENWC, "");
        let frame = client
            .road_weather_forecast()
            .location(helsinki())
            .start(day(6, 18))
            .end(day(6, 19))
            .call()
            .await?;
        let df = frame.frame.collect()?;
        assert_eq!(df.height(), 2);
        let temps = df.column("avgTemp")?.f64()?;
        assert_eq!(temps.get(0), Some(13.0));
        assert_eq!(temps.get(1), Some(11.4));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_forecast_gives_empty_frame() -> Result<(), Box<dyn std::error::Error>> {
        let client = client(r#"{"data": []}"#, "");
        let frame = client
            .road_weather_forecast()
            .location(helsinki())
            .start(day(6, 18))
            .end(day(6, 19))
            .call()
            .await?;
        assert!(frame.is_empty());
        assert_eq!(frame.frame.collect()?.width(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let client = FmiClient::with_fetcher(
            FmiConfig::builder().api_key("test-key").build(),
            FailingFetcher,
        );
        let result = client
            .road_weather_forecast()
            .location(helsinki())
            .start(day(6, 18))
            .end(day(6, 19))
            .call()
            .await;
        assert!(matches!(
            result,
            Err(FmiError::Transport(TransportError::InvalidUrl { .. }))
        ));
    }
}
