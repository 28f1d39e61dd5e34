//! Request URLs for the FMI `timeseries` and `wfs` services.
//!
//! Every URL has the form `{base_url}/{api_key}/{service}?...`. The API key only
//! ever lives in the URL; [`FmiQuery::label`] is what goes into logs and errors.

use crate::client::error::TransportError;
use crate::parsing::TIME_FIELD;
use crate::types::geo::{BoundingBox, LatLon};
use crate::types::kriging_model::{GridField, KrigingModel};
use chrono::NaiveDate;
use reqwest::Url;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://data.fmi.fi/fmi-apikey";

const HARMONIE_STORED_QUERY: &str = "fmi::forecast::harmonie::surface::point::timevaluepair";
const ROAD_WEATHER_PRODUCER: &str = "virenwc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// JSON timeseries (kriging grids, point queries, producer forecasts).
    Timeseries,
    /// WFS stored queries answering with XML.
    Wfs,
}

impl Service {
    fn path_segment(&self) -> &'static str {
        match self {
            Service::Timeseries => "timeseries",
            Service::Wfs => "wfs",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A fully built request.
#[derive(Debug, Clone, PartialEq)]
pub struct FmiQuery {
    service: Service,
    url: Url,
}

impl FmiQuery {
    pub fn service(&self) -> Service {
        self.service
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Value of a query parameter, decoded.
    pub fn param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// `service?query`, safe to log.
    pub fn label(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.service, query),
            None => self.service.to_string(),
        }
    }
}

pub(crate) struct QueryBuilder<'a> {
    base_url: &'a str,
    api_key: &'a str,
}

fn day_start(date: NaiveDate) -> String {
    format!("{date}T00:00:00")
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(base_url: &'a str, api_key: &'a str) -> Self {
        Self { base_url, api_key }
    }

    fn endpoint(&self, service: Service, pairs: &[(&str, String)]) -> Result<FmiQuery, TransportError> {
        let raw = format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            service.path_segment()
        );
        let mut url = Url::parse(&raw).map_err(|e| TransportError::InvalidUrl {
            // The key is part of the path
            url: format!("{}/.../{}", self.base_url, service),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(FmiQuery { service, url })
    }

    /// Kriging grid over a bounding box. Both bounds are midnight UTC of the given day.
    pub(crate) fn grid(
        &self,
        model: KrigingModel,
        fields: &[GridField],
        bbox: BoundingBox,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FmiQuery, TransportError> {
        let mut params = vec![TIME_FIELD];
        params.extend(fields.iter().map(|f| f.source));
        params.push("latlon");

        self.endpoint(
            Service::Timeseries,
            &[
                ("bbox", bbox.to_string()),
                ("param", params.join(",")),
                ("model", model.to_string()),
                ("format", "json".to_string()),
                ("timeformat", "sql".to_string()),
                ("starttime", day_start(start)),
                ("endtime", day_start(end)),
                ("timestep", "data".to_string()),
                ("precision", "double".to_string()),
            ],
        )
    }

    /// Growing-season temperature sum at one location.
    pub(crate) fn temperature_sum_point(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FmiQuery, TransportError> {
        let params = KrigingModel::GrowingSeason
            .fields()
            .iter()
            .fold(TIME_FIELD.to_string(), |acc, f| format!("{acc},{}", f.source));
        self.endpoint(
            Service::Timeseries,
            &[
                ("latlon", location.to_string()),
                ("param", params),
                ("model", KrigingModel::GrowingSeason.to_string()),
                ("format", "json".to_string()),
                ("timeformat", "sql".to_string()),
                ("starttime", day_start(start)),
                ("endtime", day_start(end)),
                ("timestep", "data".to_string()),
                ("precision", "double".to_string()),
            ],
        )
    }

    /// HARMONIE point forecast covering whole days. Without `parameters` FMI answers
    /// with its default parameter set at hourly steps.
    pub(crate) fn harmonie_forecast(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
        parameters: Option<&str>,
    ) -> Result<FmiQuery, TransportError> {
        let mut pairs = vec![
            ("request", "getFeature".to_string()),
            ("storedquery_id", HARMONIE_STORED_QUERY.to_string()),
            ("latlon", location.to_string()),
            ("starttime", format!("{start}T00:00:00Z")),
            ("endtime", format!("{end}T23:59:59Z")),
        ];
        match parameters {
            Some(parameters) => pairs.push(("parameters", parameters.to_string())),
            None => pairs.push(("timestep", "60".to_string())),
        }
        self.endpoint(Service::Wfs, &pairs)
    }

    /// Road weather model temperature forecast.
    pub(crate) fn road_weather_forecast(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FmiQuery, TransportError> {
        self.endpoint(
            Service::Timeseries,
            &[
                ("producer", ROAD_WEATHER_PRODUCER.to_string()),
                ("latlon", location.to_string()),
                ("starttime", format!("{start}T00:00:00Z")),
                ("endtime", format!("{end}T23:59:59Z")),
                ("param", format!("{TIME_FIELD},Temperature")),
                ("format", "json".to_string()),
                ("tz", "utc".to_string()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder<'static> {
        QueryBuilder::new(DEFAULT_BASE_URL, "secret-key")
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_grid_query() -> Result<(), TransportError> {
        let query = builder().grid(
            KrigingModel::Snow,
            KrigingModel::Snow.fields(),
            BoundingBox::new(24.0, 60.0, 25.0, 61.0),
            day(3, 1),
            day(3, 2),
        )?;
        assert_eq!(query.service(), Service::Timeseries);
        assert_eq!(
            query.url().path(),
            "/fmi-apikey/secret-key/timeseries"
        );
        assert_eq!(query.param("bbox").as_deref(), Some("24,60,25,61"));
        assert_eq!(
            query.param("param").as_deref(),
            Some("utctime,WaterEquivalentOfSnow,latlon")
        );
        assert_eq!(query.param("model").as_deref(), Some("kriging_suomi_snow"));
        assert_eq!(query.param("starttime").as_deref(), Some("2025-03-01T00:00:00"));
        assert_eq!(query.param("endtime").as_deref(), Some("2025-03-02T00:00:00"));
        assert_eq!(query.param("timestep").as_deref(), Some("data"));
        Ok(())
    }

    #[test]
    fn test_daily_grid_lists_every_field() -> Result<(), TransportError> {
        let query = builder().grid(
            KrigingModel::Daily,
            KrigingModel::Daily.fields(),
            BoundingBox::new(24.0, 60.0, 25.0, 61.0),
            day(6, 1),
            day(6, 2),
        )?;
        let param = query.param("param").unwrap_or_default();
        assert!(param.starts_with("utctime,Precipitation24h,"));
        assert!(param.ends_with(",VolumetricSoilWaterLayer1,latlon"));
        Ok(())
    }

    #[test]
    fn test_label_hides_api_key() -> Result<(), TransportError> {
        let query = builder().road_weather_forecast(LatLon(60.17, 24.94), day(6, 18), day(6, 19))?;
        let label = query.label();
        assert!(label.starts_with("timeseries?producer=virenwc"));
        assert!(!label.contains("secret-key"));
        assert!(query.url().as_str().contains("secret-key"));
        Ok(())
    }

    #[test]
    fn test_point_queries() -> Result<(), TransportError> {
        let tempsum = builder().temperature_sum_point(LatLon(60.17, 24.94), day(6, 1), day(6, 3))?;
        assert_eq!(tempsum.param("latlon").as_deref(), Some("60.17,24.94"));
        assert_eq!(
            tempsum.param("param").as_deref(),
            Some("utctime,EffectiveTemperatureSum")
        );
        assert_eq!(tempsum.param("bbox"), None);

        let road = builder().road_weather_forecast(LatLon(60.17, 24.94), day(6, 18), day(6, 19))?;
        assert_eq!(road.param("starttime").as_deref(), Some("2025-06-18T00:00:00Z"));
        assert_eq!(road.param("endtime").as_deref(), Some("2025-06-19T23:59:59Z"));
        assert_eq!(road.param("tz").as_deref(), Some("utc"));
        Ok(())
    }

    #[test]
    fn test_harmonie_queries() -> Result<(), TransportError> {
        let location = LatLon(60.17, 24.94);
        let forecast = builder().harmonie_forecast(location, day(6, 1), day(6, 2), Some("Temperature"))?;
        assert_eq!(forecast.service(), Service::Wfs);
        assert_eq!(
            forecast.param("storedquery_id").as_deref(),
            Some(HARMONIE_STORED_QUERY)
        );
        assert_eq!(forecast.param("parameters").as_deref(), Some("Temperature"));
        assert_eq!(forecast.param("timestep"), None);

        let listing = builder().harmonie_forecast(location, day(6, 1), day(6, 2), None)?;
        assert_eq!(listing.param("timestep").as_deref(), Some("60"));
        assert_eq!(listing.param("parameters"), None);
        Ok(())
    }

    #[test]
    fn test_invalid_base_url() {
        let result = QueryBuilder::new("not a url", "secret-key").road_weather_forecast(
            LatLon(60.0, 25.0),
            day(6, 1),
            day(6, 1),
        );
        match result {
            Err(TransportError::InvalidUrl { url, .. }) => assert!(!url.contains("secret-key")),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }
}
