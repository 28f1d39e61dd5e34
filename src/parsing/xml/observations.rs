//! Queries over FMI's WFS `timevaluepair` responses:
//!
//! ```text
//! wfs:FeatureCollection
//!   wfs:member
//!     omso:PointTimeSeriesObservation
//!       om:observedProperty xlink:href=".../meta?...&param=Temperature"
//!       om:result
//!         wml2:MeasurementTimeseries
//!           wml2:point
//!             wml2:MeasurementTVP
//!               wml2:time   2025-06-18T09:00:00Z
//!               wml2:value  14.2
//! ```

use crate::parsing::error::ParseError;
use crate::parsing::policy::{FailurePolicy, Parsed};
use crate::parsing::timestamp::parse_timestamp;
use crate::parsing::xml::namespaces::{ExpandedName, NamespaceMap};
use crate::parsing::xml::tree::XmlDocument;
use crate::types::records::PointObservation;
use log::debug;
use std::collections::BTreeSet;

pub struct ObservationParser {
    namespaces: NamespaceMap,
    policy: FailurePolicy,
}

impl Default for ObservationParser {
    fn default() -> Self {
        Self::new(NamespaceMap::default())
    }
}

impl ObservationParser {
    pub fn new(namespaces: NamespaceMap) -> Self {
        Self {
            namespaces,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn name(&self, qualified: &str) -> Result<ExpandedName, ParseError> {
        self.namespaces.expand(qualified)
    }

    /// Every (time, value) pair under every measurement timeseries of every member.
    ///
    /// Points lacking a time or value element are ignored; points whose time or
    /// value does not parse are handled according to the failure policy.
    pub fn points(&self, document: &XmlDocument) -> Result<Parsed<Vec<PointObservation>>, ParseError> {
        let member = self.name("wfs:member")?;
        let series = self.name("wml2:MeasurementTimeseries")?;
        let point = self.name("wml2:point")?;
        let time = self.name("wml2:time")?;
        let value = self.name("wml2:value")?;

        let mut observations = Vec::new();
        let mut diagnostics = Vec::new();
        let mut index = 0;
        for member_el in document.descendants(&member) {
            for series_el in member_el.descendants(&series) {
                for point_el in series_el.descendants(&point) {
                    let (Some(time_el), Some(value_el)) = (point_el.find(&time), point_el.find(&value))
                    else {
                        continue;
                    };
                    let outcome = parse_point(time_el.text(), value_el.text());
                    if let Some(observation) = self.policy.handle(index, outcome, &mut diagnostics)? {
                        observations.push(observation);
                    }
                    index += 1;
                }
            }
        }
        debug!(
            "Parsed {} observations from XML ({} skipped)",
            observations.len(),
            diagnostics.len()
        );
        Ok(Parsed {
            data: observations,
            diagnostics,
        })
    }

    /// Parameter names advertised by the response's `om:observedProperty` references.
    pub fn observed_properties(&self, document: &XmlDocument) -> Result<BTreeSet<String>, ParseError> {
        let property = self.name("om:observedProperty")?;
        let href = self.name("xlink:href")?;

        Ok(document
            .descendants(&property)
            .into_iter()
            .filter_map(|el| el.attribute(&href))
            .filter_map(parameter_name)
            .collect())
    }
}

fn parse_point(time: &str, value: &str) -> Result<PointObservation, ParseError> {
    let time = parse_timestamp(time)?;
    let value = value
        .parse::<f64>()
        .map_err(|source| ParseError::MalformedValue {
            value: value.to_string(),
            source,
        })?;
    Ok(PointObservation { time, value })
}

/// The last path segment of a reference URI. FMI's references point at a
/// metadata service (`.../meta?observableProperty=forecast&param=Temperature`),
/// in which case the `param` query value is the name.
fn parameter_name(href: &str) -> Option<String> {
    let segment = href.rsplit('/').next()?;
    let name = match segment.split_once('?') {
        Some((path, query)) => query
            .split('&')
            .find_map(|pair| pair.strip_prefix("param="))
            .unwrap_or(path),
        None => segment,
    };
    (!name.is_empty()).then(|| name.to_string())
}
