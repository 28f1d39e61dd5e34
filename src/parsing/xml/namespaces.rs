use crate::parsing::error::ParseError;
use std::collections::BTreeMap;

const DEFAULT_NAMESPACES: &[(&str, &str)] = &[
    ("wfs", "http://www.opengis.net/wfs/2.0"),
    ("om", "http://www.opengis.net/om/2.0"),
    ("gml", "http://www.opengis.net/gml/3.2"),
    ("wml2", "http://www.opengis.net/waterml/2.0"),
    ("sams", "http://www.opengis.net/samplingSpatial/2.0"),
    ("sf", "http://www.opengis.net/sampling/2.0"),
    ("gmd", "http://www.isotc211.org/2005/gmd"),
    ("xlink", "http://www.w3.org/1999/xlink"),
];

/// A namespace URI plus local name, the identity of an element or attribute
/// regardless of which prefix the document happened to use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    pub namespace: Option<String>,
    pub local: String,
}

/// Maps the prefixes used in queries (`wml2:point`) to namespace URIs.
///
/// Queries are written against these prefixes, not the document's own ones, so a
/// response that binds WaterML to `ns3:` still matches `wml2:point`.
///
/// # Examples
///
/// ```
/// use fmi_timeseries::NamespaceMap;
///
/// let namespaces = NamespaceMap::default().with("ef", "http://inspire.ec.europa.eu/schemas/ef/4.0");
/// let name = namespaces.expand("wml2:MeasurementTimeseries")?;
/// assert_eq!(name.namespace.as_deref(), Some("http://www.opengis.net/waterml/2.0"));
/// assert_eq!(name.local, "MeasurementTimeseries");
/// assert!(namespaces.expand("ef:EnvironmentalMonitoringFacility").is_ok());
/// # Ok::<(), fmi_timeseries::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMap {
    prefixes: BTreeMap<String, String>,
}

impl NamespaceMap {
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), uri.into());
        self
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expands `prefix:local`. A name without a prefix is taken to be in no namespace.
    pub fn expand(&self, qualified: &str) -> Result<ExpandedName, ParseError> {
        match qualified.split_once(':') {
            Some((prefix, local)) => {
                let uri = self
                    .uri(prefix)
                    .ok_or_else(|| ParseError::UnknownPrefix(prefix.to_string()))?;
                Ok(ExpandedName {
                    namespace: Some(uri.to_string()),
                    local: local.to_string(),
                })
            }
            None => Ok(ExpandedName {
                namespace: None,
                local: qualified.to_string(),
            }),
        }
    }
}

/// The WFS / O&M / WaterML / GML prefixes used by FMI's stored queries.
impl Default for NamespaceMap {
    fn default() -> Self {
        DEFAULT_NAMESPACES
            .iter()
            .fold(Self::empty(), |map, (prefix, uri)| map.with(*prefix, *uri))
    }
}
