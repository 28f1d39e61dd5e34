use polars::error::PolarsError;
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Token '{token}' in encoded array is not a number")]
    MalformedNumber {
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Encoded coordinate array has an odd number of values ({0})")]
    OddCoordinateCount(usize),

    // Wraps a decoder error with the payload field it came from
    #[error("Field '{field}' could not be decoded")]
    MalformedField {
        field: String,
        #[source]
        source: Box<ParseError>,
    },

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' is not {expected}")]
    UnexpectedFieldType {
        field: String,
        expected: &'static str,
    },

    #[error("Field '{field}' has {found} values but the coordinate array has {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Could not parse timestamp '{0}'")]
    MalformedTimestamp(String),

    #[error("Could not parse value '{value}' as a number")]
    MalformedValue {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Entry {0} is not a JSON object")]
    NotAnObject(usize),

    #[error("Namespace prefix '{0}' is not configured")]
    UnknownPrefix(String),

    #[error("XML document could not be read")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute could not be read")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Failed building DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}

impl ParseError {
    pub(crate) fn in_field(self, field: &str) -> ParseError {
        ParseError::MalformedField {
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}
