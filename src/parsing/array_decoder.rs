//! Decoder for FMI's array-in-string encoding.
//!
//! For multi-point queries the timeseries endpoint returns every parameter as a
//! JSON string such as `"[0.1 0.3 nan 2]"`, one value per grid point, and the
//! coordinates as `"[60.1 24.9 61.2 25.0]"`, alternating latitude and longitude.

use crate::parsing::error::ParseError;
use crate::types::geo::LatLon;

/// A numeric vector encoded as a bracketed, whitespace or comma separated string.
///
/// # Examples
///
/// ```
/// use fmi_timeseries::{EncodedArray, LatLon};
///
/// let values = EncodedArray::new("[1.0 2.5 3]").values()?;
/// assert_eq!(values, vec![1.0, 2.5, 3.0]);
///
/// let coordinates = EncodedArray::new("[60.1 24.9 61.2 25.0]").coordinates()?;
/// assert_eq!(coordinates, vec![LatLon(60.1, 24.9), LatLon(61.2, 25.0)]);
/// # Ok::<(), fmi_timeseries::ParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedArray<'a>(&'a str);

impl<'a> EncodedArray<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self(raw)
    }

    fn tokens(&self) -> impl Iterator<Item = &'a str> {
        self.0
            .split(|c: char| c.is_whitespace() || c == ',' || c == '[' || c == ']')
            .filter(|token| !token.is_empty())
    }

    /// Decodes every token as an `f64`, in order. `nan` is accepted.
    pub fn values(&self) -> Result<Vec<f64>, ParseError> {
        self.tokens()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|source| ParseError::MalformedNumber {
                        token: token.to_string(),
                        source,
                    })
            })
            .collect()
    }

    /// Decodes the values and pairs them up: even indices are latitudes, odd
    /// indices longitudes.
    pub fn coordinates(&self) -> Result<Vec<LatLon>, ParseError> {
        let values = self.values()?;
        if values.len() % 2 != 0 {
            return Err(ParseError::OddCoordinateCount(values.len()));
        }
        Ok(values
            .chunks_exact(2)
            .map(|pair| LatLon(pair[0], pair[1]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_space_separated() -> Result<(), ParseError> {
        assert_eq!(EncodedArray::new("[1.0 2.5 3]").values()?, vec![1.0, 2.5, 3.0]);
        Ok(())
    }

    #[test]
    fn test_values_with_commas_and_stray_brackets() -> Result<(), ParseError> {
        let values = EncodedArray::new("[[1.5, -2,  3e1 ]]").values()?;
        assert_eq!(values, vec![1.5, -2.0, 30.0]);
        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<(), ParseError> {
        assert!(EncodedArray::new("").values()?.is_empty());
        assert!(EncodedArray::new("[]").values()?.is_empty());
        assert!(EncodedArray::new("").coordinates()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_nan_is_kept() -> Result<(), ParseError> {
        let values = EncodedArray::new("[nan 4]").values()?;
        assert!(values[0].is_nan());
        assert_eq!(values[1], 4.0);
        Ok(())
    }

    #[test]
    fn test_malformed_token() {
        let err = EncodedArray::new("[1.0 abc 3]").values().unwrap_err();
        match err {
            ParseError::MalformedNumber { token, .. } => assert_eq!(token, "abc"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_coordinate_pairs_in_order() -> Result<(), ParseError> {
        let pairs = EncodedArray::new("[60.1 24.9 61.2 25.0]").coordinates()?;
        assert_eq!(pairs, vec![LatLon(60.1, 24.9), LatLon(61.2, 25.0)]);
        Ok(())
    }

    #[test]
    fn test_odd_coordinate_count() {
        let err = EncodedArray::new("[60.1 24.9 61.2]").coordinates().unwrap_err();
        assert!(matches!(err, ParseError::OddCoordinateCount(3)));
    }
}
