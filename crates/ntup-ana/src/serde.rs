use std::fmt;

use ntup_core::errors::{ErrorInfo, NtupError};
use serde::de::{self, DeserializeOwned, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn serde_error(code: &str, err: impl ToString) -> NtupError {
    NtupError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, NtupError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, NtupError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, NtupError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}

/// Float that keeps NaN and the infinities through JSON.
///
/// Finite values are plain numbers. The others are written as the strings
/// `"NaN"`, `"Infinity"` and `"-Infinity"`; `null` reads back as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Real(pub f64);

impl Serialize for Real {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() {
            serializer.serialize_f64(value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value > 0.0 {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }
}

struct RealVisitor;

impl<'de> Visitor<'de> for RealVisitor {
    type Value = Real;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, null, \"NaN\", \"Infinity\" or \"-Infinity\"")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Real, E> {
        Ok(Real(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Real, E> {
        Ok(Real(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Real, E> {
        Ok(Real(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Real, E> {
        match value {
            "NaN" => Ok(Real(f64::NAN)),
            "Infinity" => Ok(Real(f64::INFINITY)),
            "-Infinity" => Ok(Real(f64::NEG_INFINITY)),
            other => Err(E::invalid_value(Unexpected::Str(other), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Real, E> {
        Ok(Real(f64::NAN))
    }

    fn visit_none<E: de::Error>(self) -> Result<Real, E> {
        Ok(Real(f64::NAN))
    }
}

impl<'de> Deserialize<'de> for Real {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RealVisitor)
    }
}

struct Reals<'a>(&'a [f64]);

impl Serialize for Reals<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|&value| Real(value)))
    }
}

struct RealRows<'a>(&'a [Vec<f64>]);

impl Serialize for RealRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|row| Reals(row.as_slice())))
    }
}

fn into_floats(row: Vec<Real>) -> Vec<f64> {
    row.into_iter().map(|Real(value)| value).collect()
}

/// `#[serde(with)]` adapter for event-by-object float columns.
pub mod real_columns {
    use super::*;

    /// Writes the column with [`Real`] spelling.
    pub fn serialize<S: Serializer>(value: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error> {
        RealRows(value).serialize(serializer)
    }

    /// Reads a column written by [`serialize`].
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error> {
        let rows = Vec::<Vec<Real>>::deserialize(deserializer)?;
        Ok(rows.into_iter().map(into_floats).collect())
    }
}

/// `#[serde(with)]` adapter for event-by-track-by-hit float columns.
pub mod real_hit_columns {
    use super::*;

    /// Writes the column with [`Real`] spelling.
    pub fn serialize<S: Serializer>(
        value: &[Vec<Vec<f64>>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(value.iter().map(|tracks| RealRows(tracks.as_slice())))
    }

    /// Reads a column written by [`serialize`].
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<Vec<f64>>>, D::Error> {
        let events = Vec::<Vec<Vec<Real>>>::deserialize(deserializer)?;
        Ok(events
            .into_iter()
            .map(|tracks| tracks.into_iter().map(into_floats).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Real;

    #[test]
    fn non_finite_values_keep_their_identity() {
        let values = vec![Real(1.5), Real(f64::INFINITY), Real(f64::NEG_INFINITY), Real(f64::NAN)];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1.5,"Infinity","-Infinity","NaN"]"#);

        let back: Vec<Real> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].0, 1.5);
        assert_eq!(back[1].0, f64::INFINITY);
        assert_eq!(back[2].0, f64::NEG_INFINITY);
        assert!(back[3].0.is_nan());
    }

    #[test]
    fn null_and_integers_are_accepted() {
        let back: Vec<Real> = serde_json::from_str("[null, 3, -2]").unwrap();
        assert!(back[0].0.is_nan());
        assert_eq!(back[1].0, 3.0);
        assert_eq!(back[2].0, -2.0);
        assert!(serde_json::from_str::<Real>(r#""inf""#).is_err());
    }
}
