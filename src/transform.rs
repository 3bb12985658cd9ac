use crate::db::DataSet;
use crate::error::PlotError;
use serde::Deserialize;

/// Value a percentage is computed against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    Value(f64),
    /// The maximum of a column of the same data set, e.g. the total number of
    /// nodes when plotting failing nodes.
    ColumnMax(String),
}

impl Reference {
    fn resolve(&self, dataset: &DataSet) -> Result<f64, PlotError> {
        match self {
            Reference::Value(value) => Ok(*value),
            Reference::ColumnMax(column) => dataset.max(column),
        }
    }
}

/// Pure function applied to every value of a column.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Identity,
    Scale(f64),
    Divide(f64),
    /// `value / reference * 100`, optionally truncated toward zero.
    Percentage {
        of: Reference,
        #[serde(default)]
        truncate: bool,
    },
    #[serde(skip)]
    Map(fn(f64) -> f64),
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Identity
    }
}

impl Transform {
    pub const SECONDS_TO_MILLIS: Transform = Transform::Scale(1000.0);
    pub const BYTES_TO_KILOBYTES: Transform = Transform::Divide(1024.0);

    pub fn percentage_of_max(column: &str) -> Self {
        Transform::Percentage {
            of: Reference::ColumnMax(column.to_string()),
            truncate: true,
        }
    }

    /// Applies the transform to `column` of `dataset`, returning a new series
    /// in row order. `dataset` is left untouched.
    pub fn apply(
        &self,
        dataset: &DataSet,
        column: &str,
    ) -> Result<Vec<f64>, PlotError> {
        let values = dataset.numbers(column)?;
        let series = match self {
            Transform::Identity => values,
            Transform::Scale(factor) => {
                values.into_iter().map(|value| value * factor).collect()
            }
            Transform::Divide(divisor) => {
                values.into_iter().map(|value| value / divisor).collect()
            }
            Transform::Percentage { of, truncate } => {
                // the reference must be known before mapping any value
                let reference = of.resolve(dataset)?;
                values
                    .into_iter()
                    .map(|value| {
                        let percentage = value / reference * 100.0;
                        if *truncate {
                            percentage.trunc()
                        } else {
                            percentage
                        }
                    })
                    .collect()
            }
            Transform::Map(fun) => values.into_iter().map(fun).collect(),
        };
        Ok(series)
    }
}

/// Derives a series from `column` of `dataset`.
pub fn apply(
    dataset: &DataSet,
    column: &str,
    transform: &Transform,
) -> Result<Vec<f64>, PlotError> {
    transform.apply(dataset, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;
    use quickcheck_macros::quickcheck;

    fn dataset(columns: Vec<(&str, Vec<f64>)>) -> DataSet {
        let columns = columns
            .into_iter()
            .map(|(name, values)| {
                let values = values.into_iter().map(Value::Number).collect();
                (name.to_string(), values)
            })
            .collect();
        DataSet::from_columns("test.csv", columns).unwrap()
    }

    fn assert_close(values: &[f64], expected: &[f64]) {
        assert_eq!(values.len(), expected.len());
        for (value, expected) in values.iter().zip(expected) {
            assert!(
                (value - expected).abs() < 1e-9,
                "{} != {}",
                value,
                expected
            );
        }
    }

    #[test]
    fn seconds_to_millis() {
        let dataset = dataset(vec![
            ("totalNbOfNodes", vec![100.0, 200.0, 400.0]),
            ("sigen_wall_avg", vec![0.01, 0.02, 0.05]),
        ]);
        let y = apply(&dataset, "sigen_wall_avg", &Transform::SECONDS_TO_MILLIS)
            .unwrap();
        assert_close(&y, &[10.0, 20.0, 50.0]);

        // source data is not modified
        assert_eq!(
            dataset.numbers("sigen_wall_avg").unwrap(),
            [0.01, 0.02, 0.05]
        );
    }

    #[test]
    fn bytes_to_kilobytes() {
        let dataset = dataset(vec![("net_sentBytes_avg", vec![2048.0, 512.0])]);
        let y = Transform::BYTES_TO_KILOBYTES
            .apply(&dataset, "net_sentBytes_avg")
            .unwrap();
        assert_eq!(y, [2.0, 0.5]);
    }

    #[test]
    fn percentage_of_column_max() {
        let dataset = dataset(vec![
            ("totalNbOfNodes", vec![4000.0, 4000.0, 4000.0]),
            ("failing", vec![0.0, 1000.0, 1999.0]),
        ]);
        let x = Transform::percentage_of_max("totalNbOfNodes")
            .apply(&dataset, "failing")
            .unwrap();
        assert_eq!(x, [0.0, 25.0, 49.0]);

        let exact = Transform::Percentage {
            of: Reference::Value(8000.0),
            truncate: false,
        };
        let x = exact.apply(&dataset, "failing").unwrap();
        assert_close(&x, &[0.0, 12.5, 24.9875]);
    }

    #[test]
    fn percentage_of_unknown_column() {
        let dataset = dataset(vec![("failing", vec![1.0])]);
        let err = Transform::percentage_of_max("totalNbOfNodes")
            .apply(&dataset, "failing")
            .unwrap_err();
        assert!(matches!(err, PlotError::Usage(_)));
    }

    #[test]
    fn custom_map() {
        let dataset = dataset(vec![("x", vec![1.0, 4.0, 9.0])]);
        let y = Transform::Map(f64::sqrt).apply(&dataset, "x").unwrap();
        assert_eq!(y, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn deserialize() {
        let transform: Transform =
            serde_json::from_str(r#"{"scale": 1000.0}"#).unwrap();
        assert!(
            matches!(transform, Transform::Scale(factor) if factor == 1000.0)
        );

        let transform: Transform = serde_json::from_str(
            r#"{"percentage": {"of": {"column_max": "totalNbOfNodes"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            transform,
            Transform::Percentage { truncate: false, .. }
        ));

        let transform: Transform =
            serde_json::from_str(r#""identity""#).unwrap();
        assert!(matches!(transform, Transform::Identity));
    }

    #[quickcheck]
    fn transform_is_pure(values: Vec<f64>, factor: f64) -> bool {
        let dataset = dataset(vec![("metric", values)]);
        let transforms = vec![
            Transform::Identity,
            Transform::Scale(factor),
            Transform::Divide(factor),
            Transform::Percentage {
                of: Reference::Value(factor),
                truncate: true,
            },
        ];
        transforms.into_iter().all(|transform| {
            let first = transform.apply(&dataset, "metric").unwrap();
            let second = transform.apply(&dataset, "metric").unwrap();
            // compare bit patterns so that NaN results are equal too
            first.len() == dataset.rows()
                && first
                    .iter()
                    .zip(second.iter())
                    .all(|(a, b)| a.to_bits() == b.to_bits())
        })
    }
}
