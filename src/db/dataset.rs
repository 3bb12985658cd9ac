use crate::error::PlotError;
use color_eyre::Report;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A single cell of a data file.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Parses a (trimmed) field. Empty fields are missing measurements and
    /// become `NaN`, so that aggregates can skip them.
    pub fn parse(field: &str) -> Self {
        if field.is_empty() {
            return Value::Number(f64::NAN);
        }
        match field.parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::Text(field.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(number) => write!(f, "{}", number),
            Value::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The content of one data file: named columns sharing the same row count.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    path: PathBuf,
    columns: Vec<Column>,
    rows: usize,
}

impl DataSet {
    /// Reads a data set from a csv reader whose first record is the header.
    pub fn from_reader<R: io::Read>(
        path: impl Into<PathBuf>,
        mut reader: csv::Reader<R>,
    ) -> Result<Self, Report> {
        let path = path.into();

        // parse header
        let header = reader
            .headers()
            .map_err(|e| PlotError::load(&path, e))?
            .clone();
        if header.is_empty() || header.iter().all(|name| name.is_empty()) {
            return Err(PlotError::load(&path, "missing header row").into());
        }
        let mut columns: Vec<_> = header
            .iter()
            .map(|name| Column {
                name: name.to_string(),
                values: Vec::new(),
            })
            .collect();

        // parse rows; the csv reader rejects records whose field count differs
        // from the header's
        for record in reader.records() {
            let record = record.map_err(|e| PlotError::load(&path, e))?;
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.values.push(Value::parse(field));
            }
        }

        let columns = columns
            .into_iter()
            .map(|column| (column.name, column.values))
            .collect();
        Self::from_columns(path, columns).map_err(Report::from)
    }

    /// Creates a data set from in-memory columns.
    pub fn from_columns(
        path: impl Into<PathBuf>,
        columns: Vec<(String, Vec<Value>)>,
    ) -> Result<Self, PlotError> {
        let path = path.into();
        let rows = columns.first().map(|(_, values)| values.len()).unwrap_or(0);

        let mut names = HashSet::with_capacity(columns.len());
        for (name, values) in &columns {
            if !names.insert(name.as_str()) {
                return Err(PlotError::load(
                    &path,
                    format!("duplicated column {:?}", name),
                ));
            }
            if values.len() != rows {
                return Err(PlotError::load(
                    &path,
                    format!(
                        "column {:?} has {} rows instead of {}",
                        name,
                        values.len(),
                        rows
                    ),
                ));
            }
        }

        let columns = columns
            .into_iter()
            .map(|(name, values)| Column { name, values })
            .collect();
        Ok(Self {
            path,
            columns,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns column `name` as numbers. Fails if the column does not exist or
    /// holds a categorical value.
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, PlotError> {
        let column = self.column(name).ok_or_else(|| {
            PlotError::usage(format!(
                "column {:?} not found in {} (columns: {})",
                name,
                self.path.display(),
                self.column_names().collect::<Vec<_>>().join(", ")
            ))
        })?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.as_number().ok_or_else(|| {
                    PlotError::load(
                        &self.path,
                        format!(
                            "column {:?} row {}: {:?} is not numeric",
                            name, row, value
                        ),
                    )
                })
            })
            .collect()
    }

    /// Maximum of column `name`, ignoring missing values.
    pub fn max(&self, name: &str) -> Result<f64, PlotError> {
        let numbers = self.present(name)?;
        Ok(numbers.into_iter().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Mean of column `name`, ignoring missing values.
    pub fn mean(&self, name: &str) -> Result<f64, PlotError> {
        let numbers = self.present(name)?;
        let count = numbers.len() as f64;
        Ok(numbers.into_iter().sum::<f64>() / count)
    }

    fn present(&self, name: &str) -> Result<Vec<f64>, PlotError> {
        let numbers: Vec<_> = self
            .numbers(name)?
            .into_iter()
            .filter(|number| !number.is_nan())
            .collect();
        if numbers.is_empty() {
            return Err(PlotError::load(
                &self.path,
                format!("column {:?} has no values", name),
            ));
        }
        Ok(numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|value| Value::Number(*value)).collect()
    }

    fn read(content: &str) -> Result<DataSet, Report> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        DataSet::from_reader("inline.csv", reader)
    }

    #[test]
    fn parse_value() {
        assert_eq!(Value::parse("12"), Value::Number(12.0));
        assert_eq!(Value::parse("0.05"), Value::Number(0.05));
        assert_eq!(Value::parse("handel"), Value::Text("handel".to_string()));
        assert!(Value::parse("").as_number().unwrap().is_nan());
    }

    #[test]
    fn read_mixed_columns() {
        let dataset = read(
            "totalNbOfNodes, sigen_wall_avg, network\n\
             100, 0.01, udp\n\
             200, 0.02, udp\n",
        )
        .unwrap();
        assert_eq!(dataset.rows(), 2);
        assert_eq!(dataset.column_count(), 3);
        assert_eq!(
            dataset.column_names().collect::<Vec<_>>(),
            vec!["totalNbOfNodes", "sigen_wall_avg", "network"]
        );
        assert_eq!(dataset.numbers("totalNbOfNodes").unwrap(), [100.0, 200.0]);

        // categorical columns can't be used as numbers
        let err = dataset.numbers("network").unwrap_err();
        assert!(matches!(err, PlotError::Load { .. }));

        // unknown columns are a configuration mistake
        let err = dataset.numbers("failing").unwrap_err();
        assert!(matches!(err, PlotError::Usage(_)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = read("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotError>(),
            Some(PlotError::Load { .. })
        ));
    }

    #[test]
    fn duplicated_columns_are_rejected() {
        let err = read("a,a\n1,2\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotError>(),
            Some(PlotError::Load { .. })
        ));
    }

    #[test]
    fn header_only() {
        let dataset = read("a,b\n").unwrap();
        assert_eq!(dataset.rows(), 0);
        assert_eq!(dataset.column_count(), 2);
        assert!(dataset.max("a").is_err());
    }

    #[test]
    fn aggregates_skip_missing_values() {
        let mut values = numbers(&[3990.0, 4000.0]);
        values.push(Value::Number(f64::NAN));
        let dataset = DataSet::from_columns(
            "nodes.csv",
            vec![("totalNbOfNodes".to_string(), values)],
        )
        .unwrap();
        assert_eq!(dataset.max("totalNbOfNodes").unwrap(), 4000.0);
        assert_eq!(dataset.mean("totalNbOfNodes").unwrap(), 3995.0);
    }

    #[test]
    fn columns_must_share_row_count() {
        let err = DataSet::from_columns(
            "bad.csv",
            vec![
                ("a".to_string(), numbers(&[1.0, 2.0])),
                ("b".to_string(), numbers(&[1.0])),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, PlotError::Load { .. }));
    }
}
