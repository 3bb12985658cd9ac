use crate::db::DataSet;
use crate::error::PlotError;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_DELIMITER: u8 = b',';

/// All data files needed by a chart, keyed by path.
#[derive(Debug, Default)]
pub struct DataDB {
    datasets: HashMap<PathBuf, DataSet>,
    // load order
    paths: Vec<PathBuf>,
}

impl DataDB {
    /// Loads comma-separated files. Repeated paths are loaded once.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, Report> {
        Self::load_with(paths, DEFAULT_DELIMITER)
    }

    pub fn load_with<P: AsRef<Path>>(
        paths: &[P],
        delimiter: u8,
    ) -> Result<Self, Report> {
        if paths.is_empty() {
            return Err(
                PlotError::usage("expected at least one data file").into()
            );
        }

        let mut db = Self::default();
        for path in paths {
            let path = path.as_ref();
            if db.datasets.contains_key(path) {
                continue;
            }
            let dataset = Self::load_entry(path, delimiter)
                .wrap_err_with(|| format!("load {}", path.display()))?;
            db.insert(dataset);
        }
        Ok(db)
    }

    fn load_entry(path: &Path, delimiter: u8) -> Result<DataSet, Report> {
        // register load start time
        let start = std::time::Instant::now();

        if !path.is_file() {
            return Err(PlotError::load(path, "no such file").into());
        }
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| PlotError::load(path, e))?;
        let dataset = DataSet::from_reader(path, reader)?;

        info!(
            path = %path.display(),
            rows = dataset.rows(),
            columns = dataset.column_count(),
            "read data file"
        );
        debug!("loaded {} after {:?}", path.display(), start.elapsed());
        Ok(dataset)
    }

    /// Adds an already built data set, replacing any with the same path.
    pub fn insert(&mut self, dataset: DataSet) {
        let path = dataset.path().to_path_buf();
        if self.datasets.insert(path.clone(), dataset).is_none() {
            self.paths.push(path);
        }
    }

    pub fn get(&self, path: &Path) -> Option<&DataSet> {
        self.datasets.get(path)
    }

    /// Data sets in load order.
    pub fn iter(&self) -> impl Iterator<Item = &DataSet> {
        self.paths.iter().map(move |path| &self.datasets[path])
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_without_paths() {
        let paths: Vec<PathBuf> = Vec::new();
        let err = DataDB::load(&paths).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotError>(),
            Some(PlotError::Usage(_))
        ));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataDB::load(&[dir.path().join("missing.csv")]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotError>(),
            Some(PlotError::Load { .. })
        ));
    }

    #[test]
    fn every_column_has_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "handel.csv",
            "totalNbOfNodes,sigen_wall_avg,net_sentBytes_avg\n\
             100,0.01,2048\n\
             200,0.02,4096\n\
             400,0.05,8192\n",
        );
        let db = DataDB::load(&[&path, &path]).unwrap();
        assert_eq!(db.len(), 1);

        let dataset = db.get(&path).unwrap();
        assert_eq!(dataset.rows(), 3);
        assert_eq!(dataset.column_count(), 3);
        for column in dataset.columns() {
            assert_eq!(column.len(), dataset.rows());
        }
    }

    #[test]
    fn load_with_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_csv(dir.path(), "a.csv", "x;y\n1;2\n");
        let second = write_csv(dir.path(), "b.csv", "x;y\n3;4\n5;6\n");
        let db = DataDB::load_with(&[&second, &first], b';').unwrap();
        let rows: Vec<_> = db.iter().map(|dataset| dataset.rows()).collect();
        assert_eq!(rows, vec![2, 1]);
        assert_eq!(db.get(&first).unwrap().numbers("y").unwrap(), [2.0]);
    }
}
