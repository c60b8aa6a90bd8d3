//! Domain data collaborator: JSON records on disk.
//!
//! ## Layout
//!
//! ```text
//! <data>/countries/*.json   one Country per file
//! <data>/alliances/*.json   one Alliance per file
//! <data>/conflicts/*.json   one Conflict per file
//! <data>/regions/*.json     one Region per file
//! <data>/layers/<id>.json   LayerConfig keyed by layer id
//! ```
//!
//! A missing directory is an empty list and a missing file is `None`.
//! Lists are ordered by file name so alliance precedence is stable.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{Alliance, Conflict, Country, LayerConfig, LayerKind, Region};

/// Errors raised while reading domain data.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A file or directory exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A file is not a valid record.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reader over a data directory.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Create a reader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All countries.
    pub fn countries(&self) -> Result<Vec<Country>, DatasetError> {
        self.read_dir("countries")
    }

    /// All alliances, in file-name order.
    pub fn alliances(&self) -> Result<Vec<Alliance>, DatasetError> {
        self.read_dir("alliances")
    }

    /// All conflicts.
    pub fn conflicts(&self) -> Result<Vec<Conflict>, DatasetError> {
        self.read_dir("conflicts")
    }

    /// All regions.
    pub fn regions(&self) -> Result<Vec<Region>, DatasetError> {
        self.read_dir("regions")
    }

    /// One country by id (file names are lowercase).
    pub fn country(&self, id: &str) -> Result<Option<Country>, DatasetError> {
        self.read_file("countries", &id.to_lowercase())
    }

    /// One region by id.
    pub fn region(&self, id: &str) -> Result<Option<Region>, DatasetError> {
        self.read_file("regions", id)
    }

    /// One layer config by id.
    pub fn layer_config(&self, id: &str) -> Result<Option<LayerConfig>, DatasetError> {
        self.read_file("layers", id)
    }

    fn read_dir<T: DeserializeOwned>(&self, subdir: &str) -> Result<Vec<T>, DatasetError> {
        let dir = self.root.join(subdir);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(DatasetError::Io { path: dir, source }),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DatasetError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let records = paths.iter().map(|p| read_json(p)).collect::<Result<Vec<T>, _>>()?;
        debug!(dir = %dir.display(), count = records.len(), "Loaded records");
        Ok(records)
    }

    fn read_file<T: DeserializeOwned>(&self, subdir: &str, name: &str) -> Result<Option<T>, DatasetError> {
        let path = self.root.join(subdir).join(format!("{name}.json"));
        match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| DatasetError::Json { path, source }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DatasetError::Io { path, source }),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Every record the map pages draw from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainDataset {
    /// Countries.
    pub countries: Vec<Country>,
    /// Alliances in precedence order.
    pub alliances: Vec<Alliance>,
    /// Conflicts.
    pub conflicts: Vec<Conflict>,
    /// Regions.
    pub regions: Vec<Region>,
    /// Layer configs present on disk, keyed by layer id.
    pub layers: BTreeMap<String, LayerConfig>,
}

impl DomainDataset {
    /// Read the whole dataset from a data directory.
    pub fn load(dir: &DataDir) -> Result<Self, DatasetError> {
        let mut layers = BTreeMap::new();
        for kind in LayerKind::ALL {
            if let Some(config) = dir.layer_config(kind.as_str())? {
                layers.insert(kind.as_str().to_string(), config);
            }
        }

        let dataset = Self {
            countries: dir.countries()?,
            alliances: dir.alliances()?,
            conflicts: dir.conflicts()?,
            regions: dir.regions()?,
            layers,
        };
        debug!(
            countries = dataset.countries.len(),
            alliances = dataset.alliances.len(),
            conflicts = dataset.conflicts.len(),
            regions = dataset.regions.len(),
            layers = dataset.layers.len(),
            "Domain dataset loaded"
        );
        Ok(dataset)
    }

    /// A layer config by id.
    pub fn layer_config(&self, id: &str) -> Option<&LayerConfig> {
        self.layers.get(id)
    }

    /// A region by id.
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}

/// Text of a region's analysis document, resolved against `content_root`.
///
/// A missing document reads as the empty string.
pub fn analysis_text(content_root: &Path, region: &Region) -> Result<String, DatasetError> {
    if region.analysis.is_empty() {
        return Ok(String::new());
    }
    let path = content_root.join(&region.analysis);
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(DatasetError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scratch(PathBuf);

    impl Scratch {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("geolayer-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, rel: &str, body: &str) {
            let path = self.0.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, body).unwrap();
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_missing_dirs_and_files() {
        let scratch = Scratch::new();
        let dir = DataDir::new(&scratch.0);
        assert!(dir.countries().unwrap().is_empty());
        assert!(dir.layer_config("power-tiers").unwrap().is_none());
        assert!(dir.region("nowhere").unwrap().is_none());
    }

    #[test]
    fn test_lists_sorted_by_file_name() {
        let scratch = Scratch::new();
        scratch.write(
            "alliances/b-nato.json",
            r##"{"id":"nato","name":"NATO","members":["usa"],"color":"#2563EB","type":"military","description":""}"##,
        );
        scratch.write(
            "alliances/a-eu.json",
            r##"{"id":"eu","name":"EU","members":["fra"],"color":"#FACC15","type":"economic","description":""}"##,
        );
        scratch.write("alliances/README.md", "not a record");

        let alliances = DataDir::new(&scratch.0).alliances().unwrap();
        let ids: Vec<_> = alliances.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["eu", "nato"]);
    }

    #[test]
    fn test_invalid_json_names_path() {
        let scratch = Scratch::new();
        scratch.write("countries/usa.json", "{ nope");
        let err = DataDir::new(&scratch.0).countries().unwrap_err();
        assert!(matches!(err, DatasetError::Json { .. }));
        assert!(err.to_string().contains("usa.json"));
    }

    #[test]
    fn test_load_dataset_and_analysis() {
        let scratch = Scratch::new();
        scratch.write(
            "data/countries/usa.json",
            r#"{"id":"usa","name":"United States","isoCode":"US","powerTier":1,"alliances":[],"conflicts":[],"description":""}"#,
        );
        scratch.write(
            "data/layers/power-tiers.json",
            r##"{"id":"power-tiers","name":"Power Tiers","field":"powerTier","colorScale":{"1":"#111"},"legend":[]}"##,
        );
        scratch.write(
            "data/regions/red-sea.json",
            r#"{"id":"red-sea","name":"Red Sea","countries":["YE"],"bounds":{"topLeft":[30,32],"bottomRight":[11,45]},"conflicts":[],"analysis":"content/regions/red-sea.md"}"#,
        );
        scratch.write("content/regions/red-sea.md", "## Chokepoint");

        let data = DomainDataset::load(&DataDir::new(scratch.0.join("data"))).unwrap();
        assert_eq!(data.countries.len(), 1);
        assert!(data.layer_config("power-tiers").is_some());
        assert!(data.layer_config("alliances").is_none());

        let region = data.region("red-sea").unwrap();
        assert_eq!(analysis_text(&scratch.0, region).unwrap(), "## Chokepoint");

        let mut moved = region.clone();
        moved.analysis = "content/regions/missing.md".into();
        assert_eq!(analysis_text(&scratch.0, &moved).unwrap(), "");

        let country = DataDir::new(scratch.0.join("data")).country("USA").unwrap();
        assert_eq!(country.unwrap().iso_code, "US");
    }
}
