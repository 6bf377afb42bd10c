//! CSV dataset → typed records.
//!
//! Reads the three tables of an affiliation dataset from a local directory:
//! - `agent.csv`: [`AgentRecord`]
//! - `affiliation.csv`: [`AffiliationRecord`]
//! - `affiliationrel.csv`: [`RelationRecord`]
//!
//! Retrieval of the dataset itself happens upstream; this module only parses
//! files that are already on disk.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::graph::{
    AffiliationRecord, AgentRecord, BuildReport, GraphBuilder, GraphModel, RelationRecord,
};

/// Location of the three tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetFiles {
    pub data_dir: PathBuf,
    pub agents: String,
    pub affiliations: String,
    pub relations: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            agents: "agent.csv".into(),
            affiliations: "affiliation.csv".into(),
            relations: "affiliationrel.csv".into(),
        }
    }
}

impl DatasetFiles {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn agents_path(&self) -> PathBuf {
        self.data_dir.join(&self.agents)
    }

    pub fn affiliations_path(&self) -> PathBuf {
        self.data_dir.join(&self.affiliations)
    }

    pub fn relations_path(&self) -> PathBuf {
        self.data_dir.join(&self.relations)
    }
}

/// The three record streams of one dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub agents: Vec<AgentRecord>,
    pub affiliations: Vec<AffiliationRecord>,
    pub relations: Vec<RelationRecord>,
}

impl Dataset {
    pub fn build_graph(&self) -> (GraphModel, BuildReport) {
        GraphBuilder::new().build_with_report(&self.agents, &self.affiliations, &self.relations)
    }
}

/// Deserialize headered CSV rows from any reader.
pub fn read_records<T, R>(reader: R) -> csv::Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let records: csv::Result<Vec<T>> = rdr.deserialize().collect();
    records
}

fn read_csv_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let records =
        read_records(file).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = records.len(), "Loaded CSV table");
    Ok(records)
}

/// Load all three tables.
pub fn load_dataset(files: &DatasetFiles) -> Result<Dataset> {
    let dataset = Dataset {
        agents: read_csv_file(&files.agents_path())?,
        affiliations: read_csv_file(&files.affiliations_path())?,
        relations: read_csv_file(&files.relations_path())?,
    };
    tracing::info!(
        agents = dataset.agents.len(),
        affiliations = dataset.affiliations.len(),
        relations = dataset.relations.len(),
        "Dataset loaded from {}",
        files.data_dir.display()
    );
    Ok(dataset)
}

// ============================================================================
// Tests
// ============================================================================
