//! Stage configuration.
//!
//! Every stage reads one input and writes its outputs to configured paths.
//! Values are layered: built-in defaults, then environment variables (a
//! `.env` file is loaded first), then command-line flags applied by the
//! binary.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::models::Segment;

/// Source report.
pub const ENV_REPORT: &str = "FRENTES_REPORT";
/// Flattened activity table (extract output, cleanup input).
pub const ENV_FLATTENED: &str = "FRENTES_FLATTENED";
/// Cleaned activity table (cleanup output, partition input).
pub const ENV_CLEANED: &str = "FRENTES_CLEANED";
pub const ENV_STOP_PROCEDURE: &str = "FRENTES_STOP_PROCEDURE";
pub const ENV_MAINTENANCE: &str = "FRENTES_MAINTENANCE";
pub const ENV_START_PROCEDURE: &str = "FRENTES_START_PROCEDURE";
/// Optional structured JSON export of extracted activities.
pub const ENV_JSON: &str = "FRENTES_JSON";

const DEFAULT_REPORT: &str = "data/Project/report.csv";
const DEFAULT_FLATTENED: &str = "data/csv/frentes_filtrado.csv";
const DEFAULT_CLEANED: &str = "data/csv/frentes_filtrado_corrigido.csv";
// Block 0 (the last segment of the report) has always landed in
// procedimento_partida.csv; see DESIGN.md.
const DEFAULT_STOP_PROCEDURE: &str = "data/csv/procedimento_partida.csv";
const DEFAULT_MAINTENANCE: &str = "data/csv/manutencao.csv";
const DEFAULT_START_PROCEDURE: &str = "data/csv/procedimento_parada.csv";

/// Input and output of a single-file stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl StageConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }
}

/// Extraction stage paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Also write activities as structured JSON
    pub json_path: Option<PathBuf>,
}

impl ExtractConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            json_path: None,
        }
    }

    pub fn with_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_path = Some(path.into());
        self
    }
}

/// One output file per procedure segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOutputs {
    pub stop_procedure: PathBuf,
    pub maintenance: PathBuf,
    pub start_procedure: PathBuf,
}

impl BlockOutputs {
    /// Outputs named after each segment key inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            stop_procedure: dir.join(format!("{}.csv", Segment::StopProcedure.key())),
            maintenance: dir.join(format!("{}.csv", Segment::Maintenance.key())),
            start_procedure: dir.join(format!("{}.csv", Segment::StartProcedure.key())),
        }
    }

    pub fn path_for(&self, segment: Segment) -> &Path {
        match segment {
            Segment::StopProcedure => &self.stop_procedure,
            Segment::Maintenance => &self.maintenance,
            Segment::StartProcedure => &self.start_procedure,
        }
    }
}

/// Partition stage paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub input_path: PathBuf,
    pub outputs: BlockOutputs,
}

/// Paths for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub extract: ExtractConfig,
    pub cleanup: StageConfig,
    pub partition: PartitionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract: ExtractConfig::new(DEFAULT_REPORT, DEFAULT_FLATTENED),
            cleanup: StageConfig::new(DEFAULT_FLATTENED, DEFAULT_CLEANED),
            partition: PartitionConfig {
                input_path: PathBuf::from(DEFAULT_CLEANED),
                outputs: BlockOutputs {
                    stop_procedure: PathBuf::from(DEFAULT_STOP_PROCEDURE),
                    maintenance: PathBuf::from(DEFAULT_MAINTENANCE),
                    start_procedure: PathBuf::from(DEFAULT_START_PROCEDURE),
                },
            },
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by the process environment (and `.env`, if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_vars(|key| env::var(key).ok());
        config
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        if let Some(p) = var(ENV_REPORT) {
            self.extract.input_path = p;
        }
        if let Some(p) = var(ENV_FLATTENED) {
            self.set_flattened(p);
        }
        if let Some(p) = var(ENV_CLEANED) {
            self.set_cleaned(p);
        }
        if let Some(p) = var(ENV_STOP_PROCEDURE) {
            self.partition.outputs.stop_procedure = p;
        }
        if let Some(p) = var(ENV_MAINTENANCE) {
            self.partition.outputs.maintenance = p;
        }
        if let Some(p) = var(ENV_START_PROCEDURE) {
            self.partition.outputs.start_procedure = p;
        }
        if let Some(p) = var(ENV_JSON) {
            self.extract.json_path = Some(p);
        }
    }

    /// Point extract output and cleanup input at the same file.
    pub fn set_flattened(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.extract.output_path = path.clone();
        self.cleanup.input_path = path;
    }

    /// Point cleanup output and partition input at the same file.
    pub fn set_cleaned(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.cleanup.output_path = path.clone();
        self.partition.input_path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_chain_stages() {
        let config = PipelineConfig::default();
        assert_eq!(config.extract.output_path, config.cleanup.input_path);
        assert_eq!(config.cleanup.output_path, config.partition.input_path);
        assert!(config.extract.json_path.is_none());
    }

    #[test]
    fn test_default_block_destinations() {
        let outputs = PipelineConfig::default().partition.outputs;
        assert_eq!(
            outputs.path_for(Segment::StopProcedure),
            Path::new("data/csv/procedimento_partida.csv")
        );
        assert_eq!(outputs.path_for(Segment::Maintenance), Path::new("data/csv/manutencao.csv"));
        assert_eq!(
            outputs.path_for(Segment::StartProcedure),
            Path::new("data/csv/procedimento_parada.csv")
        );
    }

    #[test]
    fn test_env_overrides_keep_stages_linked() {
        let env = vars(&[
            (ENV_REPORT, "in/report.csv"),
            (ENV_FLATTENED, "tmp/flat.csv"),
            (ENV_CLEANED, "tmp/clean.csv"),
            (ENV_MAINTENANCE, "out/m.csv"),
            (ENV_JSON, "out/activities.json"),
        ]);
        let mut config = PipelineConfig::default();
        config.apply_vars(|k| env.get(k).cloned());

        assert_eq!(config.extract.input_path, PathBuf::from("in/report.csv"));
        assert_eq!(config.extract.output_path, PathBuf::from("tmp/flat.csv"));
        assert_eq!(config.cleanup.input_path, PathBuf::from("tmp/flat.csv"));
        assert_eq!(config.cleanup.output_path, PathBuf::from("tmp/clean.csv"));
        assert_eq!(config.partition.input_path, PathBuf::from("tmp/clean.csv"));
        assert_eq!(config.partition.outputs.maintenance, PathBuf::from("out/m.csv"));
        assert_eq!(config.extract.json_path, Some(PathBuf::from("out/activities.json")));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let env = vars(&[(ENV_REPORT, "  ")]);
        let mut config = PipelineConfig::default();
        config.apply_vars(|k| env.get(k).cloned());
        assert_eq!(config.extract.input_path, PathBuf::from(DEFAULT_REPORT));
    }

    #[test]
    fn test_outputs_in_dir() {
        let outputs = BlockOutputs::in_dir("out");
        assert_eq!(outputs.stop_procedure, PathBuf::from("out/parada.csv"));
        assert_eq!(outputs.maintenance, PathBuf::from("out/manutencao.csv"));
        assert_eq!(outputs.start_procedure, PathBuf::from("out/partida.csv"));
    }
}
