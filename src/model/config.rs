use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 30.0;
pub const DEFAULT_THRESHOLD: f64 = 0.0001;
pub const DEFAULT_FRAME_LIMIT: usize = 170;
pub const REFERENCE_BOTTOM_MEAN: f64 = 100.0;
pub const REFERENCE_BOTTOM_STD: f64 = 40.0;

const STRAIN_DIR_TEMPLATE: &str = "2025_02_19_{id}_80mW30ms";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the dim ("bottom") pixel population of a frame is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BottomPopulation {
    /// The lowest `1 - q` fraction of the frame's own pixels.
    Symmetric,
    /// An assumed background floor that ignores the frame's dim pixels.
    FixedReference { mean: f64, std: f64 },
}

impl BottomPopulation {
    pub fn reference_v1() -> Self {
        BottomPopulation::FixedReference {
            mean: REFERENCE_BOTTOM_MEAN,
            std: REFERENCE_BOTTOM_STD,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            BottomPopulation::Symmetric => "symmetric".to_string(),
            BottomPopulation::FixedReference { mean, std } => {
                format!("fixed-reference (mean={mean}, std={std})")
            }
        }
    }
}

/// Directory convention used to locate acquisition files under the data root.
///
/// `strain_dir` may contain `{id}`, which is replaced with the group id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AcquisitionLayout {
    /// `<root>/<strain_dir>/<base_name><n>/<base_name><n><file_suffix>`
    Replicates {
        strain_dir: String,
        base_name: String,
        file_suffix: String,
    },
    /// `<root>/<strain_dir>/Crops<ID>/Crop<n><file_suffix>`
    Crops {
        strain_dir: String,
        file_suffix: String,
    },
}

impl AcquisitionLayout {
    pub fn name(&self) -> &'static str {
        match self {
            AcquisitionLayout::Replicates { .. } => "replicates",
            AcquisitionLayout::Crops { .. } => "crops",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Triangle,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureStyle {
    pub group_figure: String,
    pub average_figure: String,
    pub group_title: String,
    pub average_title: String,
    /// Legend label for one acquisition; `{n}` is the replicate or crop number.
    pub replicate_label: String,
    pub marker: MarkerShape,
}

/// One strain: its id, display label and replicate numbers, in plotting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub id: String,
    pub label: String,
    pub members: Vec<u32>,
}

impl GroupSpec {
    pub fn new(id: &str, label: &str, members: Vec<u32>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            members,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub frame_interval_ms: f64,
    pub threshold: f64,
    pub frame_limit: usize,
    pub bottom: BottomPopulation,
    pub layout: AcquisitionLayout,
    pub groups: Vec<GroupSpec>,
    pub figures: FigureStyle,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::replicates_v1()
    }
}

impl ExperimentConfig {
    /// Full-sensor acquisitions, three replicates per strain, symmetric bottom population.
    pub fn replicates_v1() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            threshold: DEFAULT_THRESHOLD,
            frame_limit: DEFAULT_FRAME_LIMIT,
            bottom: BottomPopulation::Symmetric,
            layout: AcquisitionLayout::Replicates {
                strain_dir: STRAIN_DIR_TEMPLATE.to_string(),
                base_name: "FluorecenseYeastFullSensor80mW_".to_string(),
                file_suffix: "_MMStack_Pos0.ome.tif".to_string(),
            },
            groups: vec![
                GroupSpec::new("y2", "LH4409", vec![1, 2, 3]),
                GroupSpec::new("y4", "LH4591", vec![1, 2, 3]),
                GroupSpec::new("y5", "LH4592", vec![1, 2]),
                GroupSpec::new("y7", "LH4832", vec![1, 2, 3]),
            ],
            figures: FigureStyle {
                group_figure: "figure_group_subplots.svg".to_string(),
                average_figure: "figure_group_averages.svg".to_string(),
                group_title: "Contrast Across Time".to_string(),
                average_title: "Averaged Contrast Across Time".to_string(),
                replicate_label: "Group {n} Ratio".to_string(),
                marker: MarkerShape::Triangle,
            },
        }
    }

    /// Single-cell crops, fixed background reference.
    pub fn crops_v1() -> Self {
        let crops = |n: u32| (1..=n).collect::<Vec<_>>();
        Self {
            bottom: BottomPopulation::reference_v1(),
            layout: AcquisitionLayout::Crops {
                strain_dir: STRAIN_DIR_TEMPLATE.to_string(),
                file_suffix: ".ome".to_string(),
            },
            groups: vec![
                GroupSpec::new("y2", "LH4409", crops(8)),
                GroupSpec::new("y4", "LH4591", crops(9)),
                GroupSpec::new("y5", "LH4592", crops(7)),
                GroupSpec::new("y7", "LH4832", crops(5)),
            ],
            figures: FigureStyle {
                group_figure: "crop_group_ratios.svg".to_string(),
                average_figure: "crop_group_averages.svg".to_string(),
                group_title: "Contrast Across Time".to_string(),
                average_title: "Averaged Contrast each yeast strain".to_string(),
                replicate_label: "Crop{n}".to_string(),
                marker: MarkerShape::Circle,
            },
            ..Self::replicates_v1()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "threshold must lie in (0, 1), got {}",
                self.threshold
            )));
        }
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "frame_interval_ms must be positive, got {}",
                self.frame_interval_ms
            )));
        }
        if self.frame_limit == 0 {
            return Err(ConfigError::Invalid(
                "frame_limit must be at least 1".to_string(),
            ));
        }
        if let BottomPopulation::FixedReference { mean, std } = self.bottom {
            if !mean.is_finite() || !std.is_finite() || std < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "fixed reference needs finite mean and non-negative std, got mean={mean}, std={std}"
                )));
            }
        }
        if self.groups.is_empty() {
            return Err(ConfigError::Invalid("no groups configured".to_string()));
        }
        let mut seen = BTreeSet::new();
        for group in &self.groups {
            if group.id.trim().is_empty() {
                return Err(ConfigError::Invalid("group with empty id".to_string()));
            }
            if !seen.insert(group.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate group id {}",
                    group.id
                )));
            }
            if group.members.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "group {} has no members",
                    group.id
                )));
            }
        }
        Ok(())
    }

    /// Display label for one acquisition of a group.
    pub fn replicate_label(&self, member: u32) -> String {
        self.figures
            .replicate_label
            .replace("{n}", &member.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/config.rs"]
mod tests;
