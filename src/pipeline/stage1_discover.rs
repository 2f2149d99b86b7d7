use std::path::{Path, PathBuf};

use crate::input::StackSource;
use crate::model::config::{AcquisitionLayout, ExperimentConfig, GroupSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    pub member: u32,
    pub label: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    pub id: String,
    pub label: String,
    pub acquisitions: Vec<Acquisition>,
    pub missing: Vec<PathBuf>,
}

pub fn strain_dir(template: &str, group_id: &str) -> String {
    template.replace("{id}", group_id)
}

pub fn acquisition_path(
    root: &Path,
    layout: &AcquisitionLayout,
    group_id: &str,
    member: u32,
) -> PathBuf {
    match layout {
        AcquisitionLayout::Replicates {
            strain_dir: template,
            base_name,
            file_suffix,
        } => {
            let subfolder = format!("{base_name}{member}");
            root.join(strain_dir(template, group_id))
                .join(&subfolder)
                .join(format!("{subfolder}{file_suffix}"))
        }
        AcquisitionLayout::Crops {
            strain_dir: template,
            file_suffix,
        } => root
            .join(strain_dir(template, group_id))
            .join(format!("Crops{}", group_id.to_uppercase()))
            .join(format!("Crop{member}{file_suffix}")),
    }
}

/// Expands every configured group into the acquisition files that exist under `root`.
/// Missing files are logged and left out.
pub fn run_stage1(
    root: &Path,
    config: &ExperimentConfig,
    source: &dyn StackSource,
) -> Vec<GroupPlan> {
    config
        .groups
        .iter()
        .map(|group| plan_group(root, config, group, source))
        .collect()
}

fn plan_group(
    root: &Path,
    config: &ExperimentConfig,
    group: &GroupSpec,
    source: &dyn StackSource,
) -> GroupPlan {
    let mut acquisitions = Vec::with_capacity(group.members.len());
    let mut missing = Vec::new();
    for &member in &group.members {
        let path = acquisition_path(root, &config.layout, &group.id, member);
        if !source.exists(&path) {
            tracing::warn!("file not found: {}", path.display());
            missing.push(path);
            continue;
        }
        acquisitions.push(Acquisition {
            member,
            label: config.replicate_label(member),
            path,
        });
    }
    GroupPlan {
        id: group.id.clone(),
        label: group.label.clone(),
        acquisitions,
        missing,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_discover.rs"]
mod tests;
