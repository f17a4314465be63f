//! Directory-to-directory conversion for native hosts.

use crate::config::RetargetConfig;
use crate::joint_names::BoneRenaming;
use crate::retarget::retarget;
use crate::scene::Scene;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    pub config: RetargetConfig,
    /// Renaming applied to each scene before conversion
    pub renaming: BoneRenaming,
}

impl BatchOptions {
    /// Config with the knee/foot defaults of the renamed rig
    fn effective_config(&self) -> RetargetConfig {
        let mut config = self.config.clone();
        if self.renaming == BoneRenaming::Unreal {
            config.joint_naming = self.renaming.naming();
        }
        config
    }
}

/// `*.json` files directly inside `dir`, sorted by path.
fn scene_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn convert_file(
    path: &Path,
    dest_dir: &Path,
    options: &BatchOptions,
    config: &RetargetConfig,
) -> Result<PathBuf> {
    let mut scene = Scene::from_json(&fs::read_to_string(path)?)?;
    scene.apply_renaming(options.renaming)?;
    retarget(&mut scene, config)?;

    let file_name = path.file_name().unwrap_or_default();
    let out = dest_dir.join(file_name);
    fs::write(&out, scene.to_json_string()?)?;
    Ok(out)
}

/// Convert every scene in `source_dir`, writing results under the same file
/// name into `dest_dir`. A file that fails is logged and skipped.
///
/// Returns the number of scene files attempted.
pub fn batch_convert(source_dir: &Path, dest_dir: &Path, options: &BatchOptions) -> Result<usize> {
    let files = scene_files(source_dir)?;
    fs::create_dir_all(dest_dir)?;
    let config = options.effective_config();

    let mut converted = 0usize;
    for path in &files {
        match convert_file(path, dest_dir, options, &config) {
            Ok(out) => {
                converted += 1;
                log::info!("converted {} -> {}", path.display(), out.display());
            }
            Err(err) => log::error!("skipping {}: {}", path.display(), err),
        }
    }

    log::info!(
        "batch finished: {} of {} scenes converted",
        converted,
        files.len()
    );
    Ok(files.len())
}
