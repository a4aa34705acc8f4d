use crate::image::io::{load_flow, load_mask};
use crate::image::ResizeMode;
use crate::smoother::{InitFill, Mode, SmoothingParams};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct SmoothToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub params: SmoothingParams,
    #[serde(default)]
    pub mode: ModeConfig,
    pub output: SmoothOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct SmoothOutputConfig {
    pub image: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

/// File-backed description of a [`Mode`].
#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModeConfig {
    #[default]
    Restore,
    Inpaint {
        mask: PathBuf,
        #[serde(default)]
        init: InitFill,
        #[serde(default)]
        dilation: usize,
    },
    Resize {
        width: usize,
        height: usize,
        #[serde(default = "default_anchor")]
        anchor_original_pixels: bool,
        #[serde(default)]
        interpolation: ResizeMode,
    },
    VisualizeFlow {
        flow: PathBuf,
    },
}

fn default_anchor() -> bool {
    true
}

impl ModeConfig {
    /// Load the referenced mask / flow files and build the runtime mode.
    /// Relative paths are resolved against `base`.
    pub fn load(&self, base: &Path) -> Result<Mode, String> {
        Ok(match self {
            ModeConfig::Restore => Mode::Restore,
            ModeConfig::Inpaint {
                mask,
                init,
                dilation,
            } => Mode::Inpaint {
                mask: load_mask(&base.join(mask))?,
                init: *init,
                dilation: *dilation,
            },
            ModeConfig::Resize {
                width,
                height,
                anchor_original_pixels,
                interpolation,
            } => Mode::Resize {
                width: *width,
                height: *height,
                anchor_original_pixels: *anchor_original_pixels,
                interpolation: *interpolation,
            },
            ModeConfig::VisualizeFlow { flow } => Mode::VisualizeFlow {
                flow: load_flow(&base.join(flow))?,
            },
        })
    }
}

pub fn load_config(path: &Path) -> Result<SmoothToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
