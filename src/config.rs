use anyhow::{anyhow, Context, Result};
use burn::config::Config;

use crate::{render::RenderStyle, utils::env_opt};

pub const DEFAULT_DATASET: &str = "huggan/flowers-102-categories";

#[derive(Config, Debug)]
pub struct FlowConfig {
    #[config(default = "String::from(crate::config::DEFAULT_DATASET)")]
    pub dataset: String,
    /// Splits loaded alongside `split` and reported by the count step.
    #[config(default = "Vec::new()")]
    pub splits: Vec<String>,
    #[config(default = "String::from(\"train\")")]
    pub split: String,
    #[config(default = 70)]
    pub index: usize,
    #[config(default = "String::from(\"image\")")]
    pub field: String,
    #[config(default = "RenderStyle::Color")]
    pub style: RenderStyle,
    #[config(default = false)]
    pub show_axes: bool,
    #[config(default = true)]
    pub wait_for_key: bool,
    /// Write a PNG here instead of drawing to the terminal.
    #[config(default = "None")]
    pub save_to: Option<String>,
    #[config(default = "None")]
    pub base_dir: Option<String>,
    #[config(default = "None")]
    pub token: Option<String>,
    #[config(default = "None")]
    pub subset: Option<String>,
}

impl FlowConfig {
    /// Defaults, then the JSON file named by `FLOW_CONFIG`, then the
    /// individual environment variables.
    pub fn from_env() -> Result<Self> {
        let config = match env_opt("FLOW_CONFIG") {
            Some(path) => Self::load(path.as_str())
                .map_err(|err| anyhow!("{err}"))
                .with_context(|| format!("loading config file `{path}`"))?,
            None => Self::new(),
        };
        config.with_env_overrides(env_opt)
    }

    /// Applies overrides looked up through `var`, so tests can feed a map
    /// instead of the process environment.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(dataset) = var("DATASET_ID") {
            self.dataset = dataset;
        }
        if let Some(splits) = var("DATASET_SPLITS") {
            self.splits = splits
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Some(split) = var("DATASET_SPLIT") {
            self.split = split;
        }
        if let Some(index) = var("RECORD_INDEX") {
            self.index = index
                .parse()
                .with_context(|| format!("parsing RECORD_INDEX `{index}`"))?;
        }
        if let Some(field) = var("IMAGE_FIELD") {
            self.field = field;
        }
        if let Some(style) = var("RENDER_STYLE") {
            self.style = style.parse()?;
        }
        if let Some(show_axes) = var("SHOW_AXES") {
            self.show_axes = parse_bool("SHOW_AXES", &show_axes)?;
        }
        if let Some(wait) = var("WAIT_FOR_KEY") {
            self.wait_for_key = parse_bool("WAIT_FOR_KEY", &wait)?;
        }
        if let Some(path) = var("SAVE_TO") {
            self.save_to = Some(path);
        }
        if let Some(base_dir) = var("DB_BASE_DIR") {
            self.base_dir = Some(base_dir);
        }
        if let Some(token) = var("HF_TOKEN") {
            self.token = Some(token);
        }
        if let Some(subset) = var("DATASET_SUBSET") {
            self.subset = Some(subset);
        }
        Ok(self)
    }

    /// Every split to load; the selected split is always part of it.
    pub fn split_names(&self) -> Vec<String> {
        let mut splits = self.splits.clone();
        if !splits.contains(&self.split) {
            splits.push(self.split.clone());
        }
        splits
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("`{key}` should be a boolean, got `{value}`")),
    }
}
