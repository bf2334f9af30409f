use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spacing and size table the flow builder lays steps out with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub step_width: f32,
    pub step_height: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    /// Radius of the loop/router corner arcs. Only the renderer draws them,
    /// but the child offsets below are derived from it.
    pub arc_length: f32,
    pub label_height: f32,
    pub big_add_button_width: f32,
    pub big_add_button_height: f32,
    /// Loop/router nesting levels allowed. Chain length is not limited.
    pub max_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            step_width: 232.0,
            step_height: 60.0,
            horizontal_gap: 80.0,
            vertical_gap: 60.0,
            arc_length: 15.0,
            label_height: 30.0,
            big_add_button_width: 50.0,
            big_add_button_height: 50.0,
            max_depth: 64,
        }
    }
}

impl LayoutConfig {
    pub fn loop_child_vertical_offset(&self) -> f32 {
        1.5 * self.vertical_gap + 2.0 * self.arc_length
    }

    pub fn router_child_vertical_offset(&self) -> f32 {
        self.loop_child_vertical_offset() + self.label_height
    }
}

/// Config values with the two child offsets resolved up front.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMetrics {
    pub step_width: f32,
    pub step_height: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub big_add_button_width: f32,
    pub big_add_button_height: f32,
    pub loop_child_vertical_offset: f32,
    pub router_child_vertical_offset: f32,
    pub max_depth: usize,
}

impl LayoutMetrics {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            step_width: config.step_width,
            step_height: config.step_height,
            horizontal_gap: config.horizontal_gap,
            vertical_gap: config.vertical_gap,
            big_add_button_width: config.big_add_button_width,
            big_add_button_height: config.big_add_button_height,
            loop_child_vertical_offset: config.loop_child_vertical_offset(),
            router_child_vertical_offset: config.router_child_vertical_offset(),
            max_depth: config.max_depth,
        }
    }

    /// Width of one branch column: a step plus the gap to its right neighbour.
    pub fn branch_column_width(&self) -> f32 {
        self.step_width + self.horizontal_gap
    }
}

pub static DEFAULT_METRICS: Lazy<LayoutMetrics> =
    Lazy::new(|| LayoutMetrics::new(&LayoutConfig::default()));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    pub pretty: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub dump: DumpConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    pretty: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    step_width: Option<f32>,
    step_height: Option<f32>,
    horizontal_gap: Option<f32>,
    vertical_gap: Option<f32>,
    arc_length: Option<f32>,
    label_height: Option<f32>,
    big_add_button_width: Option<f32>,
    big_add_button_height: Option<f32>,
    max_depth: Option<usize>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.step_width {
            config.layout.step_width = v;
        }
        if let Some(v) = layout.step_height {
            config.layout.step_height = v;
        }
        if let Some(v) = layout.horizontal_gap {
            config.layout.horizontal_gap = v;
        }
        if let Some(v) = layout.vertical_gap {
            config.layout.vertical_gap = v;
        }
        if let Some(v) = layout.arc_length {
            config.layout.arc_length = v;
        }
        if let Some(v) = layout.label_height {
            config.layout.label_height = v;
        }
        if let Some(v) = layout.big_add_button_width {
            config.layout.big_add_button_width = v;
        }
        if let Some(v) = layout.big_add_button_height {
            config.layout.big_add_button_height = v;
        }
        if let Some(v) = layout.max_depth {
            config.layout.max_depth = v;
        }
    }

    if let Some(v) = parsed.pretty {
        config.dump.pretty = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_offsets_follow_defaults() {
        let metrics = &*DEFAULT_METRICS;
        assert_eq!(metrics.loop_child_vertical_offset, 120.0);
        assert_eq!(metrics.router_child_vertical_offset, 150.0);
        assert_eq!(metrics.branch_column_width(), 312.0);
    }

    #[test]
    fn derived_offsets_track_overrides() {
        let config = parse_config(
            r#"{
                // json5 comments are fine
                layout: { verticalGap: 40, arcLength: 10, labelHeight: 20 },
                pretty: false,
            }"#,
        )
        .unwrap();
        let metrics = LayoutMetrics::new(&config.layout);
        assert_eq!(metrics.loop_child_vertical_offset, 80.0);
        assert_eq!(metrics.router_child_vertical_offset, 100.0);
        assert_eq!(metrics.step_width, 232.0);
        assert!(!config.dump.pretty);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.max_depth, 64);
        assert!(config.dump.pretty);
    }
}
