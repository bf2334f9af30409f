use flow_layout::{Config, layout_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowLayoutOptions {
    step_width: Option<f32>,
    step_height: Option<f32>,
    horizontal_gap: Option<f32>,
    vertical_gap: Option<f32>,
    pretty: Option<bool>,
}

fn build_config(options: FlowLayoutOptions) -> Config {
    let mut config = Config::default();
    config.dump.pretty = options.pretty.unwrap_or(false);
    if let Some(v) = options.step_width {
        config.layout.step_width = v;
    }
    if let Some(v) = options.step_height {
        config.layout.step_height = v;
    }
    if let Some(v) = options.horizontal_gap {
        config.layout.horizontal_gap = v;
    }
    if let Some(v) = options.vertical_gap {
        config.layout.vertical_gap = v;
    }
    config
}

#[wasm_bindgen]
pub fn layout_flow(flow_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FlowLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FlowLayoutOptions::default()
    };

    layout_json(flow_json, &build_config(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
