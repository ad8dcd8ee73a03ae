use flow_workflows::config::parse_config;
use flow_workflows::{Config, group_document_json};
use wasm_bindgen::prelude::*;

/// Options use the config-file shape (`{"grouping": {...}, "output": {...}}`),
/// so every grouping setting is reachable from the browser. Output is compact
/// unless the options ask for `pretty`.
fn build_config(options_json: Option<&str>) -> anyhow::Result<Config> {
    match options_json {
        Some(raw) => parse_config(raw),
        None => {
            let mut config = Config::default();
            config.output.pretty = false;
            Ok(config)
        }
    }
}

#[wasm_bindgen]
pub fn group_flow_json(document_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(options_json.as_deref())
        .map_err(|error| JsValue::from_str(&error.to_string()))?;

    group_document_json(document_json, &config)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use flow_workflows::group_document_json;

    use crate::build_config;

    const DOCUMENT: &str = r#"{
        "nodes": [
            {"id": "h1", "type": "webhook", "position": {"x": 0, "y": 0}},
            {"id": "h2", "type": "webhook", "position": {"x": 200, "y": 10}},
            {"id": "solo", "type": "api"}
        ],
        "edges": [{"id": "e1", "source": "h1", "target": "h2"}]
    }"#;

    #[test]
    fn groups_canvas_document_with_custom_vocabulary() {
        let config = build_config(Some(r#"{"grouping":{"vocabulary":{"webhook":"Webhooks"}}}"#))
            .expect("options should parse");

        let json = group_document_json(DOCUMENT, &config).expect("canvas document should group");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["workflows"][0]["name"], "Webhooks");
        assert_eq!(value["ungroupedNodes"][0], "solo");
    }

    #[test]
    fn every_grouping_setting_is_reachable() {
        let config = build_config(Some(
            r#"{"grouping":{"minMembers":3,"minLabelChars":5,"trimLabels":true,
                "frameType":"frame","userType":"person","generatedIdPrefix":"gen"}}"#,
        ))
        .expect("options should parse");
        assert_eq!(config.grouping.min_members, 3);
        assert_eq!(config.grouping.min_label_chars, 5);
        assert!(config.grouping.trim_labels);
        assert_eq!(config.grouping.frame_type, "frame");
        assert_eq!(config.grouping.user_type, "person");
        assert_eq!(config.grouping.generated_id_prefix, "gen");

        let json = group_document_json(DOCUMENT, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["workflows"].as_array().unwrap().len(), 0);
        assert_eq!(value["ungroupedNodes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn defaults_are_compact() {
        let config = build_config(None).unwrap();
        let json = group_document_json(DOCUMENT, &config).unwrap();
        assert_eq!(json.trim_end().lines().count(), 1);
    }
}
