use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_VOCABULARY: [(&str, &str); 8] = [
    ("api", "API Integration"),
    ("database", "Data Processing"),
    ("user", "User Workflow"),
    ("process", "Process Flow"),
    ("decision", "Decision Flow"),
    ("data", "Data Pipeline"),
    ("output", "Output Process"),
    ("input", "Input Handler"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupingConfig {
    /// Two members whose y differs by at most this much share a row.
    pub row_tolerance: f64,
    pub min_members: usize,
    /// Labels shorter than this many chars never name a workflow through the
    /// label rule.
    pub min_label_chars: usize,
    /// Trim labels before the non-empty and length checks. Off by default, so
    /// labels are tested and returned exactly as written.
    pub trim_labels: bool,
    pub frame_type: String,
    pub user_type: String,
    pub generated_id_prefix: String,
    pub fallback_name: String,
    pub vocabulary: BTreeMap<String, String>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 50.0,
            min_members: 2,
            min_label_chars: 3,
            trim_labels: false,
            frame_type: "kframe".to_string(),
            user_type: "user".to_string(),
            generated_id_prefix: "node".to_string(),
            fallback_name: "Workflow".to_string(),
            vocabulary: default_vocabulary(),
        }
    }
}

impl GroupingConfig {
    pub fn name_for_kind(&self, kind: &str) -> &str {
        self.vocabulary
            .get(kind)
            .map(String::as_str)
            .unwrap_or(&self.fallback_name)
    }
}

pub fn default_vocabulary() -> BTreeMap<String, String> {
    DEFAULT_VOCABULARY
        .iter()
        .map(|(kind, name)| (kind.to_string(), name.to_string()))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub grouping: GroupingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    grouping: Option<GroupingFile>,
    output: Option<OutputFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GroupingFile {
    row_tolerance: Option<f64>,
    min_members: Option<usize>,
    min_label_chars: Option<usize>,
    trim_labels: Option<bool>,
    frame_type: Option<String>,
    user_type: Option<String>,
    generated_id_prefix: Option<String>,
    fallback_name: Option<String>,
    vocabulary: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize, Default)]
struct OutputFile {
    pretty: Option<bool>,
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
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(vars) = parsed.grouping {
        let grouping = &mut config.grouping;
        if let Some(v) = vars.row_tolerance {
            if !v.is_finite() || v < 0.0 {
                anyhow::bail!("rowTolerance must be a non-negative number, got {v}");
            }
            grouping.row_tolerance = v;
        }
        if let Some(v) = vars.min_members {
            // A single node is never a workflow.
            grouping.min_members = v.max(2);
        }
        if let Some(v) = vars.min_label_chars {
            grouping.min_label_chars = v;
        }
        if let Some(v) = vars.trim_labels {
            grouping.trim_labels = v;
        }
        if let Some(v) = vars.frame_type {
            grouping.frame_type = v;
        }
        if let Some(v) = vars.user_type {
            grouping.user_type = v;
        }
        if let Some(v) = vars.generated_id_prefix {
            grouping.generated_id_prefix = v;
        }
        if let Some(v) = vars.fallback_name {
            grouping.fallback_name = v;
        }
        if let Some(entries) = vars.vocabulary {
            grouping.vocabulary.extend(entries);
        }
    }

    if let Some(output) = parsed.output {
        if let Some(v) = output.pretty {
            config.output.pretty = v;
        }
    }

    Ok(config)
}
