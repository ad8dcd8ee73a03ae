//! Groups the nodes of a flow diagram into connected "workflows" and names
//! them for display in a layers panel.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod ir;
pub mod report;
pub mod workflow;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, GroupingConfig, load_config};
pub use document::FlowDocument;
pub use error::DocumentError;
pub use ir::{Edge, Node, Position};
pub use report::{GroupingReport, ReportFormat, render_text};
pub use workflow::{
    Grouping, Workflow, WorkflowId, WorkflowSignature, group_workflows, group_workflows_with,
};

/// Groups a JSON flow document and returns the JSON report.
pub fn group_document_json(document: &str, config: &Config) -> anyhow::Result<String> {
    let document = FlowDocument::from_json(document)?;
    let report = GroupingReport::from_grouping(&document.group(&config.grouping));
    report::format_report(&report, ReportFormat::Json, config.output.pretty)
}
