use crate::workflow::Grouping;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingReport {
    pub workflows: Vec<WorkflowDump>,
    pub ungrouped_nodes: Vec<String>,
    pub ungrouped_edges: Vec<String>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDump {
    pub id: String,
    pub sequence: usize,
    pub name: String,
    pub signature: String,
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
    pub hidden: bool,
}

impl GroupingReport {
    pub fn from_grouping(grouping: &Grouping<'_>) -> Self {
        let workflows = grouping
            .iter()
            .map(|workflow| WorkflowDump {
                id: workflow.id.to_string(),
                sequence: workflow.sequence,
                name: workflow.name.clone(),
                signature: workflow.signature().to_string(),
                nodes: workflow.nodes.iter().map(|node| node.id.clone()).collect(),
                edges: workflow.edges.iter().map(|edge| edge.id.clone()).collect(),
                hidden: workflow.is_hidden(),
            })
            .collect();

        GroupingReport {
            workflows,
            ungrouped_nodes: grouping
                .ungrouped_nodes
                .iter()
                .map(|node| node.id.clone())
                .collect(),
            ungrouped_edges: grouping
                .ungrouped_edges
                .iter()
                .map(|edge| edge.id.clone())
                .collect(),
            node_count: grouping.node_count(),
            edge_count: grouping.edge_count(),
        }
    }
}

pub fn render_text(report: &GroupingReport) -> String {
    let mut out = String::new();
    for workflow in &report.workflows {
        let _ = write!(
            out,
            "{} [{}] {} node(s), {} edge(s)",
            workflow.name,
            workflow.id,
            workflow.nodes.len(),
            workflow.edges.len()
        );
        if workflow.hidden {
            out.push_str(" (hidden)");
        }
        out.push('\n');
        for node in &workflow.nodes {
            let _ = writeln!(out, "  - {}", node);
        }
    }
    if !report.ungrouped_nodes.is_empty() {
        let _ = writeln!(out, "Ungrouped nodes: {}", report.ungrouped_nodes.join(", "));
    }
    if !report.ungrouped_edges.is_empty() {
        let _ = writeln!(out, "Ungrouped edges: {}", report.ungrouped_edges.join(", "));
    }
    let _ = writeln!(
        out,
        "{} workflow(s), {} node(s), {} edge(s)",
        report.workflows.len(),
        report.node_count,
        report.edge_count
    );
    out
}

pub fn format_report(report: &GroupingReport, format: ReportFormat, pretty: bool) -> Result<String> {
    let out = match format {
        ReportFormat::Text => render_text(report),
        ReportFormat::Json if pretty => serde_json::to_string_pretty(report)? + "\n",
        ReportFormat::Json => serde_json::to_string(report)? + "\n",
    };
    Ok(out)
}

pub fn write_report(
    report: &GroupingReport,
    format: ReportFormat,
    pretty: bool,
    output: Option<&Path>,
) -> Result<()> {
    let rendered = format_report(report, format, pretty)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
        }
        None => {
            print!("{}", rendered);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Edge, Node};
    use crate::workflow::group_workflows;

    #[test]
    fn text_report_lists_groups_and_leftovers() {
        let nodes = vec![
            Node::new("a").with_kind("api"),
            Node::new("b").with_kind("api"),
            Node::new("c"),
        ];
        let edges = vec![Edge::new("e1", "a", "b"), Edge::new("e2", "c", "gone")];
        let report = GroupingReport::from_grouping(&group_workflows(&nodes, &edges));
        let text = render_text(&report);
        assert!(text.starts_with("API Integration [workflow-0] 2 node(s), 1 edge(s)\n"));
        assert!(text.contains("Ungrouped nodes: c\n"));
        assert!(text.contains("Ungrouped edges: e2\n"));
        assert!(text.ends_with("1 workflow(s), 3 node(s), 2 edge(s)\n"));
    }

    #[test]
    fn json_report_uses_camel_case() {
        let nodes = vec![Node::new("a"), Node::new("b")];
        let edges = vec![Edge::new("e1", "a", "b")];
        let report = GroupingReport::from_grouping(&group_workflows(&nodes, &edges));
        let json = format_report(&report, ReportFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["workflows"][0]["id"], "workflow-0");
        assert_eq!(value["workflows"][0]["signature"], "a,b");
        assert_eq!(value["ungroupedNodes"].as_array().unwrap().len(), 0);
        assert_eq!(value["nodeCount"], 2);
    }
}
