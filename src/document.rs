use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GroupingConfig;
use crate::error::DocumentError;
use crate::ir::{Edge, Node, Position};
use crate::workflow::{Grouping, WorkflowSignature, group_workflows_with};

/// Nodes and edges of one canvas, plus the workflow names the user assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentFile", rename_all = "camelCase")]
pub struct FlowDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub workflow_names: BTreeMap<WorkflowSignature, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentFile {
    #[serde(default)]
    nodes: Vec<NodeFile>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    workflow_names: BTreeMap<WorkflowSignature, String>,
}

/// Canvas editors keep the label under `data`; flat documents keep it inline.
#[derive(Debug, Deserialize)]
struct NodeFile {
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    data: Option<NodeData>,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
struct NodeData {
    #[serde(default)]
    label: Option<String>,
}

impl From<NodeFile> for Node {
    fn from(raw: NodeFile) -> Self {
        Node {
            id: raw.id,
            kind: raw.kind,
            label: raw.label.or_else(|| raw.data.and_then(|data| data.label)),
            position: raw.position,
            hidden: raw.hidden,
        }
    }
}

impl From<DocumentFile> for FlowDocument {
    fn from(raw: DocumentFile) -> Self {
        FlowDocument {
            nodes: raw.nodes.into_iter().map(Node::from).collect(),
            edges: raw.edges,
            workflow_names: raw.workflow_names,
        }
    }
}

impl FlowDocument {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            workflow_names: BTreeMap::new(),
        }
    }

    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, DocumentError> {
        let out = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(out)
    }

    /// Checks id uniqueness. Grouping tolerates broken topology but callers
    /// persisting documents should not.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(DocumentError::EmptyNodeId { index });
            }
            if !seen.insert(node.id.as_str()) {
                return Err(DocumentError::DuplicateNodeId(node.id.clone()));
            }
        }
        seen.clear();
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.id.is_empty() {
                return Err(DocumentError::EmptyEdgeId { index });
            }
            if !seen.insert(edge.id.as_str()) {
                return Err(DocumentError::DuplicateEdgeId(edge.id.clone()));
            }
        }
        Ok(())
    }

    /// Groups the document and applies stored names.
    pub fn group(&self, config: &GroupingConfig) -> Grouping<'_> {
        let mut grouping = group_workflows_with(&self.nodes, &self.edges, config);
        grouping.apply_names(&self.workflow_names);
        grouping
    }

    /// Stores a name for the workflow with this signature. A blank name clears
    /// it. Returns the previous name.
    pub fn rename_workflow(
        &mut self,
        signature: &WorkflowSignature,
        name: &str,
    ) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return self.clear_workflow_name(signature);
        }
        debug!(workflow = %signature, new_name = name, "renamed workflow");
        self.workflow_names
            .insert(signature.clone(), name.to_string())
    }

    pub fn clear_workflow_name(&mut self, signature: &WorkflowSignature) -> Option<String> {
        self.workflow_names.remove(signature)
    }

    /// Sets `hidden` on every member node. Returns how many nodes changed.
    pub fn set_workflow_hidden(&mut self, signature: &WorkflowSignature, hidden: bool) -> usize {
        let members: HashSet<String> = signature.node_ids().into_iter().collect();
        let mut changed = 0usize;
        for node in self.nodes.iter_mut() {
            if members.contains(&node.id) && node.hidden != hidden {
                node.hidden = hidden;
                changed += 1;
            }
        }
        debug!(workflow = %signature, hidden, changed, "toggled workflow visibility");
        changed
    }

    /// Removes the member nodes and every edge touching them, along with the
    /// stored name. Returns `(nodes_removed, edges_removed)`.
    pub fn delete_workflow(&mut self, signature: &WorkflowSignature) -> (usize, usize) {
        let members: HashSet<String> = signature.node_ids().into_iter().collect();
        let nodes_before = self.nodes.len();
        self.nodes.retain(|node| !members.contains(&node.id));
        let edges_before = self.edges.len();
        self.edges
            .retain(|edge| !members.contains(&edge.source) && !members.contains(&edge.target));
        self.workflow_names.remove(signature);

        let removed = (nodes_before - self.nodes.len(), edges_before - self.edges.len());
        debug!(
            workflow = %signature,
            nodes = removed.0,
            edges = removed.1,
            "deleted workflow"
        );
        removed
    }
}
