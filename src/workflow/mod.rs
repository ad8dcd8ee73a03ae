//! Connected-component grouping of diagram nodes into named workflows.

mod naming;
mod ordering;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GroupingConfig;
use crate::ir::{Edge, Node};

use naming::workflow_name;
use ordering::layout_order;

/// Identifier assigned to a workflow for one grouping call. Orders by
/// sequence position; it is not stable across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct WorkflowId(usize);

impl WorkflowId {
    pub fn sequence(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "workflow-{}", self.0)
    }
}

impl From<WorkflowId> for String {
    fn from(id: WorkflowId) -> Self {
        id.to_string()
    }
}

/// Content-derived key of a workflow: its member node ids, sorted.
///
/// Unlike [`WorkflowId`] this survives regrouping as long as membership does
/// not change, so callers key renamed/collapsed/hidden state by it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowSignature(String);

impl WorkflowSignature {
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ids: Vec<&str> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        let mut out = String::new();
        for (idx, id) in ids.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            for ch in id.chars() {
                if ch == ',' || ch == '\\' {
                    out.push('\\');
                }
                out.push(ch);
            }
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Member ids encoded in the signature, sorted.
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        if self.0.is_empty() {
            return ids;
        }
        let mut current = String::new();
        let mut chars = self.0.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                ',' => ids.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            }
        }
        ids.push(current);
        ids
    }
}

impl fmt::Display for WorkflowSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow<'a> {
    pub id: WorkflowId,
    pub sequence: usize,
    pub name: String,
    /// Members in layout order (rows top to bottom, left to right).
    pub nodes: Vec<&'a Node>,
    /// Edges with both endpoints inside this workflow, in input order.
    pub edges: Vec<&'a Edge>,
}

impl Workflow<'_> {
    pub fn signature(&self) -> WorkflowSignature {
        WorkflowSignature::from_ids(self.nodes.iter().map(|node| node.id.as_str()))
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == node_id)
    }

    pub fn is_hidden(&self) -> bool {
        self.nodes.iter().all(|node| node.hidden)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping<'a> {
    pub workflows: BTreeMap<WorkflowId, Workflow<'a>>,
    pub ungrouped_nodes: Vec<&'a Node>,
    pub ungrouped_edges: Vec<&'a Edge>,
}

impl<'a> Grouping<'a> {
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    pub fn get(&self, id: WorkflowId) -> Option<&Workflow<'a>> {
        self.workflows.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workflow<'a>> {
        self.workflows.values()
    }

    pub fn find_by_signature(&self, signature: &WorkflowSignature) -> Option<&Workflow<'a>> {
        self.iter().find(|workflow| &workflow.signature() == signature)
    }

    pub fn workflow_of(&self, node_id: &str) -> Option<&Workflow<'a>> {
        self.iter().find(|workflow| workflow.contains_node(node_id))
    }

    /// Replaces generated names with caller-assigned ones. Returns how many
    /// workflows were renamed.
    pub fn apply_names(&mut self, names: &BTreeMap<WorkflowSignature, String>) -> usize {
        if names.is_empty() {
            return 0;
        }
        let mut renamed = 0usize;
        for workflow in self.workflows.values_mut() {
            if let Some(name) = names.get(&workflow.signature()) {
                workflow.name = name.clone();
                renamed += 1;
            }
        }
        renamed
    }

    pub fn node_count(&self) -> usize {
        self.iter().map(|workflow| workflow.nodes.len()).sum::<usize>() + self.ungrouped_nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.iter().map(|workflow| workflow.edges.len()).sum::<usize>() + self.ungrouped_edges.len()
    }
}

pub fn group_workflows<'a>(nodes: &'a [Node], edges: &'a [Edge]) -> Grouping<'a> {
    group_workflows_with(nodes, edges, &GroupingConfig::default())
}

pub fn group_workflows_with<'a>(
    nodes: &'a [Node],
    edges: &'a [Edge],
    config: &GroupingConfig,
) -> Grouping<'a> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        if index.contains_key(node.id.as_str()) {
            warn!(node = %node.id, "duplicate node id, treating later occurrence as isolated");
            continue;
        }
        index.insert(node.id.as_str(), idx);
    }
    let endpoints = |edge: &Edge| -> Option<(usize, usize)> {
        if edge.is_self_loop() {
            return None;
        }
        let from = *index.get(edge.source.as_str())?;
        let to = *index.get(edge.target.as_str())?;
        Some((from, to))
    };

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        if let Some((from, to)) = endpoints(edge) {
            adjacency[from].push(to);
            adjacency[to].push(from);
        }
    }

    let min_members = config.min_members.max(2);
    let mut visited = vec![false; nodes.len()];
    let mut workflow_of: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut ungrouped: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for seed in 0..nodes.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);
        let mut comp = Vec::new();
        while let Some(cur) = stack.pop() {
            comp.push(cur);
            for &next in &adjacency[cur] {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        if comp.len() < min_members {
            ungrouped.extend(comp);
            continue;
        }
        comp.sort_unstable();
        for &member in &comp {
            workflow_of[member] = Some(components.len());
        }
        components.push(comp);
    }
    ungrouped.sort_unstable();

    let mut component_edges: Vec<Vec<&'a Edge>> = vec![Vec::new(); components.len()];
    let mut ungrouped_edges = Vec::new();
    for edge in edges {
        let slot = endpoints(edge).and_then(|(from, to)| {
            let slot = workflow_of[from]?;
            (workflow_of[to] == Some(slot)).then_some(slot)
        });
        match slot {
            Some(slot) => component_edges[slot].push(edge),
            None => ungrouped_edges.push(edge),
        }
    }

    let mut workflows = BTreeMap::new();
    for (sequence, (comp, comp_edges)) in components.into_iter().zip(component_edges).enumerate() {
        let members: Vec<&'a Node> = comp.iter().map(|&idx| &nodes[idx]).collect();
        let id = WorkflowId(sequence);
        workflows.insert(
            id,
            Workflow {
                id,
                sequence,
                name: workflow_name(&members, config),
                nodes: layout_order(&members, config.row_tolerance),
                edges: comp_edges,
            },
        );
    }

    let grouping = Grouping {
        workflows,
        ungrouped_nodes: ungrouped.into_iter().map(|idx| &nodes[idx]).collect(),
        ungrouped_edges,
    };
    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        workflows = grouping.len(),
        ungrouped_nodes = grouping.ungrouped_nodes.len(),
        ungrouped_edges = grouping.ungrouped_edges.len(),
        "grouped workflows"
    );
    grouping
}
