//! Prerequisite graph shared by the job catalog and the card tree.
//!
//! Edges point from a node to the nodes it requires. Validation runs once at
//! catalog load; the traversals still carry their own cycle guard so a graph
//! built from unvalidated data fails with an error instead of recursing forever.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

/// A prerequisite id that does not name any node in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub node: String,
    pub missing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("prerequisite cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

pub struct PrereqGraph<'a> {
    order: Vec<&'a str>,
    edges: HashMap<&'a str, &'a [String]>,
}

impl<'a> PrereqGraph<'a> {
    /// Builds the graph from `(id, prerequisite ids)` pairs. Input order is kept
    /// for deterministic validation output. Later duplicates overwrite earlier ones;
    /// callers reject duplicate ids before building.
    pub fn new<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut order = Vec::new();
        let mut edges = HashMap::new();
        for (id, prereqs) in nodes {
            if edges.insert(id, prereqs).is_none() {
                order.push(id);
            }
        }
        Self { order, edges }
    }

    pub fn prerequisites(&self, id: &str) -> &'a [String] {
        self.edges.get(id).copied().unwrap_or(&[])
    }

    /// Every prerequisite reference that does not resolve, in input order.
    pub fn dangling(&self) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        for &node in &self.order {
            for prereq in self.prerequisites(node) {
                if !self.edges.contains_key(prereq.as_str()) {
                    out.push(DanglingReference {
                        node: node.to_string(),
                        missing: prereq.clone(),
                    });
                }
            }
        }
        out
    }

    /// Returns the first cycle found, as a closed walk (`a -> b -> a`).
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks = HashMap::new();
        for &node in &self.order {
            if marks.contains_key(node) {
                continue;
            }
            let mut stack = Vec::new();
            let mut sink = Vec::new();
            if let Err(GraphError::Cycle(cycle)) =
                self.visit(node, &mut marks, &mut stack, &mut sink)
            {
                return Some(cycle);
            }
        }
        None
    }

    /// Post-order walk from `target`: every prerequisite precedes the nodes that
    /// require it, each node appears once, and `target` is last.
    pub fn path_to(&self, target: &str) -> Result<Vec<&'a str>, GraphError> {
        let (&key, _) = self
            .edges
            .get_key_value(target)
            .ok_or_else(|| GraphError::UnknownNode(target.to_string()))?;
        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut out = Vec::new();
        self.visit(key, &mut marks, &mut stack, &mut out)?;
        Ok(out)
    }

    /// Ids of every node that lists `id` as a direct prerequisite, in input order.
    pub fn dependents(&self, id: &str) -> Vec<&'a str> {
        self.order
            .iter()
            .copied()
            .filter(|&node| self.prerequisites(node).iter().any(|p| p == id))
            .collect()
    }

    fn visit(
        &self,
        node: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
        out: &mut Vec<&'a str>,
    ) -> Result<(), GraphError> {
        match marks.get(node) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                let start = stack.iter().position(|n| *n == node).unwrap_or(0);
                let mut cycle: Vec<String> =
                    stack[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(node.to_string());
                return Err(GraphError::Cycle(cycle));
            }
            None => {}
        }

        marks.insert(node, Mark::InProgress);
        stack.push(node);
        for prereq in self.prerequisites(node) {
            // Unresolved references are reported by `dangling`; the walk skips them.
            if let Some((&key, _)) = self.edges.get_key_value(prereq.as_str()) {
                self.visit(key, marks, stack, out)?;
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
        out.push(node);
        Ok(())
    }
}

/// Ids that occur more than once, each reported once, in first-seen order.
pub fn duplicate_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dups = Vec::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            dups.push(id.to_string());
        }
    }
    dups
}
