//! Scene topology: parent links, topological order, reachability
//!
//! Computed once after nodes are loaded. All three passes are breadth-first
//! over `children` edges and deterministic for a given node array.

use std::collections::VecDeque;

use crate::error::{Result, SceneError};
use crate::node::Node;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneTopology {
    pub parents: Vec<Option<usize>>,
    /// Parents precede children; parentless nodes come first.
    pub topo_order: Vec<usize>,
    pub renderable: Vec<bool>,
}

impl SceneTopology {
    pub fn resolve(nodes: &[Node], roots: &[usize]) -> Result<Self> {
        let parents = compute_parents(nodes)?;
        let topo_order = compute_topo_order(nodes, &parents)?;
        let renderable = compute_renderable(nodes, roots)?;
        Ok(Self {
            parents,
            topo_order,
            renderable,
        })
    }
}

/// Invert `children`. A node listed under several parents keeps the last one
/// in array order.
pub fn compute_parents(nodes: &[Node]) -> Result<Vec<Option<usize>>> {
    let mut parents = vec![None; nodes.len()];

    for (parent, node) in nodes.iter().enumerate() {
        for &child in &node.children {
            let slot = parents
                .get_mut(child)
                .ok_or_else(|| SceneError::out_of_bounds("node", child, nodes.len()))?;
            if let Some(previous) = slot.replace(parent) {
                if previous != parent {
                    tracing::warn!(
                        "Node {} is a child of both {} and {}, using {}",
                        child,
                        previous,
                        parent,
                        parent
                    );
                }
            }
        }
    }

    Ok(parents)
}

/// Breadth-first order from every parentless node. Children must be in range
/// (checked by [`compute_parents`]).
pub fn compute_topo_order(nodes: &[Node], parents: &[Option<usize>]) -> Result<Vec<usize>> {
    let mut visited = vec![false; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut queue: VecDeque<usize> = parents
        .iter()
        .enumerate()
        .filter(|(_, parent)| parent.is_none())
        .map(|(i, _)| i)
        .collect();

    while let Some(index) = queue.pop_front() {
        if std::mem::replace(&mut visited[index], true) {
            return Err(SceneError::Cycle(index));
        }
        order.push(index);
        queue.extend(nodes[index].children.iter().copied());
    }

    // Anything left over hangs off a cycle no root can reach.
    if let Some(unvisited) = visited.iter().position(|&v| !v) {
        return Err(SceneError::Cycle(unvisited));
    }

    Ok(order)
}

/// Nodes reachable from the declared scene roots.
pub fn compute_renderable(nodes: &[Node], roots: &[usize]) -> Result<Vec<bool>> {
    let mut renderable = vec![false; nodes.len()];
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();

    while let Some(index) = queue.pop_front() {
        let flag = renderable
            .get_mut(index)
            .ok_or_else(|| SceneError::out_of_bounds("node", index, nodes.len()))?;
        if std::mem::replace(flag, true) {
            continue;
        }
        queue.extend(nodes[index].children.iter().copied());
    }

    Ok(renderable)
}
