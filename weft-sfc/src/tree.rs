//! Traversals shared by the raw and the declared tree.
//!
//! Every traversal runs on an explicit work stack, so nesting depth is
//! bounded by the heap rather than the call stack. Visitation order is
//! always pre-order: a node, then each of its children in order.

use crate::error::{CompileError, Result};
use crate::template_ast::{Document, NodeId};

/// Arena-backed tree with parent and child links.
pub trait Tree {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn parent(&self, id: NodeId) -> Option<NodeId>;
    fn children(&self, id: NodeId) -> &[NodeId];
}

impl Tree for Document {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }
}

/// Visit `roots` and their descendants depth-first, pre-order.
///
/// `roots` must be actual subtree roots. Passing an already flattened list
/// visits a node once per list entry that reaches it.
pub fn walk<T: Tree + ?Sized>(tree: &T, roots: &[NodeId], mut visit: impl FnMut(NodeId)) {
    let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        visit(id);
        stack.extend(tree.children(id).iter().rev().copied());
    }
}

/// Every distinct node under `roots`, in pre-order, each exactly once.
pub fn flat<T: Tree + ?Sized>(tree: &T, roots: &[NodeId]) -> Vec<NodeId> {
    let mut seen = vec![false; tree.len()];
    let mut out = Vec::new();
    walk(tree, roots, |id| {
        if !seen[id.0] {
            seen[id.0] = true;
            out.push(id);
        }
    });
    out
}

/// Nearest strict ancestor of `id` for which `predicate` holds.
pub fn find_parent_matching<T: Tree + ?Sized>(
    tree: &T,
    id: NodeId,
    mut predicate: impl FnMut(NodeId) -> bool,
) -> Option<NodeId> {
    let mut current = tree.parent(id);
    while let Some(p) = current {
        if predicate(p) {
            return Some(p);
        }
        current = tree.parent(p);
    }
    None
}

/// Results of [`reduce_tree`], indexed by node id.
#[derive(Debug)]
pub struct Reduced<R> {
    order: Vec<NodeId>,
    values: Vec<Option<R>>,
}

impl<R> Reduced<R> {
    pub fn get(&self, id: NodeId) -> Option<&R> {
        self.values.get(id.0).and_then(Option::as_ref)
    }

    /// Ids in the order they were reduced.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Consume into a dense vector ordered by id.
    ///
    /// Fails if any node of the tree was not reached from the roots.
    pub fn into_dense(self) -> Result<Vec<R>> {
        self.values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| {
                    CompileError::Internal(format!("node #{} was never reduced", i + 1))
                })
            })
            .collect()
    }
}

/// Pre-order fold where each node sees its parent's already-reduced value.
///
/// The parent's value is stored before any of its children are visited, so
/// `visit` always receives `Some(parent)` for non-root nodes. A node whose
/// parent has no stored value is a pipeline bug and stops the fold.
pub fn reduce_tree<T, R>(
    tree: &T,
    roots: &[NodeId],
    mut visit: impl FnMut(NodeId, Option<&R>) -> Result<R>,
) -> Result<Reduced<R>>
where
    T: Tree + ?Sized,
{
    let mut values: Vec<Option<R>> = std::iter::repeat_with(|| None).take(tree.len()).collect();
    let mut order = Vec::with_capacity(tree.len());
    let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        if values.get(id.0).is_none() {
            return Err(CompileError::Internal(format!("{id} is outside the tree")));
        }
        if values[id.0].is_some() {
            continue;
        }
        let value = match tree.parent(id) {
            Some(p) => {
                let parent = values[p.0].as_ref().ok_or_else(|| {
                    CompileError::Internal(format!("parent {p} of {id} has not been reduced"))
                })?;
                visit(id, Some(parent))?
            }
            None => visit(id, None)?,
        };
        values[id.0] = Some(value);
        order.push(id);
        stack.extend(tree.children(id).iter().rev().copied());
    }

    Ok(Reduced { order, values })
}
