//! In-memory reconstruction of the category hierarchy.
//!
//! Categories are stored as a flat adjacency list. Every read rebuilds the
//! hierarchy from the current snapshot: nodes live in an arena (`Vec`) with
//! an id -> position index, and each node keeps the positions of its
//! children in display order.

use std::collections::{HashMap, HashSet};

use log::warn;
use serde::Serialize;

use super::category_order::compare_categories;
use super::{Category, CategoryNode};
use crate::constants::BREADCRUMB_SEPARATOR;

#[derive(Debug, Clone)]
struct TreeEntry {
    category: Category,
    children: Vec<usize>,
}

/// Forest of categories rebuilt from flat records.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<TreeEntry>,
    index: HashMap<i32, usize>,
    roots: Vec<usize>,
}

impl CategoryTree {
    /// Rebuilds the forest from flat records.
    ///
    /// A parent id that does not resolve within `records` is treated as a
    /// root (and logged), so partially loaded snapshots still render. A node
    /// naming itself as parent is also promoted to a root. Repeated ids keep
    /// the first occurrence.
    pub fn build(records: Vec<Category>) -> Self {
        let mut nodes: Vec<TreeEntry> = Vec::with_capacity(records.len());
        let mut index: HashMap<i32, usize> = HashMap::with_capacity(records.len());

        for category in records {
            if index.contains_key(&category.id) {
                warn!("Ignoring duplicate category id {}", category.id);
                continue;
            }
            index.insert(category.id, nodes.len());
            nodes.push(TreeEntry {
                category,
                children: Vec::new(),
            });
        }

        let mut roots = Vec::new();
        for pos in 0..nodes.len() {
            let parent_pos = match nodes[pos].category.parent_id {
                None => None,
                Some(parent_id) => match index.get(&parent_id) {
                    Some(&p) if p != pos => Some(p),
                    Some(_) => {
                        warn!("Category {} is its own parent", nodes[pos].category.id);
                        None
                    }
                    None => {
                        warn!(
                            "Category {} references missing parent {}; treating as root",
                            nodes[pos].category.id, parent_id
                        );
                        None
                    }
                },
            };
            match parent_pos {
                Some(p) => nodes[p].children.push(pos),
                None => roots.push(pos),
            }
        }

        for pos in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[pos].children);
            children.sort_by(|a, b| {
                compare_categories(&nodes[*a].category, &nodes[*b].category)
            });
            nodes[pos].children = children;
        }
        roots.sort_by(|a, b| compare_categories(&nodes[*a].category, &nodes[*b].category));

        Self {
            nodes,
            index,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: i32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: i32) -> Option<&Category> {
        self.index.get(&id).map(|&pos| &self.nodes[pos].category)
    }

    /// Root categories in display order.
    pub fn roots(&self) -> Vec<&Category> {
        self.roots
            .iter()
            .map(|&pos| &self.nodes[pos].category)
            .collect()
    }

    /// Direct children of `id` in display order; empty for leaves and unknown ids.
    pub fn children(&self, id: i32) -> Vec<&Category> {
        self.index
            .get(&id)
            .map(|&pos| {
                self.nodes[pos]
                    .children
                    .iter()
                    .map(|&c| &self.nodes[c].category)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nested projection of the whole forest.
    pub fn to_nodes(&self) -> Vec<CategoryNode> {
        self.roots.iter().map(|&pos| self.project(pos)).collect()
    }

    /// Nested projection of the subtree rooted at `id`.
    pub fn node(&self, id: i32) -> Option<CategoryNode> {
        self.index.get(&id).map(|&pos| self.project(pos))
    }

    fn project(&self, pos: usize) -> CategoryNode {
        let mut visited = HashSet::from([pos]);
        self.project_with(pos, &mut visited)
    }

    // Nodes caught in a parent cycle link back to an ancestor; `visited`
    // cuts those edges so the projection stays finite.
    fn project_with(&self, pos: usize, visited: &mut HashSet<usize>) -> CategoryNode {
        let entry = &self.nodes[pos];
        let mut children = Vec::with_capacity(entry.children.len());
        for &child in &entry.children {
            if visited.insert(child) {
                children.push(self.project_with(child, visited));
            }
        }
        CategoryNode {
            id: entry.category.id,
            name: entry.category.name.clone(),
            parent_id: entry.category.parent_id,
            children,
        }
    }

    /// Id of `id` plus all ids beneath it, or `None` when `id` is unknown.
    pub fn descendant_ids(&self, id: i32) -> Option<HashSet<i32>> {
        let start = *self.index.get(&id)?;
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            let entry = &self.nodes[pos];
            if !seen.insert(entry.category.id) {
                continue;
            }
            stack.extend(entry.children.iter().copied());
        }
        Some(seen)
    }

    /// Root-first path ending at `id`; empty when `id` is unknown.
    pub fn lineage(&self, id: i32) -> Vec<Category> {
        walk_lineage(id, |candidate| self.get(candidate))
    }

    /// Number of ancestors above `id`, or `None` when `id` is unknown.
    pub fn depth(&self, id: i32) -> Option<usize> {
        let lineage = self.lineage(id);
        if lineage.is_empty() {
            None
        } else {
            Some(lineage.len() - 1)
        }
    }

    /// Every category reachable from a root, pre-order in display order.
    pub fn flatten(&self) -> Vec<Category> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(pos) = stack.pop() {
            let entry = &self.nodes[pos];
            out.push(entry.category.clone());
            stack.extend(entry.children.iter().rev().copied());
        }
        out
    }

    /// Option lists for a cascading picker.
    ///
    /// Level 0 holds the roots. Each selected id in `path` contributes the
    /// next level (its children) until an id has no children or does not
    /// resolve.
    pub fn picker_levels(&self, path: &[i32]) -> Vec<Vec<Category>> {
        let mut levels = vec![self.roots().into_iter().cloned().collect::<Vec<_>>()];
        for id in path {
            let children = self.children(*id);
            if children.is_empty() {
                break;
            }
            levels.push(children.into_iter().cloned().collect());
        }
        levels
    }

    /// Forest restricted to names containing `query` (case-insensitive).
    ///
    /// Ancestors of a match are kept so the match stays reachable, and a
    /// matching node keeps its whole subtree. A blank query returns the full
    /// forest.
    pub fn filter(&self, query: &str) -> Vec<CategoryNode> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.to_nodes();
        }
        self.roots
            .iter()
            .filter_map(|&pos| self.filter_node(pos, &needle))
            .collect()
    }

    fn filter_node(&self, pos: usize, needle: &str) -> Option<CategoryNode> {
        let entry = &self.nodes[pos];
        if entry.category.name.to_lowercase().contains(needle) {
            return Some(self.project(pos));
        }
        let children: Vec<CategoryNode> = entry
            .children
            .iter()
            .filter_map(|&c| self.filter_node(c, needle))
            .collect();
        if children.is_empty() {
            None
        } else {
            Some(CategoryNode {
                id: entry.category.id,
                name: entry.category.name.clone(),
                parent_id: entry.category.parent_id,
                children,
            })
        }
    }
}

/// Root-first path from the top of the hierarchy down to `target`.
///
/// Returns an empty path when `target` is not in `by_id`. The walk stops at a
/// root, at a parent id that does not resolve, or when it would revisit a
/// node (cyclic data).
pub fn lineage(target: i32, by_id: &HashMap<i32, Category>) -> Vec<Category> {
    walk_lineage(target, |id| by_id.get(&id))
}

fn walk_lineage<'a, F>(target: i32, lookup: F) -> Vec<Category>
where
    F: Fn(i32) -> Option<&'a Category>,
{
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = lookup(target);
    while let Some(category) = current {
        if !seen.insert(category.id) {
            warn!("Cycle detected in lineage of category {}", target);
            break;
        }
        path.push(category.clone());
        current = category.parent_id.and_then(&lookup);
    }
    path.reverse();
    path
}

/// Joins a lineage into "Root → Child → Leaf".
pub fn breadcrumb_label(lineage: &[Category]) -> String {
    lineage
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(BREADCRUMB_SEPARATOR)
}

/// Whether `id` is the current selection or one of its ancestors.
pub fn is_selected_or_ancestor(id: i32, selection_lineage: &[Category]) -> bool {
    selection_lineage.iter().any(|c| c.id == id)
}

/// Structural problems found in a flat category snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityIssue {
    DuplicateId { id: i32 },
    SelfParent { id: i32 },
    UnresolvedParent { id: i32, parent_id: i32 },
    Cycle { ids: Vec<i32> },
    DuplicateSibling { name: String, parent_id: Option<i32> },
}

/// Strict validation of a snapshot. `CategoryTree::build` stays lenient;
/// callers that must reject malformed data check here first.
pub fn check_integrity(records: &[Category]) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    let mut by_id: HashMap<i32, &Category> = HashMap::with_capacity(records.len());
    let mut siblings: HashSet<(Option<i32>, &str)> = HashSet::new();

    for category in records {
        if by_id.insert(category.id, category).is_some() {
            issues.push(IntegrityIssue::DuplicateId { id: category.id });
            continue;
        }
        if !siblings.insert((category.parent_id, category.name.as_str())) {
            issues.push(IntegrityIssue::DuplicateSibling {
                name: category.name.clone(),
                parent_id: category.parent_id,
            });
        }
    }

    for category in records {
        match category.parent_id {
            Some(parent_id) if parent_id == category.id => {
                issues.push(IntegrityIssue::SelfParent { id: category.id });
            }
            Some(parent_id) if !by_id.contains_key(&parent_id) => {
                issues.push(IntegrityIssue::UnresolvedParent {
                    id: category.id,
                    parent_id,
                });
            }
            _ => {}
        }
    }

    // Walk upwards from every node; ids on the current walk that are met
    // again form a cycle. Finished ids are never walked twice.
    let mut finished: HashSet<i32> = HashSet::new();
    let mut ids: Vec<i32> = by_id.keys().copied().collect();
    ids.sort_unstable();
    for start in ids {
        let mut walk: Vec<i32> = Vec::new();
        let mut on_walk: HashSet<i32> = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if finished.contains(&id) {
                break;
            }
            if !on_walk.insert(id) {
                if let Some(pos) = walk.iter().position(|w| *w == id) {
                    let cycle = walk[pos..].to_vec();
                    if cycle.len() > 1 {
                        issues.push(IntegrityIssue::Cycle { ids: cycle });
                    }
                }
                break;
            }
            walk.push(id);
            current = by_id.get(&id).and_then(|c| c.parent_id);
        }
        finished.extend(walk);
    }

    issues
}
