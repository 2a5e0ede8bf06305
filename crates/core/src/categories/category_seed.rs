//! Idempotent seeding of the category taxonomy from a nested description.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::categories_model::validate_name;
use super::{Category, CategoryRepositoryTrait, NewCategory};
use crate::errors::{Result, ValidationError};

/// Built-in storefront taxonomy used when no seed file is configured.
pub const DEFAULT_TAXONOMY_JSON: &str = include_str!("default_taxonomy.json");

/// One entry of a taxonomy description: a bare name or a name with children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedNode {
    Leaf(String),
    Branch {
        name: String,
        #[serde(default)]
        children: Vec<SeedNode>,
    },
}

impl SeedNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        SeedNode::Leaf(name.into())
    }

    pub fn branch(name: impl Into<String>, children: Vec<SeedNode>) -> Self {
        SeedNode::Branch {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SeedNode::Leaf(name) => name,
            SeedNode::Branch { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[SeedNode] {
        match self {
            SeedNode::Leaf(_) => &[],
            SeedNode::Branch { children, .. } => children,
        }
    }
}

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub created: usize,
    pub existing: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.created + self.existing
    }
}

/// Parses a taxonomy description (a JSON array of `SeedNode`).
pub fn parse_seed_tree(json: &str) -> Result<Vec<SeedNode>> {
    serde_json::from_str(json).map_err(|e| {
        ValidationError::InvalidInput(format!("Invalid taxonomy description: {}", e)).into()
    })
}

/// The built-in taxonomy.
pub fn default_seed_tree() -> Result<Vec<SeedNode>> {
    parse_seed_tree(DEFAULT_TAXONOMY_JSON)
}

/// Ensures every node of `tree` exists under its parent, creating only what
/// is missing.
///
/// Nodes are visited depth-first in input order with an explicit stack; a
/// node's children are only pushed once the node itself has an id. Existing
/// rows are reused untouched. The first storage failure aborts the run and
/// leaves already created rows in place, so a re-run resumes where this one
/// stopped.
pub async fn seed_category_tree(
    repository: &dyn CategoryRepositoryTrait,
    tree: &[SeedNode],
) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut stack: Vec<(&SeedNode, Option<i32>)> =
        tree.iter().rev().map(|n| (n, None)).collect();

    while let Some((node, parent_id)) = stack.pop() {
        let category = ensure_category(repository, node.name(), parent_id, &mut report).await?;
        for child in node.children().iter().rev() {
            stack.push((child, Some(category.id)));
        }
    }

    info!(
        "Category seeding finished: {} created, {} already present",
        report.created, report.existing
    );
    Ok(report)
}

async fn ensure_category(
    repository: &dyn CategoryRepositoryTrait,
    name: &str,
    parent_id: Option<i32>,
    report: &mut SeedReport,
) -> Result<Category> {
    let name = validate_name(name)?;

    if let Some(existing) = repository.find_by_name_and_parent(&name, parent_id)? {
        report.existing += 1;
        return Ok(existing);
    }

    match repository
        .create_category(NewCategory::new(name.clone(), parent_id))
        .await
    {
        Ok(created) => {
            debug!("Created category {} '{}'", created.id, created.name);
            report.created += 1;
            Ok(created)
        }
        // Another writer inserted the same (name, parent) between our lookup
        // and insert; the unique index rejected ours, so adopt theirs.
        Err(err) if err.is_unique_violation() => {
            match repository.find_by_name_and_parent(&name, parent_id)? {
                Some(existing) => {
                    report.existing += 1;
                    Ok(existing)
                }
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}
