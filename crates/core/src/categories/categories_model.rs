//! Domain models for product categories.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{BREADCRUMB_SEPARATOR, MAX_NAME_LENGTH};
use crate::errors::{Result, ValidationError};

/// A node of the product taxonomy as persisted (adjacency list via parent_id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

impl Category {
    pub fn new(id: i32, name: impl Into<String>, parent_id: Option<i32>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data for creating a new category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, parent_id: Option<i32>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }

    /// Returns a copy with the name trimmed, rejecting blank or oversized names.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            parent_id: self.parent_id,
        })
    }
}

/// Minimal parent reference shown next to a category in the admin listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
    pub id: i32,
    pub name: String,
}

/// A category joined with its immediate parent, as listed in the back-office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithParent {
    #[serde(flatten)]
    pub category: Category,
    pub parent: Option<ParentRef>,
    /// "<parent name> → <name>" or just the name for roots
    pub label: String,
}

impl CategoryWithParent {
    pub fn new(category: Category, parent: Option<ParentRef>) -> Self {
        let label = match &parent {
            Some(p) => format!("{}{}{}", p.name, BREADCRUMB_SEPARATOR, category.name),
            None => category.name.clone(),
        };
        Self {
            category,
            parent,
            label,
        }
    }
}

/// Owned, nested projection of the category tree.
///
/// Children are always in display order (natural, case-insensitive by name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn leaf(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            children: Vec::new(),
        }
    }

    pub fn to_category(&self) -> Category {
        Category::new(self.id, self.name.clone(), self.parent_id)
    }

    /// Id of this node plus every id reachable through its children.
    ///
    /// Walks with an explicit stack; ids already seen are not expanded again
    /// so a malformed projection cannot make the walk revisit a subtree.
    pub fn descendant_ids(&self) -> HashSet<i32> {
        let mut seen = HashSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id) {
                continue;
            }
            stack.extend(node.children.iter());
        }
        seen
    }

    /// Depth-first search for the node with the given id within this subtree.
    pub fn find(&self, id: i32) -> Option<&CategoryNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Flattens this subtree back into records, pre-order.
    pub fn flatten(&self) -> Vec<Category> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node.to_category());
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Trims a category or product name and checks it is usable.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidInput(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        ))
        .into());
    }
    Ok(trimmed.to_string())
}
