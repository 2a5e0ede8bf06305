//! Property-based integration tests for the category tree engine.
//!
//! Random well-formed forests are generated as flat records (every parent id
//! refers to an earlier record), then reconstructed and queried. Random
//! nested taxonomy descriptions are seeded into an in-memory repository.

use async_trait::async_trait;
use proptest::prelude::*;
use proptest::sample::Index;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use storefront_core::categories::{
    check_integrity, lineage, natural_cmp, seed_category_tree, Category, CategoryNode,
    CategoryRepositoryTrait, CategoryTree, IntegrityIssue, NewCategory, SeedNode,
};
use storefront_core::products::resolve_category_scope;
use storefront_core::Result;

// =============================================================================
// Generators
// =============================================================================

/// Generates a flat, well-formed forest of up to `max` categories.
fn arb_forest(max: usize) -> impl Strategy<Value = Vec<Category>> {
    proptest::collection::vec(
        (any::<Index>(), any::<bool>(), "[A-Za-z0-9 ]{1,8}"),
        1..=max,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (parent, is_root, name))| {
                let id = i as i32 + 1;
                let parent_id = if i == 0 || is_root {
                    None
                } else {
                    Some(parent.index(i) as i32 + 1)
                };
                Category::new(id, name, parent_id)
            })
            .collect()
    })
}

/// Names drawn from a small pool so siblings repeat, padded with whitespace
/// the seeder is expected to trim.
fn arb_seed_name() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["Lighting", "Indoor", "Outdoor", "12V", "24V", "Plumbing"]),
        " {0,2}",
        " {0,2}",
    )
        .prop_map(|(name, left, right)| format!("{}{}{}", left, name, right))
}

/// Nested taxonomy descriptions mixing bare leaves and branches.
fn arb_seed_tree() -> impl Strategy<Value = Vec<SeedNode>> {
    let leaf = arb_seed_name().prop_map(SeedNode::Leaf);
    let node = leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            arb_seed_name().prop_map(SeedNode::Leaf),
            (arb_seed_name(), proptest::collection::vec(inner, 0..4))
                .prop_map(|(name, children)| SeedNode::branch(name, children)),
        ]
    });
    proptest::collection::vec(node, 0..6)
}

/// Root-first trimmed name paths a description should produce.
fn seed_paths(nodes: &[SeedNode], prefix: &[String], out: &mut HashSet<Vec<String>>) {
    for node in nodes {
        let mut path = prefix.to_vec();
        path.push(node.name().trim().to_string());
        seed_paths(node.children(), &path, out);
        out.insert(path);
    }
}

/// Root-first name paths of every stored category.
fn stored_paths(records: &[Category]) -> HashSet<Vec<String>> {
    let tree = CategoryTree::build(records.to_vec());
    records
        .iter()
        .map(|c| tree.lineage(c.id).into_iter().map(|a| a.name).collect())
        .collect()
}

fn name_parent_pairs(records: &[Category]) -> HashSet<(String, Option<i32>)> {
    records
        .iter()
        .map(|c| (c.name.clone(), c.parent_id))
        .collect()
}

/// Reference depth computed by following parent ids through the records.
fn reference_depth(id: i32, records: &[Category]) -> usize {
    let by_id: HashMap<i32, &Category> = records.iter().map(|c| (c.id, c)).collect();
    let mut depth = 0;
    let mut current = by_id[&id];
    while let Some(parent) = current.parent_id {
        current = by_id[&parent];
        depth += 1;
    }
    depth
}

struct StaticCategories(Vec<Category>);

#[async_trait]
impl CategoryRepositoryTrait for StaticCategories {
    fn get_categories(&self) -> Result<Vec<Category>> {
        Ok(self.0.clone())
    }

    fn get_category(&self, id: i32) -> Result<Option<Category>> {
        Ok(self.0.iter().find(|c| c.id == id).cloned())
    }

    fn find_by_name_and_parent(
        &self,
        _name: &str,
        _parent_id: Option<i32>,
    ) -> Result<Option<Category>> {
        unimplemented!()
    }

    async fn create_category(&self, _category: NewCategory) -> Result<Category> {
        unimplemented!()
    }
}

/// Insert-only repository for seeding runs.
#[derive(Default)]
struct MemoryCategories {
    rows: RwLock<Vec<Category>>,
}

#[async_trait]
impl CategoryRepositoryTrait for MemoryCategories {
    fn get_categories(&self) -> Result<Vec<Category>> {
        Ok(self.rows.read().unwrap().clone())
    }

    fn get_category(&self, id: i32) -> Result<Option<Category>> {
        Ok(self.rows.read().unwrap().iter().find(|c| c.id == id).cloned())
    }

    fn find_by_name_and_parent(
        &self,
        name: &str,
        parent_id: Option<i32>,
    ) -> Result<Option<Category>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .find(|c| c.name == name && c.parent_id == parent_id)
            .cloned())
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let mut rows = self.rows.write().unwrap();
        let created = Category::new(rows.len() as i32 + 1, category.name, category.parent_id);
        rows.push(created.clone());
        Ok(created)
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Round-trip reconstruction**
    ///
    /// Flattening a reconstructed forest yields exactly the input records.
    #[test]
    fn prop_round_trip_reconstruction(records in arb_forest(60)) {
        let tree = CategoryTree::build(records.clone());
        let expected: HashSet<Category> = records.iter().cloned().collect();

        let flat: HashSet<Category> = tree.flatten().into_iter().collect();
        prop_assert_eq!(&flat, &expected);

        let projected: Vec<Category> = tree
            .to_nodes()
            .iter()
            .flat_map(CategoryNode::flatten)
            .collect();
        prop_assert_eq!(projected.len(), records.len());
        prop_assert_eq!(projected.into_iter().collect::<HashSet<_>>(), expected);
        // Generated names may repeat among siblings; nothing else is malformed.
        let only_duplicate_siblings = check_integrity(&records)
            .iter()
            .all(|issue| matches!(issue, IntegrityIssue::DuplicateSibling { .. }));
        prop_assert!(only_duplicate_siblings);
    }

    /// **Lineage correctness**
    ///
    /// The lineage of a node has depth + 1 entries, starts at a root, ends at
    /// the node, and each entry is the parent of the next.
    #[test]
    fn prop_lineage_correctness(records in arb_forest(60), pick in any::<Index>()) {
        let target = &records[pick.index(records.len())];
        let by_id: HashMap<i32, Category> =
            records.iter().map(|c| (c.id, c.clone())).collect();
        let path = lineage(target.id, &by_id);

        prop_assert_eq!(path.len(), reference_depth(target.id, &records) + 1);
        prop_assert_eq!(path.last(), Some(target));
        prop_assert!(path[0].is_root());
        for pair in path.windows(2) {
            prop_assert_eq!(pair[1].parent_id, Some(pair[0].id));
        }

        let tree = CategoryTree::build(records.clone());
        prop_assert_eq!(tree.lineage(target.id), path);
    }

    /// **Descendant superset**
    ///
    /// A node's descendant set contains its own id and every child's set; a
    /// leaf's set is just itself.
    #[test]
    fn prop_descendant_superset(records in arb_forest(60)) {
        let tree = CategoryTree::build(records.clone());
        for category in &records {
            let own = tree.descendant_ids(category.id).unwrap();
            prop_assert!(own.contains(&category.id));

            let children = tree.children(category.id);
            if children.is_empty() {
                prop_assert_eq!(own, HashSet::from([category.id]));
                continue;
            }
            for child in children {
                let child_set = tree.descendant_ids(child.id).unwrap();
                prop_assert!(child_set.is_subset(&own));
            }
        }
    }

    /// **Filter monotonicity**
    ///
    /// Selecting a parent category selects everything any of its children
    /// would select.
    #[test]
    fn prop_filter_monotonicity(records in arb_forest(60)) {
        let repo = StaticCategories(records.clone());
        for category in &records {
            let Some(parent_id) = category.parent_id else {
                continue;
            };
            let parent_scope = resolve_category_scope(&repo, Some(parent_id)).unwrap();
            let child_scope = resolve_category_scope(&repo, Some(category.id)).unwrap();
            prop_assert!(child_scope.is_subset(&parent_scope));
        }
        prop_assert_eq!(resolve_category_scope(&repo, None), None);
    }

    /// **Order independence**
    ///
    /// Input order does not change the reconstructed forest.
    #[test]
    fn prop_build_ignores_input_order(records in arb_forest(40)) {
        let mut reversed = records.clone();
        reversed.reverse();
        prop_assert_eq!(
            CategoryTree::build(records).to_nodes(),
            CategoryTree::build(reversed).to_nodes()
        );
    }

    /// **Natural order is a total order**
    #[test]
    fn prop_natural_cmp_antisymmetric(a in "[A-Za-z0-9]{0,6}", b in "[A-Za-z0-9]{0,6}") {
        let forward = natural_cmp(&a, &b);
        prop_assert_eq!(forward, natural_cmp(&b, &a).reverse());
        prop_assert_eq!(forward == Ordering::Equal, a == b);
    }

    /// **Idempotent seeding**
    ///
    /// Seeding any description twice creates nothing the second time and
    /// leaves the stored `(name, parent)` set untouched. The stored tree holds
    /// exactly the trimmed name paths of the description, with repeated
    /// siblings merged.
    #[test]
    fn prop_seeding_is_idempotent(tree in arb_seed_tree()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let repo = MemoryCategories::default();

        let first = runtime.block_on(seed_category_tree(&repo, &tree)).unwrap();
        let after_first = repo.get_categories().unwrap();
        prop_assert_eq!(first.created, after_first.len());

        let second = runtime.block_on(seed_category_tree(&repo, &tree)).unwrap();
        let after_second = repo.get_categories().unwrap();
        prop_assert_eq!(second.created, 0);
        prop_assert_eq!(second.existing, first.total());
        prop_assert_eq!(name_parent_pairs(&after_second), name_parent_pairs(&after_first));

        let mut expected = HashSet::new();
        seed_paths(&tree, &[], &mut expected);
        prop_assert_eq!(stored_paths(&after_second), expected);
        prop_assert!(check_integrity(&after_second).is_empty());
    }
}
