use crate::core::io::table::NodeId;
use crate::core::models::class::{ClassKey, StructuralClass};
use crate::core::models::distribution::SiteDistribution;
use std::collections::BTreeMap;
use thiserror::Error;

/// All distributions of one class: per node, one distribution per site.
pub type ClassMatrices = BTreeMap<NodeId, Vec<SiteDistribution>>;

/// Represents errors raised while populating the ancestor matrix store.
///
/// The node-set and site-count mismatches are data-integrity failures across
/// independently produced reconstruction runs; they abort the pipeline and are
/// never repaired silently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("Class '{class}' is already present in the store")]
    DuplicateClass { class: ClassKey },

    #[error("Class '{class}' contains no node tables")]
    EmptyClass { class: ClassKey },

    #[error(
        "Class '{class}' was reconstructed on different ancestral nodes than previously loaded classes ({found} nodes vs {expected})",
        expected = expected.len(),
        found = found.len()
    )]
    InconsistentNodeSet {
        class: ClassKey,
        expected: Vec<NodeId>,
        found: Vec<NodeId>,
    },

    #[error(
        "Node {node} of class '{class}' has {found} sites where {expected} were expected"
    )]
    InconsistentSiteCount {
        class: ClassKey,
        node: NodeId,
        expected: usize,
        found: usize,
    },
}

/// The per-class, per-node, per-site posterior matrices.
///
/// Populated by one [`load`](AncestorMatrixStore::load) per real structural
/// class, then extended exactly twice by the combination tasks (adding the
/// mixture and final pseudo-classes through [`put`](AncestorMatrixStore::put)).
/// The first loaded class fixes the reference node set and site count; every
/// later class must match both — the central cross-file invariant of the
/// pipeline. Matrices are never overwritten.
#[derive(Debug, Default, Clone)]
pub struct AncestorMatrixStore {
    matrices: BTreeMap<ClassKey, ClassMatrices>,
    node_ids: Vec<NodeId>,
    site_count: usize,
}

impl AncestorMatrixStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the matrices of one real structural class.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateClass`] if the class was already loaded,
    /// [`StoreError::EmptyClass`] for a class without nodes,
    /// [`StoreError::InconsistentSiteCount`] if any node's site count differs
    /// from the reference (or from the class's own first node), and
    /// [`StoreError::InconsistentNodeSet`] if the class's node ids differ from
    /// the reference set.
    pub fn load(
        &mut self,
        class: StructuralClass,
        tables: ClassMatrices,
    ) -> Result<(), StoreError> {
        self.insert(ClassKey::Structural(class), tables)
    }

    /// Inserts a freshly derived pseudo-class.
    ///
    /// Same validation as [`load`](AncestorMatrixStore::load); used by the
    /// combination tasks for [`ClassKey::Mixture`] and [`ClassKey::Final`].
    pub fn put(&mut self, key: ClassKey, tables: ClassMatrices) -> Result<(), StoreError> {
        self.insert(key, tables)
    }

    fn insert(&mut self, key: ClassKey, tables: ClassMatrices) -> Result<(), StoreError> {
        if self.matrices.contains_key(&key) {
            return Err(StoreError::DuplicateClass { class: key });
        }
        if tables.is_empty() {
            return Err(StoreError::EmptyClass { class: key });
        }

        let site_count = tables
            .values()
            .next()
            .map(Vec::len)
            .unwrap_or_default();
        let expected = if self.matrices.is_empty() {
            site_count
        } else {
            self.site_count
        };
        for (&node, sites) in &tables {
            if sites.len() != expected {
                return Err(StoreError::InconsistentSiteCount {
                    class: key,
                    node,
                    expected,
                    found: sites.len(),
                });
            }
        }

        let node_ids: Vec<NodeId> = tables.keys().copied().collect();
        if self.matrices.is_empty() {
            self.node_ids = node_ids;
            self.site_count = expected;
        } else if node_ids != self.node_ids {
            return Err(StoreError::InconsistentNodeSet {
                class: key,
                expected: self.node_ids.clone(),
                found: node_ids,
            });
        }

        self.matrices.insert(key, tables);
        Ok(())
    }

    /// The reference node ids, ascending.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Sites per node (alignment columns).
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    pub fn contains(&self, key: ClassKey) -> bool {
        self.matrices.contains_key(&key)
    }

    /// The real structural classes loaded so far, in tag order.
    pub fn structural_classes(&self) -> impl Iterator<Item = StructuralClass> + '_ {
        self.matrices.keys().filter_map(|key| match key {
            ClassKey::Structural(class) => Some(*class),
            _ => None,
        })
    }

    /// All distributions of one class.
    pub fn class_matrices(&self, key: ClassKey) -> Option<&ClassMatrices> {
        self.matrices.get(&key)
    }

    /// One node's distributions under one class.
    pub fn node_sites(&self, key: ClassKey, node: NodeId) -> Option<&[SiteDistribution]> {
        self.matrices.get(&key)?.get(&node).map(Vec::as_slice)
    }

    /// A single stored distribution.
    ///
    /// `None` here on a fully loaded store is a programming error in the
    /// caller, not a recoverable condition.
    pub fn get(&self, key: ClassKey, node: NodeId, site: usize) -> Option<&SiteDistribution> {
        self.matrices.get(&key)?.get(&node)?.get(site)
    }
}
