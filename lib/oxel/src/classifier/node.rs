use crate::entity::{EntityId, EntityManager, EntityType};
use crate::error::InvalidInputError;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt;

/// A virtual node: a class together with a set of existential restrictions `∃r.A`.
///
/// Restrictions are kept sorted so that structurally equal nodes are equal whatever the order they were built in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VNode {
    class_id: EntityId,
    existentials: BTreeSet<(EntityId, EntityId)>,
}

impl VNode {
    /// The node of a plain class.
    pub fn new(class_id: EntityId) -> Self {
        Self {
            class_id,
            existentials: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn class_id(&self) -> EntityId {
        self.class_id
    }

    /// The `(property, class)` pairs of the restrictions.
    pub fn existentials(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.existentials.iter().copied()
    }

    pub fn contains_existential(&self, property: EntityId, class: EntityId) -> bool {
        self.existentials.contains(&(property, class))
    }

    /// A node without any restriction stands for its class.
    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.existentials.is_empty()
    }

    /// Copy of this node with one more restriction.
    #[must_use]
    pub fn with_existential(&self, property: EntityId, class: EntityId) -> Self {
        let mut node = self.clone();
        node.existentials.insert((property, class));
        node
    }

    /// Copy of this node with the restrictions of `other` added.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut node = self.clone();
        node.existentials
            .extend(other.existentials.iter().copied());
        node
    }
}

impl fmt::Display for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_id)?;
        for (property, class) in &self.existentials {
            write!(f, " ⊓ ∃{property}.{class}")?;
        }
        Ok(())
    }
}

/// Gives an identifier to each distinct node.
///
/// A node without restriction is identified by its class.
/// Other nodes get a fresh anonymous class the first time they are seen.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: FxHashMap<EntityId, VNode>,
    ids: FxHashMap<VNode, EntityId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the node of a plain class.
    pub fn register_class(&mut self, class_id: EntityId) {
        let node = VNode::new(class_id);
        self.ids.insert(node.clone(), class_id);
        self.nodes.insert(class_id, node);
    }

    /// Returns the identifier of the node and whether it has just been allocated.
    pub fn create_or_get(
        &mut self,
        node: VNode,
        entities: &mut EntityManager,
    ) -> Result<(EntityId, bool), InvalidInputError> {
        if let Some(id) = self.ids.get(&node) {
            return Ok((*id, false));
        }
        if node.is_fresh() {
            let id = node.class_id();
            self.register_class(id);
            return Ok((id, false));
        }
        let id = entities.create_anonymous_entity(EntityType::Class)?;
        self.ids.insert(node.clone(), id);
        self.nodes.insert(id, node);
        Ok((id, true))
    }

    /// The identifier of an already registered node.
    pub fn id(&self, node: &VNode) -> Option<EntityId> {
        self.ids.get(node).copied()
    }

    pub fn node(&self, id: EntityId) -> Option<&VNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
