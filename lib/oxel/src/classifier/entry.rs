use crate::classifier::node::VNode;
use crate::entity::EntityId;
use std::fmt;

/// A subsumption fact `sub_class ⊑ super_class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SEntry {
    pub sub_class: EntityId,
    pub super_class: EntityId,
}

impl SEntry {
    #[inline]
    pub fn new(sub_class: EntityId, super_class: EntityId) -> Self {
        Self {
            sub_class,
            super_class,
        }
    }
}

/// A role fact: `left_class` is linked to `right_class` through `property`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct REntry {
    pub property: EntityId,
    pub left_class: EntityId,
    pub right_class: EntityId,
}

impl REntry {
    #[inline]
    pub fn new(property: EntityId, left_class: EntityId, right_class: EntityId) -> Self {
        Self {
            property,
            left_class,
            right_class,
        }
    }
}

/// An entry of the saturation queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XEntry {
    S(SEntry),
    R(REntry),
}

impl fmt::Display for XEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(e) => write!(f, "S({} {})", e.sub_class, e.super_class),
            Self::R(e) => write!(f, "R({} {} {})", e.property, e.left_class, e.right_class),
        }
    }
}

/// Link `left_class` to a node, registering the node if needed.
///
/// The engine gives the node its identifier `v`, then derives:
/// * `v ⊑ c` for each subsumer `c` of each node in `inherits_from`, now and whenever they get new subsumers,
/// * `v ⊑ c` for each `c` in `subsumers`,
/// * the link `(property, left_class, v)`.
///
/// Nodes in `inherits_from` must have the same base class as `node` and a subset of its restrictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntry {
    pub node: VNode,
    pub inherits_from: Vec<EntityId>,
    pub subsumers: Vec<EntityId>,
    pub property: EntityId,
    pub left_class: EntityId,
}

/// What a completion rule concludes. Novelty is checked by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    Subsumption(SEntry),
    Link(REntry),
    Node(NodeEntry),
}

impl Conclusion {
    #[inline]
    pub fn subsumption(sub_class: EntityId, super_class: EntityId) -> Self {
        Self::Subsumption(SEntry::new(sub_class, super_class))
    }

    #[inline]
    pub fn link(property: EntityId, left_class: EntityId, right_class: EntityId) -> Self {
        Self::Link(REntry::new(property, left_class, right_class))
    }
}
