use crate::entity::EntityId;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_set;

/// Stores for each element the set of its subsumers.
///
/// Elements proven equivalent to the bottom element are kept apart: they are subsumed by every element
/// of the graph, which is returned on demand instead of being materialized.
/// An element never leaves that set and adding ancestors to it is a no-op.
#[derive(Debug, Clone)]
pub struct SubsumerGraph {
    bottom: EntityId,
    top: EntityId,
    elements: FxHashSet<EntityId>,
    subsumers: FxHashMap<EntityId, FxHashSet<EntityId>>,
    equiv_to_bottom: FxHashSet<EntityId>,
}

impl SubsumerGraph {
    /// Builds a graph containing only the bottom and the top elements.
    pub fn new(bottom: EntityId, top: EntityId) -> Self {
        let mut graph = Self {
            bottom,
            top,
            elements: FxHashSet::default(),
            subsumers: FxHashMap::default(),
            equiv_to_bottom: FxHashSet::default(),
        };
        graph.elements.insert(bottom);
        graph.equiv_to_bottom.insert(bottom);
        graph.add_vertex(top);
        graph
    }

    #[inline]
    pub fn bottom_element(&self) -> EntityId {
        self.bottom
    }

    #[inline]
    pub fn top_element(&self) -> EntityId {
        self.top
    }

    /// Adds an element without any subsumer. Returns `true` if the element is new.
    pub fn add_vertex(&mut self, vertex: EntityId) -> bool {
        if !self.elements.insert(vertex) {
            return false;
        }
        if !self.equiv_to_bottom.contains(&vertex) {
            self.subsumers.insert(vertex, FxHashSet::default());
        }
        true
    }

    /// Records that `sub` is subsumed by `sup`. Returns `true` if the graph changed.
    ///
    /// Both elements are added to the graph if needed.
    pub fn add_ancestor(&mut self, sub: EntityId, sup: EntityId) -> bool {
        self.add_vertex(sup);
        if self.equiv_to_bottom.contains(&sub) {
            self.elements.insert(sub);
            return false;
        }
        self.add_vertex(sub);
        if sup == self.bottom {
            self.subsumers.remove(&sub);
            self.equiv_to_bottom.insert(sub);
            return true;
        }
        self.subsumers.entry(sub).or_default().insert(sup)
    }

    /// Whether `sup` is a known subsumer of `sub`.
    pub fn contains(&self, sub: EntityId, sup: EntityId) -> bool {
        if self.equiv_to_bottom.contains(&sub) {
            self.elements.contains(&sup)
        } else {
            self.subsumers
                .get(&sub)
                .is_some_and(|subsumers| subsumers.contains(&sup))
        }
    }

    /// The subsumers of an element, every element if it is equivalent to bottom.
    pub fn subsumers(&self, sub: EntityId) -> Subsumers<'_> {
        if self.equiv_to_bottom.contains(&sub) {
            Subsumers {
                inner: Some(self.elements.iter()),
            }
        } else {
            Subsumers {
                inner: self.subsumers.get(&sub).map(FxHashSet::iter),
            }
        }
    }

    #[inline]
    pub fn contains_element(&self, element: EntityId) -> bool {
        self.elements.contains(&element)
    }

    pub fn elements(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.elements.iter().copied()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn is_equiv_to_bottom(&self, element: EntityId) -> bool {
        self.equiv_to_bottom.contains(&element)
    }

    pub fn equiv_to_bottom(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.equiv_to_bottom.iter().copied()
    }
}

/// Iterator over the subsumers of an element of a [`SubsumerGraph`].
#[derive(Debug, Clone)]
pub struct Subsumers<'a> {
    inner: Option<hash_set::Iter<'a, EntityId>>,
}

impl Iterator for Subsumers<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        self.inner.as_mut()?.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl ExactSizeIterator for Subsumers<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityManager, EntityType};

    fn graph<const N: usize>() -> (SubsumerGraph, [EntityId; N]) {
        let mut entities = EntityManager::new();
        let ids = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        (
            SubsumerGraph::new(EntityId::BOTTOM_CLASS, EntityId::TOP_CLASS),
            ids,
        )
    }

    fn sorted(subsumers: Subsumers<'_>) -> Vec<EntityId> {
        let mut subsumers = subsumers.collect::<Vec<_>>();
        subsumers.sort_unstable();
        subsumers
    }

    #[test]
    fn add_ancestor_reports_changes() {
        let (mut graph, [a, b]) = graph();
        assert!(graph.add_ancestor(a, a));
        assert!(graph.add_ancestor(a, b));
        assert!(!graph.add_ancestor(a, b));
        assert!(graph.contains(a, b));
        assert!(!graph.contains(b, a));
        assert_eq!(sorted(graph.subsumers(a)), vec![a, b]);
        assert!(graph.contains_element(b));
    }

    #[test]
    fn bottom_is_subsumed_by_everything() {
        let (mut graph, [a]) = graph();
        graph.add_vertex(a);
        assert!(graph.is_equiv_to_bottom(EntityId::BOTTOM_CLASS));
        assert_eq!(
            sorted(graph.subsumers(EntityId::BOTTOM_CLASS)),
            vec![EntityId::BOTTOM_CLASS, EntityId::TOP_CLASS, a]
        );
    }

    #[test]
    fn equiv_to_bottom_absorbs() {
        let (mut graph, [a, b, c]) = graph();
        graph.add_ancestor(a, a);
        graph.add_ancestor(a, b);
        assert!(graph.add_ancestor(a, EntityId::BOTTOM_CLASS));
        assert!(graph.is_equiv_to_bottom(a));
        assert!(!graph.add_ancestor(a, EntityId::BOTTOM_CLASS));
        assert!(!graph.add_ancestor(a, c));
        // c became an element so it is reported as subsumer
        assert_eq!(graph.subsumers(a).len(), graph.len());
        assert!(graph.contains(a, c));
        assert!(graph.contains(a, EntityId::TOP_CLASS));
    }

    #[test]
    fn unknown_element_has_no_subsumer() {
        let (graph, [a]) = graph();
        assert_eq!(graph.subsumers(a).count(), 0);
        assert!(!graph.contains(a, a));
    }
}
