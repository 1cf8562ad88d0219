use crate::entity::EntityId;
use rustc_hash::{FxHashMap, FxHashSet};

/// A subsumer graph that also answers "what does this element subsume".
///
/// Used for the object property hierarchy. Unlike the class [`SubsumerGraph`](super::SubsumerGraph)
/// it is closed transitively once, by [`close_transitively`](Self::close_transitively),
/// and is only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct BidirectionalGraph {
    subsumers: FxHashMap<EntityId, FxHashSet<EntityId>>,
    subsumees: FxHashMap<EntityId, FxHashSet<EntityId>>,
}

impl BidirectionalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element, which subsumes itself. Returns `true` if the element is new.
    pub fn add_vertex(&mut self, vertex: EntityId) -> bool {
        if self.subsumers.contains_key(&vertex) {
            return false;
        }
        self.subsumers.insert(vertex, [vertex].into_iter().collect());
        self.subsumees.insert(vertex, [vertex].into_iter().collect());
        true
    }

    /// Records that `sub` is subsumed by `sup`. Returns `true` if the graph changed.
    pub fn add_ancestor(&mut self, sub: EntityId, sup: EntityId) -> bool {
        self.add_vertex(sub);
        self.add_vertex(sup);
        let changed = self.subsumers.entry(sub).or_default().insert(sup);
        self.subsumees.entry(sup).or_default().insert(sub);
        changed
    }

    /// Makes the relation transitive.
    pub fn close_transitively(&mut self) {
        let vertices = self.subsumers.keys().copied().collect::<Vec<_>>();
        let mut closed = FxHashMap::default();
        for vertex in vertices {
            let mut reached = FxHashSet::default();
            let mut stack = vec![vertex];
            while let Some(current) = stack.pop() {
                if reached.insert(current) {
                    if let Some(next) = self.subsumers.get(&current) {
                        stack.extend(next.iter().copied().filter(|n| !reached.contains(n)));
                    }
                }
            }
            closed.insert(vertex, reached);
        }
        self.subsumees.clear();
        for (sub, sups) in &closed {
            for sup in sups {
                self.subsumees.entry(*sup).or_default().insert(*sub);
            }
        }
        self.subsumers = closed;
    }

    /// The elements subsuming `element`, itself included.
    pub fn subsumers(&self, element: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.subsumers.get(&element).into_iter().flatten().copied()
    }

    /// The elements subsumed by `element`, itself included.
    pub fn subsumees(&self, element: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.subsumees.get(&element).into_iter().flatten().copied()
    }

    pub fn is_subsumed_by(&self, sub: EntityId, sup: EntityId) -> bool {
        self.subsumers
            .get(&sub)
            .is_some_and(|subsumers| subsumers.contains(&sup))
    }

    pub fn contains_element(&self, element: EntityId) -> bool {
        self.subsumers.contains_key(&element)
    }

    pub fn elements(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.subsumers.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityManager, EntityType};

    fn properties<const N: usize>() -> [EntityId; N] {
        let mut entities = EntityManager::new();
        std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap())
    }

    fn sorted(iter: impl Iterator<Item = EntityId>) -> Vec<EntityId> {
        let mut values = iter.collect::<Vec<_>>();
        values.sort_unstable();
        values
    }

    #[test]
    fn reflexive() {
        let [r] = properties();
        let mut graph = BidirectionalGraph::new();
        graph.add_vertex(r);
        graph.close_transitively();
        assert!(graph.is_subsumed_by(r, r));
        assert_eq!(sorted(graph.subsumees(r)), vec![r]);
    }

    #[test]
    fn transitive_closure() {
        let [r, s, t, u] = properties();
        let mut graph = BidirectionalGraph::new();
        graph.add_ancestor(r, s);
        graph.add_ancestor(s, t);
        graph.add_ancestor(u, t);
        assert!(!graph.is_subsumed_by(r, t));
        graph.close_transitively();
        assert!(graph.is_subsumed_by(r, t));
        assert_eq!(sorted(graph.subsumers(r)), vec![r, s, t]);
        assert_eq!(sorted(graph.subsumees(t)), vec![r, s, t, u]);
        assert!(!graph.is_subsumed_by(t, r));
    }

    #[test]
    fn cycles() {
        let [r, s] = properties();
        let mut graph = BidirectionalGraph::new();
        graph.add_ancestor(r, s);
        graph.add_ancestor(s, r);
        graph.close_transitively();
        assert_eq!(sorted(graph.subsumers(r)), vec![r, s]);
        assert_eq!(sorted(graph.subsumees(r)), vec![r, s]);
    }
}
