use crate::entity::EntityId;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

/// A taxonomy: the transitive reduction of a subsumption relation, with equivalent elements grouped.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalGraph {
    elements: BTreeSet<EntityId>,
    equivalents: FxHashMap<EntityId, BTreeSet<EntityId>>,
    ancestors: FxHashMap<EntityId, BTreeSet<EntityId>>,
    descendants: FxHashMap<EntityId, BTreeSet<EntityId>>,
    parents: FxHashMap<EntityId, BTreeSet<EntityId>>,
    children: FxHashMap<EntityId, BTreeSet<EntityId>>,
}

impl HierarchicalGraph {
    /// Builds the taxonomy of `elements`.
    ///
    /// `subsumers` must return the transitively closed subsumers of an element.
    /// Subsumers that are not in `elements` are ignored.
    pub fn new<I: IntoIterator<Item = EntityId>>(
        elements: impl IntoIterator<Item = EntityId>,
        mut subsumers: impl FnMut(EntityId) -> I,
    ) -> Self {
        let elements = elements.into_iter().collect::<BTreeSet<_>>();
        let closure = elements
            .iter()
            .map(|element| {
                let mut subs = subsumers(*element)
                    .into_iter()
                    .filter(|s| elements.contains(s))
                    .collect::<FxHashSet<_>>();
                subs.insert(*element);
                (*element, subs)
            })
            .collect::<FxHashMap<_, _>>();

        let mut graph = Self {
            elements,
            ..Self::default()
        };
        for (element, subs) in &closure {
            let equivalents = subs
                .iter()
                .copied()
                .filter(|s| closure.get(s).is_some_and(|back| back.contains(element)))
                .collect::<BTreeSet<_>>();
            let strict = subs
                .iter()
                .copied()
                .filter(|s| !equivalents.contains(s))
                .collect::<BTreeSet<_>>();
            graph.equivalents.insert(*element, equivalents);
            graph.ancestors.insert(*element, strict);
        }
        for (element, strict) in &graph.ancestors {
            for ancestor in strict {
                graph
                    .descendants
                    .entry(*ancestor)
                    .or_default()
                    .insert(*element);
            }
            // a parent is a strict ancestor that is not a strict ancestor of another strict ancestor
            let parents = strict
                .iter()
                .copied()
                .filter(|candidate| {
                    !strict.iter().any(|other| {
                        graph
                            .ancestors
                            .get(other)
                            .is_some_and(|a| a.contains(candidate))
                    })
                })
                .collect::<BTreeSet<_>>();
            for parent in &parents {
                graph.children.entry(*parent).or_default().insert(*element);
            }
            graph.parents.insert(*element, parents);
        }
        graph
    }

    pub fn elements(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.elements.iter().copied()
    }

    pub fn contains(&self, element: EntityId) -> bool {
        self.elements.contains(&element)
    }

    /// The elements equivalent to `element`, itself included.
    pub fn equivalents(&self, element: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        Self::lookup(&self.equivalents, element)
    }

    /// The direct strict subsumers of `element`.
    pub fn parents(&self, element: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        Self::lookup(&self.parents, element)
    }

    /// The direct strict subsumees of `element`.
    pub fn children(&self, element: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        Self::lookup(&self.children, element)
    }

    /// All strict subsumers of `element`.
    pub fn ancestors(&self, element: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        Self::lookup(&self.ancestors, element)
    }

    /// All strict subsumees of `element`.
    pub fn descendants(&self, element: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        Self::lookup(&self.descendants, element)
    }

    fn lookup(
        map: &FxHashMap<EntityId, BTreeSet<EntityId>>,
        element: EntityId,
    ) -> impl Iterator<Item = EntityId> + '_ {
        map.get(&element).into_iter().flatten().copied()
    }
}
