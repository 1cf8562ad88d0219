use crate::entity::EntityId;
use rustc_hash::{FxHashMap, FxHashSet};

/// A set of pairs, indexed on both components.
#[derive(Debug, Clone, Default)]
pub struct BinaryRelation {
    by_first: FxHashMap<EntityId, FxHashSet<EntityId>>,
    by_second: FxHashMap<EntityId, FxHashSet<EntityId>>,
    len: usize,
}

impl BinaryRelation {
    /// Adds a pair. Returns `true` if it was not already there.
    pub fn add(&mut self, first: EntityId, second: EntityId) -> bool {
        if !self.by_first.entry(first).or_default().insert(second) {
            return false;
        }
        self.by_second.entry(second).or_default().insert(first);
        self.len += 1;
        true
    }

    pub fn contains(&self, first: EntityId, second: EntityId) -> bool {
        self.by_first
            .get(&first)
            .is_some_and(|seconds| seconds.contains(&second))
    }

    /// All `y` such that `(first, y)` is in the relation.
    pub fn by_first(&self, first: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.by_first.get(&first).into_iter().flatten().copied()
    }

    /// All `x` such that `(x, second)` is in the relation.
    pub fn by_second(&self, second: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.by_second.get(&second).into_iter().flatten().copied()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.by_first
            .iter()
            .flat_map(|(first, seconds)| seconds.iter().map(|second| (*first, *second)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The ternary role relation: one [`BinaryRelation`] per object property.
///
/// It also remembers for each element the properties it appears with, in first or second position,
/// so that the predecessors or successors of an element can be enumerated without scanning every property.
#[derive(Debug, Clone, Default)]
pub struct RelationMap {
    relations: FxHashMap<EntityId, BinaryRelation>,
    properties_by_first: FxHashMap<EntityId, FxHashSet<EntityId>>,
    properties_by_second: FxHashMap<EntityId, FxHashSet<EntityId>>,
}

impl RelationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure a relation exists for the property.
    pub fn add_property(&mut self, property: EntityId) {
        self.relations.entry(property).or_default();
    }

    /// Adds the triple `(property, first, second)`. Returns `true` if it is new.
    pub fn add(&mut self, property: EntityId, first: EntityId, second: EntityId) -> bool {
        if !self.relations.entry(property).or_default().add(first, second) {
            return false;
        }
        self.properties_by_first
            .entry(first)
            .or_default()
            .insert(property);
        self.properties_by_second
            .entry(second)
            .or_default()
            .insert(property);
        true
    }

    pub fn contains(&self, property: EntityId, first: EntityId, second: EntityId) -> bool {
        self.relations
            .get(&property)
            .is_some_and(|relation| relation.contains(first, second))
    }

    pub fn get(&self, property: EntityId) -> Option<&BinaryRelation> {
        self.relations.get(&property)
    }

    /// All `y` such that `(property, first, y)` holds.
    pub fn second_by_first(
        &self,
        property: EntityId,
        first: EntityId,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.relations
            .get(&property)
            .into_iter()
            .flat_map(move |relation| relation.by_first(first))
    }

    /// All `x` such that `(property, x, second)` holds.
    pub fn first_by_second(
        &self,
        property: EntityId,
        second: EntityId,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.relations
            .get(&property)
            .into_iter()
            .flat_map(move |relation| relation.by_second(second))
    }

    /// The properties linking `first` to something.
    pub fn properties_by_first(&self, first: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.properties_by_first
            .get(&first)
            .into_iter()
            .flatten()
            .copied()
    }

    /// The properties linking something to `second`.
    pub fn properties_by_second(&self, second: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.properties_by_second
            .get(&second)
            .into_iter()
            .flatten()
            .copied()
    }

    pub fn properties(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.relations.keys().copied()
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.relations.values().map(BinaryRelation::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.values().all(BinaryRelation::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityManager, EntityType};

    #[test]
    fn indexed_both_ways() {
        let mut entities = EntityManager::new();
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let s = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let x = entities.create_anonymous_entity(EntityType::Class).unwrap();
        let y = entities.create_anonymous_entity(EntityType::Class).unwrap();
        let mut relations = RelationMap::new();
        relations.add_property(s);
        assert!(relations.is_empty());
        assert!(relations.add(r, x, y));
        assert!(!relations.add(r, x, y));
        assert!(relations.contains(r, x, y));
        assert!(!relations.contains(r, y, x));
        assert!(!relations.contains(s, x, y));
        assert_eq!(relations.second_by_first(r, x).collect::<Vec<_>>(), vec![y]);
        assert_eq!(relations.first_by_second(r, y).collect::<Vec<_>>(), vec![x]);
        assert_eq!(relations.second_by_first(s, x).count(), 0);
        assert_eq!(relations.properties_by_first(x).collect::<Vec<_>>(), vec![r]);
        assert_eq!(relations.properties_by_second(y).collect::<Vec<_>>(), vec![r]);
        assert_eq!(relations.properties_by_second(x).count(), 0);
        assert_eq!(relations.len(), 1);
        assert_eq!(
            relations.get(r).map(|r| r.pairs().collect::<Vec<_>>()),
            Some(vec![(x, y)])
        );
    }
}
