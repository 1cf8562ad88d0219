//! Indexed view of a set of normal-form axioms.

use crate::entity::EntityId;
use crate::normalized::{
    Gci0Axiom, Gci1Axiom, Gci2Axiom, Gci3Axiom, NominalAxiom, NormalizedAxiom, RangeAxiom,
    Ri2Axiom, Ri3Axiom,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use std::hash::Hash;

/// Normal-form axioms indexed for the lookups done by the completion rules.
///
/// Every accessor returns an empty iterator when nothing matches the key.
///
/// ```
/// use oxel::{EntityId, EntityManager, EntityType, ExtendedOntology, Gci0Axiom, NormalizedAxiom};
///
/// let mut entities = EntityManager::new();
/// let a = entities.create_anonymous_entity(EntityType::Class)?;
/// let b = entities.create_anonymous_entity(EntityType::Class)?;
/// let ontology = ExtendedOntology::from_axioms(&[NormalizedAxiom::from(Gci0Axiom::new(a, b))]);
/// assert_eq!(ontology.gci0_by_sub_class(a).count(), 1);
/// assert_eq!(ontology.gci0_by_sub_class(b).count(), 0);
/// assert!(ontology.classes().any(|c| c == b));
/// assert!(ontology.classes().any(|c| c == EntityId::TOP_CLASS));
/// # Result::<_, oxel::InvalidInputError>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtendedOntology {
    classes: FxHashSet<EntityId>,
    object_properties: FxHashSet<EntityId>,
    individuals: FxHashSet<EntityId>,
    gci0_by_sub_class: FxHashMap<EntityId, FxHashSet<Gci0Axiom>>,
    gci1_by_operand: FxHashMap<EntityId, FxHashSet<Gci1Axiom>>,
    gci2_by_sub_class: FxHashMap<EntityId, FxHashSet<Gci2Axiom>>,
    gci3_by_property: FxHashMap<EntityId, FxHashMap<EntityId, FxHashSet<Gci3Axiom>>>,
    gci3_by_class: FxHashMap<(EntityId, EntityId), FxHashSet<Gci3Axiom>>,
    ri2_by_sub_property: FxHashMap<EntityId, FxHashSet<Ri2Axiom>>,
    ri3_by_left_sub_property: FxHashMap<EntityId, FxHashSet<Ri3Axiom>>,
    ri3_by_right_sub_property: FxHashMap<EntityId, FxHashSet<Ri3Axiom>>,
    nominals_by_individual: FxHashMap<EntityId, FxHashSet<NominalAxiom>>,
    ranges_by_property: FxHashMap<EntityId, FxHashSet<RangeAxiom>>,
    functional_properties: FxHashSet<EntityId>,
    reflexive_properties: FxHashSet<EntityId>,
    transitive_properties: FxHashSet<EntityId>,
    axiom_count: usize,
}

impl ExtendedOntology {
    /// Creates an ontology containing only the top and bottom entities.
    pub fn new() -> Self {
        let mut ontology = Self::default();
        ontology.add_reserved_entities();
        ontology
    }

    pub fn from_axioms<'a>(axioms: impl IntoIterator<Item = &'a NormalizedAxiom>) -> Self {
        let mut ontology = Self::new();
        ontology.load(axioms);
        ontology
    }

    /// Replaces the content of the ontology with the given axioms.
    pub fn load<'a>(&mut self, axioms: impl IntoIterator<Item = &'a NormalizedAxiom>) {
        self.clear();
        let mut classes = BTreeSet::new();
        let mut properties = BTreeSet::new();
        let mut individuals = BTreeSet::new();
        for axiom in axioms {
            axiom.collect_classes(&mut classes);
            axiom.collect_object_properties(&mut properties);
            axiom.collect_individuals(&mut individuals);
            self.add_axiom(axiom);
        }
        self.classes.extend(classes);
        self.object_properties.extend(properties);
        self.individuals.extend(individuals);
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn add_reserved_entities(&mut self) {
        self.classes
            .extend([EntityId::BOTTOM_CLASS, EntityId::TOP_CLASS]);
        self.object_properties.extend([
            EntityId::BOTTOM_OBJECT_PROPERTY,
            EntityId::TOP_OBJECT_PROPERTY,
        ]);
    }

    fn add_axiom(&mut self, axiom: &NormalizedAxiom) {
        self.axiom_count += 1;
        match axiom {
            NormalizedAxiom::Gci0(a) => insert(&mut self.gci0_by_sub_class, a.sub_class(), a),
            NormalizedAxiom::Gci1(a) => {
                insert(&mut self.gci1_by_operand, a.left_sub_class(), a);
                insert(&mut self.gci1_by_operand, a.right_sub_class(), a);
            }
            NormalizedAxiom::Gci2(a) => insert(&mut self.gci2_by_sub_class, a.sub_class(), a),
            NormalizedAxiom::Gci3(a) => {
                insert(
                    self.gci3_by_property.entry(a.property()).or_default(),
                    a.class_in_sub_class(),
                    a,
                );
                insert(
                    &mut self.gci3_by_class,
                    (a.class_in_sub_class(), a.super_class()),
                    a,
                );
            }
            NormalizedAxiom::Ri1(a) => {
                self.reflexive_properties.insert(a.super_property());
            }
            NormalizedAxiom::Ri2(a) => insert(&mut self.ri2_by_sub_property, a.sub_property(), a),
            NormalizedAxiom::Ri3(a) => {
                if a.is_transitivity() {
                    self.transitive_properties.insert(a.super_property());
                }
                insert(&mut self.ri3_by_left_sub_property, a.left_sub_property(), a);
                insert(&mut self.ri3_by_right_sub_property, a.right_sub_property(), a);
            }
            NormalizedAxiom::FunctionalObjectProperty(a) => {
                self.functional_properties.insert(a.property());
            }
            NormalizedAxiom::Range(a) => insert(&mut self.ranges_by_property, a.property(), a),
            NormalizedAxiom::Nominal(a) => {
                insert(&mut self.nominals_by_individual, a.individual(), a);
            }
        }
    }

    /// All classes of the signature, `owl:Thing` and `owl:Nothing` included.
    pub fn classes(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.classes.iter().copied()
    }

    /// All object properties of the signature, the top and bottom properties included.
    pub fn object_properties(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.object_properties.iter().copied()
    }

    pub fn individuals(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.individuals.iter().copied()
    }

    pub fn contains_class(&self, class: EntityId) -> bool {
        self.classes.contains(&class)
    }

    pub fn contains_object_property(&self, property: EntityId) -> bool {
        self.object_properties.contains(&property)
    }

    /// `A ⊑ B` axioms with the given `A`.
    pub fn gci0_by_sub_class(&self, sub_class: EntityId) -> impl Iterator<Item = &Gci0Axiom> {
        get(&self.gci0_by_sub_class, &sub_class)
    }

    /// `A1 ⊓ A2 ⊑ B` axioms where the given class is `A1` or `A2`.
    pub fn gci1_by_operand(&self, operand: EntityId) -> impl Iterator<Item = &Gci1Axiom> {
        get(&self.gci1_by_operand, &operand)
    }

    /// `A ⊑ ∃r.B` axioms with the given `A`.
    pub fn gci2_by_sub_class(&self, sub_class: EntityId) -> impl Iterator<Item = &Gci2Axiom> {
        get(&self.gci2_by_sub_class, &sub_class)
    }

    /// `∃r.A ⊑ B` axioms with the given `r`.
    pub fn gci3_by_property(&self, property: EntityId) -> impl Iterator<Item = &Gci3Axiom> {
        self.gci3_by_property
            .get(&property)
            .into_iter()
            .flat_map(|by_class| by_class.values().flatten())
    }

    /// `∃r.A ⊑ B` axioms with the given `r` and `A`.
    pub fn gci3_by_property_and_class(
        &self,
        property: EntityId,
        class_in_sub_class: EntityId,
    ) -> impl Iterator<Item = &Gci3Axiom> {
        self.gci3_by_property
            .get(&property)
            .and_then(|by_class| by_class.get(&class_in_sub_class))
            .into_iter()
            .flatten()
    }

    /// `∃r.A ⊑ B` axioms with the given `A` and `B`.
    pub fn gci3_by_class_and_super_class(
        &self,
        class_in_sub_class: EntityId,
        super_class: EntityId,
    ) -> impl Iterator<Item = &Gci3Axiom> {
        get(&self.gci3_by_class, &(class_in_sub_class, super_class))
    }

    /// `r ⊑ s` axioms with the given `r`.
    pub fn ri2_by_sub_property(&self, sub_property: EntityId) -> impl Iterator<Item = &Ri2Axiom> {
        get(&self.ri2_by_sub_property, &sub_property)
    }

    /// `r ∘ s ⊑ t` axioms with the given `r`.
    pub fn ri3_by_left_sub_property(&self, property: EntityId) -> impl Iterator<Item = &Ri3Axiom> {
        get(&self.ri3_by_left_sub_property, &property)
    }

    /// `r ∘ s ⊑ t` axioms with the given `s`.
    pub fn ri3_by_right_sub_property(
        &self,
        property: EntityId,
    ) -> impl Iterator<Item = &Ri3Axiom> {
        get(&self.ri3_by_right_sub_property, &property)
    }

    pub fn nominal_axioms_by_individual(
        &self,
        individual: EntityId,
    ) -> impl Iterator<Item = &NominalAxiom> {
        get(&self.nominals_by_individual, &individual)
    }

    pub fn range_axioms_by_property(&self, property: EntityId) -> impl Iterator<Item = &RangeAxiom> {
        get(&self.ranges_by_property, &property)
    }

    pub fn functional_object_properties(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.functional_properties.iter().copied()
    }

    pub fn reflexive_object_properties(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.reflexive_properties.iter().copied()
    }

    pub fn transitive_object_properties(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.transitive_properties.iter().copied()
    }

    pub fn has_functional_object_property(&self, property: EntityId) -> bool {
        self.functional_properties.contains(&property)
    }

    pub fn has_reflexive_object_property(&self, property: EntityId) -> bool {
        self.reflexive_properties.contains(&property)
    }

    pub fn has_transitive_object_property(&self, property: EntityId) -> bool {
        self.transitive_properties.contains(&property)
    }

    /// Number of loaded axioms.
    pub fn axiom_count(&self) -> usize {
        self.axiom_count
    }
}

fn insert<K: Hash + Eq, V: Hash + Eq + Clone>(
    map: &mut FxHashMap<K, FxHashSet<V>>,
    key: K,
    value: &V,
) {
    map.entry(key).or_default().insert(value.clone());
}

fn get<'a, K: Hash + Eq, V>(
    map: &'a FxHashMap<K, FxHashSet<V>>,
    key: &K,
) -> impl Iterator<Item = &'a V> + use<'a, K, V> {
    map.get(key).into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalized::{FunctionalObjectPropertyAxiom, Ri1Axiom};
    use crate::{EntityManager, EntityType};

    #[test]
    fn empty() {
        let ontology = ExtendedOntology::new();
        let mut classes = ontology.classes().collect::<Vec<_>>();
        classes.sort_unstable();
        assert_eq!(classes, vec![EntityId::BOTTOM_CLASS, EntityId::TOP_CLASS]);
        assert_eq!(ontology.object_properties().count(), 2);
        assert_eq!(ontology.gci0_by_sub_class(EntityId::TOP_CLASS).count(), 0);
        assert_eq!(ontology.axiom_count(), 0);
    }

    #[test]
    fn every_index_is_filled() {
        let mut entities = EntityManager::new();
        let [a, b, c] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let [r, s] = std::array::from_fn(|_| {
            entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap()
        });
        let i = entities.create_anonymous_entity(EntityType::NamedIndividual).unwrap();
        let axioms = vec![
            NormalizedAxiom::from(Gci0Axiom::new(a, b)),
            Gci1Axiom::new(a, b, c).into(),
            Gci2Axiom::new(a, r, b).into(),
            Gci3Axiom::new(r, a, c).into(),
            Ri1Axiom::new(s).into(),
            Ri2Axiom::new(r, s).into(),
            Ri3Axiom::new(s, s, s).into(),
            Ri3Axiom::new(r, s, s).into(),
            FunctionalObjectPropertyAxiom::new(r).into(),
            RangeAxiom::new(r, c).into(),
            NominalAxiom::new(c, i).into(),
        ];
        let ontology = ExtendedOntology::from_axioms(&axioms);
        assert_eq!(ontology.axiom_count(), 11);
        assert_eq!(ontology.gci0_by_sub_class(a).count(), 1);
        assert_eq!(ontology.gci1_by_operand(a).count(), 1);
        assert_eq!(ontology.gci1_by_operand(b).count(), 1);
        assert_eq!(ontology.gci1_by_operand(c).count(), 0);
        assert_eq!(ontology.gci2_by_sub_class(a).count(), 1);
        assert_eq!(ontology.gci3_by_property(r).count(), 1);
        assert_eq!(ontology.gci3_by_property_and_class(r, a).count(), 1);
        assert_eq!(ontology.gci3_by_property_and_class(r, b).count(), 0);
        assert_eq!(ontology.gci3_by_class_and_super_class(a, c).count(), 1);
        assert_eq!(ontology.ri2_by_sub_property(r).count(), 1);
        assert_eq!(ontology.ri3_by_left_sub_property(s).count(), 1);
        assert_eq!(ontology.ri3_by_right_sub_property(s).count(), 2);
        assert_eq!(ontology.range_axioms_by_property(r).count(), 1);
        assert_eq!(ontology.nominal_axioms_by_individual(i).count(), 1);
        assert!(ontology.has_functional_object_property(r));
        assert!(ontology.has_reflexive_object_property(s));
        assert!(ontology.has_transitive_object_property(s));
        assert!(!ontology.has_transitive_object_property(r));
        assert!(ontology.contains_object_property(s));
        assert!(ontology.individuals().any(|x| x == i));
    }

    #[test]
    fn load_replaces_content() {
        let mut entities = EntityManager::new();
        let [a, b] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let mut ontology = ExtendedOntology::from_axioms(&[NormalizedAxiom::from(Gci0Axiom::new(a, b))]);
        ontology.load(&[NormalizedAxiom::from(Gci0Axiom::new(b, a))]);
        assert_eq!(ontology.gci0_by_sub_class(a).count(), 0);
        assert_eq!(ontology.gci0_by_sub_class(b).count(), 1);
        assert_eq!(ontology.axiom_count(), 1);
    }
}
