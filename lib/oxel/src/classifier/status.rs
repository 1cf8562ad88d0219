use crate::classifier::node::{NodeRegistry, VNode};
use crate::entity::{EntityId, EntityManager};
use crate::error::InvalidInputError;
use crate::graph::{BidirectionalGraph, RelationMap, SubsumerGraph, Subsumers};
use crate::ontology::ExtendedOntology;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// Everything the completion rules read: the subsumer graph `S`, the role relation `R`,
/// the object property hierarchy, the node registry and the ontology itself.
///
/// Rules only get a shared reference. The processor is the only writer.
#[derive(Debug, Clone)]
pub struct ClassifierStatus {
    ontology: Arc<ExtendedOntology>,
    entities: EntityManager,
    class_graph: SubsumerGraph,
    object_property_graph: BidirectionalGraph,
    relations: RelationMap,
    nodes: NodeRegistry,
    derived_nodes: FxHashMap<EntityId, FxHashSet<EntityId>>,
    cognate_functional_properties: FxHashMap<EntityId, FxHashSet<EntityId>>,
}

impl ClassifierStatus {
    /// Builds the initial status of a classification.
    ///
    /// Every class of the ontology is subsumed by `owl:Thing`, every object property (and its inverse)
    /// by the top object property, and the object property hierarchy is closed transitively.
    pub fn new(
        ontology: Arc<ExtendedOntology>,
        mut entities: EntityManager,
    ) -> Result<Self, InvalidInputError> {
        let class_graph = Self::create_class_graph(&ontology);
        let object_property_graph = Self::create_object_property_graph(&ontology, &mut entities)?;
        let mut relations = RelationMap::new();
        for property in object_property_graph.elements() {
            relations.add_property(property);
        }
        let mut nodes = NodeRegistry::new();
        for class in ontology.classes() {
            nodes.register_class(class);
        }
        let cognate_functional_properties =
            Self::create_cognate_functional_properties(&ontology, &object_property_graph);
        debug!(
            classes = class_graph.len(),
            object_properties = relations.properties().count(),
            functional_cognates = cognate_functional_properties.len(),
            "classifier status initialized"
        );
        Ok(Self {
            ontology,
            entities,
            class_graph,
            object_property_graph,
            relations,
            nodes,
            derived_nodes: FxHashMap::default(),
            cognate_functional_properties,
        })
    }

    fn create_class_graph(ontology: &ExtendedOntology) -> SubsumerGraph {
        let mut graph = SubsumerGraph::new(EntityId::BOTTOM_CLASS, EntityId::TOP_CLASS);
        graph.add_ancestor(EntityId::TOP_CLASS, EntityId::TOP_CLASS);
        for class in ontology.classes() {
            if class != EntityId::BOTTOM_CLASS {
                graph.add_ancestor(class, EntityId::TOP_CLASS);
            }
        }
        graph
    }

    fn create_object_property_graph(
        ontology: &ExtendedOntology,
        entities: &mut EntityManager,
    ) -> Result<BidirectionalGraph, InvalidInputError> {
        let mut graph = BidirectionalGraph::new();
        graph.add_vertex(EntityId::BOTTOM_OBJECT_PROPERTY);
        graph.add_vertex(EntityId::TOP_OBJECT_PROPERTY);
        for property in ontology.object_properties() {
            let inverse = entities.create_or_get_inverse_object_property_of(property)?;
            graph.add_ancestor(property, EntityId::TOP_OBJECT_PROPERTY);
            graph.add_ancestor(inverse, EntityId::TOP_OBJECT_PROPERTY);
        }
        for property in ontology.object_properties() {
            for axiom in ontology.ri2_by_sub_property(property) {
                let sub = axiom.sub_property();
                let sup = axiom.super_property();
                graph.add_ancestor(sub, sup);
                // r ⊑ s implies r⁻ ⊑ s⁻
                graph.add_ancestor(
                    entities.create_or_get_inverse_object_property_of(sub)?,
                    entities.create_or_get_inverse_object_property_of(sup)?,
                );
            }
        }
        graph.close_transitively();
        Ok(graph)
    }

    /// Maps each property having a functional super property `s` to all the sub properties of such `s`.
    fn create_cognate_functional_properties(
        ontology: &ExtendedOntology,
        graph: &BidirectionalGraph,
    ) -> FxHashMap<EntityId, FxHashSet<EntityId>> {
        let mut map = FxHashMap::<EntityId, FxHashSet<EntityId>>::default();
        for functional in ontology.functional_object_properties() {
            let cognates = graph.subsumees(functional).collect::<FxHashSet<_>>();
            for property in &cognates {
                map.entry(*property)
                    .or_default()
                    .extend(cognates.iter().copied());
            }
        }
        map
    }

    #[inline]
    pub fn ontology(&self) -> &ExtendedOntology {
        &self.ontology
    }

    #[inline]
    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    /// Gives back the entity manager, with the identifiers allocated during the classification.
    pub fn into_entities(self) -> EntityManager {
        self.entities
    }

    /// Adds `sub ⊑ sup` to `S`. Returns `true` if it was not already there.
    pub fn add_to_s(&mut self, sub: EntityId, sup: EntityId) -> bool {
        self.class_graph.add_ancestor(sub, sup)
    }

    /// Adds `(property, left, right)` to `R`. Returns `true` if it was not already there.
    pub fn add_to_r(&mut self, property: EntityId, left: EntityId, right: EntityId) -> bool {
        self.relations.add(property, left, right)
    }

    /// Returns the identifier of a node, and whether it has just been created.
    ///
    /// A created node is added to the subsumer graph without subsumers.
    pub fn create_or_get_node_id(
        &mut self,
        node: VNode,
    ) -> Result<(EntityId, bool), InvalidInputError> {
        let (id, created) = self.nodes.create_or_get(node, &mut self.entities)?;
        if created {
            self.class_graph.add_vertex(id);
        }
        Ok((id, created))
    }

    /// Records that `node` inherits the subsumers of `source`. Returns `true` if it is new.
    pub fn add_derived_node(&mut self, source: EntityId, node: EntityId) -> bool {
        source != node && self.derived_nodes.entry(source).or_default().insert(node)
    }

    /// The nodes inheriting the subsumers of `source`.
    pub fn derived_nodes(&self, source: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.derived_nodes.get(&source).into_iter().flatten().copied()
    }

    pub fn node(&self, id: EntityId) -> Option<&VNode> {
        self.nodes.node(id)
    }

    /// Number of registered nodes, plain classes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_s(&self, sub: EntityId, sup: EntityId) -> bool {
        self.class_graph.contains(sub, sup)
    }

    pub fn contains_r(&self, property: EntityId, left: EntityId, right: EntityId) -> bool {
        self.relations.contains(property, left, right)
    }

    /// The subsumers of a class. Every class for an unsatisfiable class.
    pub fn subsumers(&self, class: EntityId) -> Subsumers<'_> {
        self.class_graph.subsumers(class)
    }

    pub fn is_unsatisfiable(&self, class: EntityId) -> bool {
        self.class_graph.is_equiv_to_bottom(class)
    }

    /// All classes of `S`, nodes included.
    pub fn classes(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.class_graph.elements()
    }

    /// The sub properties of `property`, itself included.
    pub fn sub_object_properties(&self, property: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.object_property_graph.subsumees(property)
    }

    /// The super properties of `property`, itself included.
    pub fn super_object_properties(
        &self,
        property: EntityId,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.object_property_graph.subsumers(property)
    }

    /// All object properties of the hierarchy, inverses included.
    pub fn object_properties(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.object_property_graph.elements()
    }

    pub fn inverse_object_property_of(&self, property: EntityId) -> Option<EntityId> {
        self.entities.inverse_object_property_of(property)
    }

    /// All `y` such that `(property, x, y)` is in `R`.
    pub fn second_by_first(
        &self,
        property: EntityId,
        x: EntityId,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.relations.second_by_first(property, x)
    }

    /// All `x` such that `(property, x, y)` is in `R`.
    pub fn first_by_second(
        &self,
        property: EntityId,
        y: EntityId,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.relations.first_by_second(property, y)
    }

    /// The properties `r` such that some `(r, x, _)` is in `R`.
    pub fn properties_by_first(&self, x: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.relations.properties_by_first(x)
    }

    /// The properties `r` such that some `(r, _, y)` is in `R`.
    pub fn properties_by_second(&self, y: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.relations.properties_by_second(y)
    }

    /// The properties sharing a functional super property with `property`.
    pub fn object_properties_with_functional_ancestor(
        &self,
        property: EntityId,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.cognate_functional_properties
            .get(&property)
            .into_iter()
            .flatten()
            .copied()
    }

    pub fn has_functional_ancestor(&self, property: EntityId) -> bool {
        self.cognate_functional_properties.contains_key(&property)
    }

    #[inline]
    pub fn class_graph(&self) -> &SubsumerGraph {
        &self.class_graph
    }

    #[inline]
    pub fn relations(&self) -> &RelationMap {
        &self.relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalized::{FunctionalObjectPropertyAxiom, Gci0Axiom, NormalizedAxiom, Ri2Axiom};
    use crate::EntityType;

    #[test]
    fn initialization() {
        let mut entities = EntityManager::new();
        let [a, b] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let [r, s, t] = std::array::from_fn(|_| {
            entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap()
        });
        let ontology = ExtendedOntology::from_axioms(&[
            NormalizedAxiom::from(Gci0Axiom::new(a, b)),
            Ri2Axiom::new(r, s).into(),
            Ri2Axiom::new(s, t).into(),
            FunctionalObjectPropertyAxiom::new(s).into(),
        ]);
        let status = ClassifierStatus::new(Arc::new(ontology), entities).unwrap();

        assert!(status.contains_s(a, EntityId::TOP_CLASS));
        assert!(!status.contains_s(a, b));
        assert!(status.is_unsatisfiable(EntityId::BOTTOM_CLASS));
        assert_eq!(status.node(a), Some(&VNode::new(a)));

        // the hierarchy is closed, and mirrored on inverses
        assert!(status.super_object_properties(r).any(|p| p == t));
        assert!(status.sub_object_properties(r).any(|p| p == r));
        assert!(
            status
                .super_object_properties(r)
                .any(|p| p == EntityId::TOP_OBJECT_PROPERTY)
        );
        let r_inverse = status.inverse_object_property_of(r).unwrap();
        let t_inverse = status.inverse_object_property_of(t).unwrap();
        assert!(status.super_object_properties(r_inverse).any(|p| p == t_inverse));

        // r and s are both below the functional s
        assert!(status.has_functional_ancestor(r));
        assert!(status.has_functional_ancestor(s));
        assert!(!status.has_functional_ancestor(t));
        let mut cognates = status
            .object_properties_with_functional_ancestor(r)
            .collect::<Vec<_>>();
        cognates.sort_unstable();
        assert_eq!(cognates, vec![r, s]);
    }

    #[test]
    fn nodes_are_added_to_s() {
        let mut entities = EntityManager::new();
        let a = entities.create_anonymous_entity(EntityType::Class).unwrap();
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let ontology = ExtendedOntology::from_axioms(&[NormalizedAxiom::from(Gci0Axiom::new(
            a,
            EntityId::TOP_CLASS,
        ))]);
        let mut status = ClassifierStatus::new(Arc::new(ontology), entities).unwrap();
        let (id, created) =
            status.create_or_get_node_id(VNode::new(EntityId::TOP_CLASS).with_existential(r, a)).unwrap();
        assert!(created);
        assert!(status.classes().any(|c| c == id));
        assert_eq!(status.subsumers(id).count(), 0);
        assert!(status.add_to_s(id, id));
        assert!(status.add_to_r(r, a, id));
        assert!(!status.add_to_r(r, a, id));
        assert!(status.contains_r(r, a, id));
        assert_eq!(status.second_by_first(r, a).collect::<Vec<_>>(), vec![id]);
        assert_eq!(status.properties_by_second(id).collect::<Vec<_>>(), vec![r]);
    }
}
