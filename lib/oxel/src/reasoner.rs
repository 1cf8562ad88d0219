//! Classification of a set of axioms and queries on the resulting hierarchies.

use crate::axiom::IntegerAxiom;
use crate::classifier::{ClassifierStatus, Processor, QueueOrder};
use crate::entity::{EntityId, EntityManager, EntityType};
use crate::error::{InvalidInputError, OwlError, ReasoningError};
use crate::graph::HierarchicalGraph;
use crate::normalization::normalize;
use crate::normalized::{Gci0Axiom, NominalAxiom, NormalizedAxiom, Ri2Axiom};
use crate::ontology::ExtendedOntology;
use oxrdf::NamedNode;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, info_span};

/// Configuration for the reasoner.
#[derive(Debug, Clone)]
pub struct ReasonerConfig {
    /// Order in which derived facts are processed.
    pub queue_order: QueueOrder,
    /// Maximum number of processed facts.
    pub max_iterations: usize,
    /// Maximum time allowed for the saturation (None = unlimited).
    pub timeout: Option<Duration>,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            queue_order: QueueOrder::Fifo,
            max_iterations: 100_000_000,
            timeout: None,
        }
    }
}

/// A shareable flag to stop a running classification.
///
/// ```
/// use oxel::InterruptHandle;
///
/// let handle = InterruptHandle::new();
/// let shared = handle.clone();
/// shared.interrupt();
/// assert!(handle.is_interrupted());
/// handle.reset();
/// assert!(!shared.is_interrupted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the classification to stop before processing its next fact.
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Trait for OWL reasoners.
///
/// Queries fail with [`ReasoningError::NotClassified`] until [`classify`](Reasoner::classify) succeeded.
/// Results never contain anonymous entities.
pub trait Reasoner {
    /// Computes the class and object property hierarchies.
    fn classify(&mut self) -> Result<(), OwlError>;

    /// Checks if `owl:Thing` and every individual are satisfiable.
    fn is_consistent(&self) -> Result<bool, OwlError>;

    fn is_satisfiable(&self, class: EntityId) -> Result<bool, OwlError>;

    /// Returns the superclasses of a class, or only the direct ones.
    fn get_super_classes(&self, class: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError>;

    /// Returns the subclasses of a class, or only the direct ones.
    ///
    /// `owl:Nothing` and the unsatisfiable classes are subclasses of every class.
    fn get_sub_classes(&self, class: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError>;

    /// Returns the classes equivalent to a class, itself excluded.
    fn get_equivalent_classes(&self, class: EntityId) -> Result<Vec<EntityId>, OwlError>;

    fn get_super_object_properties(
        &self,
        property: EntityId,
        direct: bool,
    ) -> Result<Vec<EntityId>, OwlError>;

    fn get_sub_object_properties(
        &self,
        property: EntityId,
        direct: bool,
    ) -> Result<Vec<EntityId>, OwlError>;

    /// Returns the classes an individual belongs to.
    fn get_types(&self, individual: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError>;

    /// Returns the individuals belonging to a class.
    fn get_instances(&self, class: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError>;
}

/// The result of a classification, restricted to named entities.
#[derive(Debug, Clone)]
struct Classification {
    classes: HierarchicalGraph,
    object_properties: HierarchicalGraph,
    consistent: bool,
    types: FxHashMap<EntityId, BTreeSet<EntityId>>,
    direct_types: FxHashMap<EntityId, BTreeSet<EntityId>>,
}

impl Classification {
    fn new(status: &ClassifierStatus) -> Self {
        let entities = status.entities();
        let named_classes = entities.named_entities(EntityType::Class);
        let classes = HierarchicalGraph::new(named_classes, |class| status.subsumers(class));

        let named_properties = entities.named_entities(EntityType::ObjectProperty);
        let object_properties = HierarchicalGraph::new(named_properties.clone(), |property| {
            if property == EntityId::BOTTOM_OBJECT_PROPERTY {
                named_properties.clone()
            } else {
                status.super_object_properties(property).collect()
            }
        });

        let mut consistent = !status.is_unsatisfiable(EntityId::TOP_CLASS);
        let mut types = FxHashMap::default();
        let mut direct_types = FxHashMap::default();
        for individual in entities.named_entities(EntityType::NamedIndividual) {
            let Some(nominal_class) = entities.class_id_for_individual(individual) else {
                continue;
            };
            if status.is_unsatisfiable(nominal_class) {
                consistent = false;
                continue;
            }
            let all = status
                .subsumers(nominal_class)
                .filter(|class| classes.contains(*class))
                .collect::<BTreeSet<_>>();
            let direct = all
                .iter()
                .copied()
                .filter(|class| {
                    !all.iter()
                        .any(|other| classes.ancestors(*other).any(|a| a == *class))
                })
                .collect::<BTreeSet<_>>();
            types.insert(individual, all);
            direct_types.insert(individual, direct);
        }

        Self {
            classes,
            object_properties,
            consistent,
            types,
            direct_types,
        }
    }
}

/// A reasoner for the OWL 2 EL profile, based on the saturation of subsumers.
///
/// The reasoner owns the identifier space. Entities are declared by IRI,
/// axioms are then added with the returned identifiers.
///
/// ```
/// use oxel::{ClassExpression, ComplexAxiom, ElReasoner, Reasoner};
///
/// let mut reasoner = ElReasoner::new();
/// let heart = reasoner.declare_class("http://example.com/Heart")?;
/// let organ = reasoner.declare_class("http://example.com/Organ")?;
/// let part_of = reasoner.declare_object_property("http://example.com/partOf")?;
/// let body = reasoner.declare_class("http://example.com/Body")?;
/// let body_part = reasoner.declare_class("http://example.com/BodyPart")?;
/// reasoner.add_axiom(ComplexAxiom::sub_class_of(
///     heart,
///     ClassExpression::intersection([organ.into(), ClassExpression::some_values_from(part_of, body.into())]),
/// ))?;
/// reasoner.add_axiom(ComplexAxiom::equivalent_classes([
///     body_part.into(),
///     ClassExpression::some_values_from(part_of, body.into()),
/// ]))?;
/// reasoner.classify()?;
/// assert_eq!(reasoner.get_super_classes(heart, true)?, vec![organ, body_part]);
/// assert!(reasoner.is_consistent()?);
/// # Result::<_, oxel::OwlError>::Ok(())
/// ```
#[derive(Debug, Default)]
pub struct ElReasoner {
    config: ReasonerConfig,
    entities: EntityManager,
    axioms: Vec<IntegerAxiom>,
    interrupt_handle: InterruptHandle,
    classification: Option<Classification>,
}

impl ElReasoner {
    pub fn new() -> Self {
        Self::with_config(ReasonerConfig::default())
    }

    pub fn with_config(config: ReasonerConfig) -> Self {
        Self {
            config,
            entities: EntityManager::new(),
            axioms: Vec::new(),
            interrupt_handle: InterruptHandle::new(),
            classification: None,
        }
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    /// A handle to stop a classification from another thread.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt_handle.clone()
    }

    pub fn declare_class(&mut self, iri: &str) -> Result<EntityId, OwlError> {
        self.declare(EntityType::Class, iri)
    }

    pub fn declare_object_property(&mut self, iri: &str) -> Result<EntityId, OwlError> {
        self.declare(EntityType::ObjectProperty, iri)
    }

    pub fn declare_data_property(&mut self, iri: &str) -> Result<EntityId, OwlError> {
        self.declare(EntityType::DataProperty, iri)
    }

    pub fn declare_individual(&mut self, iri: &str) -> Result<EntityId, OwlError> {
        self.declare(EntityType::NamedIndividual, iri)
    }

    fn declare(&mut self, kind: EntityType, iri: &str) -> Result<EntityId, OwlError> {
        let iri = NamedNode::new(iri)?;
        Ok(self.entities.create_named_entity(kind, iri)?)
    }

    /// The identifier of an already declared entity.
    pub fn entity(&self, kind: EntityType, iri: &str) -> Result<EntityId, OwlError> {
        let iri = NamedNode::new(iri)?;
        self.entities
            .id_of(kind, iri.as_ref())
            .ok_or_else(|| {
                InvalidInputError::UnknownIri {
                    kind,
                    iri: iri.into_string(),
                }
                .into()
            })
    }

    /// Adds an axiom. Every entity it mentions must be declared with the right kind.
    ///
    /// The previous classification is dropped.
    pub fn add_axiom(&mut self, axiom: impl Into<IntegerAxiom>) -> Result<(), OwlError> {
        let axiom = axiom.into();
        axiom.signature().validate(&self.entities)?;
        self.axioms.push(axiom);
        self.classification = None;
        Ok(())
    }

    pub fn axioms(&self) -> &[IntegerAxiom] {
        &self.axioms
    }

    pub fn is_classified(&self) -> bool {
        self.classification.is_some()
    }

    fn classification(&self) -> Result<&Classification, OwlError> {
        self.classification
            .as_ref()
            .ok_or(OwlError::Reasoning(ReasoningError::NotClassified))
    }

    /// Every declared entity is part of the classified ontology, even if no axiom mentions it.
    fn declarations(
        &self,
        entities: &mut EntityManager,
    ) -> Result<Vec<IntegerAxiom>, InvalidInputError> {
        let mut declarations = Vec::new();
        for class in self.entities.named_entities(EntityType::Class) {
            if class != EntityId::BOTTOM_CLASS {
                declarations.push(NormalizedAxiom::from(Gci0Axiom::new(
                    class,
                    EntityId::TOP_CLASS,
                )));
            }
        }
        for property in self.entities.named_entities(EntityType::ObjectProperty) {
            if property != EntityId::BOTTOM_OBJECT_PROPERTY
                && property != EntityId::TOP_OBJECT_PROPERTY
            {
                declarations.push(Ri2Axiom::new(property, EntityId::TOP_OBJECT_PROPERTY).into());
            }
        }
        for individual in self.entities.named_entities(EntityType::NamedIndividual) {
            declarations.push(
                NominalAxiom::new(
                    entities.create_or_get_class_id_for_individual(individual)?,
                    individual,
                )
                .into(),
            );
        }
        Ok(declarations.into_iter().map(IntegerAxiom::from).collect())
    }

    fn check_class(&self, class: EntityId) -> Result<&Classification, OwlError> {
        self.entities.check(class, EntityType::Class)?;
        let classification = self.classification()?;
        if !classification.classes.contains(class) {
            return Err(InvalidInputError::UnknownEntity(class).into());
        }
        Ok(classification)
    }

    fn check_object_property(&self, property: EntityId) -> Result<&Classification, OwlError> {
        self.entities.check(property, EntityType::ObjectProperty)?;
        let classification = self.classification()?;
        if !classification.object_properties.contains(property) {
            return Err(InvalidInputError::UnknownEntity(property).into());
        }
        Ok(classification)
    }
}

impl Reasoner for ElReasoner {
    fn classify(&mut self) -> Result<(), OwlError> {
        let _span = info_span!("classification", axioms = self.axioms.len()).entered();
        self.classification = None;
        let mut entities = self.entities.clone();
        let declarations = self.declarations(&mut entities)?;
        let normalized = {
            let _span = info_span!("normalization").entered();
            normalize(
                self.axioms.iter().cloned().chain(declarations),
                &mut entities,
            )?
        };
        let ontology = {
            let _span = info_span!("indexing").entered();
            Arc::new(ExtendedOntology::from_axioms(&normalized))
        };
        let mut processor = Processor::new(ontology, entities)?
            .with_interrupt_handle(self.interrupt_handle.clone());
        processor.run(&self.config)?;
        let status = processor.into_status()?;
        let classification = {
            let _span = info_span!("taxonomy").entered();
            Classification::new(&status)
        };
        info!(
            normalized_axioms = normalized.len(),
            classes = classification.classes.elements().count(),
            nodes = status.node_count(),
            consistent = classification.consistent,
            "classification done"
        );
        self.classification = Some(classification);
        Ok(())
    }

    fn is_consistent(&self) -> Result<bool, OwlError> {
        Ok(self.classification()?.consistent)
    }

    fn is_satisfiable(&self, class: EntityId) -> Result<bool, OwlError> {
        let classification = self.check_class(class)?;
        Ok(!classification
            .classes
            .equivalents(class)
            .any(|c| c == EntityId::BOTTOM_CLASS))
    }

    fn get_super_classes(&self, class: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError> {
        let classes = &self.check_class(class)?.classes;
        Ok(if direct {
            classes.parents(class).collect()
        } else {
            classes.ancestors(class).collect()
        })
    }

    fn get_sub_classes(&self, class: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError> {
        let classes = &self.check_class(class)?.classes;
        Ok(if direct {
            classes.children(class).collect()
        } else {
            classes.descendants(class).collect()
        })
    }

    fn get_equivalent_classes(&self, class: EntityId) -> Result<Vec<EntityId>, OwlError> {
        let classes = &self.check_class(class)?.classes;
        Ok(classes.equivalents(class).filter(|c| *c != class).collect())
    }

    fn get_super_object_properties(
        &self,
        property: EntityId,
        direct: bool,
    ) -> Result<Vec<EntityId>, OwlError> {
        let properties = &self.check_object_property(property)?.object_properties;
        Ok(if direct {
            properties.parents(property).collect()
        } else {
            properties.ancestors(property).collect()
        })
    }

    fn get_sub_object_properties(
        &self,
        property: EntityId,
        direct: bool,
    ) -> Result<Vec<EntityId>, OwlError> {
        let properties = &self.check_object_property(property)?.object_properties;
        Ok(if direct {
            properties.children(property).collect()
        } else {
            properties.descendants(property).collect()
        })
    }

    fn get_types(&self, individual: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError> {
        self.entities.check(individual, EntityType::NamedIndividual)?;
        let classification = self.classification()?;
        let types = if direct {
            &classification.direct_types
        } else {
            &classification.types
        };
        Ok(types
            .get(&individual)
            .into_iter()
            .flatten()
            .copied()
            .collect())
    }

    fn get_instances(&self, class: EntityId, direct: bool) -> Result<Vec<EntityId>, OwlError> {
        let classification = self.check_class(class)?;
        let types = if direct {
            &classification.direct_types
        } else {
            &classification.types
        };
        let mut instances = types
            .iter()
            .filter(|(_, classes)| classes.contains(&class))
            .map(|(individual, _)| *individual)
            .collect::<Vec<_>>();
        instances.sort_unstable();
        Ok(instances)
    }
}
