//! OxEL is a classifier for the [OWL 2 EL profile](https://www.w3.org/TR/owl2-profiles/#OWL_2_EL).
//!
//! It computes the subsumption hierarchy of the classes and object properties of an ontology by
//! normalizing its axioms and saturating them with completion rules.
//! Inverse and functional object properties are supported through virtual nodes: anonymous
//! classes standing for a class together with the existential restrictions it must satisfy.
//!
//! Entities are referred to by [`EntityId`], allocated by an [`EntityManager`] from their IRIs.
//!
//! Usage example:
//! ```
//! use oxel::*;
//!
//! let mut reasoner = ElReasoner::new();
//! let person = reasoner.declare_class("http://example.com/Person")?;
//! let parent = reasoner.declare_class("http://example.com/Parent")?;
//! let child = reasoner.declare_class("http://example.com/Child")?;
//! let has_child = reasoner.declare_object_property("http://example.com/hasChild")?;
//! let has_parent = reasoner.declare_object_property("http://example.com/hasParent")?;
//!
//! reasoner.add_axiom(ComplexAxiom::InverseObjectProperties(has_child.into(), has_parent.into()))?;
//! // Parent ≡ ∃hasChild.Person
//! reasoner.add_axiom(ComplexAxiom::equivalent_classes([
//!     parent.into(),
//!     ClassExpression::some_values_from(has_child, person.into()),
//! ]))?;
//! // Child ≡ ∃hasParent.Parent
//! reasoner.add_axiom(ComplexAxiom::equivalent_classes([
//!     child.into(),
//!     ClassExpression::some_values_from(has_parent, parent.into()),
//! ]))?;
//! // Person ⊑ ∃hasParent.Person
//! reasoner.add_axiom(ComplexAxiom::sub_class_of(
//!     person,
//!     ClassExpression::some_values_from(has_parent, person.into()),
//! ))?;
//!
//! reasoner.classify()?;
//! assert!(reasoner.get_super_classes(person, false)?.contains(&child));
//! assert!(!reasoner.get_super_classes(person, false)?.contains(&parent));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod axiom;
mod classifier;
mod entity;
mod error;
mod expression;
pub mod graph;
mod normalization;
mod normalized;
mod ontology;
mod reasoner;

pub use crate::axiom::{Annotation, Annotations, ComplexAxiom, IntegerAxiom, Signature};
pub use crate::classifier::{
    ClassifierStatus, CompletionRule, Conclusion, NodeEntry, NodeRegistry, Processor, QueueOrder,
    REntry, RuleChain, SEntry, Trigger, VNode, XEntry,
};
pub use crate::entity::{EntityId, EntityManager, EntityType};
pub use crate::error::{InvalidInputError, OwlError, ReasoningError};
pub use crate::expression::{ClassExpression, ObjectPropertyExpression};
pub use crate::normalization::{NormalizationRule, Normalizer, Rewrite, normalize};
pub use crate::normalized::{
    FunctionalObjectPropertyAxiom, Gci0Axiom, Gci1Axiom, Gci2Axiom, Gci3Axiom, NominalAxiom,
    NormalizedAxiom, RangeAxiom, Ri1Axiom, Ri2Axiom, Ri3Axiom,
};
pub use crate::ontology::ExtendedOntology;
pub use crate::reasoner::{ElReasoner, InterruptHandle, Reasoner, ReasonerConfig};
