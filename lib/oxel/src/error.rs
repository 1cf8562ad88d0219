//! Error types for classification.

use crate::entity::{EntityId, EntityType};
use oxrdf::IriParseError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building or classifying an ontology.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OwlError {
    /// IRI parsing error.
    #[error(transparent)]
    InvalidIri(#[from] IriParseError),
    /// An argument referenced something the reasoner does not know about.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    /// The classification did not reach saturation.
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
}

/// An argument given to a public operation is not valid.
///
/// These errors are always raised before any state is modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvalidInputError {
    /// The identifier has never been allocated.
    #[error("the entity {0} has not been allocated")]
    UnknownEntity(EntityId),
    /// The identifier is allocated but for another kind of entity.
    #[error("the entity {id} is a {actual} and not a {expected}")]
    WrongEntityType {
        id: EntityId,
        expected: EntityType,
        actual: EntityType,
    },
    /// No entity with this IRI and kind has been declared.
    #[error("no {kind} is named <{iri}>")]
    UnknownIri { kind: EntityType, iri: String },
    /// Every entity identifier has been allocated.
    #[error("no entity identifier is left to allocate")]
    TooManyEntities,
}

/// The saturation was stopped before reaching its fixpoint.
///
/// The classifier status of an aborted run is never returned: partial results are not valid hierarchies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ReasoningError {
    /// The interruption flag was raised.
    #[error("classification interrupted")]
    Interrupted,
    /// The iteration budget has been exhausted.
    #[error("the classification did not saturate within {0} iterations")]
    MaxIterationsExceeded(usize),
    /// The time budget has been exhausted.
    #[error("the classification did not saturate within {0:?}")]
    Timeout(Duration),
    /// The processor still has pending entries.
    #[error("the classification has not reached saturation yet")]
    NotSaturated,
    /// A hierarchy query was issued before any successful classification.
    #[error("the ontology has not been classified")]
    NotClassified,
    /// No identifier is left for a new node.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}
