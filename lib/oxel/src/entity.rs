//! Integer identifiers for classes, properties and individuals.

use crate::error::InvalidInputError;
use oxrdf::{NamedNode, NamedNodeRef};
use rustc_hash::FxHashMap;
use std::fmt;

/// An opaque entity identifier.
///
/// Classes, object properties, data properties and individuals share a single namespace.
/// Identifiers are allocated by an [`EntityManager`] and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// `owl:Nothing`
    pub const BOTTOM_CLASS: Self = Self(0);
    /// `owl:Thing`
    pub const TOP_CLASS: Self = Self(1);
    /// `owl:bottomObjectProperty`
    pub const BOTTOM_OBJECT_PROPERTY: Self = Self(2);
    /// `owl:topObjectProperty`
    pub const TOP_OBJECT_PROPERTY: Self = Self(3);
    /// `owl:bottomDataProperty`
    pub const BOTTOM_DATA_PROPERTY: Self = Self(4);
    /// `owl:topDataProperty`
    pub const TOP_DATA_PROPERTY: Self = Self(5);

    const FIRST_FREE: u32 = 6;

    /// The raw value of the identifier.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

mod vocab {
    use super::{EntityId, EntityType};
    use oxrdf::NamedNodeRef;

    pub const RESERVED: [(EntityId, EntityType, NamedNodeRef<'static>); 6] = [
        (
            EntityId::BOTTOM_CLASS,
            EntityType::Class,
            NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Nothing"),
        ),
        (
            EntityId::TOP_CLASS,
            EntityType::Class,
            NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing"),
        ),
        (
            EntityId::BOTTOM_OBJECT_PROPERTY,
            EntityType::ObjectProperty,
            NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#bottomObjectProperty"),
        ),
        (
            EntityId::TOP_OBJECT_PROPERTY,
            EntityType::ObjectProperty,
            NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#topObjectProperty"),
        ),
        (
            EntityId::BOTTOM_DATA_PROPERTY,
            EntityType::DataProperty,
            NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#bottomDataProperty"),
        ),
        (
            EntityId::TOP_DATA_PROPERTY,
            EntityType::DataProperty,
            NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#topDataProperty"),
        ),
    ];
}

/// The kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityType {
    Class,
    ObjectProperty,
    DataProperty,
    NamedIndividual,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::ObjectProperty => "object property",
            Self::DataProperty => "data property",
            Self::NamedIndividual => "named individual",
        })
    }
}

/// Allocates entity identifiers and keeps track of what they stand for.
///
/// Besides plain allocation it remembers:
/// * the IRI of named entities,
/// * the inverse of each object property (inverses are anonymous object properties),
/// * the nominal class `{a}` of each individual `a`.
///
/// ```
/// use oxel::{EntityId, EntityManager, EntityType};
///
/// let mut entities = EntityManager::new();
/// let r = entities.create_anonymous_entity(EntityType::ObjectProperty)?;
/// let r_inverse = entities.create_or_get_inverse_object_property_of(r)?;
/// assert_ne!(r, r_inverse);
/// assert_eq!(entities.create_or_get_inverse_object_property_of(r_inverse)?, r);
/// assert_eq!(
///     entities.create_or_get_inverse_object_property_of(EntityId::TOP_OBJECT_PROPERTY)?,
///     EntityId::TOP_OBJECT_PROPERTY
/// );
/// # Result::<_, oxel::InvalidInputError>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct EntityManager {
    next: u32,
    types: FxHashMap<EntityId, EntityType>,
    names: FxHashMap<EntityId, NamedNode>,
    ids: FxHashMap<(EntityType, NamedNode), EntityId>,
    inverses: FxHashMap<EntityId, EntityId>,
    nominal_classes: FxHashMap<EntityId, EntityId>,
    nominal_individuals: FxHashMap<EntityId, EntityId>,
}

impl EntityManager {
    pub fn new() -> Self {
        let mut types = FxHashMap::default();
        let mut names = FxHashMap::default();
        let mut ids = FxHashMap::default();
        for (id, kind, iri) in vocab::RESERVED {
            types.insert(id, kind);
            names.insert(id, iri.into_owned());
            ids.insert((kind, iri.into_owned()), id);
        }
        let mut inverses = FxHashMap::default();
        inverses.insert(
            EntityId::BOTTOM_OBJECT_PROPERTY,
            EntityId::BOTTOM_OBJECT_PROPERTY,
        );
        inverses.insert(EntityId::TOP_OBJECT_PROPERTY, EntityId::TOP_OBJECT_PROPERTY);
        Self {
            next: EntityId::FIRST_FREE,
            types,
            names,
            ids,
            inverses,
            nominal_classes: FxHashMap::default(),
            nominal_individuals: FxHashMap::default(),
        }
    }

    fn allocate(&mut self, kind: EntityType) -> Result<EntityId, InvalidInputError> {
        let id = EntityId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .ok_or(InvalidInputError::TooManyEntities)?;
        self.types.insert(id, kind);
        Ok(id)
    }

    /// Returns the identifier of the entity with this IRI, allocating it if needed.
    ///
    /// The IRIs of `owl:Thing`, `owl:Nothing` and of the top and bottom properties resolve to the
    /// reserved identifiers.
    pub fn create_named_entity(
        &mut self,
        kind: EntityType,
        iri: NamedNode,
    ) -> Result<EntityId, InvalidInputError> {
        if let Some(id) = self.ids.get(&(kind, iri.clone())) {
            return Ok(*id);
        }
        let id = self.allocate(kind)?;
        self.names.insert(id, iri.clone());
        self.ids.insert((kind, iri), id);
        Ok(id)
    }

    /// Allocates a fresh entity without name.
    pub fn create_anonymous_entity(
        &mut self,
        kind: EntityType,
    ) -> Result<EntityId, InvalidInputError> {
        self.allocate(kind)
    }

    /// Returns the inverse of an object property, allocating it the first time.
    pub fn create_or_get_inverse_object_property_of(
        &mut self,
        property: EntityId,
    ) -> Result<EntityId, InvalidInputError> {
        if let Some(inverse) = self.inverses.get(&property) {
            return Ok(*inverse);
        }
        let inverse = self.allocate(EntityType::ObjectProperty)?;
        self.inverses.insert(property, inverse);
        self.inverses.insert(inverse, property);
        Ok(inverse)
    }

    /// Returns the inverse of an object property if it has already been allocated.
    pub fn inverse_object_property_of(&self, property: EntityId) -> Option<EntityId> {
        self.inverses.get(&property).copied()
    }

    /// Returns the nominal class `{individual}`, allocating it the first time.
    pub fn create_or_get_class_id_for_individual(
        &mut self,
        individual: EntityId,
    ) -> Result<EntityId, InvalidInputError> {
        if let Some(class) = self.nominal_classes.get(&individual) {
            return Ok(*class);
        }
        let class = self.allocate(EntityType::Class)?;
        self.nominal_classes.insert(individual, class);
        self.nominal_individuals.insert(class, individual);
        Ok(class)
    }

    /// The nominal class of an individual, if any.
    pub fn class_id_for_individual(&self, individual: EntityId) -> Option<EntityId> {
        self.nominal_classes.get(&individual).copied()
    }

    /// The individual a nominal class stands for.
    pub fn individual_for_class_id(&self, class: EntityId) -> Option<EntityId> {
        self.nominal_individuals.get(&class).copied()
    }

    pub fn entity_type(&self, id: EntityId) -> Option<EntityType> {
        self.types.get(&id).copied()
    }

    /// An entity is anonymous if it has been allocated without IRI.
    ///
    /// The reserved top and bottom entities are not anonymous.
    pub fn is_anonymous(&self, id: EntityId) -> bool {
        id.0 >= EntityId::FIRST_FREE && !self.names.contains_key(&id)
    }

    /// The IRI of a named entity.
    pub fn name(&self, id: EntityId) -> Option<&NamedNode> {
        self.names.get(&id)
    }

    /// Looks up a named entity by IRI.
    pub fn id_of(&self, kind: EntityType, iri: NamedNodeRef<'_>) -> Option<EntityId> {
        self.ids.get(&(kind, iri.into_owned())).copied()
    }

    /// All entities of the given kind that are not anonymous, including the reserved ones, sorted.
    pub fn named_entities(&self, kind: EntityType) -> Vec<EntityId> {
        let mut entities = self
            .types
            .iter()
            .filter(|(id, t)| **t == kind && !self.is_anonymous(**id))
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        entities.sort_unstable();
        entities
    }

    /// Number of allocated identifiers.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Fails if `id` is not an allocated entity of the given kind.
    pub fn check(&self, id: EntityId, expected: EntityType) -> Result<(), InvalidInputError> {
        match self.entity_type(id) {
            None => Err(InvalidInputError::UnknownEntity(id)),
            Some(actual) if actual != expected => Err(InvalidInputError::WrongEntityType {
                id,
                expected,
                actual,
            }),
            Some(_) => Ok(()),
        }
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
