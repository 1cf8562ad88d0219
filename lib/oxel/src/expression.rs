//! Class and object property expressions over entity identifiers.
//!
//! Only the constructors of the EL profile are representable.

use crate::entity::EntityId;
use std::collections::BTreeSet;
use std::fmt;

/// An EL class expression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassExpression {
    /// A class identifier (named, anonymous, top or bottom)
    Class(EntityId),

    /// ObjectIntersectionOf(C1, ..., Cn), `owl:Thing` if empty
    ObjectIntersectionOf(BTreeSet<ClassExpression>),

    /// ObjectSomeValuesFrom(P, C) - existential restriction
    ObjectSomeValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },

    /// ObjectOneOf(a) - the class containing only the given individual
    ObjectOneOf(EntityId),

    /// ObjectHasValue(P, a) - shortcut for ObjectSomeValuesFrom(P, ObjectOneOf(a))
    ObjectHasValue {
        property: ObjectPropertyExpression,
        individual: EntityId,
    },
}

impl ClassExpression {
    #[inline]
    pub fn class(id: EntityId) -> Self {
        Self::Class(id)
    }

    #[inline]
    pub fn thing() -> Self {
        Self::Class(EntityId::TOP_CLASS)
    }

    #[inline]
    pub fn nothing() -> Self {
        Self::Class(EntityId::BOTTOM_CLASS)
    }

    pub fn intersection(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        Self::ObjectIntersectionOf(operands.into_iter().collect())
    }

    pub fn some_values_from(
        property: impl Into<ObjectPropertyExpression>,
        filler: ClassExpression,
    ) -> Self {
        Self::ObjectSomeValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    pub fn one_of(individual: EntityId) -> Self {
        Self::ObjectOneOf(individual)
    }

    pub fn has_value(property: impl Into<ObjectPropertyExpression>, individual: EntityId) -> Self {
        Self::ObjectHasValue {
            property: property.into(),
            individual,
        }
    }

    /// A literal is a class identifier, i.e. an expression without constructor.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    #[inline]
    pub fn as_class(&self) -> Option<EntityId> {
        match self {
            Self::Class(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether a nominal constructor occurs somewhere in the expression.
    pub fn contains_nominal(&self) -> bool {
        match self {
            Self::Class(_) => false,
            Self::ObjectIntersectionOf(operands) => operands.iter().any(Self::contains_nominal),
            Self::ObjectSomeValuesFrom { filler, .. } => filler.contains_nominal(),
            Self::ObjectOneOf(_) | Self::ObjectHasValue { .. } => true,
        }
    }

    /// Adds the class identifiers occurring in this expression to `classes`.
    pub fn collect_classes(&self, classes: &mut BTreeSet<EntityId>) {
        match self {
            Self::Class(id) => {
                classes.insert(*id);
            }
            Self::ObjectIntersectionOf(operands) => {
                for operand in operands {
                    operand.collect_classes(classes);
                }
            }
            Self::ObjectSomeValuesFrom { filler, .. } => filler.collect_classes(classes),
            Self::ObjectOneOf(_) | Self::ObjectHasValue { .. } => (),
        }
    }

    /// Adds the object property identifiers occurring in this expression to `properties`.
    pub fn collect_object_properties(&self, properties: &mut BTreeSet<EntityId>) {
        match self {
            Self::Class(_) | Self::ObjectOneOf(_) => (),
            Self::ObjectIntersectionOf(operands) => {
                for operand in operands {
                    operand.collect_object_properties(properties);
                }
            }
            Self::ObjectSomeValuesFrom { property, filler } => {
                properties.insert(property.property());
                filler.collect_object_properties(properties);
            }
            Self::ObjectHasValue { property, .. } => {
                properties.insert(property.property());
            }
        }
    }

    /// Adds the individual identifiers occurring in this expression to `individuals`.
    pub fn collect_individuals(&self, individuals: &mut BTreeSet<EntityId>) {
        match self {
            Self::Class(_) => (),
            Self::ObjectIntersectionOf(operands) => {
                for operand in operands {
                    operand.collect_individuals(individuals);
                }
            }
            Self::ObjectSomeValuesFrom { filler, .. } => filler.collect_individuals(individuals),
            Self::ObjectOneOf(individual) | Self::ObjectHasValue { individual, .. } => {
                individuals.insert(*individual);
            }
        }
    }
}

impl From<EntityId> for ClassExpression {
    fn from(id: EntityId) -> Self {
        Self::Class(id)
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(id) => write!(f, "{id}"),
            Self::ObjectIntersectionOf(operands) => {
                f.write_str("ObjectIntersectionOf(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            }
            Self::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom({property} {filler})")
            }
            Self::ObjectOneOf(individual) => write!(f, "ObjectOneOf({individual})"),
            Self::ObjectHasValue {
                property,
                individual,
            } => write!(f, "ObjectHasValue({property} {individual})"),
        }
    }
}

/// An object property expression: a property or the inverse of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectPropertyExpression {
    ObjectProperty(EntityId),
    ObjectInverseOf(EntityId),
}

impl ObjectPropertyExpression {
    #[inline]
    pub fn inverse(property: EntityId) -> Self {
        Self::ObjectInverseOf(property)
    }

    /// The property the expression is built on.
    #[inline]
    pub fn property(self) -> EntityId {
        match self {
            Self::ObjectProperty(p) | Self::ObjectInverseOf(p) => p,
        }
    }

    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(self, Self::ObjectInverseOf(_))
    }
}

impl From<EntityId> for ObjectPropertyExpression {
    fn from(id: EntityId) -> Self {
        Self::ObjectProperty(id)
    }
}

impl fmt::Display for ObjectPropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectProperty(p) => write!(f, "{p}"),
            Self::ObjectInverseOf(p) => write!(f, "ObjectInverseOf({p})"),
        }
    }
}
