//! Axioms over entity identifiers, before normalization.

use crate::entity::{EntityId, EntityManager, EntityType};
use crate::error::InvalidInputError;
use crate::expression::{ClassExpression, ObjectPropertyExpression};
use crate::normalized::NormalizedAxiom;
use oxrdf::{Literal, NamedNode, Term};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An axiom annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub property: NamedNode,
    pub value: Term,
}

impl Annotation {
    pub fn new(property: NamedNode, value: impl Into<Term>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

/// The annotations attached to an axiom.
///
/// Annotations never take part in axiom identity: two axioms that only differ by their
/// annotations are equal and hash the same.
#[derive(Debug, Clone, Default)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.0.iter()
    }

    pub fn push(&mut self, annotation: Annotation) {
        if !self.0.contains(&annotation) {
            self.0.push(annotation);
        }
    }
}

impl PartialEq for Annotations {
    #[inline]
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for Annotations {}

impl PartialOrd for Annotations {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Annotations {
    #[inline]
    fn cmp(&self, _: &Self) -> Ordering {
        Ordering::Equal
    }
}

impl Hash for Annotations {
    #[inline]
    fn hash<H: Hasher>(&self, _: &mut H) {}
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        let mut annotations = Self::default();
        for annotation in iter {
            annotations.push(annotation);
        }
        annotations
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An axiom as produced by an ontology translator.
///
/// Any of these is accepted by [`normalize`](crate::normalize).
/// Data property assertions and negative object property assertions only contribute to the signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComplexAxiom {
    /// SubClassOf(C D)
    SubClassOf {
        sub_class: ClassExpression,
        super_class: ClassExpression,
    },
    /// EquivalentClasses(C1 ... Cn)
    EquivalentClasses(BTreeSet<ClassExpression>),
    /// DisjointClasses(C1 ... Cn)
    DisjointClasses(BTreeSet<ClassExpression>),
    /// ObjectPropertyDomain(P C)
    ObjectPropertyDomain {
        property: ObjectPropertyExpression,
        domain: ClassExpression,
    },
    /// ObjectPropertyRange(P C)
    ObjectPropertyRange {
        property: ObjectPropertyExpression,
        range: ClassExpression,
    },
    /// SubObjectPropertyOf(P Q)
    SubObjectPropertyOf {
        sub_property: ObjectPropertyExpression,
        super_property: ObjectPropertyExpression,
    },
    /// SubObjectPropertyOf(ObjectPropertyChain(P1 ... Pn) Q)
    SubPropertyChainOf {
        chain: Vec<ObjectPropertyExpression>,
        super_property: ObjectPropertyExpression,
    },
    /// EquivalentObjectProperties(P1 ... Pn)
    EquivalentObjectProperties(BTreeSet<ObjectPropertyExpression>),
    /// InverseObjectProperties(P Q)
    InverseObjectProperties(ObjectPropertyExpression, ObjectPropertyExpression),
    FunctionalObjectProperty(ObjectPropertyExpression),
    InverseFunctionalObjectProperty(ObjectPropertyExpression),
    ReflexiveObjectProperty(ObjectPropertyExpression),
    TransitiveObjectProperty(ObjectPropertyExpression),
    /// ClassAssertion(C a)
    ClassAssertion {
        class: ClassExpression,
        individual: EntityId,
    },
    /// ObjectPropertyAssertion(P a b)
    ObjectPropertyAssertion {
        property: ObjectPropertyExpression,
        source: EntityId,
        target: EntityId,
    },
    /// NegativeObjectPropertyAssertion(P a b)
    NegativeObjectPropertyAssertion {
        property: ObjectPropertyExpression,
        source: EntityId,
        target: EntityId,
    },
    /// DataPropertyAssertion(P a v)
    DataPropertyAssertion {
        property: EntityId,
        source: EntityId,
        target: Literal,
    },
    SameIndividual(BTreeSet<EntityId>),
    DifferentIndividuals(BTreeSet<EntityId>),
    DeclareClass(EntityId),
    DeclareObjectProperty(EntityId),
    DeclareDataProperty(EntityId),
    DeclareNamedIndividual(EntityId),
}

impl ComplexAxiom {
    pub fn sub_class_of(
        sub_class: impl Into<ClassExpression>,
        super_class: impl Into<ClassExpression>,
    ) -> Self {
        Self::SubClassOf {
            sub_class: sub_class.into(),
            super_class: super_class.into(),
        }
    }

    pub fn equivalent_classes(classes: impl IntoIterator<Item = ClassExpression>) -> Self {
        Self::EquivalentClasses(classes.into_iter().collect())
    }

    pub fn disjoint_classes(classes: impl IntoIterator<Item = ClassExpression>) -> Self {
        Self::DisjointClasses(classes.into_iter().collect())
    }

    pub fn sub_object_property_of(
        sub_property: impl Into<ObjectPropertyExpression>,
        super_property: impl Into<ObjectPropertyExpression>,
    ) -> Self {
        Self::SubObjectPropertyOf {
            sub_property: sub_property.into(),
            super_property: super_property.into(),
        }
    }

    pub fn sub_property_chain_of(
        chain: impl IntoIterator<Item = ObjectPropertyExpression>,
        super_property: impl Into<ObjectPropertyExpression>,
    ) -> Self {
        Self::SubPropertyChainOf {
            chain: chain.into_iter().collect(),
            super_property: super_property.into(),
        }
    }

    pub fn class_assertion(class: impl Into<ClassExpression>, individual: EntityId) -> Self {
        Self::ClassAssertion {
            class: class.into(),
            individual,
        }
    }

    pub fn object_property_assertion(
        property: impl Into<ObjectPropertyExpression>,
        source: EntityId,
        target: EntityId,
    ) -> Self {
        Self::ObjectPropertyAssertion {
            property: property.into(),
            source,
            target,
        }
    }

    /// The entities this axiom is about.
    pub fn signature(&self) -> Signature {
        let mut signature = Signature::default();
        match self {
            Self::SubClassOf {
                sub_class,
                super_class,
            } => {
                signature.add_class_expression(sub_class);
                signature.add_class_expression(super_class);
            }
            Self::EquivalentClasses(classes) | Self::DisjointClasses(classes) => {
                for class in classes {
                    signature.add_class_expression(class);
                }
            }
            Self::ObjectPropertyDomain {
                property,
                domain: class,
            }
            | Self::ObjectPropertyRange {
                property,
                range: class,
            } => {
                signature.object_properties.insert(property.property());
                signature.add_class_expression(class);
            }
            Self::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => {
                signature.object_properties.insert(sub_property.property());
                signature.object_properties.insert(super_property.property());
            }
            Self::SubPropertyChainOf {
                chain,
                super_property,
            } => {
                signature
                    .object_properties
                    .extend(chain.iter().map(|p| p.property()));
                signature.object_properties.insert(super_property.property());
            }
            Self::EquivalentObjectProperties(properties) => {
                signature
                    .object_properties
                    .extend(properties.iter().map(|p| p.property()));
            }
            Self::InverseObjectProperties(first, second) => {
                signature
                    .object_properties
                    .extend([first.property(), second.property()]);
            }
            Self::FunctionalObjectProperty(property)
            | Self::InverseFunctionalObjectProperty(property)
            | Self::ReflexiveObjectProperty(property)
            | Self::TransitiveObjectProperty(property) => {
                signature.object_properties.insert(property.property());
            }
            Self::ClassAssertion { class, individual } => {
                signature.add_class_expression(class);
                signature.individuals.insert(*individual);
            }
            Self::ObjectPropertyAssertion {
                property,
                source,
                target,
            }
            | Self::NegativeObjectPropertyAssertion {
                property,
                source,
                target,
            } => {
                signature.object_properties.insert(property.property());
                signature.individuals.extend([*source, *target]);
            }
            Self::DataPropertyAssertion {
                property, source, ..
            } => {
                signature.data_properties.insert(*property);
                signature.individuals.insert(*source);
            }
            Self::SameIndividual(individuals) | Self::DifferentIndividuals(individuals) => {
                signature.individuals.extend(individuals);
            }
            Self::DeclareClass(class) => {
                signature.classes.insert(*class);
            }
            Self::DeclareObjectProperty(property) => {
                signature.object_properties.insert(*property);
            }
            Self::DeclareDataProperty(property) => {
                signature.data_properties.insert(*property);
            }
            Self::DeclareNamedIndividual(individual) => {
                signature.individuals.insert(*individual);
            }
        }
        signature
    }
}

impl fmt::Display for ComplexAxiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(
            f: &mut fmt::Formatter<'_>,
            name: &str,
            items: impl IntoIterator<Item = T>,
        ) -> fmt::Result {
            write!(f, "{name}(")?;
            for (i, item) in items.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::SubClassOf {
                sub_class,
                super_class,
            } => write!(f, "SubClassOf({sub_class} {super_class})"),
            Self::EquivalentClasses(classes) => list(f, "EquivalentClasses", classes),
            Self::DisjointClasses(classes) => list(f, "DisjointClasses", classes),
            Self::ObjectPropertyDomain { property, domain } => {
                write!(f, "ObjectPropertyDomain({property} {domain})")
            }
            Self::ObjectPropertyRange { property, range } => {
                write!(f, "ObjectPropertyRange({property} {range})")
            }
            Self::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "SubObjectPropertyOf({sub_property} {super_property})"),
            Self::SubPropertyChainOf {
                chain,
                super_property,
            } => {
                f.write_str("SubObjectPropertyOf(")?;
                list(f, "ObjectPropertyChain", chain)?;
                write!(f, " {super_property})")
            }
            Self::EquivalentObjectProperties(properties) => {
                list(f, "EquivalentObjectProperties", properties)
            }
            Self::InverseObjectProperties(first, second) => {
                write!(f, "InverseObjectProperties({first} {second})")
            }
            Self::FunctionalObjectProperty(p) => write!(f, "FunctionalObjectProperty({p})"),
            Self::InverseFunctionalObjectProperty(p) => {
                write!(f, "InverseFunctionalObjectProperty({p})")
            }
            Self::ReflexiveObjectProperty(p) => write!(f, "ReflexiveObjectProperty({p})"),
            Self::TransitiveObjectProperty(p) => write!(f, "TransitiveObjectProperty({p})"),
            Self::ClassAssertion { class, individual } => {
                write!(f, "ClassAssertion({class} {individual})")
            }
            Self::ObjectPropertyAssertion {
                property,
                source,
                target,
            } => write!(f, "ObjectPropertyAssertion({property} {source} {target})"),
            Self::NegativeObjectPropertyAssertion {
                property,
                source,
                target,
            } => write!(
                f,
                "NegativeObjectPropertyAssertion({property} {source} {target})"
            ),
            Self::DataPropertyAssertion {
                property,
                source,
                target,
            } => write!(f, "DataPropertyAssertion({property} {source} {target})"),
            Self::SameIndividual(individuals) => list(f, "SameIndividual", individuals),
            Self::DifferentIndividuals(individuals) => {
                list(f, "DifferentIndividuals", individuals)
            }
            Self::DeclareClass(id) => write!(f, "Declaration(Class({id}))"),
            Self::DeclareObjectProperty(id) => write!(f, "Declaration(ObjectProperty({id}))"),
            Self::DeclareDataProperty(id) => write!(f, "Declaration(DataProperty({id}))"),
            Self::DeclareNamedIndividual(id) => write!(f, "Declaration(NamedIndividual({id}))"),
        }
    }
}

/// An axiom accepted by the normalizer: either still complex or already in normal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntegerAxiom {
    Complex {
        axiom: ComplexAxiom,
        annotations: Annotations,
    },
    Normalized(NormalizedAxiom),
}

impl IntegerAxiom {
    /// Builds a complex axiom carrying annotations.
    pub fn annotated(axiom: ComplexAxiom, annotations: Annotations) -> Self {
        Self::Complex { axiom, annotations }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Self::Complex { annotations, .. } => annotations,
            Self::Normalized(axiom) => axiom.annotations(),
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Complex { axiom, .. } => axiom.signature(),
            Self::Normalized(axiom) => {
                let mut signature = Signature::default();
                axiom.collect_classes(&mut signature.classes);
                axiom.collect_object_properties(&mut signature.object_properties);
                axiom.collect_individuals(&mut signature.individuals);
                signature
            }
        }
    }
}

impl From<ComplexAxiom> for IntegerAxiom {
    fn from(axiom: ComplexAxiom) -> Self {
        Self::Complex {
            axiom,
            annotations: Annotations::default(),
        }
    }
}

impl From<NormalizedAxiom> for IntegerAxiom {
    fn from(axiom: NormalizedAxiom) -> Self {
        Self::Normalized(axiom)
    }
}

impl fmt::Display for IntegerAxiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complex { axiom, .. } => axiom.fmt(f),
            Self::Normalized(axiom) => axiom.fmt(f),
        }
    }
}

/// The entities an axiom is about, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub classes: BTreeSet<EntityId>,
    pub object_properties: BTreeSet<EntityId>,
    pub data_properties: BTreeSet<EntityId>,
    pub individuals: BTreeSet<EntityId>,
}

impl Signature {
    fn add_class_expression(&mut self, expression: &ClassExpression) {
        expression.collect_classes(&mut self.classes);
        expression.collect_object_properties(&mut self.object_properties);
        expression.collect_individuals(&mut self.individuals);
    }

    /// Fails on the first entity that is not allocated with the expected kind.
    pub fn validate(&self, entities: &EntityManager) -> Result<(), InvalidInputError> {
        for class in &self.classes {
            entities.check(*class, EntityType::Class)?;
        }
        for property in &self.object_properties {
            entities.check(*property, EntityType::ObjectProperty)?;
        }
        for property in &self.data_properties {
            entities.check(*property, EntityType::DataProperty)?;
        }
        for individual in &self.individuals {
            entities.check(*individual, EntityType::NamedIndividual)?;
        }
        Ok(())
    }
}
