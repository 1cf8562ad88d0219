//! Normal-form axioms.
//!
//! Completion rules only ever see these shapes. `A`, `B` denote class identifiers and `r`, `s`, `t`
//! object property identifiers.

use crate::axiom::Annotations;
use crate::entity::EntityId;
use std::collections::BTreeSet;
use std::fmt;

/// `A ⊑ B`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gci0Axiom {
    sub_class: EntityId,
    super_class: EntityId,
    annotations: Annotations,
}

impl Gci0Axiom {
    pub fn new(sub_class: EntityId, super_class: EntityId) -> Self {
        Self {
            sub_class,
            super_class,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn sub_class(&self) -> EntityId {
        self.sub_class
    }

    #[inline]
    pub fn super_class(&self) -> EntityId {
        self.super_class
    }
}

/// `A1 ⊓ A2 ⊑ B`
///
/// The operands are stored in increasing order so that `A1 ⊓ A2 ⊑ B` and `A2 ⊓ A1 ⊑ B` are the same axiom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gci1Axiom {
    left_sub_class: EntityId,
    right_sub_class: EntityId,
    super_class: EntityId,
    annotations: Annotations,
}

impl Gci1Axiom {
    pub fn new(first: EntityId, second: EntityId, super_class: EntityId) -> Self {
        Self {
            left_sub_class: first.min(second),
            right_sub_class: first.max(second),
            super_class,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn left_sub_class(&self) -> EntityId {
        self.left_sub_class
    }

    #[inline]
    pub fn right_sub_class(&self) -> EntityId {
        self.right_sub_class
    }

    #[inline]
    pub fn super_class(&self) -> EntityId {
        self.super_class
    }

    /// Given one operand, returns the other one.
    pub fn other_operand(&self, operand: EntityId) -> EntityId {
        if operand == self.left_sub_class {
            self.right_sub_class
        } else {
            self.left_sub_class
        }
    }
}

/// `A ⊑ ∃r.B`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gci2Axiom {
    sub_class: EntityId,
    property: EntityId,
    class_in_super_class: EntityId,
    annotations: Annotations,
}

impl Gci2Axiom {
    pub fn new(sub_class: EntityId, property: EntityId, class_in_super_class: EntityId) -> Self {
        Self {
            sub_class,
            property,
            class_in_super_class,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn sub_class(&self) -> EntityId {
        self.sub_class
    }

    #[inline]
    pub fn property(&self) -> EntityId {
        self.property
    }

    #[inline]
    pub fn class_in_super_class(&self) -> EntityId {
        self.class_in_super_class
    }
}

/// `∃r.A ⊑ B`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gci3Axiom {
    property: EntityId,
    class_in_sub_class: EntityId,
    super_class: EntityId,
    annotations: Annotations,
}

impl Gci3Axiom {
    pub fn new(property: EntityId, class_in_sub_class: EntityId, super_class: EntityId) -> Self {
        Self {
            property,
            class_in_sub_class,
            super_class,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn property(&self) -> EntityId {
        self.property
    }

    #[inline]
    pub fn class_in_sub_class(&self) -> EntityId {
        self.class_in_sub_class
    }

    #[inline]
    pub fn super_class(&self) -> EntityId {
        self.super_class
    }
}

/// `ε ⊑ r`, i.e. `r` is reflexive
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ri1Axiom {
    super_property: EntityId,
    annotations: Annotations,
}

impl Ri1Axiom {
    pub fn new(super_property: EntityId) -> Self {
        Self {
            super_property,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn super_property(&self) -> EntityId {
        self.super_property
    }
}

/// `r ⊑ s`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ri2Axiom {
    sub_property: EntityId,
    super_property: EntityId,
    annotations: Annotations,
}

impl Ri2Axiom {
    pub fn new(sub_property: EntityId, super_property: EntityId) -> Self {
        Self {
            sub_property,
            super_property,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn sub_property(&self) -> EntityId {
        self.sub_property
    }

    #[inline]
    pub fn super_property(&self) -> EntityId {
        self.super_property
    }
}

/// `r ∘ s ⊑ t`
///
/// `r ∘ r ⊑ r` states that `r` is transitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ri3Axiom {
    left_sub_property: EntityId,
    right_sub_property: EntityId,
    super_property: EntityId,
    annotations: Annotations,
}

impl Ri3Axiom {
    pub fn new(
        left_sub_property: EntityId,
        right_sub_property: EntityId,
        super_property: EntityId,
    ) -> Self {
        Self {
            left_sub_property,
            right_sub_property,
            super_property,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn left_sub_property(&self) -> EntityId {
        self.left_sub_property
    }

    #[inline]
    pub fn right_sub_property(&self) -> EntityId {
        self.right_sub_property
    }

    #[inline]
    pub fn super_property(&self) -> EntityId {
        self.super_property
    }

    /// Whether this axiom is `r ∘ r ⊑ r`.
    pub fn is_transitivity(&self) -> bool {
        self.left_sub_property == self.super_property
            && self.right_sub_property == self.super_property
    }
}

/// `r` is functional
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionalObjectPropertyAxiom {
    property: EntityId,
    annotations: Annotations,
}

impl FunctionalObjectPropertyAxiom {
    pub fn new(property: EntityId) -> Self {
        Self {
            property,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn property(&self) -> EntityId {
        self.property
    }
}

/// `range(r) ⊑ B`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeAxiom {
    property: EntityId,
    range: EntityId,
    annotations: Annotations,
}

impl RangeAxiom {
    pub fn new(property: EntityId, range: EntityId) -> Self {
        Self {
            property,
            range,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn property(&self) -> EntityId {
        self.property
    }

    #[inline]
    pub fn range(&self) -> EntityId {
        self.range
    }
}

/// The class `A` is the nominal `{a}`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NominalAxiom {
    class: EntityId,
    individual: EntityId,
    annotations: Annotations,
}

impl NominalAxiom {
    pub fn new(class: EntityId, individual: EntityId) -> Self {
        Self {
            class,
            individual,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn class(&self) -> EntityId {
        self.class
    }

    #[inline]
    pub fn individual(&self) -> EntityId {
        self.individual
    }
}

macro_rules! impl_annotated {
    ($($t:ty),*) => {
        $(
            impl $t {
                /// Replaces the annotations of the axiom.
                #[must_use]
                pub fn with_annotations(mut self, annotations: Annotations) -> Self {
                    self.annotations = annotations;
                    self
                }

                #[inline]
                pub fn annotations(&self) -> &Annotations {
                    &self.annotations
                }
            }
        )*
    };
}

impl_annotated!(
    Gci0Axiom,
    Gci1Axiom,
    Gci2Axiom,
    Gci3Axiom,
    Ri1Axiom,
    Ri2Axiom,
    Ri3Axiom,
    FunctionalObjectPropertyAxiom,
    RangeAxiom,
    NominalAxiom
);

/// An axiom in normal form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NormalizedAxiom {
    Gci0(Gci0Axiom),
    Gci1(Gci1Axiom),
    Gci2(Gci2Axiom),
    Gci3(Gci3Axiom),
    Ri1(Ri1Axiom),
    Ri2(Ri2Axiom),
    Ri3(Ri3Axiom),
    FunctionalObjectProperty(FunctionalObjectPropertyAxiom),
    Range(RangeAxiom),
    Nominal(NominalAxiom),
}

impl NormalizedAxiom {
    pub fn annotations(&self) -> &Annotations {
        match self {
            Self::Gci0(a) => a.annotations(),
            Self::Gci1(a) => a.annotations(),
            Self::Gci2(a) => a.annotations(),
            Self::Gci3(a) => a.annotations(),
            Self::Ri1(a) => a.annotations(),
            Self::Ri2(a) => a.annotations(),
            Self::Ri3(a) => a.annotations(),
            Self::FunctionalObjectProperty(a) => a.annotations(),
            Self::Range(a) => a.annotations(),
            Self::Nominal(a) => a.annotations(),
        }
    }

    /// Replaces the annotations of the axiom.
    #[must_use]
    pub fn with_annotations(self, annotations: Annotations) -> Self {
        match self {
            Self::Gci0(a) => Self::Gci0(a.with_annotations(annotations)),
            Self::Gci1(a) => Self::Gci1(a.with_annotations(annotations)),
            Self::Gci2(a) => Self::Gci2(a.with_annotations(annotations)),
            Self::Gci3(a) => Self::Gci3(a.with_annotations(annotations)),
            Self::Ri1(a) => Self::Ri1(a.with_annotations(annotations)),
            Self::Ri2(a) => Self::Ri2(a.with_annotations(annotations)),
            Self::Ri3(a) => Self::Ri3(a.with_annotations(annotations)),
            Self::FunctionalObjectProperty(a) => {
                Self::FunctionalObjectProperty(a.with_annotations(annotations))
            }
            Self::Range(a) => Self::Range(a.with_annotations(annotations)),
            Self::Nominal(a) => Self::Nominal(a.with_annotations(annotations)),
        }
    }

    /// Adds the class identifiers of the axiom signature to `classes`.
    pub fn collect_classes(&self, classes: &mut BTreeSet<EntityId>) {
        match self {
            Self::Gci0(a) => classes.extend([a.sub_class, a.super_class]),
            Self::Gci1(a) => {
                classes.extend([a.left_sub_class, a.right_sub_class, a.super_class]);
            }
            Self::Gci2(a) => classes.extend([a.sub_class, a.class_in_super_class]),
            Self::Gci3(a) => classes.extend([a.class_in_sub_class, a.super_class]),
            Self::Range(a) => {
                classes.insert(a.range);
            }
            Self::Nominal(a) => {
                classes.insert(a.class);
            }
            Self::Ri1(_) | Self::Ri2(_) | Self::Ri3(_) | Self::FunctionalObjectProperty(_) => (),
        }
    }

    /// Adds the object property identifiers of the axiom signature to `properties`.
    pub fn collect_object_properties(&self, properties: &mut BTreeSet<EntityId>) {
        match self {
            Self::Gci2(a) => {
                properties.insert(a.property);
            }
            Self::Gci3(a) => {
                properties.insert(a.property);
            }
            Self::Ri1(a) => {
                properties.insert(a.super_property);
            }
            Self::Ri2(a) => properties.extend([a.sub_property, a.super_property]),
            Self::Ri3(a) => properties.extend([
                a.left_sub_property,
                a.right_sub_property,
                a.super_property,
            ]),
            Self::FunctionalObjectProperty(a) => {
                properties.insert(a.property);
            }
            Self::Range(a) => {
                properties.insert(a.property);
            }
            Self::Gci0(_) | Self::Gci1(_) | Self::Nominal(_) => (),
        }
    }

    /// Adds the individual identifiers of the axiom signature to `individuals`.
    pub fn collect_individuals(&self, individuals: &mut BTreeSet<EntityId>) {
        if let Self::Nominal(a) = self {
            individuals.insert(a.individual);
        }
    }
}

impl fmt::Display for NormalizedAxiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gci0(a) => write!(f, "GCI0({} {})", a.sub_class, a.super_class),
            Self::Gci1(a) => write!(
                f,
                "GCI1({} {} {})",
                a.left_sub_class, a.right_sub_class, a.super_class
            ),
            Self::Gci2(a) => write!(
                f,
                "GCI2({} {} {})",
                a.sub_class, a.property, a.class_in_super_class
            ),
            Self::Gci3(a) => write!(
                f,
                "GCI3({} {} {})",
                a.property, a.class_in_sub_class, a.super_class
            ),
            Self::Ri1(a) => write!(f, "RI1({})", a.super_property),
            Self::Ri2(a) => write!(f, "RI2({} {})", a.sub_property, a.super_property),
            Self::Ri3(a) => write!(
                f,
                "RI3({} {} {})",
                a.left_sub_property, a.right_sub_property, a.super_property
            ),
            Self::FunctionalObjectProperty(a) => write!(f, "Functional({})", a.property),
            Self::Range(a) => write!(f, "Range({} {})", a.property, a.range),
            Self::Nominal(a) => write!(f, "Nominal({} {})", a.class, a.individual),
        }
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident($t:ty)),*) => {
        $(
            impl From<$t> for NormalizedAxiom {
                fn from(axiom: $t) -> Self {
                    Self::$variant(axiom)
                }
            }
        )*
    };
}

impl_from_shape!(
    Gci0(Gci0Axiom),
    Gci1(Gci1Axiom),
    Gci2(Gci2Axiom),
    Gci3(Gci3Axiom),
    Ri1(Ri1Axiom),
    Ri2(Ri2Axiom),
    Ri3(Ri3Axiom),
    FunctionalObjectProperty(FunctionalObjectPropertyAxiom),
    Range(RangeAxiom),
    Nominal(NominalAxiom)
);
