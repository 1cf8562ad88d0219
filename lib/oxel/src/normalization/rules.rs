//! Rewrite rules turning a complex axiom into simpler ones.

use crate::axiom::{ComplexAxiom, IntegerAxiom};
use crate::entity::{EntityId, EntityManager, EntityType};
use crate::error::InvalidInputError;
use crate::expression::{ClassExpression, ObjectPropertyExpression};
use crate::normalized::{
    FunctionalObjectPropertyAxiom, Gci0Axiom, Gci1Axiom, Gci2Axiom, Gci3Axiom, NominalAxiom,
    NormalizedAxiom, RangeAxiom, Ri1Axiom, Ri2Axiom, Ri3Axiom,
};
use std::collections::BTreeSet;

/// A rewrite rule of the normalizer.
///
/// Rules are tried in the order of [`NormalizationRule::all`]; the first one that does not decline wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationRule {
    /// `{a}` and `∃r.{a}` become the nominal class of `a`
    NominalReplacement,
    /// `C1 ≡ ... ≡ Cn` becomes a cycle of sub-class axioms
    EquivalentClasses,
    /// `Ci ⊓ Cj ⊑ ⊥` for every pair
    DisjointClasses,
    /// `∃r.⊤ ⊑ C`
    PropertyDomain,
    /// `range(r) = C`, through a fresh class if `C` is complex
    PropertyRange,
    /// chains of any length down to `RI1`, `RI2` and `RI3`
    PropertyChain,
    /// sub, equivalent and inverse properties
    PropertyHierarchy,
    /// functional, inverse functional, reflexive and transitive properties
    PropertyCharacteristic,
    /// class and property assertions, same and different individuals
    Assertion,
    Declaration,
    /// flattening of `C ⊑ D` down to the four GCI shapes
    SubClassOf,
}

/// What a rule did with an axiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// The rule does not handle this axiom.
    Declined,
    /// The axiom carries nothing for the classifier.
    Discarded,
    /// The axiom is replaced by these ones.
    Replaced(Vec<IntegerAxiom>),
}

impl NormalizationRule {
    pub fn all() -> &'static [NormalizationRule] {
        &[
            Self::NominalReplacement,
            Self::EquivalentClasses,
            Self::DisjointClasses,
            Self::PropertyDomain,
            Self::PropertyRange,
            Self::PropertyChain,
            Self::PropertyHierarchy,
            Self::PropertyCharacteristic,
            Self::Assertion,
            Self::Declaration,
            Self::SubClassOf,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NominalReplacement => "nominal-replacement",
            Self::EquivalentClasses => "equivalent-classes",
            Self::DisjointClasses => "disjoint-classes",
            Self::PropertyDomain => "property-domain",
            Self::PropertyRange => "property-range",
            Self::PropertyChain => "property-chain",
            Self::PropertyHierarchy => "property-hierarchy",
            Self::PropertyCharacteristic => "property-characteristic",
            Self::Assertion => "assertion",
            Self::Declaration => "declaration",
            Self::SubClassOf => "sub-class-of",
        }
    }

    /// Applies the rule. Fresh classes and properties are allocated in `entities`.
    pub fn apply(
        self,
        axiom: &ComplexAxiom,
        entities: &mut EntityManager,
    ) -> Result<Rewrite, InvalidInputError> {
        match self {
            Self::NominalReplacement => replace_nominals(axiom, entities),
            Self::EquivalentClasses => Ok(equivalent_classes(axiom)),
            Self::DisjointClasses => Ok(disjoint_classes(axiom)),
            Self::PropertyDomain => Ok(property_domain(axiom)),
            Self::PropertyRange => property_range(axiom, entities),
            Self::PropertyChain => property_chain(axiom, entities),
            Self::PropertyHierarchy => property_hierarchy(axiom, entities),
            Self::PropertyCharacteristic => property_characteristic(axiom, entities),
            Self::Assertion => assertion(axiom, entities),
            Self::Declaration => declaration(axiom, entities),
            Self::SubClassOf => sub_class_of(axiom, entities),
        }
    }
}

/// The identifier of a property expression, minting the inverse property if needed.
fn property_id(
    property: ObjectPropertyExpression,
    entities: &mut EntityManager,
) -> Result<EntityId, InvalidInputError> {
    match property {
        ObjectPropertyExpression::ObjectProperty(p) => Ok(p),
        ObjectPropertyExpression::ObjectInverseOf(p) => {
            entities.create_or_get_inverse_object_property_of(p)
        }
    }
}

fn fresh_class(entities: &mut EntityManager) -> Result<EntityId, InvalidInputError> {
    entities.create_anonymous_entity(EntityType::Class)
}

fn normalized(axiom: impl Into<NormalizedAxiom>) -> IntegerAxiom {
    IntegerAxiom::Normalized(axiom.into())
}

fn complex(axiom: ComplexAxiom) -> IntegerAxiom {
    axiom.into()
}

fn nominal(
    individual: EntityId,
    entities: &mut EntityManager,
) -> Result<IntegerAxiom, InvalidInputError> {
    Ok(normalized(NominalAxiom::new(
        entities.create_or_get_class_id_for_individual(individual)?,
        individual,
    )))
}

fn nominal_class(
    individual: EntityId,
    entities: &mut EntityManager,
) -> Result<ClassExpression, InvalidInputError> {
    Ok(ClassExpression::Class(
        entities.create_or_get_class_id_for_individual(individual)?,
    ))
}

fn is_top(expression: &ClassExpression) -> bool {
    match expression {
        ClassExpression::Class(id) => *id == EntityId::TOP_CLASS,
        ClassExpression::ObjectIntersectionOf(operands) => operands.is_empty(),
        _ => false,
    }
}

fn is_bottom(expression: &ClassExpression) -> bool {
    expression.as_class() == Some(EntityId::BOTTOM_CLASS)
}

fn replace_nominals(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    fn replace(
        expression: &ClassExpression,
        entities: &mut EntityManager,
        individuals: &mut BTreeSet<EntityId>,
    ) -> Result<ClassExpression, InvalidInputError> {
        Ok(match expression {
            ClassExpression::Class(_) => expression.clone(),
            ClassExpression::ObjectIntersectionOf(operands) => {
                ClassExpression::ObjectIntersectionOf(
                    operands
                        .iter()
                        .map(|operand| replace(operand, entities, individuals))
                        .collect::<Result<_, _>>()?,
                )
            }
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                ClassExpression::some_values_from(
                    *property,
                    replace(filler, entities, individuals)?,
                )
            }
            ClassExpression::ObjectOneOf(individual) => {
                individuals.insert(*individual);
                nominal_class(*individual, entities)?
            }
            ClassExpression::ObjectHasValue {
                property,
                individual,
            } => {
                individuals.insert(*individual);
                ClassExpression::some_values_from(*property, nominal_class(*individual, entities)?)
            }
        })
    }

    let mut individuals = BTreeSet::new();
    let mut r = |expression: &ClassExpression| replace(expression, entities, &mut individuals);
    let rewritten = match axiom {
        ComplexAxiom::SubClassOf {
            sub_class,
            super_class,
        } if sub_class.contains_nominal() || super_class.contains_nominal() => {
            ComplexAxiom::SubClassOf {
                sub_class: r(sub_class)?,
                super_class: r(super_class)?,
            }
        }
        ComplexAxiom::EquivalentClasses(classes)
            if classes.iter().any(ClassExpression::contains_nominal) =>
        {
            ComplexAxiom::EquivalentClasses(classes.iter().map(&mut r).collect::<Result<_, _>>()?)
        }
        ComplexAxiom::DisjointClasses(classes)
            if classes.iter().any(ClassExpression::contains_nominal) =>
        {
            ComplexAxiom::DisjointClasses(classes.iter().map(&mut r).collect::<Result<_, _>>()?)
        }
        ComplexAxiom::ObjectPropertyDomain { property, domain } if domain.contains_nominal() => {
            ComplexAxiom::ObjectPropertyDomain {
                property: *property,
                domain: r(domain)?,
            }
        }
        ComplexAxiom::ObjectPropertyRange { property, range } if range.contains_nominal() => {
            ComplexAxiom::ObjectPropertyRange {
                property: *property,
                range: r(range)?,
            }
        }
        ComplexAxiom::ClassAssertion { class, individual } if class.contains_nominal() => {
            ComplexAxiom::ClassAssertion {
                class: r(class)?,
                individual: *individual,
            }
        }
        _ => return Ok(Rewrite::Declined),
    };
    let mut output = vec![complex(rewritten)];
    for individual in individuals {
        output.push(nominal(individual, entities)?);
    }
    Ok(Rewrite::Replaced(output))
}

fn equivalent_classes(axiom: &ComplexAxiom) -> Rewrite {
    let ComplexAxiom::EquivalentClasses(classes) = axiom else {
        return Rewrite::Declined;
    };
    let classes = classes.iter().collect::<Vec<_>>();
    if classes.len() < 2 {
        return Rewrite::Discarded;
    }
    // C1 ⊑ C2 ⊑ ... ⊑ Cn ⊑ C1
    Rewrite::Replaced(
        classes
            .iter()
            .zip(classes.iter().cycle().skip(1))
            .map(|(sub, sup)| complex(ComplexAxiom::sub_class_of((*sub).clone(), (*sup).clone())))
            .collect(),
    )
}

fn disjoint_classes(axiom: &ComplexAxiom) -> Rewrite {
    let ComplexAxiom::DisjointClasses(classes) = axiom else {
        return Rewrite::Declined;
    };
    let classes = classes.iter().collect::<Vec<_>>();
    let mut output = Vec::new();
    for (i, first) in classes.iter().enumerate() {
        for second in &classes[i + 1..] {
            output.push(complex(ComplexAxiom::sub_class_of(
                ClassExpression::intersection([(*first).clone(), (*second).clone()]),
                ClassExpression::nothing(),
            )));
        }
    }
    if output.is_empty() {
        Rewrite::Discarded
    } else {
        Rewrite::Replaced(output)
    }
}

fn property_domain(axiom: &ComplexAxiom) -> Rewrite {
    let ComplexAxiom::ObjectPropertyDomain { property, domain } = axiom else {
        return Rewrite::Declined;
    };
    Rewrite::Replaced(vec![complex(ComplexAxiom::sub_class_of(
        ClassExpression::some_values_from(*property, ClassExpression::thing()),
        domain.clone(),
    ))])
}

fn property_range(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    let ComplexAxiom::ObjectPropertyRange { property, range } = axiom else {
        return Ok(Rewrite::Declined);
    };
    let property = property_id(*property, entities)?;
    if let Some(range) = range.as_class() {
        return Ok(Rewrite::Replaced(vec![normalized(RangeAxiom::new(
            property, range,
        ))]));
    }
    let fresh = fresh_class(entities)?;
    Ok(Rewrite::Replaced(vec![
        normalized(RangeAxiom::new(property, fresh)),
        complex(ComplexAxiom::sub_class_of(fresh, range.clone())),
    ]))
}

fn property_chain(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    let ComplexAxiom::SubPropertyChainOf {
        chain,
        super_property,
    } = axiom
    else {
        return Ok(Rewrite::Declined);
    };
    let super_property = property_id(*super_property, entities)?;
    let output = match chain.as_slice() {
        [] => vec![normalized(Ri1Axiom::new(super_property))],
        [property] => vec![normalized(Ri2Axiom::new(
            property_id(*property, entities)?,
            super_property,
        ))],
        [left, right] => vec![normalized(Ri3Axiom::new(
            property_id(*left, entities)?,
            property_id(*right, entities)?,
            super_property,
        ))],
        [left, right, rest @ ..] => {
            // r1 ∘ r2 ∘ ... ⊑ s becomes r1 ∘ r2 ⊑ u and u ∘ ... ⊑ s
            let fresh = entities.create_anonymous_entity(EntityType::ObjectProperty)?;
            let mut shorter = vec![ObjectPropertyExpression::ObjectProperty(fresh)];
            shorter.extend_from_slice(rest);
            vec![
                normalized(Ri3Axiom::new(
                    property_id(*left, entities)?,
                    property_id(*right, entities)?,
                    fresh,
                )),
                complex(ComplexAxiom::sub_property_chain_of(shorter, super_property)),
            ]
        }
    };
    Ok(Rewrite::Replaced(output))
}

fn property_hierarchy(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    Ok(match axiom {
        ComplexAxiom::SubObjectPropertyOf {
            sub_property,
            super_property,
        } => Rewrite::Replaced(vec![normalized(Ri2Axiom::new(
            property_id(*sub_property, entities)?,
            property_id(*super_property, entities)?,
        ))]),
        ComplexAxiom::EquivalentObjectProperties(properties) => {
            let properties = properties
                .iter()
                .map(|p| property_id(*p, entities))
                .collect::<Result<Vec<_>, _>>()?;
            if properties.len() < 2 {
                return Ok(Rewrite::Discarded);
            }
            Rewrite::Replaced(
                properties
                    .iter()
                    .zip(properties.iter().cycle().skip(1))
                    .map(|(sub, sup)| normalized(Ri2Axiom::new(*sub, *sup)))
                    .collect(),
            )
        }
        ComplexAxiom::InverseObjectProperties(first, second) => {
            // r ≡ s⁻
            let first = property_id(*first, entities)?;
            let second = property_id(*second, entities)?;
            let second_inverse = entities.create_or_get_inverse_object_property_of(second)?;
            Rewrite::Replaced(vec![
                normalized(Ri2Axiom::new(first, second_inverse)),
                normalized(Ri2Axiom::new(second_inverse, first)),
            ])
        }
        _ => Rewrite::Declined,
    })
}

fn property_characteristic(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    let output = match axiom {
        ComplexAxiom::FunctionalObjectProperty(property) => normalized(
            FunctionalObjectPropertyAxiom::new(property_id(*property, entities)?),
        ),
        ComplexAxiom::InverseFunctionalObjectProperty(property) => {
            let property = property_id(*property, entities)?;
            normalized(FunctionalObjectPropertyAxiom::new(
                entities.create_or_get_inverse_object_property_of(property)?,
            ))
        }
        ComplexAxiom::ReflexiveObjectProperty(property) => {
            normalized(Ri1Axiom::new(property_id(*property, entities)?))
        }
        ComplexAxiom::TransitiveObjectProperty(property) => {
            let property = property_id(*property, entities)?;
            normalized(Ri3Axiom::new(property, property, property))
        }
        _ => return Ok(Rewrite::Declined),
    };
    Ok(Rewrite::Replaced(vec![output]))
}

fn assertion(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    let (mut output, individuals) = match axiom {
        ComplexAxiom::ClassAssertion { class, individual } => (
            vec![complex(ComplexAxiom::sub_class_of(
                nominal_class(*individual, entities)?,
                class.clone(),
            ))],
            vec![*individual],
        ),
        ComplexAxiom::ObjectPropertyAssertion {
            property,
            source,
            target,
        } => {
            let source_class = nominal_class(*source, entities)?;
            let target_class = nominal_class(*target, entities)?;
            (
                vec![complex(ComplexAxiom::sub_class_of(
                    source_class,
                    ClassExpression::some_values_from(*property, target_class),
                ))],
                vec![*source, *target],
            )
        }
        ComplexAxiom::SameIndividual(individuals) => (
            vec![complex(ComplexAxiom::equivalent_classes(
                individuals
                    .iter()
                    .map(|i| nominal_class(*i, entities))
                    .collect::<Result<Vec<_>, _>>()?,
            ))],
            individuals.iter().copied().collect(),
        ),
        ComplexAxiom::DifferentIndividuals(individuals) => (
            vec![complex(ComplexAxiom::disjoint_classes(
                individuals
                    .iter()
                    .map(|i| nominal_class(*i, entities))
                    .collect::<Result<Vec<_>, _>>()?,
            ))],
            individuals.iter().copied().collect(),
        ),
        // only the individuals are kept
        ComplexAxiom::NegativeObjectPropertyAssertion { source, target, .. } => {
            (Vec::new(), vec![*source, *target])
        }
        ComplexAxiom::DataPropertyAssertion { source, .. } => (Vec::new(), vec![*source]),
        _ => return Ok(Rewrite::Declined),
    };
    for individual in individuals {
        output.push(nominal(individual, entities)?);
    }
    Ok(Rewrite::Replaced(output))
}

fn declaration(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    Ok(match axiom {
        ComplexAxiom::DeclareClass(class) => Rewrite::Replaced(vec![normalized(Gci0Axiom::new(
            *class,
            EntityId::TOP_CLASS,
        ))]),
        ComplexAxiom::DeclareObjectProperty(property) => Rewrite::Replaced(vec![normalized(
            Ri2Axiom::new(*property, EntityId::TOP_OBJECT_PROPERTY),
        )]),
        ComplexAxiom::DeclareNamedIndividual(individual) => {
            Rewrite::Replaced(vec![nominal(*individual, entities)?])
        }
        ComplexAxiom::DeclareDataProperty(_) => Rewrite::Discarded,
        _ => Rewrite::Declined,
    })
}

fn sub_class_of(
    axiom: &ComplexAxiom,
    entities: &mut EntityManager,
) -> Result<Rewrite, InvalidInputError> {
    let ComplexAxiom::SubClassOf {
        sub_class,
        super_class,
    } = axiom
    else {
        return Ok(Rewrite::Declined);
    };
    if is_bottom(sub_class) {
        return Ok(Rewrite::Discarded);
    }
    if is_top(super_class) {
        // A ⊑ ⊤ is kept to have A in the signature
        return Ok(match sub_class.as_class() {
            Some(sub_class) => Rewrite::Replaced(vec![normalized(Gci0Axiom::new(
                sub_class,
                EntityId::TOP_CLASS,
            ))]),
            None => Rewrite::Discarded,
        });
    }
    if let ClassExpression::ObjectIntersectionOf(operands) = super_class {
        return Ok(Rewrite::Replaced(
            operands
                .iter()
                .map(|operand| complex(ComplexAxiom::sub_class_of(sub_class.clone(), operand.clone())))
                .collect(),
        ));
    }
    let output = match (sub_class, super_class) {
        (ClassExpression::Class(sub), ClassExpression::Class(sup)) => {
            vec![normalized(Gci0Axiom::new(*sub, *sup))]
        }
        (ClassExpression::Class(sub), ClassExpression::ObjectSomeValuesFrom { property, filler }) => {
            match filler.as_class() {
                Some(filler) => vec![normalized(Gci2Axiom::new(
                    *sub,
                    property_id(*property, entities)?,
                    filler,
                ))],
                None => {
                    let fresh = fresh_class(entities)?;
                    vec![
                        complex(ComplexAxiom::sub_class_of(
                            *sub,
                            ClassExpression::some_values_from(*property, fresh.into()),
                        )),
                        complex(ComplexAxiom::sub_class_of(fresh, (**filler).clone())),
                    ]
                }
            }
        }
        (ClassExpression::ObjectSomeValuesFrom { property, filler }, ClassExpression::Class(sup)) => {
            match filler.as_class() {
                Some(filler) => vec![normalized(Gci3Axiom::new(
                    property_id(*property, entities)?,
                    filler,
                    *sup,
                ))],
                None => {
                    let fresh = fresh_class(entities)?;
                    vec![
                        complex(ComplexAxiom::sub_class_of((**filler).clone(), fresh)),
                        complex(ComplexAxiom::sub_class_of(
                            ClassExpression::some_values_from(*property, fresh.into()),
                            *sup,
                        )),
                    ]
                }
            }
        }
        (ClassExpression::ObjectIntersectionOf(operands), ClassExpression::Class(sup)) => {
            intersection_sub_class_of(operands, *sup, entities)?
        }
        (ClassExpression::Class(_), _) | (_, ClassExpression::Class(_)) => {
            // nominals are replaced before reaching this rule
            return Ok(Rewrite::Declined);
        }
        _ => {
            // C ⊑ D becomes C ⊑ A and A ⊑ D
            let fresh = fresh_class(entities)?;
            vec![
                complex(ComplexAxiom::sub_class_of(sub_class.clone(), fresh)),
                complex(ComplexAxiom::sub_class_of(fresh, super_class.clone())),
            ]
        }
    };
    Ok(Rewrite::Replaced(output))
}

fn intersection_sub_class_of(
    operands: &BTreeSet<ClassExpression>,
    super_class: EntityId,
    entities: &mut EntityManager,
) -> Result<Vec<IntegerAxiom>, InvalidInputError> {
    if let Some(complex_operand) = operands.iter().find(|operand| !operand.is_literal()) {
        // C ⊓ D ⊑ B becomes D ⊑ A and C ⊓ A ⊑ B
        let fresh = fresh_class(entities)?;
        let rest = operands
            .iter()
            .filter(|operand| *operand != complex_operand)
            .cloned()
            .chain([ClassExpression::Class(fresh)]);
        return Ok(vec![
            complex(ComplexAxiom::sub_class_of(complex_operand.clone(), fresh)),
            complex(ComplexAxiom::sub_class_of(
                ClassExpression::intersection(rest),
                super_class,
            )),
        ]);
    }
    let literals = operands
        .iter()
        .filter_map(ClassExpression::as_class)
        .collect::<Vec<_>>();
    Ok(match literals.as_slice() {
        [] => vec![normalized(Gci0Axiom::new(EntityId::TOP_CLASS, super_class))],
        [operand] => vec![normalized(Gci0Axiom::new(*operand, super_class))],
        [left, right] => vec![normalized(Gci1Axiom::new(*left, *right, super_class))],
        [left, right, rest @ ..] => {
            // A1 ⊓ A2 ⊓ ... ⊑ B becomes A1 ⊓ A2 ⊑ X and X ⊓ ... ⊑ B
            let fresh = fresh_class(entities)?;
            vec![
                normalized(Gci1Axiom::new(*left, *right, fresh)),
                complex(ComplexAxiom::sub_class_of(
                    ClassExpression::intersection(
                        rest.iter()
                            .copied()
                            .chain([fresh])
                            .map(ClassExpression::Class),
                    ),
                    super_class,
                )),
            ]
        }
    })
}
