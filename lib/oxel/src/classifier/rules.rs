//! Completion rules.
//!
//! A rule reads the [`ClassifierStatus`] and a freshly derived entry and pushes [`Conclusion`]s.
//! It never writes the status: checking novelty and inserting is the job of the processor.
//!
//! Notation: `S(x)` is the set of subsumers of `x`, `(r, x, y)` a link in `R`,
//! `node(x)` the virtual node with identifier `x`, `r⁻` the inverse of `r`.

use crate::classifier::entry::{Conclusion, NodeEntry, REntry, SEntry};
use crate::classifier::node::VNode;
use crate::classifier::status::ClassifierStatus;
use crate::entity::EntityId;
use std::fmt;

/// What kind of entry triggers a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A new pair in `S`.
    Subsumption,
    /// A new triple in `R`.
    Relation,
}

/// A completion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionRule {
    // S observers
    /// `A ∈ S(x)`, `A ⊑ B` ⇒ `B ∈ S(x)`
    ToldSubsumption,
    /// `A1, A2 ∈ S(x)`, `A1 ⊓ A2 ⊑ B` ⇒ `B ∈ S(x)`
    Conjunction,
    /// `A ∈ S(x)`, `A ⊑ ∃r.B` ⇒ `(r, x, B)`, or a link to `⊤ ⊓ ∃r⁻.A` if `r` has a functional ancestor
    SuccessorGeneration,
    /// `A ∈ S(y)`, `(r, x, y)`, `∃r.A ⊑ B` or `∃⊤ₚ.A ⊑ B` ⇒ `B ∈ S(x)`
    ExistentialBySubsumption,
    /// `A ∈ S(x)`, `(r1, x, y)`, `r1 ⊑ s`, `∃s⁻.A ⊑ B` ⇒ link `x` to `node(y) ⊓ ∃r1⁻.A ⊑ B`
    InverseExistentialBySubsumption,
    /// `⊥ ∈ S(y)`, `(r, x, y)` ⇒ `⊥ ∈ S(x)`
    BottomBySubsumption,
    /// `⊤ ∈ S(x)`, `r` reflexive ⇒ `(r, x, x)`
    Reflexivity,
    /// `A ∈ S(y)`, `v` refines `y` ⇒ `A ∈ S(v)`
    NodeInheritance,

    // R observers
    /// `(r, x, y)`, `A ∈ S(y)`, `∃r.A ⊑ B` or `∃⊤ₚ.A ⊑ B` ⇒ `B ∈ S(x)`
    ExistentialByRelation,
    /// `(r, x, y)`, `r1 ⊑ s`, `A ∈ S(x)`, `∃s⁻.A ⊑ B` ⇒ link `x` to `node(y) ⊓ ∃r⁻.A ⊑ B`
    InverseExistentialByRelation,
    /// `(r, x, y)`, `⊥ ∈ S(y)` or `r ⊑ ⊥ₚ` ⇒ `⊥ ∈ S(x)`
    BottomByRelation,
    /// `(r, x, y)`, `r ⊑ s` ⇒ `(s, x, y)`
    ///
    /// Links over `⊤ₚ` are left implicit: the existential rules look up `∃⊤ₚ.A ⊑ B` for every link.
    RoleHierarchy,
    /// `(r, x, y)`, `(s, y, z)`, `r ∘ s ⊑ t` ⇒ `(t, x, z)`
    RoleChain,
    /// `(r2, x, y)`, `r2 ⊑ r`, `r` transitive, `r1 ⊑ r`, `∃r1⁻.A ∈ node(x)`, `r ⊑ s`, `∃s⁻.A ⊑ B`
    /// ⇒ link `x` to `node(y) ⊓ ∃r⁻.A ⊑ B`
    TransitiveInverseExistential,
    /// `(r1, x, y)`, `(r2, x, z)`, `r1` and `r2` below the same functional property,
    /// `y` and `z` rooted in `⊤` ⇒ link `x` to the merge of `node(y)` and `node(z)`
    FunctionalMerge,
}

impl CompletionRule {
    /// Returns all completion rules.
    pub fn all() -> &'static [CompletionRule] {
        &[
            Self::ToldSubsumption,
            Self::Conjunction,
            Self::SuccessorGeneration,
            Self::ExistentialBySubsumption,
            Self::InverseExistentialBySubsumption,
            Self::BottomBySubsumption,
            Self::Reflexivity,
            Self::NodeInheritance,
            Self::ExistentialByRelation,
            Self::InverseExistentialByRelation,
            Self::BottomByRelation,
            Self::RoleHierarchy,
            Self::RoleChain,
            Self::TransitiveInverseExistential,
            Self::FunctionalMerge,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ToldSubsumption => "told-subsumption",
            Self::Conjunction => "conjunction",
            Self::SuccessorGeneration => "successor-generation",
            Self::ExistentialBySubsumption => "existential-by-subsumption",
            Self::InverseExistentialBySubsumption => "inverse-existential-by-subsumption",
            Self::BottomBySubsumption => "bottom-by-subsumption",
            Self::Reflexivity => "reflexivity",
            Self::NodeInheritance => "node-inheritance",
            Self::ExistentialByRelation => "existential-by-relation",
            Self::InverseExistentialByRelation => "inverse-existential-by-relation",
            Self::BottomByRelation => "bottom-by-relation",
            Self::RoleHierarchy => "role-hierarchy",
            Self::RoleChain => "role-chain",
            Self::TransitiveInverseExistential => "transitive-inverse-existential",
            Self::FunctionalMerge => "functional-merge",
        }
    }

    pub fn trigger(self) -> Trigger {
        match self {
            Self::ToldSubsumption
            | Self::Conjunction
            | Self::SuccessorGeneration
            | Self::ExistentialBySubsumption
            | Self::InverseExistentialBySubsumption
            | Self::BottomBySubsumption
            | Self::Reflexivity
            | Self::NodeInheritance => Trigger::Subsumption,
            Self::ExistentialByRelation
            | Self::InverseExistentialByRelation
            | Self::BottomByRelation
            | Self::RoleHierarchy
            | Self::RoleChain
            | Self::TransitiveInverseExistential
            | Self::FunctionalMerge => Trigger::Relation,
        }
    }

    /// Applies an S observer. Does nothing for R observers.
    pub fn apply_s(self, status: &ClassifierStatus, entry: SEntry, out: &mut Vec<Conclusion>) {
        let SEntry {
            sub_class: x,
            super_class: a,
        } = entry;
        match self {
            Self::ToldSubsumption => told_subsumption(status, x, a, out),
            Self::Conjunction => conjunction(status, x, a, out),
            Self::SuccessorGeneration => successor_generation(status, x, a, out),
            Self::ExistentialBySubsumption => existential_by_subsumption(status, x, a, out),
            Self::InverseExistentialBySubsumption => {
                inverse_existential_by_subsumption(status, x, a, out);
            }
            Self::BottomBySubsumption => bottom_by_subsumption(status, x, a, out),
            Self::Reflexivity => reflexivity(status, x, a, out),
            Self::NodeInheritance => node_inheritance(status, x, a, out),
            _ => (),
        }
    }

    /// Applies an R observer. Does nothing for S observers.
    pub fn apply_r(self, status: &ClassifierStatus, entry: REntry, out: &mut Vec<Conclusion>) {
        match self {
            Self::ExistentialByRelation => existential_by_relation(status, entry, out),
            Self::InverseExistentialByRelation => {
                inverse_existential_by_relation(status, entry, out);
            }
            Self::BottomByRelation => bottom_by_relation(status, entry, out),
            Self::RoleHierarchy => role_hierarchy(status, entry, out),
            Self::RoleChain => role_chain(status, entry, out),
            Self::TransitiveInverseExistential => {
                transitive_inverse_existential(status, entry, out);
            }
            Self::FunctionalMerge => functional_merge(status, entry, out),
            _ => (),
        }
    }
}

impl fmt::Display for CompletionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The rules of a classification, grouped by trigger.
#[derive(Debug, Clone)]
pub struct RuleChain {
    s_rules: Vec<CompletionRule>,
    r_rules: Vec<CompletionRule>,
}

impl RuleChain {
    pub fn new(rules: impl IntoIterator<Item = CompletionRule>) -> Self {
        let (s_rules, r_rules) = rules
            .into_iter()
            .partition(|rule| rule.trigger() == Trigger::Subsumption);
        Self { s_rules, r_rules }
    }

    pub fn apply_s(&self, status: &ClassifierStatus, entry: SEntry, out: &mut Vec<Conclusion>) {
        for rule in &self.s_rules {
            rule.apply_s(status, entry, out);
        }
    }

    pub fn apply_r(&self, status: &ClassifierStatus, entry: REntry, out: &mut Vec<Conclusion>) {
        for rule in &self.r_rules {
            rule.apply_r(status, entry, out);
        }
    }
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::new(CompletionRule::all().iter().copied())
    }
}

fn told_subsumption(status: &ClassifierStatus, x: EntityId, a: EntityId, out: &mut Vec<Conclusion>) {
    for axiom in status.ontology().gci0_by_sub_class(a) {
        out.push(Conclusion::subsumption(x, axiom.super_class()));
    }
}

fn conjunction(status: &ClassifierStatus, x: EntityId, a: EntityId, out: &mut Vec<Conclusion>) {
    for axiom in status.ontology().gci1_by_operand(a) {
        if status.contains_s(x, axiom.other_operand(a)) {
            out.push(Conclusion::subsumption(x, axiom.super_class()));
        }
    }
}

fn successor_generation(
    status: &ClassifierStatus,
    x: EntityId,
    a: EntityId,
    out: &mut Vec<Conclusion>,
) {
    for axiom in status.ontology().gci2_by_sub_class(a) {
        let r = axiom.property();
        let b = axiom.class_in_super_class();
        if status.has_functional_ancestor(r) {
            // all the r-successors of A instances are the same
            let Some(r_inverse) = status.inverse_object_property_of(r) else {
                continue;
            };
            out.push(Conclusion::Node(NodeEntry {
                node: VNode::new(EntityId::TOP_CLASS)
                    .with_existential(r_inverse, a),
                inherits_from: Vec::new(),
                subsumers: vec![b],
                property: r,
                left_class: x,
            }));
        } else {
            out.push(Conclusion::link(r, x, b));
        }
    }
}

fn existential_by_subsumption(
    status: &ClassifierStatus,
    y: EntityId,
    a: EntityId,
    out: &mut Vec<Conclusion>,
) {
    let top = EntityId::TOP_OBJECT_PROPERTY;
    for r in status.properties_by_second(y) {
        // every link is also a link over ⊤ₚ
        let top_axioms = if r == top {
            None
        } else {
            Some(status.ontology().gci3_by_property_and_class(top, a))
        };
        for axiom in status
            .ontology()
            .gci3_by_property_and_class(r, a)
            .chain(top_axioms.into_iter().flatten())
        {
            for x in status.first_by_second(r, y) {
                out.push(Conclusion::subsumption(x, axiom.super_class()));
            }
        }
    }
}

fn inverse_existential_by_subsumption(
    status: &ClassifierStatus,
    x: EntityId,
    a: EntityId,
    out: &mut Vec<Conclusion>,
) {
    for r1 in status.properties_by_first(x) {
        for s in status.super_object_properties(r1) {
            let Some(s_inverse) = status.inverse_object_property_of(s) else {
                continue;
            };
            for axiom in status.ontology().gci3_by_property_and_class(s_inverse, a) {
                for y in status.second_by_first(r1, x) {
                    refine_successor(status, r1, x, y, r1, a, axiom.super_class(), out);
                }
            }
        }
    }
}

fn bottom_by_subsumption(
    status: &ClassifierStatus,
    y: EntityId,
    a: EntityId,
    out: &mut Vec<Conclusion>,
) {
    if a != EntityId::BOTTOM_CLASS {
        return;
    }
    for r in status.properties_by_second(y) {
        for x in status.first_by_second(r, y) {
            out.push(Conclusion::subsumption(x, EntityId::BOTTOM_CLASS));
        }
    }
}

fn reflexivity(status: &ClassifierStatus, x: EntityId, a: EntityId, out: &mut Vec<Conclusion>) {
    if a != EntityId::TOP_CLASS {
        return;
    }
    for r in status.ontology().reflexive_object_properties() {
        out.push(Conclusion::link(r, x, x));
    }
}

fn node_inheritance(status: &ClassifierStatus, y: EntityId, a: EntityId, out: &mut Vec<Conclusion>) {
    for v in status.derived_nodes(y) {
        out.push(Conclusion::subsumption(v, a));
    }
}

fn existential_by_relation(status: &ClassifierStatus, entry: REntry, out: &mut Vec<Conclusion>) {
    let REntry {
        property: r,
        left_class: x,
        right_class: y,
    } = entry;
    let top = EntityId::TOP_OBJECT_PROPERTY;
    let top_axioms = if r == top {
        None
    } else {
        Some(status.ontology().gci3_by_property(top))
    };
    for axiom in status
        .ontology()
        .gci3_by_property(r)
        .chain(top_axioms.into_iter().flatten())
    {
        if status.contains_s(y, axiom.class_in_sub_class()) {
            out.push(Conclusion::subsumption(x, axiom.super_class()));
        }
    }
}

fn inverse_existential_by_relation(
    status: &ClassifierStatus,
    entry: REntry,
    out: &mut Vec<Conclusion>,
) {
    let REntry {
        property: r1,
        left_class: x,
        right_class: y,
    } = entry;
    for s in status.super_object_properties(r1) {
        let Some(s_inverse) = status.inverse_object_property_of(s) else {
            continue;
        };
        for axiom in status.ontology().gci3_by_property(s_inverse) {
            let a = axiom.class_in_sub_class();
            if status.contains_s(x, a) {
                refine_successor(status, r1, x, y, r1, a, axiom.super_class(), out);
            }
        }
    }
}

/// Links `x` through `link_property` to `node(y) ⊓ ∃restriction⁻.a`, which is subsumed by `super_class`.
#[expect(clippy::too_many_arguments)]
fn refine_successor(
    status: &ClassifierStatus,
    link_property: EntityId,
    x: EntityId,
    y: EntityId,
    restriction: EntityId,
    a: EntityId,
    super_class: EntityId,
    out: &mut Vec<Conclusion>,
) {
    let (Some(node), Some(restriction_inverse)) = (
        status.node(y),
        status.inverse_object_property_of(restriction),
    ) else {
        return;
    };
    out.push(Conclusion::Node(NodeEntry {
        node: node.with_existential(restriction_inverse, a),
        inherits_from: vec![y],
        subsumers: vec![super_class],
        property: link_property,
        left_class: x,
    }));
}

fn bottom_by_relation(status: &ClassifierStatus, entry: REntry, out: &mut Vec<Conclusion>) {
    let over_bottom_property = status
        .super_object_properties(entry.property)
        .chain([entry.property])
        .any(|p| p == EntityId::BOTTOM_OBJECT_PROPERTY);
    if over_bottom_property || status.is_unsatisfiable(entry.right_class) {
        out.push(Conclusion::subsumption(
            entry.left_class,
            EntityId::BOTTOM_CLASS,
        ));
    }
}

fn role_hierarchy(status: &ClassifierStatus, entry: REntry, out: &mut Vec<Conclusion>) {
    for s in status.super_object_properties(entry.property) {
        if s != entry.property && s != EntityId::TOP_OBJECT_PROPERTY {
            out.push(Conclusion::link(s, entry.left_class, entry.right_class));
        }
    }
}

fn role_chain(status: &ClassifierStatus, entry: REntry, out: &mut Vec<Conclusion>) {
    let REntry {
        property,
        left_class: y,
        right_class: z,
    } = entry;
    // the new link is the right part of the chain: (r, x, y), (s, y, z) ⇒ (t, x, z)
    for axiom in status.ontology().ri3_by_right_sub_property(property) {
        for x in status.first_by_second(axiom.left_sub_property(), y) {
            out.push(Conclusion::link(axiom.super_property(), x, z));
        }
    }
    // the new link is the left part of the chain: (r, y, z), (s, z, w) ⇒ (t, y, w)
    for axiom in status.ontology().ri3_by_left_sub_property(property) {
        for w in status.second_by_first(axiom.right_sub_property(), z) {
            out.push(Conclusion::link(axiom.super_property(), y, w));
        }
    }
}

fn transitive_inverse_existential(
    status: &ClassifierStatus,
    entry: REntry,
    out: &mut Vec<Conclusion>,
) {
    let REntry {
        property: r2,
        left_class: x,
        right_class: y,
    } = entry;
    let Some(phi) = status.node(x) else {
        return;
    };
    if phi.is_fresh() {
        return;
    }
    for r in status.super_object_properties(r2) {
        if !status.ontology().has_transitive_object_property(r) {
            continue;
        }
        for s in status.super_object_properties(r) {
            let Some(s_inverse) = status.inverse_object_property_of(s) else {
                continue;
            };
            for axiom in status.ontology().gci3_by_property(s_inverse) {
                let a = axiom.class_in_sub_class();
                let has_predecessor = status.sub_object_properties(r).any(|r1| {
                    status
                        .inverse_object_property_of(r1)
                        .is_some_and(|r1_inverse| phi.contains_existential(r1_inverse, a))
                });
                if has_predecessor {
                    refine_successor(status, r2, x, y, r, a, axiom.super_class(), out);
                }
            }
        }
    }
}

fn functional_merge(status: &ClassifierStatus, entry: REntry, out: &mut Vec<Conclusion>) {
    let REntry {
        property: r1,
        left_class: x,
        right_class: y,
    } = entry;
    let Some(psi) = status.node(y) else {
        return;
    };
    if psi.class_id() != EntityId::TOP_CLASS {
        return;
    }
    for r2 in status.object_properties_with_functional_ancestor(r1) {
        for z in status.second_by_first(r2, x) {
            if z == y {
                continue;
            }
            let Some(phi) = status.node(z) else {
                continue;
            };
            if phi.class_id() != EntityId::TOP_CLASS {
                continue;
            }
            out.push(Conclusion::Node(NodeEntry {
                node: psi.union(phi),
                inherits_from: vec![y, z],
                subsumers: Vec::new(),
                property: r1,
                left_class: x,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityManager, EntityType};
    use crate::normalized::{
        FunctionalObjectPropertyAxiom, Gci0Axiom, Gci1Axiom, Gci2Axiom, Gci3Axiom,
        NormalizedAxiom, Ri1Axiom, Ri2Axiom, Ri3Axiom,
    };
    use crate::ontology::ExtendedOntology;
    use std::sync::Arc;

    fn status(
        entities: EntityManager,
        axioms: &[NormalizedAxiom],
    ) -> ClassifierStatus {
        ClassifierStatus::new(Arc::new(ExtendedOntology::from_axioms(axioms)), entities).unwrap()
    }

    fn apply_s(status: &ClassifierStatus, rule: CompletionRule, x: EntityId, a: EntityId) -> Vec<Conclusion> {
        let mut out = Vec::new();
        rule.apply_s(status, SEntry::new(x, a), &mut out);
        out
    }

    fn apply_r(
        status: &ClassifierStatus,
        rule: CompletionRule,
        r: EntityId,
        x: EntityId,
        y: EntityId,
    ) -> Vec<Conclusion> {
        let mut out = Vec::new();
        rule.apply_r(status, REntry::new(r, x, y), &mut out);
        out
    }

    #[test]
    fn rules_are_split_by_trigger() {
        let chain = RuleChain::default();
        assert_eq!(
            chain.s_rules.len() + chain.r_rules.len(),
            CompletionRule::all().len()
        );
        assert!(
            chain
                .s_rules
                .iter()
                .all(|r| r.trigger() == Trigger::Subsumption)
        );
        assert_eq!(CompletionRule::RoleChain.to_string(), "role-chain");
    }

    #[test]
    fn told_subsumption_and_conjunction() {
        let mut entities = EntityManager::new();
        let [a, b, c, d] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let mut status = status(
            entities,
            &[
                Gci0Axiom::new(a, b).into(),
                Gci1Axiom::new(a, c, d).into(),
            ],
        );
        assert_eq!(
            apply_s(&status, CompletionRule::ToldSubsumption, a, a),
            vec![Conclusion::subsumption(a, b)]
        );
        assert!(apply_s(&status, CompletionRule::Conjunction, a, a).is_empty());
        status.add_to_s(a, c);
        assert_eq!(
            apply_s(&status, CompletionRule::Conjunction, a, a),
            vec![Conclusion::subsumption(a, d)]
        );
        assert!(apply_s(&status, CompletionRule::ToldSubsumption, b, b).is_empty());
    }

    #[test]
    fn successor_generation() {
        let mut entities = EntityManager::new();
        let [a, b] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let [r, f] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap());
        let status = status(
            entities,
            &[
                Gci2Axiom::new(a, r, b).into(),
                Gci2Axiom::new(b, f, a).into(),
                FunctionalObjectPropertyAxiom::new(f).into(),
            ],
        );
        assert_eq!(
            apply_s(&status, CompletionRule::SuccessorGeneration, a, a),
            vec![Conclusion::link(r, a, b)]
        );
        let f_inverse = status.inverse_object_property_of(f).unwrap();
        assert_eq!(
            apply_s(&status, CompletionRule::SuccessorGeneration, b, b),
            vec![Conclusion::Node(NodeEntry {
                node: VNode::new(EntityId::TOP_CLASS).with_existential(f_inverse, b),
                inherits_from: Vec::new(),
                subsumers: vec![a],
                property: f,
                left_class: b,
            })]
        );
    }

    #[test]
    fn existential_from_both_sides() {
        let mut entities = EntityManager::new();
        let [a, b, x, y] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let mut status = status(
            entities,
            &[
                Gci3Axiom::new(r, a, b).into(),
                Gci0Axiom::new(x, EntityId::TOP_CLASS).into(),
                Gci0Axiom::new(y, EntityId::TOP_CLASS).into(),
            ],
        );
        status.add_to_r(r, x, y);
        assert_eq!(
            apply_s(&status, CompletionRule::ExistentialBySubsumption, y, a),
            vec![Conclusion::subsumption(x, b)]
        );
        assert!(apply_r(&status, CompletionRule::ExistentialByRelation, r, x, y).is_empty());
        status.add_to_s(y, a);
        assert_eq!(
            apply_r(&status, CompletionRule::ExistentialByRelation, r, x, y),
            vec![Conclusion::subsumption(x, b)]
        );
    }

    #[test]
    fn bottom_goes_backwards() {
        let mut entities = EntityManager::new();
        let [x, y] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let mut status = status(
            entities,
            &[Gci2Axiom::new(x, r, y).into()],
        );
        status.add_to_r(r, x, y);
        assert!(apply_r(&status, CompletionRule::BottomByRelation, r, x, y).is_empty());
        status.add_to_s(y, EntityId::BOTTOM_CLASS);
        assert_eq!(
            apply_r(&status, CompletionRule::BottomByRelation, r, x, y),
            vec![Conclusion::subsumption(x, EntityId::BOTTOM_CLASS)]
        );
        assert_eq!(
            apply_s(
                &status,
                CompletionRule::BottomBySubsumption,
                y,
                EntityId::BOTTOM_CLASS
            ),
            vec![Conclusion::subsumption(x, EntityId::BOTTOM_CLASS)]
        );
        assert!(apply_s(&status, CompletionRule::BottomBySubsumption, y, y).is_empty());
    }

    #[test]
    fn role_hierarchy_skips_top_property() {
        let mut entities = EntityManager::new();
        let [x, y] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let [r, s] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap());
        let status = status(entities, &[Ri2Axiom::new(r, s).into()]);
        assert_eq!(
            apply_r(&status, CompletionRule::RoleHierarchy, r, x, y),
            vec![Conclusion::link(s, x, y)]
        );
        assert!(apply_r(&status, CompletionRule::RoleHierarchy, s, x, y).is_empty());
    }

    #[test]
    fn existential_over_top_property_matches_any_link() {
        let mut entities = EntityManager::new();
        let [a, b, x, y] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities
            .create_anonymous_entity(EntityType::ObjectProperty)
            .unwrap();
        let top = EntityId::TOP_OBJECT_PROPERTY;
        let mut status = status(
            entities,
            &[
                Gci3Axiom::new(top, a, b).into(),
                Gci2Axiom::new(x, r, y).into(),
            ],
        );
        status.add_to_r(r, x, y);
        assert!(apply_r(&status, CompletionRule::ExistentialByRelation, r, x, y).is_empty());
        assert_eq!(
            apply_s(&status, CompletionRule::ExistentialBySubsumption, y, a),
            vec![Conclusion::subsumption(x, b)]
        );
        status.add_to_s(y, a);
        assert_eq!(
            apply_r(&status, CompletionRule::ExistentialByRelation, r, x, y),
            vec![Conclusion::subsumption(x, b)]
        );
        // the axiom is not looked up twice for an explicit link over ⊤ₚ
        status.add_to_r(top, x, y);
        assert_eq!(
            apply_r(&status, CompletionRule::ExistentialByRelation, top, x, y),
            vec![Conclusion::subsumption(x, b)]
        );
    }

    #[test]
    fn links_below_bottom_property_are_unsatisfiable() {
        let mut entities = EntityManager::new();
        let [x, y] = std::array::from_fn(|_| {
            entities.create_anonymous_entity(EntityType::Class).unwrap()
        });
        let [r, s] = std::array::from_fn(|_| {
            entities
                .create_anonymous_entity(EntityType::ObjectProperty)
                .unwrap()
        });
        let bottom = EntityId::BOTTOM_OBJECT_PROPERTY;
        let status = status(entities, &[Ri2Axiom::new(r, bottom).into()]);
        assert_eq!(
            apply_r(&status, CompletionRule::BottomByRelation, bottom, x, y),
            vec![Conclusion::subsumption(x, EntityId::BOTTOM_CLASS)]
        );
        assert_eq!(
            apply_r(&status, CompletionRule::BottomByRelation, r, x, y),
            vec![Conclusion::subsumption(x, EntityId::BOTTOM_CLASS)]
        );
        assert!(apply_r(&status, CompletionRule::BottomByRelation, s, x, y).is_empty());
    }

    #[test]
    fn role_chain_in_both_positions() {
        let mut entities = EntityManager::new();
        let [w, x, y, z] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let [r, s, t] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap());
        let mut status = status(entities, &[Ri3Axiom::new(r, s, t).into()]);
        status.add_to_r(r, w, x);
        status.add_to_r(s, y, z);
        // (s, x, y) closes w -r-> x -s-> y
        assert_eq!(
            apply_r(&status, CompletionRule::RoleChain, s, x, y),
            vec![Conclusion::link(t, w, y)]
        );
        // (r, x, y) opens x -r-> y -s-> z
        assert_eq!(
            apply_r(&status, CompletionRule::RoleChain, r, x, y),
            vec![Conclusion::link(t, x, z)]
        );
    }

    #[test]
    fn reflexivity_on_top() {
        let mut entities = EntityManager::new();
        let x = entities.create_anonymous_entity(EntityType::Class).unwrap();
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let status = status(entities, &[Ri1Axiom::new(r).into()]);
        assert_eq!(
            apply_s(&status, CompletionRule::Reflexivity, x, EntityId::TOP_CLASS),
            vec![Conclusion::link(r, x, x)]
        );
        assert!(apply_s(&status, CompletionRule::Reflexivity, x, x).is_empty());
    }

    #[test]
    fn inverse_existential_refines_successor() {
        let mut entities = EntityManager::new();
        let [a, b, x, y] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let r_inverse = entities.create_or_get_inverse_object_property_of(r).unwrap();
        let mut status = status(
            entities,
            &[
                Gci3Axiom::new(r_inverse, a, b).into(),
                Gci2Axiom::new(x, r, y).into(),
            ],
        );
        status.add_to_r(r, x, y);
        let expected = vec![Conclusion::Node(NodeEntry {
            node: VNode::new(y).with_existential(r_inverse, a),
            inherits_from: vec![y],
            subsumers: vec![b],
            property: r,
            left_class: x,
        })];
        assert_eq!(
            apply_s(&status, CompletionRule::InverseExistentialBySubsumption, x, a),
            expected
        );
        assert!(
            apply_r(&status, CompletionRule::InverseExistentialByRelation, r, x, y).is_empty()
        );
        status.add_to_s(x, a);
        assert_eq!(
            apply_r(&status, CompletionRule::InverseExistentialByRelation, r, x, y),
            expected
        );
    }

    #[test]
    fn transitive_inverse_existential() {
        let mut entities = EntityManager::new();
        let [a, b, c, y] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let r_inverse = entities.create_or_get_inverse_object_property_of(r).unwrap();
        let mut status = status(
            entities,
            &[
                Ri3Axiom::new(r, r, r).into(),
                Gci3Axiom::new(r_inverse, a, b).into(),
                Gci0Axiom::new(c, EntityId::TOP_CLASS).into(),
                Gci0Axiom::new(y, EntityId::TOP_CLASS).into(),
            ],
        );
        let (x, _) = status.create_or_get_node_id(VNode::new(c).with_existential(r_inverse, a)).unwrap();
        status.add_to_r(r, x, y);
        assert_eq!(
            apply_r(&status, CompletionRule::TransitiveInverseExistential, r, x, y),
            vec![Conclusion::Node(NodeEntry {
                node: VNode::new(y).with_existential(r_inverse, a),
                inherits_from: vec![y],
                subsumers: vec![b],
                property: r,
                left_class: x,
            })]
        );
        // a plain class carries no restriction to pass along
        assert!(
            apply_r(&status, CompletionRule::TransitiveInverseExistential, r, c, y).is_empty()
        );
    }

    #[test]
    fn functional_successors_are_merged() {
        let mut entities = EntityManager::new();
        let [a, b, x] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let f = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let f_inverse = entities.create_or_get_inverse_object_property_of(f).unwrap();
        let mut status = status(
            entities,
            &[
                Gci0Axiom::new(x, EntityId::TOP_CLASS).into(),
                FunctionalObjectPropertyAxiom::new(f).into(),
            ],
        );
        let psi = VNode::new(EntityId::TOP_CLASS).with_existential(f_inverse, a);
        let phi = VNode::new(EntityId::TOP_CLASS).with_existential(f_inverse, b);
        let (y, _) = status.create_or_get_node_id(psi.clone()).unwrap();
        let (z, _) = status.create_or_get_node_id(phi.clone()).unwrap();
        status.add_to_r(f, x, y);
        status.add_to_r(f, x, z);
        assert_eq!(
            apply_r(&status, CompletionRule::FunctionalMerge, f, x, y),
            vec![Conclusion::Node(NodeEntry {
                node: psi.union(&phi),
                inherits_from: vec![y, z],
                subsumers: Vec::new(),
                property: f,
                left_class: x,
            })]
        );
        // successors rooted in a named class are left alone
        assert!(apply_r(&status, CompletionRule::FunctionalMerge, f, a, x).is_empty());
    }

    #[test]
    fn node_inheritance() {
        let mut entities = EntityManager::new();
        let [a, y] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let mut status = status(entities, &[Gci2Axiom::new(a, r, y).into()]);
        let (v, _) = status.create_or_get_node_id(VNode::new(y).with_existential(r, a)).unwrap();
        status.add_derived_node(y, v);
        assert_eq!(
            apply_s(&status, CompletionRule::NodeInheritance, y, a),
            vec![Conclusion::subsumption(v, a)]
        );
        assert!(apply_s(&status, CompletionRule::NodeInheritance, v, a).is_empty());
    }
}
