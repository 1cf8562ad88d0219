//! Rewriting of arbitrary axioms into the normal forms the classifier works on.

mod rules;

pub use crate::normalization::rules::{NormalizationRule, Rewrite};

use crate::axiom::{Annotations, ComplexAxiom, IntegerAxiom};
use crate::entity::{EntityId, EntityManager, EntityType};
use crate::error::InvalidInputError;
use crate::normalized::{Gci0Axiom, Gci2Axiom, NormalizedAxiom};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, trace};

/// Normalizes a set of axioms. See [`Normalizer`].
pub fn normalize(
    axioms: impl IntoIterator<Item = IntegerAxiom>,
    entities: &mut EntityManager,
) -> Result<FxHashSet<NormalizedAxiom>, InvalidInputError> {
    Normalizer::new(entities).normalize(axioms)
}

/// Rewrites axioms until only normal forms are left.
///
/// Each complex axiom goes through the [`NormalizationRule`]s in order and is replaced by the output
/// of the first one that does not decline. Outputs are processed the same way until nothing new
/// shows up. A last pass then moves the ranges of the properties into the fillers of `A ⊑ ∃r.B`.
///
/// Outputs carry the annotations of the axiom they come from. Equal axioms are kept once
/// with the union of their annotations.
/// Normal forms given as input are kept as they are, so normalizing twice changes nothing.
///
/// ```
/// use oxel::{ClassExpression, ComplexAxiom, EntityManager, EntityType, Gci2Axiom, NormalizedAxiom, normalize};
///
/// let mut entities = EntityManager::new();
/// let a = entities.create_anonymous_entity(EntityType::Class)?;
/// let b = entities.create_anonymous_entity(EntityType::Class)?;
/// let r = entities.create_anonymous_entity(EntityType::ObjectProperty)?;
/// let axioms = normalize(
///     [ComplexAxiom::equivalent_classes([
///         a.into(),
///         ClassExpression::some_values_from(r, b.into()),
///     ])
///     .into()],
///     &mut entities,
/// )?;
/// assert!(axioms.contains(&NormalizedAxiom::from(Gci2Axiom::new(a, r, b))));
/// assert_eq!(axioms.len(), 2);
/// # Result::<_, oxel::InvalidInputError>::Ok(())
/// ```
#[derive(Debug)]
pub struct Normalizer<'a> {
    entities: &'a mut EntityManager,
    rules: &'static [NormalizationRule],
}

impl<'a> Normalizer<'a> {
    pub fn new(entities: &'a mut EntityManager) -> Self {
        Self {
            entities,
            rules: NormalizationRule::all(),
        }
    }

    /// Fails only if the fresh entities can not be allocated.
    pub fn normalize(
        &mut self,
        axioms: impl IntoIterator<Item = IntegerAxiom>,
    ) -> Result<FxHashSet<NormalizedAxiom>, InvalidInputError> {
        let mut queue = WorkQueue::default();
        let mut output = FxHashSet::default();
        let mut input_count = 0;
        for axiom in axioms {
            input_count += 1;
            queue.push(axiom, &mut output);
        }
        let mut discarded = 0;
        while let Some(axiom) = queue.pop() {
            let mut rewrite = None;
            for rule in self.rules {
                match rule.apply(&axiom, self.entities)? {
                    Rewrite::Declined => (),
                    applied => {
                        rewrite = Some((rule, applied));
                        break;
                    }
                }
            }
            match rewrite {
                Some((rule, Rewrite::Replaced(replacements))) => {
                    trace!(%axiom, rule = rule.name(), "rewritten");
                    queue.rewritten(&axiom, replacements, &mut output);
                }
                Some((rule, _)) => {
                    trace!(%axiom, rule = rule.name(), "discarded");
                    queue.rewritten(&axiom, Vec::new(), &mut output);
                    discarded += 1;
                }
                None => {
                    debug!(%axiom, "no normalization rule applies");
                    queue.rewritten(&axiom, Vec::new(), &mut output);
                    discarded += 1;
                }
            }
        }
        let output = self.move_ranges_to_fillers(output)?;
        debug!(
            input = input_count,
            output = output.len(),
            discarded,
            entities = self.entities.len(),
            "normalization done"
        );
        Ok(output)
    }

    /// Replaces the filler `B` of each `A ⊑ ∃r.B` by a fresh `F ⊑ B ⊓ C1 ⊓ ... ⊓ Cn`
    /// where the `Ci` are the ranges of `r` and of its told super properties not already told for `B`.
    ///
    /// For a reflexive `r` each range `C` also gives `⊤ ⊑ C`.
    fn move_ranges_to_fillers(
        &mut self,
        axioms: FxHashSet<NormalizedAxiom>,
    ) -> Result<FxHashSet<NormalizedAxiom>, InvalidInputError> {
        let mut ranges = FxHashMap::<EntityId, BTreeSet<EntityId>>::default();
        let mut super_properties = FxHashMap::<EntityId, Vec<EntityId>>::default();
        let mut told_subsumers = FxHashMap::<EntityId, FxHashSet<EntityId>>::default();
        let mut reflexive_properties = Vec::new();
        for axiom in &axioms {
            match axiom {
                NormalizedAxiom::Range(a) => {
                    ranges.entry(a.property()).or_default().insert(a.range());
                }
                NormalizedAxiom::Ri2(a) => super_properties
                    .entry(a.sub_property())
                    .or_default()
                    .push(a.super_property()),
                NormalizedAxiom::Gci0(a) => {
                    told_subsumers
                        .entry(a.sub_class())
                        .or_default()
                        .insert(a.super_class());
                }
                NormalizedAxiom::Ri1(a) => reflexive_properties.push(a.super_property()),
                _ => (),
            }
        }
        if ranges.is_empty() {
            return Ok(axioms);
        }

        let mut cache = FxHashMap::<EntityId, BTreeSet<EntityId>>::default();
        let mut ranges_of = |property: EntityId| -> BTreeSet<EntityId> {
            cache
                .entry(property)
                .or_insert_with(|| {
                    let mut visited = FxHashSet::default();
                    let mut stack = vec![property];
                    let mut result = BTreeSet::new();
                    while let Some(p) = stack.pop() {
                        if !visited.insert(p) {
                            continue;
                        }
                        if let Some(r) = ranges.get(&p) {
                            result.extend(r.iter().copied());
                        }
                        if let Some(sups) = super_properties.get(&p) {
                            stack.extend(sups.iter().copied());
                        }
                    }
                    result.remove(&EntityId::TOP_CLASS);
                    result
                })
                .clone()
        };

        let mut output = FxHashSet::<NormalizedAxiom>::default();
        for property in reflexive_properties {
            for range in ranges_of(property) {
                output.insert(Gci0Axiom::new(EntityId::TOP_CLASS, range).into());
            }
        }
        for axiom in axioms {
            let NormalizedAxiom::Gci2(gci2) = &axiom else {
                output.insert(axiom);
                continue;
            };
            let filler = gci2.class_in_super_class();
            let told = told_subsumers.get(&filler);
            let missing = ranges_of(gci2.property())
                .into_iter()
                .filter(|range| *range != filler && !told.is_some_and(|t| t.contains(range)))
                .collect::<Vec<_>>();
            if missing.is_empty() {
                output.insert(axiom);
                continue;
            }
            let annotations = gci2.annotations().clone();
            let fresh = self
                .entities
                .create_anonymous_entity(EntityType::Class)?;
            output.insert(
                Gci0Axiom::new(fresh, filler)
                    .with_annotations(annotations.clone())
                    .into(),
            );
            for range in missing {
                output.insert(
                    Gci0Axiom::new(fresh, range)
                        .with_annotations(annotations.clone())
                        .into(),
                );
            }
            output.insert(
                Gci2Axiom::new(gci2.sub_class(), gci2.property(), fresh)
                    .with_annotations(annotations)
                    .into(),
            );
        }
        Ok(output)
    }
}

fn annotate(axiom: IntegerAxiom, annotations: &Annotations) -> IntegerAxiom {
    if annotations.is_empty() {
        return axiom;
    }
    match axiom {
        IntegerAxiom::Complex { axiom, .. } => IntegerAxiom::Complex {
            axiom,
            annotations: annotations.clone(),
        },
        IntegerAxiom::Normalized(axiom) => {
            IntegerAxiom::Normalized(axiom.with_annotations(annotations.clone()))
        }
    }
}

/// Equal axioms are kept once, with the union of their annotations.
fn insert_merging_annotations(output: &mut FxHashSet<NormalizedAxiom>, axiom: NormalizedAxiom) {
    let Some(existing) = output.take(&axiom) else {
        output.insert(axiom);
        return;
    };
    let mut annotations = existing.annotations().clone();
    merge_annotations(&mut annotations, axiom.annotations());
    output.insert(existing.with_annotations(annotations));
}

fn merge_annotations(target: &mut Annotations, source: &Annotations) {
    for annotation in source {
        target.push(annotation.clone());
    }
}

/// The complex axioms waiting for a rewrite, each one queued at most once.
///
/// Normal forms skip the queue and go straight to the output.
/// A complex axiom pushed again while still pending gives its annotations to the pending copy.
/// Once rewritten, the new annotations of a later copy are pushed again with its replacements.
#[derive(Default)]
struct WorkQueue {
    queue: VecDeque<ComplexAxiom>,
    entries: FxHashMap<ComplexAxiom, QueueEntry>,
}

struct QueueEntry {
    annotations: Annotations,
    /// Set once the axiom has been rewritten. Empty if it was discarded.
    replacements: Option<Vec<IntegerAxiom>>,
}

impl WorkQueue {
    fn push(&mut self, axiom: IntegerAxiom, output: &mut FxHashSet<NormalizedAxiom>) {
        let (axiom, annotations) = match axiom {
            IntegerAxiom::Normalized(axiom) => {
                insert_merging_annotations(output, axiom);
                return;
            }
            IntegerAxiom::Complex {
                axiom,
                annotations,
            } => (axiom, annotations),
        };
        let Some(entry) = self.entries.get_mut(&axiom) else {
            self.queue.push_back(axiom.clone());
            self.entries.insert(
                axiom,
                QueueEntry {
                    annotations,
                    replacements: None,
                },
            );
            return;
        };
        let mut added = Annotations::default();
        for annotation in &annotations {
            if !entry.annotations.iter().any(|a| a == annotation) {
                entry.annotations.push(annotation.clone());
                added.push(annotation.clone());
            }
        }
        if added.is_empty() {
            return;
        }
        if let Some(replacements) = entry.replacements.clone() {
            for replacement in replacements {
                self.push(annotate(replacement, &added), output);
            }
        }
    }

    fn pop(&mut self) -> Option<ComplexAxiom> {
        self.queue.pop_front()
    }

    /// Records the rewrite of a popped axiom and queues its replacements.
    fn rewritten(
        &mut self,
        axiom: &ComplexAxiom,
        replacements: Vec<IntegerAxiom>,
        output: &mut FxHashSet<NormalizedAxiom>,
    ) {
        let Some(entry) = self.entries.get_mut(axiom) else {
            return;
        };
        entry.replacements = Some(replacements.clone());
        let annotations = entry.annotations.clone();
        for replacement in replacements {
            self.push(annotate(replacement, &annotations), output);
        }
    }
}
