use crate::classifier::entry::{Conclusion, NodeEntry, REntry, SEntry, XEntry};
use crate::classifier::rules::RuleChain;
use crate::classifier::status::ClassifierStatus;
use crate::entity::{EntityId, EntityManager};
use crate::error::{InvalidInputError, ReasoningError};
use crate::ontology::ExtendedOntology;
use crate::reasoner::{InterruptHandle, ReasonerConfig};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, debug_span, trace};

/// In which order the pending entries are processed.
///
/// The saturated status is the same for both orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueueOrder {
    /// Oldest entry first.
    #[default]
    Fifo,
    /// Newest entry first.
    Lifo,
}

/// Saturates a [`ClassifierStatus`] with the completion rules.
///
/// Each new fact is added to the status and queued. Processing a queued fact runs the rules
/// observing its kind and adds back the conclusions that are new.
///
/// ```
/// use oxel::{EntityId, EntityManager, EntityType, ExtendedOntology, Gci0Axiom, NormalizedAxiom, Processor, ReasonerConfig};
/// use std::sync::Arc;
///
/// let mut entities = EntityManager::new();
/// let a = entities.create_anonymous_entity(EntityType::Class)?;
/// let b = entities.create_anonymous_entity(EntityType::Class)?;
/// let ontology = ExtendedOntology::from_axioms(&[NormalizedAxiom::from(Gci0Axiom::new(a, b))]);
/// let mut processor = Processor::new(Arc::new(ontology), entities)?;
/// processor.run(&ReasonerConfig::default())?;
/// let status = processor.into_status()?;
/// assert!(status.contains_s(a, b));
/// assert!(!status.contains_s(b, a));
/// # Result::<_, oxel::ReasoningError>::Ok(())
/// ```
#[derive(Debug)]
pub struct Processor {
    status: ClassifierStatus,
    rules: RuleChain,
    queue: VecDeque<XEntry>,
    queue_order: QueueOrder,
    conclusions: Vec<Conclusion>,
    iterations: usize,
    interrupt_handle: InterruptHandle,
}

impl Processor {
    /// Builds the initial status and queues `A ⊑ A` and `A ⊑ ⊤` for every class but `⊥`.
    pub fn new(
        ontology: Arc<ExtendedOntology>,
        entities: EntityManager,
    ) -> Result<Self, InvalidInputError> {
        let mut classes = ontology
            .classes()
            .filter(|class| *class != EntityId::BOTTOM_CLASS)
            .collect::<Vec<_>>();
        classes.sort_unstable();
        let mut processor = Self {
            status: ClassifierStatus::new(ontology, entities)?,
            rules: RuleChain::default(),
            queue: VecDeque::new(),
            queue_order: QueueOrder::default(),
            conclusions: Vec::new(),
            iterations: 0,
            interrupt_handle: InterruptHandle::new(),
        };
        for class in classes {
            processor.seed(class);
        }
        Ok(processor)
    }

    /// Uses the given handle to check for interruptions in [`run`](Self::run).
    #[must_use]
    pub fn with_interrupt_handle(mut self, interrupt_handle: InterruptHandle) -> Self {
        self.interrupt_handle = interrupt_handle;
        self
    }

    #[must_use]
    pub fn with_queue_order(mut self, queue_order: QueueOrder) -> Self {
        self.queue_order = queue_order;
        self
    }

    // ⊑ ⊤ is already in the status for ontology classes, but the rules keyed on ⊤ must still run
    fn seed(&mut self, class: EntityId) {
        self.status.add_to_s(class, class);
        self.status.add_to_s(class, EntityId::TOP_CLASS);
        self.queue.push_back(XEntry::S(SEntry::new(class, class)));
        if class != EntityId::TOP_CLASS {
            self.queue
                .push_back(XEntry::S(SEntry::new(class, EntityId::TOP_CLASS)));
        }
    }

    /// Processes one pending entry. Returns `true` if there are entries left.
    ///
    /// Fails if a new node can not be allocated.
    pub fn process(&mut self) -> Result<bool, ReasoningError> {
        let entry = match self.queue_order {
            QueueOrder::Fifo => self.queue.pop_front(),
            QueueOrder::Lifo => self.queue.pop_back(),
        };
        let Some(entry) = entry else {
            return Ok(false);
        };
        trace!(%entry, "processing");
        let mut conclusions = std::mem::take(&mut self.conclusions);
        match entry {
            XEntry::S(entry) => self.rules.apply_s(&self.status, entry, &mut conclusions),
            XEntry::R(entry) => self.rules.apply_r(&self.status, entry, &mut conclusions),
        }
        let mut result = Ok(());
        for conclusion in conclusions.drain(..) {
            match conclusion {
                Conclusion::Subsumption(SEntry {
                    sub_class,
                    super_class,
                }) => self.derive_s(sub_class, super_class),
                Conclusion::Link(REntry {
                    property,
                    left_class,
                    right_class,
                }) => self.derive_r(property, left_class, right_class),
                Conclusion::Node(entry) => {
                    if result.is_ok() {
                        result = self.derive_node(entry);
                    }
                }
            }
        }
        self.conclusions = conclusions;
        self.iterations += 1;
        result?;
        Ok(!self.queue.is_empty())
    }

    /// Processes entries until saturation.
    ///
    /// The interrupt handle, the iteration budget and the timeout are checked before each entry.
    /// An aborted run can be resumed by calling this method again.
    pub fn run(&mut self, config: &ReasonerConfig) -> Result<(), ReasoningError> {
        let _span = debug_span!("saturation", queue_order = ?config.queue_order).entered();
        self.queue_order = config.queue_order;
        let start = Instant::now();
        while !self.queue.is_empty() {
            if self.interrupt_handle.is_interrupted() {
                debug!(iterations = self.iterations, "saturation interrupted");
                return Err(ReasoningError::Interrupted);
            }
            if self.iterations >= config.max_iterations {
                return Err(ReasoningError::MaxIterationsExceeded(config.max_iterations));
            }
            if let Some(timeout) = config.timeout {
                if start.elapsed() >= timeout {
                    return Err(ReasoningError::Timeout(timeout));
                }
            }
            self.process()?;
        }
        debug!(
            iterations = self.iterations,
            nodes = self.status.node_count(),
            links = self.status.relations().len(),
            unsatisfiable = self.status.class_graph().equiv_to_bottom().count(),
            "saturation done"
        );
        Ok(())
    }

    fn derive_s(&mut self, sub_class: EntityId, super_class: EntityId) {
        if self.status.add_to_s(sub_class, super_class) {
            self.queue
                .push_back(XEntry::S(SEntry::new(sub_class, super_class)));
        }
    }

    fn derive_r(&mut self, property: EntityId, left_class: EntityId, right_class: EntityId) {
        if self.status.add_to_r(property, left_class, right_class) {
            self.queue.push_back(XEntry::R(REntry::new(
                property,
                left_class,
                right_class,
            )));
        }
    }

    fn derive_node(&mut self, entry: NodeEntry) -> Result<(), InvalidInputError> {
        let NodeEntry {
            node,
            inherits_from,
            subsumers,
            property,
            left_class,
        } = entry;
        let (id, created) = self.status.create_or_get_node_id(node)?;
        if created {
            trace!(%id, "node created");
            self.derive_s(id, id);
            self.derive_s(id, EntityId::TOP_CLASS);
        }
        for source in inherits_from {
            if !self.status.add_derived_node(source, id) {
                continue;
            }
            if self.status.is_unsatisfiable(source) {
                self.derive_s(id, EntityId::BOTTOM_CLASS);
            } else {
                let inherited = self.status.subsumers(source).collect::<Vec<_>>();
                for super_class in inherited {
                    self.derive_s(id, super_class);
                }
            }
        }
        for super_class in subsumers {
            self.derive_s(id, super_class);
        }
        self.derive_r(property, left_class, id);
        Ok(())
    }

    /// Whether there is nothing left to process.
    pub fn is_saturated(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of processed entries.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn status(&self) -> &ClassifierStatus {
        &self.status
    }

    /// Returns the saturated status.
    pub fn into_status(self) -> Result<ClassifierStatus, ReasoningError> {
        if self.is_saturated() {
            Ok(self.status)
        } else {
            Err(ReasoningError::NotSaturated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::node::VNode;
    use crate::entity::EntityType;
    use crate::normalized::{
        FunctionalObjectPropertyAxiom, Gci0Axiom, Gci1Axiom, Gci2Axiom, Gci3Axiom,
        NormalizedAxiom, Ri2Axiom, Ri3Axiom,
    };
    use std::collections::BTreeSet;

    fn saturate(entities: EntityManager, axioms: &[NormalizedAxiom]) -> ClassifierStatus {
        let mut processor =
            Processor::new(Arc::new(ExtendedOntology::from_axioms(axioms)), entities).unwrap();
        while processor.process().unwrap() {}
        processor.into_status().unwrap()
    }

    #[test]
    fn seeding() {
        let mut entities = EntityManager::new();
        let a = entities.create_anonymous_entity(EntityType::Class).unwrap();
        let processor = Processor::new(
            Arc::new(ExtendedOntology::from_axioms(&[NormalizedAxiom::from(
                Gci0Axiom::new(a, EntityId::TOP_CLASS),
            )])),
            entities,
        )
        .unwrap();
        assert!(!processor.is_saturated());
        assert!(processor.status().contains_s(a, a));
        assert!(processor.status().contains_s(EntityId::TOP_CLASS, EntityId::TOP_CLASS));
        assert!(matches!(
            processor.into_status(),
            Err(ReasoningError::NotSaturated)
        ));
    }

    #[test]
    fn conjunction_and_existential() {
        let mut entities = EntityManager::new();
        let [a, b, c, d, e] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        // a ⊑ b, a ⊑ c, b ⊓ c ⊑ d, e ⊑ ∃r.a, ∃r.d ⊑ b
        let status = saturate(
            entities,
            &[
                Gci0Axiom::new(a, b).into(),
                Gci0Axiom::new(a, c).into(),
                Gci1Axiom::new(b, c, d).into(),
                Gci2Axiom::new(e, r, a).into(),
                Gci3Axiom::new(r, d, b).into(),
            ],
        );
        assert!(status.contains_s(a, d));
        assert!(status.contains_s(e, b));
        assert!(status.contains_r(r, e, a));
        assert!(!status.contains_s(e, c));
        assert!(!status.contains_s(b, d));
    }

    #[test]
    fn unsatisfiable_successor() {
        let mut entities = EntityManager::new();
        let [a, b, c] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let r = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        let status = saturate(
            entities,
            &[
                Gci2Axiom::new(a, r, b).into(),
                Gci0Axiom::new(b, EntityId::BOTTOM_CLASS).into(),
                Gci2Axiom::new(c, r, a).into(),
            ],
        );
        assert!(status.is_unsatisfiable(b));
        assert!(status.is_unsatisfiable(a));
        assert!(status.is_unsatisfiable(c));
        assert!(status.contains_s(c, b));
        assert!(!status.is_unsatisfiable(EntityId::TOP_CLASS));
    }

    #[test]
    fn functional_successors_share_subsumers() {
        let mut entities = EntityManager::new();
        let [a, b, c, d] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let f = entities.create_anonymous_entity(EntityType::ObjectProperty).unwrap();
        // a ⊑ ∃f.b, a ⊑ ∃f.c, b ⊓ c ⊑ d, ∃f.d ⊑ d, f functional
        let status = saturate(
            entities,
            &[
                Gci2Axiom::new(a, f, b).into(),
                Gci2Axiom::new(a, f, c).into(),
                Gci1Axiom::new(b, c, d).into(),
                Gci3Axiom::new(f, d, d).into(),
                FunctionalObjectPropertyAxiom::new(f).into(),
            ],
        );
        assert!(status.contains_s(a, d));
        let f_inverse = status.inverse_object_property_of(f).unwrap();
        let merged = VNode::new(EntityId::TOP_CLASS)
            .with_existential(f_inverse, a);
        // both successors are the same node, which has b and c
        let successors = status.second_by_first(f, a).collect::<Vec<_>>();
        assert_eq!(successors.len(), 1);
        assert_eq!(status.node(successors[0]), Some(&merged));
        assert!(status.contains_s(successors[0], b));
        assert!(status.contains_s(successors[0], c));
    }

    #[test]
    fn queue_order_does_not_change_the_saturation() {
        let mut entities = EntityManager::new();
        let classes: [EntityId; 8] =
            std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let [a, b, c, d, e, f, g, h] = classes;
        let [r, s, t, u] = std::array::from_fn(|_| {
            entities
                .create_anonymous_entity(EntityType::ObjectProperty)
                .unwrap()
        });
        let r_inverse = entities
            .create_or_get_inverse_object_property_of(r)
            .unwrap();
        let axioms: Vec<NormalizedAxiom> = vec![
            // a ⊑ ∃r.b, b ⊑ c, ∃r.c ⊑ d
            Gci2Axiom::new(a, r, b).into(),
            Gci0Axiom::new(b, c).into(),
            Gci3Axiom::new(r, c, d).into(),
            // ∃r⁻.a ⊑ e refines the successor of a
            Gci3Axiom::new(r_inverse, a, e).into(),
            // r ⊑ t, t transitive, b ⊑ ∃t.f, ∃t.f ⊑ g, ∃⊤ₚ.g ⊑ e
            Ri2Axiom::new(r, t).into(),
            Ri3Axiom::new(t, t, t).into(),
            Gci2Axiom::new(b, t, f).into(),
            Gci3Axiom::new(t, f, g).into(),
            Gci3Axiom::new(EntityId::TOP_OBJECT_PROPERTY, g, e).into(),
            // s functional, d ⊑ ∃s.e, d ⊑ ∃s.f, e ⊓ f ⊑ h, ∃s.h ⊑ h
            FunctionalObjectPropertyAxiom::new(s).into(),
            Gci2Axiom::new(d, s, e).into(),
            Gci2Axiom::new(d, s, f).into(),
            Gci1Axiom::new(e, f, h).into(),
            Gci3Axiom::new(s, h, h).into(),
            // u ∘ r ⊑ t, h ⊑ ∃u.a
            Ri3Axiom::new(u, r, t).into(),
            Gci2Axiom::new(h, u, a).into(),
        ];
        let saturate_in = |queue_order: QueueOrder| {
            let ontology = Arc::new(ExtendedOntology::from_axioms(&axioms));
            let mut processor = Processor::new(ontology, entities.clone())
                .unwrap()
                .with_queue_order(queue_order);
            while processor.process().unwrap() {}
            processor.into_status().unwrap()
        };
        let fifo = saturate_in(QueueOrder::Fifo);
        let lifo = saturate_in(QueueOrder::Lifo);

        // fresh nodes are numbered in processing order, only named classes are compared
        let named = [EntityId::BOTTOM_CLASS, EntityId::TOP_CLASS]
            .into_iter()
            .chain(classes)
            .collect::<BTreeSet<_>>();
        let subsumers = |status: &ClassifierStatus, x: EntityId| {
            status
                .subsumers(x)
                .filter(|c| named.contains(c))
                .collect::<BTreeSet<_>>()
        };
        let successors = |status: &ClassifierStatus, p: EntityId, x: EntityId| {
            status
                .second_by_first(p, x)
                .filter(|y| named.contains(y))
                .collect::<BTreeSet<_>>()
        };
        let properties = [
            EntityId::BOTTOM_OBJECT_PROPERTY,
            EntityId::TOP_OBJECT_PROPERTY,
            r,
            r_inverse,
            s,
            t,
            u,
        ];
        for &x in &named {
            assert_eq!(subsumers(&fifo, x), subsumers(&lifo, x), "subsumers of {x}");
            for p in properties {
                assert_eq!(
                    successors(&fifo, p, x),
                    successors(&lifo, p, x),
                    "{p}-successors of {x}"
                );
            }
        }
        assert!(fifo.contains_s(a, d));
        assert!(fifo.contains_s(a, e));
        assert!(fifo.contains_s(d, h));
        assert!(fifo.contains_r(t, h, b));
    }

    #[test]
    fn run_respects_budget() {
        let mut entities = EntityManager::new();
        let [a, b] = std::array::from_fn(|_| entities.create_anonymous_entity(EntityType::Class).unwrap());
        let ontology = ExtendedOntology::from_axioms(&[NormalizedAxiom::from(Gci0Axiom::new(a, b))]);
        let mut processor = Processor::new(Arc::new(ontology), entities).unwrap();
        let config = ReasonerConfig {
            max_iterations: 1,
            ..ReasonerConfig::default()
        };
        assert!(matches!(
            processor.run(&config),
            Err(ReasoningError::MaxIterationsExceeded(1))
        ));
        assert_eq!(processor.iterations(), 1);
        processor.run(&ReasonerConfig::default()).unwrap();
        assert!(processor.into_status().unwrap().contains_s(a, b));
    }

    #[test]
    fn run_can_be_interrupted() {
        let mut entities = EntityManager::new();
        let a = entities.create_anonymous_entity(EntityType::Class).unwrap();
        let ontology = ExtendedOntology::from_axioms(&[NormalizedAxiom::from(Gci0Axiom::new(
            a,
            EntityId::TOP_CLASS,
        ))]);
        let handle = InterruptHandle::new();
        let mut processor =
            Processor::new(Arc::new(ontology), entities)
                .unwrap()
                .with_interrupt_handle(handle.clone());
        handle.interrupt();
        assert!(matches!(
            processor.run(&ReasonerConfig::default()),
            Err(ReasoningError::Interrupted)
        ));
        assert_eq!(processor.iterations(), 0);
    }
}
