//! Aborted classifications: iteration budget, timeout and interruption.

#![cfg(test)]

use oxel::{
    ClassExpression, ComplexAxiom, ElReasoner, EntityType, OwlError, Reasoner, ReasonerConfig, ReasoningError,
};
use std::thread;
use std::time::Duration;

const CHAIN_LENGTH: usize = 200;

/// C0 ⊑ ∃r.C1, C1 ⊑ ∃r.C2, ... with r transitive.
fn chain(config: ReasonerConfig) -> ElReasoner {
    let mut reasoner = ElReasoner::with_config(config);
    let r = reasoner
        .declare_object_property("http://example.com/r")
        .unwrap();
    let classes = (0..CHAIN_LENGTH)
        .map(|i| {
            reasoner
                .declare_class(&format!("http://example.com/C{i}"))
                .unwrap()
        })
        .collect::<Vec<_>>();
    reasoner
        .add_axiom(ComplexAxiom::TransitiveObjectProperty(r.into()))
        .unwrap();
    for pair in classes.windows(2) {
        reasoner
            .add_axiom(ComplexAxiom::sub_class_of(
                pair[0],
                ClassExpression::some_values_from(r, pair[1].into()),
            ))
            .unwrap();
    }
    reasoner
        .add_axiom(ComplexAxiom::sub_class_of(
            ClassExpression::some_values_from(r, classes[CHAIN_LENGTH - 1].into()),
            classes[0],
        ))
        .unwrap();
    reasoner
}

#[test]
fn test_max_iterations() {
    let mut reasoner = chain(ReasonerConfig {
        max_iterations: 100,
        ..ReasonerConfig::default()
    });
    assert!(matches!(
        reasoner.classify(),
        Err(OwlError::Reasoning(ReasoningError::MaxIterationsExceeded(100)))
    ));
    assert!(!reasoner.is_classified());
    assert!(matches!(
        reasoner.is_consistent(),
        Err(OwlError::Reasoning(ReasoningError::NotClassified))
    ));
}

#[test]
fn test_timeout() {
    let mut reasoner = chain(ReasonerConfig {
        timeout: Some(Duration::ZERO),
        ..ReasonerConfig::default()
    });
    assert!(matches!(
        reasoner.classify(),
        Err(OwlError::Reasoning(ReasoningError::Timeout(_)))
    ));
}

#[test]
fn test_interrupt_from_another_thread() {
    let mut reasoner = chain(ReasonerConfig::default());
    let handle = reasoner.interrupt_handle();
    thread::spawn(move || handle.interrupt()).join().unwrap();
    assert!(matches!(
        reasoner.classify(),
        Err(OwlError::Reasoning(ReasoningError::Interrupted))
    ));
    reasoner.interrupt_handle().reset();
    reasoner.classify().unwrap();
    assert!(reasoner.is_consistent().unwrap());
}

#[test]
fn test_complete_chain() {
    let mut reasoner = chain(ReasonerConfig::default());
    reasoner.classify().unwrap();
    let first = reasoner
        .entity(EntityType::Class, "http://example.com/C0")
        .unwrap();
    let middle = reasoner
        .entity(EntityType::Class, "http://example.com/C100")
        .unwrap();
    // every class but the last reaches the last one, so it is below C0
    assert!(
        reasoner
            .get_super_classes(middle, false)
            .unwrap()
            .contains(&first)
    );
    assert_eq!(
        reasoner.get_sub_classes(first, false).unwrap().len(),
        // C1 to C(n-2) and owl:Nothing
        CHAIN_LENGTH - 1
    );
}
