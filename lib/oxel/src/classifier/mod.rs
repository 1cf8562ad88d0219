//! Saturation of an [`ExtendedOntology`](crate::ExtendedOntology) with the completion rules.

mod entry;
mod node;
mod processor;
mod rules;
mod status;

pub use crate::classifier::entry::{Conclusion, NodeEntry, REntry, SEntry, XEntry};
pub use crate::classifier::node::{NodeRegistry, VNode};
pub use crate::classifier::processor::{Processor, QueueOrder};
pub use crate::classifier::rules::{CompletionRule, RuleChain, Trigger};
pub use crate::classifier::status::ClassifierStatus;
