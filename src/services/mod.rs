//! Service layer module
//!
//! Core business logic: diagnostics façade, output parsing, classifier

pub mod classifier;
pub mod diagnostics;
pub mod parser;

pub use classifier::AnomalyClassifier;
pub use diagnostics::DiagnosticsService;
