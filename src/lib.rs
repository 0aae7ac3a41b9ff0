//! cytoscreen-classifiers: classical machine-learning models for cell-image screening.
//!
//! This crate provides a small batch pipeline that loads a two-class image
//! dataset into a flat pixel-feature matrix, partitions it deterministically,
//! trains several off-the-shelf classifier families behind a shared
//! fit/predict contract, and compares them with ROC/AUC metrics, textual
//! classification reports, and a comparative ROC chart.
//!
//! The design favors small, testable modules: model wrappers live next to
//! each other under `models`, metric ports under `evaluation`, and the
//! reporting/plotting helpers used by the demo under `report`.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod report;
