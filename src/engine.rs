//! This module provides the interface to the modeling engine.
//!
//! The engine is the program that actually parses MPL and MPS models, solves
//! them and writes them in its supported formats. This crate never does any
//! of that itself: it only prepares the text the engine reads and fixes up
//! the files the engine writes. Any backend implementing [ModelingEngine]
//! can be plugged into a [crate::model::Model].

use std::path::Path;

use crate::format::Format;

/// A plain (non-indexed) variable of the loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    /// name as written to output files
    pub name: String,
    /// whether the variable only takes values 0 and 1
    pub is_binary: bool,
}

/// An indexed variable of the loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct VariableVector {
    /// vector name
    pub name: String,
    /// whether every element only takes values 0 and 1
    pub is_binary: bool,
    /// names of the elements as written to output files
    pub elements: Vec<String>,
}

/// Storage of a data vector in the model
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum VectorStorage {
    /// storage not known to the engine
    Unknown,
    /// every element enumerated
    Dense,
    /// only non-default elements listed
    Sparse,
    /// random data
    Random,
    /// probabilities
    Probability,
}

/// A datum declared by the loaded model
#[derive(Debug, Clone, PartialEq)]
pub enum DataDeclaration {
    /// a scalar data constant
    Constant(String),
    /// a string datum
    String(String),
    /// a data vector
    Vector {
        /// vector name
        name: String,
        /// how its values are stored
        storage: VectorStorage,
    },
    /// an index set
    IndexSet(String),
}

/// The modeling engine collaborator. Every method reports failures as the
/// engine's own message.
pub trait ModelingEngine {
    /// Parse a model file the engine can read natively (.mpl or .mps)
    fn read_model(&mut self, path: &Path) -> Result<(), String>;
    /// Parse MPL text held in memory
    fn parse_text(&mut self, text: &str) -> Result<(), String>;
    /// Write the loaded model to `path` in `format`
    fn write_file(&mut self, path: &Path, format: Format) -> Result<(), String>;
    /// Solve the loaded model and return the objective value
    fn solve(&mut self) -> Result<f64, String>;
    /// Plain variables of the loaded model
    fn variables(&self) -> Vec<VariableInfo>;
    /// Variable vectors of the loaded model
    fn variable_vectors(&self) -> Vec<VariableVector>;
    /// Data declared by the loaded model
    fn data_declarations(&self) -> Vec<DataDeclaration>;
}

impl<'a, E: ModelingEngine> ModelingEngine for &'a mut E {
    fn read_model(&mut self, path: &Path) -> Result<(), String> {
        (**self).read_model(path)
    }

    fn parse_text(&mut self, text: &str) -> Result<(), String> {
        (**self).parse_text(text)
    }

    fn write_file(&mut self, path: &Path, format: Format) -> Result<(), String> {
        (**self).write_file(path, format)
    }

    fn solve(&mut self) -> Result<f64, String> {
        (**self).solve()
    }

    fn variables(&self) -> Vec<VariableInfo> {
        (**self).variables()
    }

    fn variable_vectors(&self) -> Vec<VariableVector> {
        (**self).variable_vectors()
    }

    fn data_declarations(&self) -> Vec<DataDeclaration> {
        (**self).data_declarations()
    }
}

/// Names of every binary variable of the loaded model, plain variables
/// first, then the elements of binary vectors
pub fn binary_variables<E: ModelingEngine + ?Sized>(engine: &E) -> Vec<String> {
    let plain = engine
        .variables()
        .into_iter()
        .filter(|v| v.is_binary)
        .map(|v| v.name);
    let indexed = engine
        .variable_vectors()
        .into_iter()
        .filter(|v| v.is_binary)
        .flat_map(|v| v.elements);
    plain.chain(indexed).collect()
}

/// An engine that is never available. Every operation fails.
#[derive(Debug, Clone, Default)]
pub struct NoEngine;

const NO_ENGINE: &str = "No modeling engine available";

impl ModelingEngine for NoEngine {
    fn read_model(&mut self, _path: &Path) -> Result<(), String> {
        Err(NO_ENGINE.to_string())
    }

    fn parse_text(&mut self, _text: &str) -> Result<(), String> {
        Err(NO_ENGINE.to_string())
    }

    fn write_file(&mut self, _path: &Path, _format: Format) -> Result<(), String> {
        Err(NO_ENGINE.to_string())
    }

    fn solve(&mut self) -> Result<f64, String> {
        Err(NO_ENGINE.to_string())
    }

    fn variables(&self) -> Vec<VariableInfo> {
        vec![]
    }

    fn variable_vectors(&self) -> Vec<VariableVector> {
        vec![]
    }

    fn data_declarations(&self) -> Vec<DataDeclaration> {
        vec![]
    }
}
