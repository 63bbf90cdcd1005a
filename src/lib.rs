#![deny(missing_docs)]
//! A library to convert (stochastic) optimization instances between
//! the .mpl, .mps and .lp file formats.
//!
//! Parsing, solving and writing models is left to a modeling engine behind
//! the [engine::ModelingEngine] trait. This crate translates .lp text into
//! MPL, splits stochastic .mps files into SMPS files, fixes the binary
//! declarations of written .lp files and manages the external data files of
//! MPL models.

pub mod converter;
pub mod engine;
pub mod error;
pub mod ext_data;
pub mod ext_model;
pub mod format;
pub mod lp_format;
pub mod model;
pub mod options;
pub mod smps;
pub mod translate;
pub mod util;

pub use converter::Converter;
pub use error::{ConvertError, Result};
pub use format::Format;
pub use options::Options;
