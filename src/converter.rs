//! Single entry point turning one instance file into another format
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::engine::ModelingEngine;
use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::model::Model;
use crate::options::Options;

/// Converts instance files with the help of a modeling engine
#[derive(Debug, Clone, Default)]
pub struct Converter<E> {
    engine: E,
    options: Options,
}

impl<E: ModelingEngine> Converter<E> {
    /// A converter with default [Options]
    pub fn new(engine: E) -> Converter<E> {
        Converter {
            engine,
            options: Options::default(),
        }
    }

    /// Use other settings
    pub fn with_options(self, options: Options) -> Converter<E> {
        Converter { options, ..self }
    }

    /// The engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Convert `source` into the format named `target` (an extension such as
    /// `"lp"`). The output is called `name`, or after the source stem.
    ///
    /// Checks, in order: the input format, that the source exists, the output
    /// format. Returns the written files.
    pub fn convert(
        &mut self,
        source: &Path,
        target: &str,
        name: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        Format::input_of(source)?;
        if !source.is_file() {
            return Err(ConvertError::NotFound(source.to_path_buf()));
        }
        let format = Format::output(target)?;

        let mut model = Model::open(source, &mut self.engine, self.options.clone())?;
        let written = model.save(format, name)?;
        info!(source = %source.display(), %format, "file converted");
        Ok(written)
    }

    /// Convert several files, going on after failures
    pub fn convert_all<'p, I>(&mut self, sources: I, target: &str) -> Vec<(PathBuf, Result<Vec<PathBuf>>)>
    where
        I: IntoIterator<Item = &'p Path>,
    {
        sources
            .into_iter()
            .map(|source| {
                let result = self.convert(source, target, None);
                if let Err(e) = &result {
                    warn!(source = %source.display(), error = %e, "conversion failed");
                }
                (source.to_path_buf(), result)
            })
            .collect()
    }
}
