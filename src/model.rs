//! A model read from one instance file, and its export to other formats
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::engine::{binary_variables, ModelingEngine};
use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::lp_format::patch_binaries;
use crate::options::Options;
use crate::smps;
use crate::translate::translate;
use crate::util::{file_stem, with_extension_appended};

/// Whether a model has read its file. A model reads exactly one file;
/// use [Model::reload] to read it again.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// nothing read yet
    Unloaded,
    /// read from `path`
    Loaded {
        /// the instance file
        path: PathBuf,
        /// its format
        format: Format,
    },
}

/// An optimization model held by a modeling engine
#[derive(Debug)]
pub struct Model<E> {
    engine: E,
    options: Options,
    state: LoadState,
    stochastic: Option<bool>,
}

impl<E: ModelingEngine> Model<E> {
    /// A model that has not read any file
    pub fn new(engine: E, options: Options) -> Model<E> {
        Model {
            engine,
            options,
            state: LoadState::Unloaded,
            stochastic: None,
        }
    }

    /// Create a model and read `path`
    pub fn open(path: &Path, engine: E, options: Options) -> Result<Model<E>> {
        let mut model = Model::new(engine, options);
        model.read_file(path)?;
        Ok(model)
    }

    /// Read the same file again into a fresh model, e.g. after its external
    /// data files were updated
    pub fn reload(self) -> Result<Model<E>> {
        match self.state {
            LoadState::Loaded { path, .. } => {
                debug!(path = %path.display(), "reloading model");
                Model::open(&path, self.engine, self.options)
            }
            LoadState::Unloaded => Err(ConvertError::NotLoaded),
        }
    }

    /// Read an instance file. Fails if this model already read one.
    ///
    /// .lp files are translated to MPL and handed to the engine as text,
    /// .mpl and .mps files are read by the engine. Stochastic .mps files are
    /// only recorded: the engine cannot read them, they are split on export.
    pub fn read_file(&mut self, path: &Path) -> Result<()> {
        if let LoadState::Loaded { path: loaded, .. } = &self.state {
            return Err(ConvertError::ReadOnlyOnce(loaded.clone()));
        }
        let format = Format::input_of(path)?;
        if !path.is_file() {
            return Err(ConvertError::NotFound(path.to_path_buf()));
        }

        match format {
            Format::Lp => {
                let text = fs::read_to_string(path)?;
                let mpl = translate(format, &text)?;
                if self.options.debug() {
                    let stem = file_stem(path)?;
                    let artifact = self
                        .options
                        .output_dir_for(path)
                        .join(format!("{}_translated.mpl", stem));
                    fs::write(&artifact, &mpl)?;
                    debug!(path = %artifact.display(), "translated model kept");
                }
                self.engine.parse_text(&mpl).map_err(ConvertError::Engine)?;
            }
            Format::Mps => {
                let stochastic = smps::is_stochastic(&fs::read_to_string(path)?);
                self.stochastic = Some(stochastic);
                if !stochastic {
                    self.engine.read_model(path).map_err(ConvertError::Engine)?;
                }
            }
            Format::Mpl => self.engine.read_model(path).map_err(ConvertError::Engine)?,
        }

        debug!(path = %path.display(), %format, "model read");
        self.state = LoadState::Loaded {
            path: path.to_path_buf(),
            format,
        };
        Ok(())
    }

    /// Load state
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The instance file, once read
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            LoadState::Loaded { path, .. } => Some(path),
            LoadState::Unloaded => None,
        }
    }

    /// Format of the instance file, once read
    pub fn format(&self) -> Option<Format> {
        match &self.state {
            LoadState::Loaded { format, .. } => Some(*format),
            LoadState::Unloaded => None,
        }
    }

    /// The engine holding the model
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Settings in use
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn loaded(&self) -> Result<(PathBuf, Format)> {
        match &self.state {
            LoadState::Loaded { path, format } => Ok((path.clone(), *format)),
            LoadState::Unloaded => Err(ConvertError::NotLoaded),
        }
    }

    /// Whether the model is stochastic. Models not read from .mps are written
    /// to a temporary .mps file by the engine to find out.
    pub fn is_stochastic(&mut self) -> Result<bool> {
        if let Some(stochastic) = self.stochastic {
            return Ok(stochastic);
        }
        let (path, _) = self.loaded()?;
        let temp = self.engine_temp_mps(&path)?;
        let stochastic = smps::is_stochastic(&fs::read_to_string(temp.path())?);
        self.stochastic = Some(stochastic);
        Ok(stochastic)
    }

    fn engine_temp_mps(&mut self, source: &Path) -> Result<NamedTempFile> {
        let temp = tempfile::Builder::new()
            .prefix(file_stem(source)?)
            .suffix(".mps")
            .tempfile_in(self.options.output_dir_for(source))?;
        self.engine
            .write_file(temp.path(), Format::Mps)
            .map_err(ConvertError::Engine)?;
        Ok(temp)
    }

    /// Write the model as `<name>.<format>` into the output directory.
    /// `name` defaults to the stem of the instance file.
    ///
    /// Stochastic models can only be written as .mps, which produces the
    /// SMPS files `<name>.cor`, `<name>.tim` and `<name>.sto`. Returns the
    /// written files.
    pub fn save(&mut self, format: Format, name: Option<&str>) -> Result<Vec<PathBuf>> {
        let (source, source_format) = self.loaded()?;
        let name = match name {
            Some(name) => name.to_string(),
            None => file_stem(&source)?.to_string(),
        };
        let target = self.options.output_dir_for(&source).join(&name);
        if format != Format::Mps && self.is_stochastic()? {
            return Err(ConvertError::StochasticExport(format));
        }

        let written = match format {
            Format::Mps if source_format == Format::Mps && self.stochastic == Some(true) => {
                let sections = smps::split(&fs::read_to_string(&source)?, &self.options)?;
                sections.write(&target)?
            }
            Format::Mps => {
                let temp = self.engine_temp_mps(&source)?;
                let stochastic = smps::is_stochastic(&fs::read_to_string(temp.path())?);
                self.stochastic = Some(stochastic);
                if stochastic {
                    let (_, combined) = temp.keep().map_err(|e| e.error)?;
                    smps::split_file(&combined, &target, &self.options).map_err(|e| {
                        let _ = fs::remove_file(&combined);
                        e
                    })?
                } else {
                    let path = with_extension_appended(&target, format.extension());
                    temp.persist(&path).map_err(|e| e.error)?;
                    vec![path]
                }
            }
            Format::Lp => {
                let path = with_extension_appended(&target, format.extension());
                self.engine
                    .write_file(&path, format)
                    .map_err(ConvertError::Engine)?;
                let binaries = binary_variables(&self.engine);
                if !binaries.is_empty() {
                    let patched = patch_binaries(&fs::read_to_string(&path)?, binaries.as_slice());
                    fs::write(&path, patched)?;
                    debug!(count = binaries.len(), "binary variables declared");
                }
                vec![path]
            }
            Format::Mpl => {
                let path = with_extension_appended(&target, format.extension());
                self.engine
                    .write_file(&path, format)
                    .map_err(ConvertError::Engine)?;
                vec![path]
            }
        };
        info!(source = %source.display(), %format, files = written.len(), "model saved");
        Ok(written)
    }

    /// Solve the model and return the objective value
    pub fn solve(&mut self) -> Result<f64> {
        self.loaded()?;
        self.engine.solve().map_err(ConvertError::Engine)
    }
}
