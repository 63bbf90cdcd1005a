//! MPL models whose data live in external `.dat` files
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::engine::ModelingEngine;
use crate::error::{ConvertError, Result};
use crate::ext_data::{file_prefix, DataStore, DataValue};
use crate::format::Format;
use crate::model::Model;
use crate::options::Options;
use crate::util::{file_stem, with_extension_appended};

/// An MPL model together with its external data
#[derive(Debug)]
pub struct ExtDataModel<E> {
    model: Model<E>,
    data: DataStore,
}

impl<E: ModelingEngine> ExtDataModel<E> {
    /// Read an .mpl file and the data files it uses
    pub fn open(path: &Path, engine: E, options: Options) -> Result<ExtDataModel<E>> {
        let format = Format::input_of(path)?;
        if format != Format::Mpl {
            return Err(ConvertError::UnsupportedInputFormat(format!(
                "{} (external data needs an .mpl model)",
                format
            )));
        }
        let model = Model::open(path, engine, options)?;
        let data = DataStore::discover(path, &model.engine().data_declarations())?;
        Ok(ExtDataModel { model, data })
    }

    /// The model
    pub fn model(&self) -> &Model<E> {
        &self.model
    }

    /// The model, mutably, e.g. to solve it
    pub fn model_mut(&mut self) -> &mut Model<E> {
        &mut self.model
    }

    /// The external data currently loaded
    pub fn data(&self) -> &DataStore {
        &self.data
    }

    /// Update data items, write them to their data files, then reload the
    /// model so that it uses the new values. Nothing is written if a name is
    /// unknown or a value does not fit its item.
    pub fn set_ext_data<I, S>(mut self, updates: I) -> Result<ExtDataModel<E>>
    where
        I: IntoIterator<Item = (S, DataValue)>,
        S: AsRef<str>,
    {
        let updates: Vec<(S, DataValue)> = updates.into_iter().collect();
        for (name, value) in &updates {
            let name = name.as_ref();
            self.data
                .get(name)
                .ok_or_else(|| ConvertError::UnknownDataItem(name.to_string()))?
                .check(value)?;
        }
        for (name, value) in updates {
            self.data.set(name.as_ref(), value)?;
        }
        let model = self.model.reload()?;
        let path = model.path().ok_or(ConvertError::NotLoaded)?.to_path_buf();
        let data = DataStore::discover(&path, &model.engine().data_declarations())?;
        debug!(items = data.len(), "external data reloaded");
        Ok(ExtDataModel { model, data })
    }

    /// Write the model as `<name>.<format>`.
    ///
    /// As .mpl, the model text is copied with every reference to the old
    /// file stem renamed, and every data file is written under the new name.
    /// Other formats are written by the engine.
    pub fn export(&mut self, format: Format, name: Option<&str>) -> Result<Vec<PathBuf>> {
        if format != Format::Mpl {
            return self.model.save(format, name);
        }
        let source = self.model.path().ok_or(ConvertError::NotLoaded)?.to_path_buf();
        let stem = file_stem(&source)?;
        let name = name.unwrap_or(stem);
        let dir = self.model.options().output_dir_for(&source).to_path_buf();

        let target = with_extension_appended(&dir.join(name), format.extension());
        let text = fs::read_to_string(&source)?.replace(stem, name);
        fs::write(&target, text)?;

        let mut written = vec![target.clone()];
        written.extend(self.data.export_all(&file_prefix(&target, name))?);
        info!(source = %source.display(), files = written.len(), "model exported with external data");
        Ok(written)
    }
}
