//! External data files of an MPL model.
//!
//! An MPL model `model.mpl` may read its data from companion files in the
//! same directory:
//!
//! * `model_ScalarData.dat` holds scalar constants, each as a `!<name>` line
//!   followed by one value line;
//! * `model_<name>.dat` holds one sparse vector or index set: a `!<name>`
//!   line, a `!<key>,<key>,...` line, then one comma-separated row per record.
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::{DataDeclaration, VectorStorage};
use crate::error::{ConvertError, Result};
use crate::util::file_stem;

/// File name part identifying the scalar data file
pub const SCALAR_DATA_SUFFIX: &str = "ScalarData";

const MARKER: char = '!';

/// Name carried by a `!<name>` marker line. Indented lines are not markers.
fn marker_name(line: &str) -> Option<&str> {
    line.trim_end().strip_prefix(MARKER)
}

/// Data files are comma-separated and line-oriented
fn check_cell(context: &str, cell: &str) -> Result<()> {
    if cell.contains(|c: char| c == ',' || c == '\n' || c == '\r') {
        return Err(ConvertError::malformed(
            context,
            format!("`{}` cannot be stored in a data file", cell.escape_default()),
        ));
    }
    Ok(())
}

/// Shape of an external datum
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DataKind {
    /// one value in the shared scalar file
    Scalar,
    /// a sparse data vector in its own file
    VectorSparse,
    /// an index set in its own file
    IndexSparse,
}

impl DataKind {
    fn is_table(self) -> bool {
        !matches!(self, DataKind::Scalar)
    }
}

/// Rows sharing one ordering of column keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    keys: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// An empty table with the given column keys
    pub fn new<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Table {
        Table {
            keys: keys.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. It must have one cell per key, and no cell may hold a
    /// comma or a line break.
    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) -> Result<()> {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        for cell in &row {
            check_cell("table row", cell)?;
        }
        if row.len() != self.keys.len() {
            return Err(ConvertError::malformed(
                "table row",
                format!(
                    "{} values given for {} keys ({})",
                    row.len(),
                    self.keys.len(),
                    self.keys.join(",")
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column keys, in file order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Rows, in file order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell of `row` under `key`
    pub fn get(&self, row: usize, key: &str) -> Option<&str> {
        let col = self.keys.iter().position(|k| k == key)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// One row as `(key, value)` pairs
    pub fn record(&self, row: usize) -> Option<Vec<(&str, &str)>> {
        let cells = self.rows.get(row)?;
        Some(
            self.keys
                .iter()
                .map(String::as_str)
                .zip(cells.iter().map(String::as_str))
                .collect(),
        )
    }

    fn parse(name: &str, text: &str, context: &str) -> Result<Table> {
        let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));
        let expected = format!("first two lines should be `{}{}` and the keys", MARKER, name);
        let first = lines.next().unwrap_or_default();
        let second = lines.next().unwrap_or_default();
        match (marker_name(first), marker_name(second)) {
            (Some(found), Some(keys)) if found == name => {
                let mut table = Table::new(keys.split(','));
                for (idx, line) in lines.enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                    let row: Vec<&str> = line.split(',').collect();
                    if row.len() != table.keys.len() {
                        return Err(ConvertError::malformed(
                            context,
                            format!("line {} has {} values for {} keys", idx + 3, row.len(), table.keys.len()),
                        ));
                    }
                    table.push_row(row)?;
                }
                Ok(table)
            }
            _ => Err(ConvertError::malformed(context, expected)),
        }
    }

    fn render(&self, name: &str) -> String {
        let mut text = format!("{m}{}\n{m}{}\n", name, self.keys.join(","), m = MARKER);
        let rows: Vec<String> = self.rows.iter().map(|r| r.join(",")).collect();
        text.push_str(&rows.join("\n"));
        text
    }
}

/// Value of an external datum
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// a scalar constant, kept as written
    Scalar(String),
    /// records of a vector or index set
    Table(Table),
}

fn data_file(prefix: &Path, kind: DataKind, name: &str) -> PathBuf {
    let mut file = OsString::from(prefix.as_os_str());
    match kind {
        DataKind::Scalar => file.push(SCALAR_DATA_SUFFIX),
        DataKind::VectorSparse | DataKind::IndexSparse => file.push(name),
    }
    file.push(".dat");
    PathBuf::from(file)
}

fn marker_position(lines: &[&str], name: &str) -> Option<usize> {
    lines
        .iter()
        .position(|l| marker_name(l) == Some(name))
}

/// One datum read from its data file
#[derive(Debug, Clone)]
pub struct DataItem {
    name: String,
    kind: DataKind,
    prefix: PathBuf,
    value: DataValue,
}

impl DataItem {
    /// Read datum `name` from the data file of `kind` under `prefix`
    /// (the model's directory and stem followed by `_`).
    pub fn load(name: &str, kind: DataKind, prefix: &Path) -> Result<DataItem> {
        let path = data_file(prefix, kind, name);
        let text = fs::read_to_string(&path)?;
        let context = path.display().to_string();
        let value = if kind.is_table() {
            DataValue::Table(Table::parse(name, &text, &context)?)
        } else {
            let lines: Vec<&str> = text.lines().collect();
            let value = marker_position(&lines, name)
                .and_then(|idx| lines.get(idx + 1))
                .ok_or_else(|| {
                    ConvertError::malformed(&context, format!("no value for `{}{}`", MARKER, name))
                })?;
            DataValue::Scalar(value.trim().to_string())
        };
        debug!(item = name, file = %context, "external data loaded");
        Ok(DataItem {
            name: name.to_string(),
            kind,
            prefix: prefix.to_path_buf(),
            value,
        })
    }

    /// Datum name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Datum kind
    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Current value
    pub fn value(&self) -> &DataValue {
        &self.value
    }

    /// File the datum is read from
    pub fn path(&self) -> PathBuf {
        data_file(&self.prefix, self.kind, &self.name)
    }

    /// Whether `value` can replace the current value: same kind, and
    /// writable to a data file so that it reads back unchanged.
    pub fn check(&self, value: &DataValue) -> Result<()> {
        match (value, self.kind.is_table()) {
            (DataValue::Scalar(scalar), false) => {
                if scalar.contains(|c: char| c == '\n' || c == '\r') {
                    return Err(ConvertError::malformed(
                        self.name.as_str(),
                        "a scalar value must fit on one line",
                    ));
                }
                Ok(())
            }
            (DataValue::Table(table), true) => table
                .keys()
                .iter()
                .try_for_each(|key| check_cell(&self.name, key)),
            _ => Err(ConvertError::DataKindMismatch(self.name.clone())),
        }
    }

    /// Replace the value and write it to the data file right away.
    /// The model using the datum has to be reloaded to see the change.
    pub fn set(&mut self, value: DataValue) -> Result<()> {
        self.check(&value)?;
        self.value = value;
        let prefix = self.prefix.clone();
        self.export(&prefix)?;
        Ok(())
    }

    /// Write the datum under another file prefix.
    ///
    /// A scalar only replaces its value line; every other line of the scalar
    /// file is copied as is. A table rewrites its whole file.
    pub fn export(&self, prefix: &Path) -> Result<PathBuf> {
        let target = data_file(prefix, self.kind, &self.name);
        let text = match &self.value {
            DataValue::Table(table) => table.render(&self.name),
            DataValue::Scalar(value) => {
                let source = self.path();
                let current = fs::read_to_string(&source)?;
                let mut lines: Vec<&str> = current.lines().collect();
                let idx = marker_position(&lines, &self.name).ok_or_else(|| {
                    ConvertError::malformed(
                        source.display().to_string(),
                        format!("marker `{}{}` disappeared", MARKER, self.name),
                    )
                })?;
                if idx + 1 < lines.len() {
                    lines[idx + 1] = value.as_str();
                } else {
                    lines.push(value.as_str());
                }
                let mut text = lines.join("\n");
                if current.ends_with('\n') {
                    text.push('\n');
                }
                text
            }
        };
        fs::write(&target, text)?;
        debug!(item = %self.name, file = %target.display(), "external data written");
        Ok(target)
    }
}

/// Every external datum of one MPL model
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    items: BTreeMap<String, DataItem>,
}

/// `<dir>/<stem>_` for a model file
pub fn file_prefix(model: &Path, stem: &str) -> PathBuf {
    let dir = model.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}_", stem))
}

impl DataStore {
    /// Find and load the data files of the model at `model`.
    ///
    /// Scalars are tracked only when the model declares them and the scalar
    /// file has their marker. Vectors and index sets are tracked when their
    /// own file exists.
    pub fn discover(model: &Path, declarations: &[DataDeclaration]) -> Result<DataStore> {
        let prefix = file_prefix(model, file_stem(model)?);
        let scalar_file = data_file(&prefix, DataKind::Scalar, "");
        let in_scalar_file: HashSet<String> = if scalar_file.is_file() {
            fs::read_to_string(&scalar_file)?
                .lines()
                .filter_map(|l| marker_name(l).map(str::to_string))
                .collect()
        } else {
            HashSet::new()
        };

        let mut store = DataStore::default();
        for declaration in declarations {
            let (name, kind) = match declaration {
                DataDeclaration::Constant(name) => {
                    if !in_scalar_file.contains(name) {
                        continue;
                    }
                    (name, DataKind::Scalar)
                }
                DataDeclaration::String(name) => {
                    let own_file = data_file(&prefix, DataKind::VectorSparse, name);
                    if in_scalar_file.contains(name) || own_file.is_file() {
                        return Err(ConvertError::StringData(name.clone()));
                    }
                    continue;
                }
                DataDeclaration::Vector { name, storage } => {
                    let path = data_file(&prefix, DataKind::VectorSparse, name);
                    if !path.is_file() {
                        continue;
                    }
                    if *storage == VectorStorage::Dense {
                        return Err(ConvertError::DenseData(path.display().to_string()));
                    }
                    (name, DataKind::VectorSparse)
                }
                DataDeclaration::IndexSet(name) => {
                    if !data_file(&prefix, DataKind::IndexSparse, name).is_file() {
                        continue;
                    }
                    (name, DataKind::IndexSparse)
                }
            };
            store
                .items
                .insert(name.clone(), DataItem::load(name, kind, &prefix)?);
        }
        debug!(model = %model.display(), items = store.items.len(), "external data discovered");
        Ok(store)
    }

    /// Datum called `name`
    pub fn get(&self, name: &str) -> Option<&DataItem> {
        self.items.get(name)
    }

    /// Names of the tracked data, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Number of tracked data
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no datum is tracked
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Set one datum and persist it
    pub fn set(&mut self, name: &str, value: DataValue) -> Result<()> {
        self.items
            .get_mut(name)
            .ok_or_else(|| ConvertError::UnknownDataItem(name.to_string()))?
            .set(value)
    }

    /// Export every datum under `prefix`
    pub fn export_all(&self, prefix: &Path) -> Result<Vec<PathBuf>> {
        self.items.values().map(|item| item.export(prefix)).collect()
    }
}
