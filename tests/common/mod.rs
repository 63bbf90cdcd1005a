#![allow(dead_code)]
use std::fs;
use std::path::{Path, PathBuf};

use opt_convert::engine::{DataDeclaration, ModelingEngine, VariableInfo, VariableVector};
use opt_convert::Format;

/// An engine that records what it is asked to read and writes canned text
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub read: Vec<PathBuf>,
    pub parsed: Vec<String>,
    pub written: Vec<(PathBuf, Format)>,
    pub mpl: String,
    pub mps: String,
    pub lp: String,
    pub variables: Vec<VariableInfo>,
    pub vectors: Vec<VariableVector>,
    pub declarations: Vec<DataDeclaration>,
    pub objective: f64,
}

impl ModelingEngine for FakeEngine {
    fn read_model(&mut self, path: &Path) -> Result<(), String> {
        self.read.push(path.to_path_buf());
        Ok(())
    }

    fn parse_text(&mut self, text: &str) -> Result<(), String> {
        self.parsed.push(text.to_string());
        Ok(())
    }

    fn write_file(&mut self, path: &Path, format: Format) -> Result<(), String> {
        let text = match format {
            Format::Mpl => &self.mpl,
            Format::Mps => &self.mps,
            Format::Lp => &self.lp,
        };
        fs::write(path, text).map_err(|e| e.to_string())?;
        self.written.push((path.to_path_buf(), format));
        Ok(())
    }

    fn solve(&mut self) -> Result<f64, String> {
        Ok(self.objective)
    }

    fn variables(&self) -> Vec<VariableInfo> {
        self.variables.clone()
    }

    fn variable_vectors(&self) -> Vec<VariableVector> {
        self.vectors.clone()
    }

    fn data_declarations(&self) -> Vec<DataDeclaration> {
        self.declarations.clone()
    }
}

pub const DETERMINISTIC_MPS: &str = "NAME          TINY
ROWS
 N  obj
 L  c1
COLUMNS
    x         obj       1   c1        1
RHS
    rhs       c1        4
ENDATA
";

pub const STOCHASTIC_MPS: &str = "NAME          SNDP
ROWS
 N  obj
TIME          SNDP
PERIODS
STOCH         SNDP
SCENARIOS     DISCRETE
 SC SCEN1     ROOT      0.5       STAGE-2
    RHS       c1        3
";

pub fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write fixture");
    path
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
