// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to interface with CASA measurement sets.
//!
//! Nothing here looks at visibilities; the pipeline only needs to know how
//! many rows a main table has, which columns it carries, and its timestamps.
//!
//! More info: https://casa.nrao.edu/Memos/229.html#SECTION00060000000000000000

mod error;

pub use error::MsReadError;

use std::path::Path;

use log::trace;
use rubbl_casatables::{Table, TableOpenMode};

use crate::constants::TIME_COL;

/// Read-only access to the main table of a measurement set.
pub trait MsTableRead {
    /// The number of rows in the main table.
    fn num_rows(&self, ms: &Path) -> Result<u64, MsReadError>;

    /// The names of the columns in the main table.
    fn column_names(&self, ms: &Path) -> Result<Vec<String>, MsReadError>;

    /// The contents of the TIME column (MJD seconds, UTC).
    fn times(&self, ms: &Path) -> Result<Vec<f64>, MsReadError>;

    fn has_column(&self, ms: &Path, col: &str) -> Result<bool, MsReadError> {
        Ok(self.column_names(ms)?.iter().any(|c| c == col))
    }
}

/// Reads measurement sets with casacore.
#[derive(Debug, Clone, Copy, Default)]
pub struct CasacoreReader;

/// Open the main table of a measurement set read only. The table is closed
/// when it is dropped.
fn read_table(ms: &Path) -> Result<Table, MsReadError> {
    if !ms.is_dir() {
        return Err(MsReadError::BadFile(ms.to_path_buf()));
    }
    trace!("Opening table {}", ms.display());
    let t = Table::open(ms, TableOpenMode::Read)?;
    Ok(t)
}

impl MsTableRead for CasacoreReader {
    fn num_rows(&self, ms: &Path) -> Result<u64, MsReadError> {
        let main_table = read_table(ms)?;
        Ok(main_table.n_rows())
    }

    fn column_names(&self, ms: &Path) -> Result<Vec<String>, MsReadError> {
        let mut main_table = read_table(ms)?;
        let col_names = main_table.column_names()?;
        Ok(col_names)
    }

    fn times(&self, ms: &Path) -> Result<Vec<f64>, MsReadError> {
        let mut main_table = read_table(ms)?;
        let times: Vec<f64> = main_table.get_col_as_vec(TIME_COL)?;
        Ok(times)
    }
}
