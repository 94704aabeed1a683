// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Measurement-set lineage.
//!
//! Every stage of the pipeline consumes one generation of a measurement set
//! and produces the next. The generation is encoded in the file name as a
//! series of dot-delimited markers at the end of the name, e.g.
//!
//! ```text
//! cracoData.LTR_1733-2344.SB77974.beam17.avg.calB0.ms
//! └─────────── stem ─────────────────┘ └┬┘ └─┬─┘
//!                                    averaged calibrated with "B0"
//! ```
//!
//! [`derive_output_name`] is the only way output paths are made. The previous
//! generation may only be removed with [`supersede`], and only after
//! [`validate_generation`] has approved the new one.

mod error;
mod name;
#[cfg(test)]
mod tests;
mod validate;

pub use error::{CleanupError, NamingError, ValidationError};
pub use name::{
    derive_output_name, selfcal_caltable_name, selfcal_generation_names, CalExtension, Marker,
    MsName, StageTag,
};
pub use validate::{ensure_container, supersede, validate_generation};
