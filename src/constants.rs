// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

Most of these are the defaults of the command-line interface; they are kept
here so that library code and help texts agree.
 */

/// The number of beams formed by an ASKAP PAF. "All beams" means beams 0 to
/// this value (exclusive).
pub const DEFAULT_NUM_BEAMS: u8 = 36;

/// The default root directory containing `<SBID>` directories.
pub const DEFAULT_DATA_ROOT: &str = "data";

/// Default beam template for importing uvfits files.
pub const DEFAULT_IMPORT_PATTERN: &str = "*/*beam{beam:02d}*.uvfits";

/// Default beam template for averaging. Raw measurement sets end in a
/// 14-digit scan timestamp.
pub const DEFAULT_AVERAGE_PATTERN: &str = "*/*beam{beam:02d}*[0-9].ms";

/// Default beam template for concatenation.
pub const DEFAULT_CONCAT_PATTERN: &str = "*/*beam{beam:02d}*.avg.ms";

/// Default beam template for applying calibration.
pub const DEFAULT_APPLYCAL_PATTERN: &str = "*beam{beam:02d}*.avg.ms";

/// Default beam template for clearing calibration.
pub const DEFAULT_CLEARCAL_PATTERN: &str = "*/*beam{beam:02d}*.avg.ms";

/// Default beam template for self-calibration.
pub const DEFAULT_SELFCAL_PATTERN: &str = "*beam{beam:02d}*.calB0.ms";

/// Default beam template for model subtraction. Only the calibrated
/// generation matches; with a self-cal index these are the self-cal bases.
pub const DEFAULT_UVSUB_PATTERN: &str = "*beam{beam:02d}*.calB0.ms";

/// The default calibration-table extension.
pub const DEFAULT_CAL_EXTENSION: &str = "B0";

/// The calibration extension that is applied with nearest-neighbour time
/// interpolation; every other extension is interpolated linearly.
pub const BANDPASS_EXTENSION: &str = "B0";

/// The default time bin handed to `mstransform`.
pub const DEFAULT_TIMEBIN: &str = "9.90s";

/// The default `gaincal` calibration mode (phase only).
pub const DEFAULT_CALMODE: &str = "p";

/// The default reference antenna.
pub const DEFAULT_REFANT: &str = "AK06";

/// The default minimum SNR for `gaincal` solutions.
pub const DEFAULT_MINSNR: f64 = 3.0;

/// The default prefix of self-cal solution tables.
pub const DEFAULT_CALTABLE_PREFIX: &str = "selfcal_p";

/// Self-cal solution tables are written into this directory, next to the
/// measurement set being calibrated.
pub const CALTABLE_DIR: &str = "caltables";

/// The default marker for model-subtracted measurement sets. Custom markers
/// must start with this, so that they can be recognised in later names.
pub const DEFAULT_UVSUB_LABEL: &str = "uvsub";

/// The column that must be present before self-calibration; `gaincal`
/// divides DATA by this column.
pub const MODEL_DATA_COL: &str = "MODEL_DATA";

/// The column holding integration times in a measurement set main table.
pub const TIME_COL: &str = "TIME";

/// The default Python interpreter expected to provide `casatasks`.
pub const DEFAULT_CASA_PYTHON: &str = "python3";
