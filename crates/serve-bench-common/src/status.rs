//! Terminal status of a validation pass
//!
//! A pass ends in exactly one of these states; the binary turns it into the
//! process exit code.

/// Outcome of a validation pass
///
/// Exit codes must remain stable for CI callers:
/// - `Validated = 0`: every generated report matched its baseline
/// - `Failed = 1`: a report failed or the inputs were unusable
/// - `NoReport = 2`: the results directory does not exist
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::FromRepr,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(i32)]
pub enum ValidationStatus {
    /// All reports within tolerance
    #[strum(serialize = "validated")]
    Validated = 0,
    /// At least one report failed, or validation could not complete
    #[strum(serialize = "failed")]
    Failed = 1,
    /// No results directory was produced
    #[strum(serialize = "no_report")]
    NoReport = 2,
}

impl ValidationStatus {
    /// Process exit code for this status
    pub fn exit_code(self) -> i32 {
        self as i32
    }

    /// Check if the status represents success
    pub fn is_success(self) -> bool {
        self == Self::Validated
    }
}
