//! Exit codes for the hz-core CLI.
//!
//! Exit code ranges:
//! - 0: success
//! - 10-19: user/input errors (fixable by changing arguments, files or config)
//! - 20-29: internal errors

/// Process exit codes.
///
/// These codes are a stable contract for scripts driving the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Invalid arguments
    ArgsError = 10,

    /// Career file is malformed or unreadable
    InputError = 11,

    /// A score lies at or beyond the model horizon
    HorizonError = 12,

    /// Configuration missing, unparsable or invalid
    ConfigError = 13,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error writing output
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Codes 20-29.
    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::HorizonError => "ERR_HORIZON",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Every code fits in a u8.
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
