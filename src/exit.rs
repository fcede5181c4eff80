// src/exit.rs
//! Process exit codes for `solmutant`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SolmutantExit {
    /// Run completed and at least one variant was kept, or there was nothing to do.
    Success = 0,
    /// Generic error (I/O, configuration, compiler not runnable).
    Error = 1,
    /// No `.sol` input found, or an unknown rule id was requested.
    InvalidInput = 2,
    /// An artifact or the manifest could not be written.
    PersistenceFailure = 3,
    /// Variants were produced but the compiler rejected every one.
    NothingAccepted = 4,
}

impl SolmutantExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl Termination for SolmutantExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
