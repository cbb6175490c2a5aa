//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | CLI usage error (bad args; clap also exits with 2)        |
//! | 3    | Planner config failed to parse or validate                |
//! | 4    | Input document unreadable or invalid                      |
//! | 5    | Database error                                            |
//! | 6    | Referenced list, quote or share id does not exist         |
//! | 7    | Nothing to analyze (`--strict` only)                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use supplyplan_store::StoreError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config parse or validation failure.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input document could not be read, parsed or validated.
pub const EXIT_INPUT: u8 = 4;

/// SQLite store could not be opened, read or written.
pub const EXIT_STORE: u8 = 5;

/// Id given on the command line matches no record.
pub const EXIT_NOT_FOUND: u8 = 6;

/// `--strict` run had no lists or no quotes to analyze.
pub const EXIT_NOTHING_TO_ANALYZE: u8 = 7;

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::NotFound { .. } => EXIT_NOT_FOUND,
        StoreError::Sqlite(_) | StoreError::Encode(_) => EXIT_STORE,
    }
}
