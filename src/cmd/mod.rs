/// Interior cell listing command.
pub mod cells;
/// File-level statistics command.
pub mod info;
/// Single record lookup command.
pub mod record;
/// Shared argument parsing and output helpers.
pub mod util;
