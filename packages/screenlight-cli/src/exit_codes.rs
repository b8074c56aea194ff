/// Process exit codes shared by all subcommands.
pub const SUCCESS: i32 = 0;

/// Bad input: missing or malformed show config, invalid argument values.
pub const INPUT_ERROR: i32 = 1;

/// The DMX device could not be opened.
pub const DEVICE_ERROR: i32 = 2;

/// A command failed after its inputs checked out.
pub const EXECUTION_ERROR: i32 = 3;
