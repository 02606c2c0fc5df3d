//! Process exit codes, taken from BSD sysexits.h

/// Bug or unexpected state inside qsheet
pub const SOFTWARE: i32 = 70;

/// Terminal or file I/O failed
pub const IOERR: i32 = 74;

/// Settings could not be read or parsed
pub const CONFIG: i32 = 78;
