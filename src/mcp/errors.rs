pub const INVALID_INPUT: &str = "invalid_input";
pub const NOT_FOUND: &str = "not_found";
pub const NOT_A_FILE: &str = "not_a_file";
pub const TOO_LARGE: &str = "too_large";
pub const PERMISSION_DENIED: &str = "permission_denied";
pub const READ_FAILED: &str = "read_failed";
pub const MISSING_FILE_NAME: &str = "missing_file_name";
pub const MISSING_SOURCE: &str = "missing_source";
