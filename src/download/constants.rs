//! Constants for the download module (pacing, temporary files).

use std::time::Duration;

/// Pause after every download call, whatever its outcome (100 ms).
pub const POST_DOWNLOAD_PAUSE: Duration = Duration::from_millis(100);

/// Suffix of the temporary file a body is streamed into before the rename.
pub const PARTIAL_SUFFIX: &str = ".part";
