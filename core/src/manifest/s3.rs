use serde::{Deserialize, Serialize};

/// Where the raw JSON lives in object storage.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct S3Details {
    /// Prefix holding the event log files.
    pub log_data: String,

    /// JSON-paths file mapping event log keys onto the `staging_events` columns in order.
    pub log_jsonpath: String,

    /// Prefix holding the song metadata files, loaded with `'auto'` key matching.
    pub song_data: String,

    pub region: String,
}
