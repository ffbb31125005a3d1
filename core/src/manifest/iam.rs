use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IamRoleDetails {
    /// Role the cluster assumes to read from S3, e.g. `arn:aws:iam::123456789012:role/dwhRole`.
    pub arn: String,
}
