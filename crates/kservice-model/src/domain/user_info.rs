use serde::{Deserialize, Serialize};

/// Identity the worker container runs as.
///
/// `uid` and `gid` land in the pod security context; `username` is only
/// conveyed through the container's `USER` environment variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub username: String,
    #[serde(rename = "uid", default)]
    pub user_id: Option<i64>,
    #[serde(rename = "gid", default)]
    pub group_ids: Option<Vec<i64>>,
}

impl UserInfo {
    pub fn new(username: impl Into<String>, user_id: i64, group_ids: Vec<i64>) -> Self {
        Self {
            username: username.into(),
            user_id: Some(user_id),
            group_ids: Some(group_ids),
        }
    }
}
