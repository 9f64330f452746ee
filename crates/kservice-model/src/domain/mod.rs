mod constants;
pub use constants::{ENV_USER, MOUNT_TYPE_NFS, MOUNT_TYPE_SECRET};

mod quantity;
pub use quantity::{Quantity, QuantityError};

mod resource;
pub use resource::Resource;

mod mount;
pub use mount::{Mount, MountType};

mod user_info;
pub use user_info::UserInfo;

mod worker_pod;
pub use worker_pod::WorkerPod;

mod worker_status;
pub use worker_status::{WorkerState, WorkerStatus};

mod worker_details;
pub use worker_details::{Logs, WorkerDetails};

/// String-to-string mapping used for env, labels and annotations.
pub type StringMap = std::collections::BTreeMap<String, String>;
