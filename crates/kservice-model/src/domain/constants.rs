/// Container environment variable carrying the worker's username.
pub const ENV_USER: &str = "USER";

/// Wire name of the network-filesystem mount type.
pub const MOUNT_TYPE_NFS: &str = "NFS";

/// Wire name of the secret mount type.
pub const MOUNT_TYPE_SECRET: &str = "secret";
