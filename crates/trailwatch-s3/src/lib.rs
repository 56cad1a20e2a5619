mod store;

pub use store::{ObjectStore, S3ObjectStore, StoreError};

#[cfg(any(test, feature = "testing"))]
pub use store::MockObjectStore;
