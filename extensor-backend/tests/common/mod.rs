mod test_backend;

#[allow(unused_imports)]
pub use test_backend::{ErrorBackend, TestBackend};
