#![allow(dead_code)]

pub use ftrap_test_utils::builders;
pub use ftrap_test_utils::scripts;
pub use ftrap_test_utils::{init_tracing, with_timeout};
