
pub mod core {
    pub mod config;
    pub mod error;
    pub mod replay;
    pub mod test;
}


pub mod reporters;

pub use crate::core::config::{HostConfig, ReporterConfig};
pub use crate::core::test::{ExecutionTarget, RunResults, TestResult};
pub use crate::reporters::defer_spec::DeferSpecReporter;
pub use crate::reporters::Reporter;
