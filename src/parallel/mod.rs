//! Generic parallel execution framework
//!
//! Distributes work items over a pool of scoped worker threads connected by
//! bounded crossbeam channels.
//!
//! # Architecture Responsibilities
//!
//! The parallel module focuses exclusively on **system resource management**
//! and **execution strategy**:
//!
//! - **Resource Discovery**: Detects available CPU cores using `num_cpus::get()`
//! - **Resource Calculation**: Applies user configuration (thread percentage,
//!   max threads) to available resources
//! - **Thread Safety**: Manages crossbeam channels and worker coordination
//!
//! It knows nothing about modules, licenses or sinks; the scan runner feeds
//! it module handles and a closure.
//!
//! # Example Usage
//!
//! ```rust
//! use license_report::parallel::{ParallelConfig, ParallelProcessor};
//!
//! let processor = ParallelProcessor::new(ParallelConfig::default());
//! let doubled = processor.process(vec![1, 2, 3], |x| Ok(x * 2), "Doubling").unwrap();
//! assert_eq!(doubled, vec![2, 4, 6]);
//! ```

pub mod processor;

// Re-export main types for easier access
pub use processor::{ParallelConfig, ParallelProcessor};
