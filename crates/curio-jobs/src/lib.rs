// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job dispatch for Curio workers.
//!
//! A queue message is decoded into a [`JobDescriptor`], and a [`JobFactory`]
//! turns the descriptor into a runnable [`Job`]. Only classes registered in
//! the [`JobRegistry`] can be built.
//!
//! ```ignore
//! let mut registry = JobRegistry::new();
//! registry.register_job::<ExportJob>()?;
//!
//! let factory = JobFactory::new(Arc::new(registry), ProcessOptions::default());
//! let job = factory.from_message(r#"{"className":"ExportJob","options":{}}"#).await?;
//! job.perform().await?;
//! ```

pub mod descriptor;
pub mod error;
pub mod factory;
pub mod job;
pub mod options;
pub mod registry;
pub mod user;

pub use descriptor::JobDescriptor;
pub use error::{JobError, RegistryError, Result};
pub use factory::JobFactory;
pub use job::{BuildJob, Job, JobOutput};
pub use options::{JobOptions, ProcessOptions, USER_KEY};
pub use registry::{JobConstructor, JobRegistry};
pub use user::{User, UserDirectory, UserLookupError};
