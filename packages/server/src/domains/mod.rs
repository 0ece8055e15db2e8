//! Business domains. Infrastructure stays in the kernel.

pub mod stories;
