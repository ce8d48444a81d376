//! KYC onboarding wizard — orchestration engine core.

pub mod config;
pub mod error;
pub mod holder;
pub mod remote;
pub mod status;
pub mod wizard;
