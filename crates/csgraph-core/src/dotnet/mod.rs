//! .NET project and package manifests.

pub mod manifest;
