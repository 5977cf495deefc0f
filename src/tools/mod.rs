//! External toolchain drivers

pub mod dotnet;

pub use dotnet::{BuildSettings, DotNet, PackSettings, PushSettings, Toolchain, VersionStamp};
