#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub mod prelude {
    pub use tether_hook as hook;
    pub use tether_reactive as reactive;

    pub use tether_hook::{
        HookConfig, HookEngine, HookRegistry, HostObject, QueueScheduler, Scheduler, SetterArg,
        SetterTable, ToolkitMeta, Value,
    };
    pub use tether_reactive::{BindSrc, Binding, TrackCx, Tracker};
}
