#![forbid(unsafe_code)]

//! Setter interception and two-way binding for host widget toolkits.
//!
//! This crate turns widget setter calls into live bindings. A setter is
//! invoked through a [`MethodHook`] with a [`SetterArg`]: a plain value
//! passes straight through to the original setter; a bind source is
//! evaluated once for the initial value, its cell dependencies are
//! discovered, and every future mutation of a dependency re-invokes the
//! setter with a freshly computed value. When the hook's options declare an
//! updater signal and the source mirrors exactly one cell, the reverse
//! (widget → state) path is wired as well.
//!
//! The host toolkit is consumed through a narrow capability surface
//! ([`HostObject`], [`ToolkitMeta`], [`Scheduler`]); this crate never
//! renders, never owns widget lifetime, and only defensively checks
//! validity before touching a target.
//!
//! # Components
//!
//! - [`config`]: the declarative hook table, read once at startup.
//! - [`registry`]: config × toolkit metadata → frozen [`HookRegistry`].
//! - [`install`]: resolves registry entries against the host's setter
//!   table and produces guarded, intercepted methods ([`HookEngine`]).
//! - [`interceptor`]: the call-time recognition and resync machinery.
//! - [`cursor`]: cursor-position preservation across text resyncs.
//! - [`sched`]: the deferred-execution primitive.

pub mod config;
pub mod cursor;
pub mod error;
pub mod host;
pub mod install;
pub mod interceptor;
pub mod registry;
pub mod sched;
pub mod value;

pub use config::{HookConfig, MethodFlags};
pub use error::{HookError, HostError};
pub use host::{ClassMeta, HostObject, SetterFn, SetterTable, SignalSlot, ToolkitMeta};
pub use install::{HookEngine, HookSet, guard_setter, install_hooks};
pub use interceptor::{FnHook, MethodHook, SetterArg};
pub use registry::{HookEntry, HookRegistry};
pub use sched::{QueueScheduler, Scheduler};
pub use value::Value;
