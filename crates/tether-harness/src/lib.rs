#![forbid(unsafe_code)]

//! Test harness for the Tether binding layer.
//!
//! Provides an in-memory stand-in for a host widget toolkit — enough
//! surface to exercise the full binding pipeline without a GUI:
//!
//! - [`MockWidget`]: property map, named signals, a validity flag that
//!   [`destroy`](MockWidget::destroy) flips, and a
//!   [`user_edit`](MockWidget::user_edit) helper simulating a user-driven
//!   property change (set + emit `<property>Changed`).
//! - [`MockToolkit`]: class metadata and original setters for a small
//!   Label / LineEdit / Slider / CheckBox widget set.
//! - [`Store`]: a named-cell namespace standing in for the external binder
//!   collaborator, with dump-log and dump-filter bookkeeping.

pub mod store;
pub mod widget;

pub use store::Store;
pub use widget::{MockToolkit, MockWidget};
