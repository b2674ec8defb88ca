#![forbid(unsafe_code)]

//! Cursor-position preservation for text setters.
//!
//! Rewriting a text widget's content resets its cursor to the end. For
//! hooked text setters flagged `preserve_cursor`, the resync path captures
//! the `cursorPosition` property before applying the new value and defers
//! the restore to the next event-loop turn, after the widget has settled.
//! The restored position is clamped to the new text length.
//!
//! Thin adapter over the capability surface; no toolkit types leak in.

use std::rc::Rc;

use crate::error::HostError;
use crate::host::{HostObject, SetterFn};
use crate::sched::Scheduler;
use crate::value::Value;

/// Property holding the caret position of text widgets.
const CURSOR_PROPERTY: &str = "cursorPosition";
/// Property holding the widget's current text, used to clamp the restore.
const TEXT_PROPERTY: &str = "text";

/// Apply `setter` to `target`, restoring the cursor position on a deferred
/// turn afterwards.
///
/// Targets without a `cursorPosition` property get a plain call. A target
/// destroyed by the time the deferred restore runs makes it a no-op.
pub(crate) fn call_preserving_cursor(
    setter: &SetterFn,
    target: &Rc<dyn HostObject>,
    scheduler: &Rc<dyn Scheduler>,
    value: &Value,
) -> Result<(), HostError> {
    let saved = target.property(CURSOR_PROPERTY).and_then(|v| v.as_int());

    let result = setter(target.as_ref(), value);

    if let Some(position) = saved {
        let target = Rc::clone(target);
        scheduler.schedule(Box::new(move || {
            if !target.is_valid() {
                return;
            }
            let text_len = target
                .property(TEXT_PROPERTY)
                .and_then(|v| v.as_str().map(|s| s.chars().count() as i64));
            let restored = text_len.map_or(position, |len| position.min(len));
            if let Err(err) = target.set_property(CURSOR_PROPERTY, Value::Int(restored)) {
                if !err.is_destroyed() {
                    tracing::warn!(class = target.class_path(), error = %err, "cursor restore failed");
                }
            }
        }));
    }

    result
}
