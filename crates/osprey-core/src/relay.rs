//! Process-wide panic hook that appends engine-native error detail.
//!
//! The previously installed hook always runs first, so the default report is
//! never lost. When the panic payload carries an [`EngineFault`] (directly or
//! inside a [`BridgeError`]), its native message and stack trace are printed
//! afterward, in that order. Inspection is best-effort and never fails.

use crate::error::{BridgeError, EngineFault};
use std::any::Any;
use std::panic;
use std::sync::Once;

static INSTALL: Once = Once::new();

/// Installs the relay hook once per process, wrapping the current hook.
pub fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            previous(info);
            for line in native_detail_lines(info.payload()) {
                eprintln!("{line}");
            }
        }));
    });
}

fn engine_fault(payload: &(dyn Any + Send)) -> Option<&EngineFault> {
    if let Some(fault) = payload.downcast_ref::<EngineFault>() {
        return Some(fault);
    }
    if let Some(error) = payload.downcast_ref::<BridgeError>() {
        return error.engine_fault();
    }
    None
}

/// Extra lines to print after the default report. Empty unless the payload
/// is recognizably engine-originated with a non-empty stack trace.
pub(crate) fn native_detail_lines(payload: &(dyn Any + Send)) -> Vec<String> {
    let Some(fault) = engine_fault(payload) else {
        return Vec::new();
    };
    if fault.stacktrace.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    if let Some(message) = fault.message.as_deref() {
        if !message.is_empty() {
            lines.push(message.to_string());
        }
    }
    lines.push(fault.stacktrace.clone());
    lines
}
