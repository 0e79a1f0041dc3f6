// SPDX-License-Identifier: MIT

//! Console/command handlers. These pass raw input through to nothing more
//! than an acknowledgement: the abstract `Engine` facade has no
//! interactive-console capability — real LLDB bindings route these to
//! `SBCommandInterpreter`, which this crate leaves to a concrete binding.

use adapter_core::error::AdapterError;

pub(crate) fn handle_console_command(command: &str) -> Result<String, AdapterError> {
    if command.is_empty() {
        return Err(AdapterError::invalid_argument("console command must not be empty"));
    }
    Ok(String::new())
}

pub(crate) fn handle_completion(_text: &str, _cursor_pos: u32) -> Vec<String> {
    Vec::new()
}

pub(crate) fn dispatch_input(_bytes: &[u8]) {}

pub(crate) fn resize_console(cols: u32, rows: u32) -> Result<(), AdapterError> {
    if cols == 0 || rows == 0 {
        return Err(AdapterError::invalid_argument("console size must be non-zero"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
