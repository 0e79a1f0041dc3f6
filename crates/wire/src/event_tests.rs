// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn initialized_has_no_fields_in_wire_form() {
    let json = serde_json::to_value(&Event::Initialized).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "Initialized" }));
}

#[test]
fn process_exited_without_code_omits_the_field() {
    let json = serde_json::to_value(&Event::ProcessExited { exit_code: None }).unwrap();
    assert!(json.get("exit_code").is_none());
}

#[test]
fn stopped_round_trips_with_breakpoint_reason() {
    let event = Event::Stopped {
        thread_id: ThreadId::from(1),
        reason: StopInfo::Breakpoint { bp_id: BreakpointId::from(1), loc_id: adapter_core::id::LocationId::from(1) },
        stop_generation: 3,
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
