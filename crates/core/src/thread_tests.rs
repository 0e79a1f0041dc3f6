// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn breakpoint_stop_info_round_trips_through_json() {
    let info = StopInfo::Breakpoint { bp_id: BreakpointId::from(7), loc_id: LocationId::from(1) };
    let json = serde_json::to_string(&info).unwrap();
    assert_eq!(serde_json::from_str::<StopInfo>(&json).unwrap(), info);
}

#[test]
fn unrecognized_stop_reason_uses_other_fallback() {
    let info = StopInfo::Other { description: "exec-state-changed".into() };
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["reason"], "Other");
}

#[test]
fn running_thread_has_no_stop_info() {
    let t = Thread {
        id: ThreadId::from(1),
        native_tid: 4242,
        name: "main".into(),
        state: ThreadRunState::Running,
        stop_info: None,
    };
    assert!(t.stop_info.is_none());
    let json = serde_json::to_value(&t).unwrap();
    assert!(json.get("stop_info").is_none());
}

#[test]
fn stack_frame_without_source_location_still_serializes() {
    let f = StackFrame {
        id: FrameId::from(3),
        function_name: "??".into(),
        source_location: None,
        program_counter: 0x7fff0000,
    };
    let json = serde_json::to_value(&f).unwrap();
    assert!(json.get("source_location").is_none());
    assert_eq!(json["program_counter"], 0x7fff0000u64);
}
