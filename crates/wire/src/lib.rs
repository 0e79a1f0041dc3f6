// SPDX-License-Identifier: MIT

//! Wire protocol for the debugger adapter daemon.
//!
//! Wire format: 4-byte big-endian length prefix + JSON payload. Requests and
//! responses are correlated by an opaque hash; events carry none.

mod event;
mod request;
mod response;
mod wire;

pub use event::Event;
pub use request::{Request, RequestBody};
pub use response::{Response, ResponseBody};
pub use wire::{
    decode, encode, read_message, read_message_limited, write_message, ProtocolError,
    DEFAULT_MAX_FRAME_BYTES,
};
