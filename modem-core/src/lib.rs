//! Emulated modem device model
//!
//! Implements the Huawei E3372-style side of the AT conversation: device
//! state (SIM identity, network registration, signal level, message store),
//! the command table served through `modem-at`, and a concatenated-SMS PDU
//! encoder for injecting test traffic.

mod commands;
mod sms;
mod state;

pub use commands::command_table;
pub use sms::inject_test_sms;
pub use state::{ModemState, StoredSms, MSG_SLOTS};
