//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements          | Connects to               |
//! |------------|---------------------|---------------------------|
//! | `display`  | DisplaySink         | Serial log (OLED stand-in)|
//! | `log_sink` | TelemetrySink       | Serial log output         |
//! |            | DiscoverySink       |                           |
//! | `nvs`      | ConfigPort          | NVS / in-memory store     |
//! | `time`     | Clock               | ESP32 system timer        |

pub mod display;
pub mod log_sink;
pub mod nvs;
pub mod time;
