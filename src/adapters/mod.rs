//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | OutputPort         | Relay GPIO (OutputPin)   |
//! | `http`     | HttpTransport      | ESP-IDF HTTP(S) client   |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `time`     | Clock              | ESP32 system timer       |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA         |

pub mod hardware;
#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
