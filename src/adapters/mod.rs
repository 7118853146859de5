//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                  |
//! |------------|--------------------|------------------------------|
//! | `flash_fs` | FileStorePort      | SPIFFS via the std VFS       |
//! | `wifi`     | AccessPointPort    | ESP-IDF WiFi soft-AP         |
//! | `mdns`     | NameResolverPort   | espressif/mdns component     |
//! | `http`     | RequestRouterPort  | EspHttpServer                |
//! | `network`  | all of the above + IndicatorPort, bundled for the toggle |
//! | `log_sink` | EventSink          | Serial log output            |
//! | `time`     | ClockPort          | ESP32 system timer           |

pub mod flash_fs;
pub mod http;
pub mod log_sink;
pub mod mdns;
pub mod network;
pub mod time;
pub mod wifi;
