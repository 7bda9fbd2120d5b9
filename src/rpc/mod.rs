//! Control-server polling.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Poll Stack                          │
//! │                                                          │
//! │  ┌────────────┐   ┌───────────┐   ┌──────────────────┐  │
//! │  │ PollClient │──▶│   Codec   │──▶│  HttpTransport   │  │
//! │  │ (url, key) │   │ (JSON,    │   │  (trait: ESP     │  │
//! │  │            │◀──│  bounded) │◀──│   HTTP client)   │  │
//! │  └────────────┘   └───────────┘   └──────────────────┘  │
//! │        │                                                 │
//! │        ▼                                                 │
//! │   Result<ModeState, PollError>                           │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod codec;
pub mod transport;
