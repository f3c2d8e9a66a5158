//! HTTP server module.
//!
//! Exposes the snapshot store and the derived summary as a small REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - Content-type and header validation                    │
//! │  - JSON / CSV responses                                  │
//! │  - CORS, compression, body limit, error mapping          │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Derivation (services/) and storage services (db/)       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  SnapshotRepository (local / file / postgres)            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path                 | Purpose                              |
//! |--------|----------------------|--------------------------------------|
//! | PUT    | `/forecast`          | Replace the stored table             |
//! | POST   | `/api/update`        | Same as `PUT /forecast`              |
//! | GET    | `/forecast`          | Stored table, verbatim               |
//! | GET    | `/forecast-metadata` | `{ "timestamp": ... }`               |
//! | GET    | `/forecast-summary`  | Derived series and freshness         |
//! | GET    | `/health`            | Service and storage status           |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
