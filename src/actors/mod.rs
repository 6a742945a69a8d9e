//! Actor-based core of the dashboard
//!
//! Each actor runs as an independent async task and is controlled through a
//! cloneable handle wrapping an mpsc command channel.
//!
//! ## Architecture Overview
//!
//! ```text
//!   HostListLoader ── attach/detach ──▶ OrchestratorActor ── paints ──▶ Renderer
//!                                             │  ▲                         ▲
//!                  operator trigger ──────────┘  │ results / timers        │
//!                                                │                         │
//!                                  spawned gateway calls                   │
//!                                             │                            │
//!                          CollectionCompleted (broadcast)                 │
//!                                             ▼                            │
//!                                       AggregateActor ── paints ──────────┘
//! ```
//!
//! ## Actor Types
//!
//! - **OrchestratorActor**: Owns every host action state machine
//! - **AggregateActor**: Refreshes the alert table and the offender chart
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each actor has an mpsc command channel for control messages
//! 2. **Events**: Collection completions are published to a broadcast channel
//! 3. **Request/Response**: oneshot channels for synchronous queries

pub mod aggregate;
pub mod machine;
pub mod messages;
pub mod orchestrator;
