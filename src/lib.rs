//! VoiceLedger - voice-driven expense ledger
//!
//! This crate records a short voice note from the microphone,
//! transcribes it with Google Cloud Speech-to-Text, extracts a
//! structured expense record with an OpenAI chat model, and keeps the
//! result in a local SQLite ledger.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: The capture-cycle use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Google STT, OpenAI, SQLite, config)
//! - **CLI**: Command-line interface, argument parsing, and stop-signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
