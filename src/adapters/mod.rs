//! Adapters Layer
//!
//! Inbound adapters present the views; outbound adapters implement the
//! domain ports against real infrastructure.

pub mod inbound;
pub mod outbound;
