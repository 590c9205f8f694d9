// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   checkpoint.rs — Saving and loading the model configuration
//                   (JSON via serde_json) and the learned
//                   parameters (Burn record, MessagePack + gzip)
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model configuration and weight persistence
pub mod checkpoint;
