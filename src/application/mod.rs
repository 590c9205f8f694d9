// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// user-visible goal each.
//
// Rules for this layer:
//   - No tensor math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layer 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Architecture inspection: stage shapes and parameter counts
pub mod summary_use_case;

// Materialise config + initial weights in a checkpoint directory
pub mod init_use_case;

// Forward pass over a seeded synthetic batch
pub mod predict_use_case;
