// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust description of the network's shape algebra.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and arithmetic
//
// Everything the model does to a tensor's *shape* can be
// computed here without allocating a single tensor:
//
//   [batch, channels, samples]
//       │  multi-scale temporal convs + spatial conv
//       ▼
//   [batch, embed_dim, samples]
//       │  mean pool ‖ variance pool   (PoolGeometry)
//       ▼
//   [batch, windows, embed_dim]  × 2 paths
//       │  fusion conv + classifier
//       ▼
//   [batch, num_classes]
//
// The CLI `summary` command and the model tests both lean on
// this layer to know what shape each stage should produce.
//
// Reference: Rust Book §5 (Structs)

/// Window/stride arithmetic shared by both pooling paths
pub mod geometry;
