//! Cross-module scenarios: generation, pooling and capture cycles together
