//! End-to-end grammar tests for skald-par
