//! Integration test support (intentionally empty).
