//! Tests for the public kole-lib API.

mod common;
