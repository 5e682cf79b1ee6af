//! Unit tests for the label codec.
//!
//! These tests verify the exact text written for label and class files and
//! that the written values can be turned back into the original pixel boxes.
