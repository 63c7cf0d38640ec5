//! Unit tests for the task orchestration module.

mod permission_tests;
