//! Frame-level scenario tests for the render world

mod frame_scenarios;
mod properties;
