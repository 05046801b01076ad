//! Platform abstraction layer
//!
//! Turns raw frame data from whatever owns the window into simulation input:
//! - Click button state -> rising-edge spawn requests
//! - Variable frame time -> fixed simulation steps

pub mod input;
pub mod time;

pub use input::ClickEdge;
pub use time::FixedStepper;
