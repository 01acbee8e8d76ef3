//! Step definitions for backend discovery scenarios.


mod given;
mod then;
mod when;
