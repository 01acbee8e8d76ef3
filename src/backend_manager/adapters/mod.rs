//! Adapter implementations for backend manager ports.
//!
//! - [`catalog`]: discovery over a table of linked-in backend plugins
//! - [`rknn`]: Rockchip RKNN runtime backend

pub mod catalog;
pub mod rknn;
