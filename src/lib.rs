#![no_std]
#![doc = include_str!("../README.md")]

/// The device address offset is outside of the range selectable by the
/// chip's address pins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange;

pub mod ina219;
