//! Platform-agnostic driver for the MAX31856 precision thermocouple-to-digital
//! converter.
//!
//! The chip is reached over SPI mode 1 (CPOL = 0, CPHA = 1), MSB first, at up to
//! 5 MHz. Either hand over a bus from your HAL (`embedded-hal` 1.0 `SpiDevice`,
//! or a 0.2 `Transfer` bus plus chip-select pin), or let [`soft_spi`] bit-bang
//! the bus on four GPIOs.

#![no_std]

pub mod max31856;
pub mod soft_spi;

pub use crate::max31856::{
    Config, ConversionMode, Error, ErrorKind, FaultMode, Max31856, NoiseFilter, ThermocoupleType,
};
