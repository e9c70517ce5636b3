//! MAX31856 register map, datasheet Table 6.
//!
//! Write addresses are the read address with bit 7 set. Only the
//! configuration, mask, threshold, offset and cold-junction registers are
//! writable.

/// Bit that turns a read address into a write address.
pub const WRITE_BIT: u8 = 0x80;

// Read addresses
pub const CR0_READ: u8 = 0x00;
pub const CR1_READ: u8 = 0x01;
pub const MASK_READ: u8 = 0x02;
pub const CJHF_READ: u8 = 0x03; // Cold-Junction High Fault Threshold
pub const CJLF_READ: u8 = 0x04; // Cold-Junction Low Fault Threshold
pub const LTHFTH_READ: u8 = 0x05; // Linearized Temperature High Fault Threshold MSB
pub const LTHFTL_READ: u8 = 0x06; // Linearized Temperature High Fault Threshold LSB
pub const LTLFTH_READ: u8 = 0x07; // Linearized Temperature Low Fault Threshold MSB
pub const LTLFTL_READ: u8 = 0x08; // Linearized Temperature Low Fault Threshold LSB
pub const CJTO_READ: u8 = 0x09; // Cold-Junction Temperature Offset
pub const CJTH_READ: u8 = 0x0A; // Cold-Junction Temperature, MSB
pub const CJTL_READ: u8 = 0x0B; // Cold-Junction Temperature, LSB
pub const LTCBH_READ: u8 = 0x0C; // Linearized TC Temperature, Byte 2
pub const LTCBM_READ: u8 = 0x0D; // Linearized TC Temperature, Byte 1
pub const LTCBL_READ: u8 = 0x0E; // Linearized TC Temperature, Byte 0
pub const SR_READ: u8 = 0x0F; // Fault Status

// Write addresses
pub const CR0_WRITE: u8 = 0x80;
pub const CR1_WRITE: u8 = 0x81;
pub const MASK_WRITE: u8 = 0x82;
pub const CJHF_WRITE: u8 = 0x83;
pub const CJLF_WRITE: u8 = 0x84;
pub const LTHFTH_WRITE: u8 = 0x85;
pub const LTHFTL_WRITE: u8 = 0x86;
pub const LTLFTH_WRITE: u8 = 0x87;
pub const LTLFTL_WRITE: u8 = 0x88;
pub const CJTO_WRITE: u8 = 0x89;
pub const CJTH_WRITE: u8 = 0x8A;
pub const CJTL_WRITE: u8 = 0x8B;

// CR0. Set through `Config`.
pub const CR0_FILTER_50HZ: u8 = 1 << 0;
pub const CR0_FAULTCLR: u8 = 1 << 1;
pub const CR0_FAULT_INTERRUPT: u8 = 1 << 2;
pub const CR0_CJ_DISABLED: u8 = 1 << 3;
pub const CR0_ONE_SHOT: u8 = 0x40; // one conversion, ~200ms
pub const CR0_CONTINUOUS: u8 = 0x80; // automatic conversion every ~100ms

// Thermocouple type codes, CR1 bits 2:0
pub const TC_TYPE_B: u8 = 0x0;
pub const TC_TYPE_E: u8 = 0x1;
pub const TC_TYPE_J: u8 = 0x2;
pub const TC_TYPE_K: u8 = 0x3;
pub const TC_TYPE_N: u8 = 0x4;
pub const TC_TYPE_R: u8 = 0x5;
pub const TC_TYPE_S: u8 = 0x6;
pub const TC_TYPE_T: u8 = 0x7;

// Fault mask register. A set bit masks the fault off the FAULT pin.
pub const MASK_CJ_HIGH: u8 = 1 << 5;
pub const MASK_CJ_LOW: u8 = 1 << 4;
pub const MASK_TC_HIGH: u8 = 1 << 3;
pub const MASK_TC_LOW: u8 = 1 << 2;
pub const MASK_OVUV: u8 = 1 << 1;
pub const MASK_OPEN: u8 = 1 << 0;

// Fault status register
pub const SR_CJ_RANGE: u8 = 1 << 7;
pub const SR_TC_RANGE: u8 = 1 << 6;
pub const SR_CJ_HIGH: u8 = 1 << 5;
pub const SR_CJ_LOW: u8 = 1 << 4;
pub const SR_TC_HIGH: u8 = 1 << 3;
pub const SR_TC_LOW: u8 = 1 << 2;
pub const SR_OVUV: u8 = 1 << 1;
pub const SR_OPEN: u8 = 1 << 0;

/// Logical MAX31856 registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Configuration 0: conversion mode, fault handling, noise filter
    Cr0,
    /// Configuration 1: averaging and thermocouple type
    Cr1,
    /// Fault mask
    Mask,
    ColdJunctionHighFault,
    ColdJunctionLowFault,
    ThermocoupleHighFaultMsb,
    ThermocoupleHighFaultLsb,
    ThermocoupleLowFaultMsb,
    ThermocoupleLowFaultLsb,
    ColdJunctionOffset,
    ColdJunctionMsb,
    ColdJunctionLsb,
    /// Linearized thermocouple temperature, byte 2
    ThermocoupleByte2,
    /// Linearized thermocouple temperature, byte 1
    ThermocoupleByte1,
    /// Linearized thermocouple temperature, byte 0
    ThermocoupleByte0,
    /// Fault status
    Status,
}

impl Register {
    pub const fn read_address(self) -> u8 {
        match self {
            Register::Cr0 => CR0_READ,
            Register::Cr1 => CR1_READ,
            Register::Mask => MASK_READ,
            Register::ColdJunctionHighFault => CJHF_READ,
            Register::ColdJunctionLowFault => CJLF_READ,
            Register::ThermocoupleHighFaultMsb => LTHFTH_READ,
            Register::ThermocoupleHighFaultLsb => LTHFTL_READ,
            Register::ThermocoupleLowFaultMsb => LTLFTH_READ,
            Register::ThermocoupleLowFaultLsb => LTLFTL_READ,
            Register::ColdJunctionOffset => CJTO_READ,
            Register::ColdJunctionMsb => CJTH_READ,
            Register::ColdJunctionLsb => CJTL_READ,
            Register::ThermocoupleByte2 => LTCBH_READ,
            Register::ThermocoupleByte1 => LTCBM_READ,
            Register::ThermocoupleByte0 => LTCBL_READ,
            Register::Status => SR_READ,
        }
    }

    /// `None` for the read-only temperature and status registers.
    pub const fn write_address(self) -> Option<u8> {
        match self {
            Register::Cr0 => Some(CR0_WRITE),
            Register::Cr1 => Some(CR1_WRITE),
            Register::Mask => Some(MASK_WRITE),
            Register::ColdJunctionHighFault => Some(CJHF_WRITE),
            Register::ColdJunctionLowFault => Some(CJLF_WRITE),
            Register::ThermocoupleHighFaultMsb => Some(LTHFTH_WRITE),
            Register::ThermocoupleHighFaultLsb => Some(LTHFTL_WRITE),
            Register::ThermocoupleLowFaultMsb => Some(LTLFTH_WRITE),
            Register::ThermocoupleLowFaultLsb => Some(LTLFTL_WRITE),
            Register::ColdJunctionOffset => Some(CJTO_WRITE),
            Register::ColdJunctionMsb => Some(CJTH_WRITE),
            Register::ColdJunctionLsb => Some(CJTL_WRITE),
            Register::ThermocoupleByte2
            | Register::ThermocoupleByte1
            | Register::ThermocoupleByte0
            | Register::Status => None,
        }
    }
}
