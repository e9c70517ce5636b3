//! MAX31856 precision thermocouple-to-digital converter with linearization.
//!
//! - Cold-junction temperature resolution: 0.015625 C
//! - Thermocouple temperature resolution: 0.0078125 C
//! - Types: B, E, J, K, N, R, S, T
//!
//! The driver writes CR0 and CR1 on construction and only remembers what it
//! wrote there. Temperature reads are two or three independent register reads, so
//! a conversion finishing in between can tear a value. Nothing is retried.
//!
//! A handle is not synchronized. Share it between contexts behind a mutex.

use embedded_hal_1::delay::DelayNs;
use embedded_hal_1::digital::{InputPin, OutputPin};
use embedded_hal_1::spi::SpiDevice;

use crate::soft_spi::{self, SoftSpi, SoftSpiPins};

pub mod fault;
pub mod registers;
pub mod temperature;
pub mod transport;

pub use fault::FaultStatus;
pub use registers::Register;
pub use transport::{LegacySpiTransport, SpiTransport, Transport, CLOCK_HZ, FRAME_LEN, MODE};

use registers::*;

/// Worst-case one-shot conversion time with averaging off, 50Hz filter.
const ONE_SHOT_CONVERSION_MS: u32 = 250;

/// MAX31856 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Missing or incomplete construction parameters
    InvalidConfiguration,
    /// Bus error
    Transport(E),
    /// The bus returned a response of the wrong length
    ProtocolViolation { expected: usize, received: usize },
}

/// What went wrong, without the bus error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    InvalidConfiguration,
    TransportFailure,
    ProtocolViolation,
}

impl<E> Error<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidConfiguration => ErrorKind::InvalidConfiguration,
            Error::Transport(_) => ErrorKind::TransportFailure,
            Error::ProtocolViolation { .. } => ErrorKind::ProtocolViolation,
        }
    }
}

/// Thermocouple type, CR1 bits 2:0.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermocoupleType {
    B = TC_TYPE_B,
    E = TC_TYPE_E,
    J = TC_TYPE_J,
    K = TC_TYPE_K,
    N = TC_TYPE_N,
    R = TC_TYPE_R,
    S = TC_TYPE_S,
    T = TC_TYPE_T,
}

impl ThermocoupleType {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Default for ThermocoupleType {
    fn default() -> Self {
        ThermocoupleType::T
    }
}

/// Conversion mode, CR0 bits 7:6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionMode {
    /// Convert every ~100ms
    Continuous,
    /// Convert once, ~200ms, then stop
    OneShot,
}

impl ConversionMode {
    fn cr0_bits(&self) -> u8 {
        match self {
            ConversionMode::Continuous => CR0_CONTINUOUS,
            ConversionMode::OneShot => CR0_ONE_SHOT,
        }
    }
}

impl Default for ConversionMode {
    fn default() -> Self {
        ConversionMode::Continuous
    }
}

/// How faults drive the FAULT pin, CR0 bit 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultMode {
    /// FAULT follows the fault condition
    Comparator,
    /// FAULT latches until cleared with [`Max31856::clear_faults`]
    Interrupt,
}

impl Default for FaultMode {
    fn default() -> Self {
        FaultMode::Comparator
    }
}

/// Mains noise rejection, CR0 bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoiseFilter {
    Reject60Hz,
    Reject50Hz,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        NoiseFilter::Reject60Hz
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub thermocouple: ThermocoupleType,
    /// Averaging select code, see the CR1 table in the datasheet. 0 is a
    /// single sample.
    pub averaging: u8,
    pub conversion: ConversionMode,
    pub fault_mode: FaultMode,
    pub filter: NoiseFilter,
    /// Turn off the internal cold-junction sensor. CJTH/CJTL then take an
    /// externally measured temperature through `write_register`.
    pub external_cold_junction: bool,
}

impl Config {
    pub fn cr0(&self) -> u8 {
        let mut cr0 = self.conversion.cr0_bits();
        if self.fault_mode == FaultMode::Interrupt {
            cr0 |= CR0_FAULT_INTERRUPT;
        }
        if self.filter == NoiseFilter::Reject50Hz {
            cr0 |= CR0_FILTER_50HZ;
        }
        if self.external_cold_junction {
            cr0 |= CR0_CJ_DISABLED;
        }
        cr0
    }

    pub fn cr1(&self) -> u8 {
        (self.averaging << 1) | self.thermocouple.code()
    }
}

/// MAX31856 on any [`Transport`].
pub struct Max31856<T> {
    transport: T,
    config: Config,
}

impl<SPI: SpiDevice> Max31856<SpiTransport<SPI>> {
    /// Use a hardware SPI device. Configure it for [`MODE`] at no more than
    /// [`CLOCK_HZ`].
    pub fn new_hardware(spi: SPI, config: Config) -> Result<Self, Error<SPI::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("max31856: using hardware SPI");
        Self::new(SpiTransport::new(spi), config)
    }
}

impl<CLK, CS, MISO, MOSI, D, E> Max31856<SpiTransport<SoftSpi<CLK, CS, MISO, MOSI, D>>>
where
    E: core::fmt::Debug,
    CLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Bit-bang the bus on GPIOs. Fails with [`Error::InvalidConfiguration`]
    /// unless all four pins are given.
    pub fn new_software(
        pins: SoftSpiPins<CLK, CS, MISO, MOSI>,
        delay: D,
        config: Config,
    ) -> Result<Self, Error<soft_spi::Error<E>>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("max31856: using software SPI");
        let bus = SoftSpi::new(pins, delay).map_err(|e| match e {
            soft_spi::Error::MissingPin => Error::InvalidConfiguration,
            e => Error::Transport(e),
        })?;
        Self::new(SpiTransport::new(bus), config)
    }
}

impl<T: Transport> Max31856<T> {
    /// Bind the transport and write CR0 then CR1. Nothing is read back.
    pub fn new(transport: T, config: Config) -> Result<Self, Error<T::Error>> {
        let mut dev = Max31856 { transport, config };
        dev.configure()?;
        Ok(dev)
    }

    fn configure(&mut self) -> Result<(), Error<T::Error>> {
        self.write_register(CR0_WRITE, self.config.cr0())?;
        self.write_register(CR1_WRITE, self.config.cr1())
    }

    /// Settings last written to CR0/CR1.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn release(self) -> T {
        self.transport
    }

    /// Read one register by its read address (0x00..=0x0F).
    ///
    /// Low level: bypasses all decoding.
    pub fn read_register(&mut self, address: u8) -> Result<u8, Error<T::Error>> {
        let mut response = [0u8; FRAME_LEN];
        let received = self
            .transport
            .transfer(&[address, 0x00], &mut response)
            .map_err(Error::Transport)?;
        if received != FRAME_LEN {
            return Err(Error::ProtocolViolation {
                expected: FRAME_LEN,
                received,
            });
        }
        // nothing is clocked out while the address is shifted in
        let value = response[1];
        #[cfg(feature = "defmt")]
        defmt::trace!("max31856: read {=u8:#04x} = {=u8:#04x}", address, value);
        Ok(value)
    }

    /// Write one register by its write address (0x80..=0x8B).
    ///
    /// Low level: there is no acknowledgement, the write is assumed to land.
    pub fn write_register(&mut self, address: u8, value: u8) -> Result<(), Error<T::Error>> {
        let mut response = [0u8; FRAME_LEN];
        self.transport
            .transfer(&[address, value], &mut response)
            .map_err(Error::Transport)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("max31856: wrote {=u8:#04x} = {=u8:#04x}", address, value);
        Ok(())
    }

    /// Cold-junction (die) temperature in degrees Celsius.
    pub fn read_internal_temperature(&mut self) -> Result<f32, Error<T::Error>> {
        let msb = self.read_register(CJTH_READ)?;
        let lsb = self.read_register(CJTL_READ)?;
        let celsius = temperature::cold_junction_celsius(msb, lsb);
        #[cfg(feature = "defmt")]
        defmt::debug!("max31856: cold junction {} C", celsius);
        Ok(celsius)
    }

    /// Linearized thermocouple temperature in degrees Celsius.
    pub fn read_thermocouple_temperature(&mut self) -> Result<f32, Error<T::Error>> {
        let byte2 = self.read_register(LTCBH_READ)?;
        let byte1 = self.read_register(LTCBM_READ)?;
        let byte0 = self.read_register(LTCBL_READ)?;
        let celsius = temperature::thermocouple_celsius(byte2, byte1, byte0);
        #[cfg(feature = "defmt")]
        defmt::debug!("max31856: thermocouple {} C", celsius);
        Ok(celsius)
    }

    pub fn read_fault_status(&mut self) -> Result<FaultStatus, Error<T::Error>> {
        self.read_register(SR_READ).map(FaultStatus::from_register)
    }

    /// Start a single conversion. Leaves continuous mode if it was on, the
    /// other CR0 settings are kept.
    pub fn trigger_one_shot(&mut self) -> Result<(), Error<T::Error>> {
        let mut config = self.config;
        config.conversion = ConversionMode::OneShot;
        self.write_register(CR0_WRITE, config.cr0())?;
        self.config = config;
        Ok(())
    }

    /// Trigger a conversion, wait for it and read the thermocouple.
    pub fn read_thermocouple_one_shot<D: DelayNs>(&mut self, delay: &mut D) -> Result<f32, Error<T::Error>> {
        self.trigger_one_shot()?;
        delay.delay_ms(ONE_SHOT_CONVERSION_MS);
        self.read_thermocouple_temperature()
    }

    /// Clear latched faults. Only has an effect in [`FaultMode::Interrupt`].
    ///
    /// CR0 is rewritten with the current settings, without 1SHOT so no
    /// conversion is started.
    pub fn clear_faults(&mut self) -> Result<(), Error<T::Error>> {
        self.write_register(CR0_WRITE, (self.config.cr0() & !CR0_ONE_SHOT) | CR0_FAULTCLR)
    }

    /// Set bits mask the corresponding fault off the FAULT pin. See `MASK_*`.
    pub fn set_fault_mask(&mut self, mask: u8) -> Result<(), Error<T::Error>> {
        self.write_register(MASK_WRITE, mask)
    }

    /// Cold-junction fault window in whole degrees.
    pub fn set_cold_junction_thresholds(&mut self, low: i8, high: i8) -> Result<(), Error<T::Error>> {
        self.write_register(CJHF_WRITE, high as u8)?;
        self.write_register(CJLF_WRITE, low as u8)
    }

    /// Thermocouple fault window, 0.0625 C resolution.
    pub fn set_thermocouple_thresholds(&mut self, low: f32, high: f32) -> Result<(), Error<T::Error>> {
        let (msb, lsb) = temperature::threshold_bytes(high);
        self.write_register(LTHFTH_WRITE, msb)?;
        self.write_register(LTHFTL_WRITE, lsb)?;
        let (msb, lsb) = temperature::threshold_bytes(low);
        self.write_register(LTLFTH_WRITE, msb)?;
        self.write_register(LTLFTL_WRITE, lsb)
    }

    /// Added to the measured cold-junction temperature, 0.0625 C resolution.
    pub fn set_cold_junction_offset(&mut self, offset: f32) -> Result<(), Error<T::Error>> {
        self.write_register(CJTO_WRITE, temperature::offset_byte(offset))
    }

    /// Dump 0x00..=0x0F, for debugging.
    pub fn read_config_registers(&mut self) -> Result<[u8; 16], Error<T::Error>> {
        let mut regs = [0u8; 16];
        for (address, reg) in regs.iter_mut().enumerate() {
            *reg = self.read_register(address as u8)?;
        }
        Ok(regs)
    }
}
