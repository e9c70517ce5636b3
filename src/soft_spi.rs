//! Bit-banged SPI mode 1 master on four GPIOs.
//!
//! Clock idles low. Each bit is driven on the rising edge and sampled on the
//! falling edge, MSB first. The half period is sized for a 5 MHz clock; on
//! most MCUs GPIO toggling is slower than that anyway.

use embedded_hal_1::delay::DelayNs;
use embedded_hal_1::digital::{InputPin, OutputPin};
use embedded_hal_1::spi::{self, ErrorType, Operation, SpiDevice};

const HALF_PERIOD_NS: u32 = 100;

/// Pins for [`SoftSpi`]. Every pin must be supplied.
pub struct SoftSpiPins<CLK, CS, MISO, MOSI> {
    pub clk: Option<CLK>,
    pub cs: Option<CS>,
    /// Data out of the chip (SDO)
    pub miso: Option<MISO>,
    /// Data into the chip (SDI)
    pub mosi: Option<MOSI>,
}

impl<CLK, CS, MISO, MOSI> Default for SoftSpiPins<CLK, CS, MISO, MOSI> {
    fn default() -> Self {
        SoftSpiPins {
            clk: None,
            cs: None,
            miso: None,
            mosi: None,
        }
    }
}

impl<CLK, CS, MISO, MOSI> SoftSpiPins<CLK, CS, MISO, MOSI> {
    pub fn new(clk: CLK, cs: CS, miso: MISO, mosi: MOSI) -> Self {
        SoftSpiPins {
            clk: Some(clk),
            cs: Some(cs),
            miso: Some(miso),
            mosi: Some(mosi),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.clk.is_some() && self.cs.is_some() && self.miso.is_some() && self.mosi.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A pin was missing when building the bus.
    MissingPin,
    /// GPIO error
    Pin(E),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Pin(e)
    }
}

impl<E: core::fmt::Debug> spi::Error for Error<E> {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

pub struct SoftSpi<CLK, CS, MISO, MOSI, D> {
    clk: CLK,
    cs: CS,
    miso: MISO,
    mosi: MOSI,
    delay: D,
}

impl<CLK, CS, MISO, MOSI, D, E> SoftSpi<CLK, CS, MISO, MOSI, D>
where
    CLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Take the pins and park the bus: chip-select high, clock low.
    pub fn new(pins: SoftSpiPins<CLK, CS, MISO, MOSI>, delay: D) -> Result<Self, Error<E>> {
        let (clk, cs, miso, mosi) = match pins {
            SoftSpiPins {
                clk: Some(clk),
                cs: Some(cs),
                miso: Some(miso),
                mosi: Some(mosi),
            } => (clk, cs, miso, mosi),
            _ => return Err(Error::MissingPin),
        };
        let mut bus = SoftSpi {
            clk,
            cs,
            miso,
            mosi,
            delay,
        };
        bus.cs.set_high()?;
        bus.clk.set_low()?;
        Ok(bus)
    }

    pub fn release(self) -> (SoftSpiPins<CLK, CS, MISO, MOSI>, D) {
        (SoftSpiPins::new(self.clk, self.cs, self.miso, self.mosi), self.delay)
    }

    fn exchange(&mut self, out: u8) -> Result<u8, E> {
        let mut input = 0u8;
        for bit in (0..8).rev() {
            self.clk.set_high()?;
            if out & (1 << bit) != 0 {
                self.mosi.set_high()?;
            } else {
                self.mosi.set_low()?;
            }
            self.delay.delay_ns(HALF_PERIOD_NS);
            self.clk.set_low()?;
            if self.miso.is_high()? {
                input |= 1 << bit;
            }
            self.delay.delay_ns(HALF_PERIOD_NS);
        }
        Ok(input)
    }

    fn run(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), E> {
        for op in operations.iter_mut() {
            match op {
                Operation::Read(words) => {
                    for word in words.iter_mut() {
                        *word = self.exchange(0x00)?;
                    }
                }
                Operation::Write(words) => {
                    for word in words.iter() {
                        self.exchange(*word)?;
                    }
                }
                Operation::Transfer(read, write) => {
                    let len = read.len().max(write.len());
                    for i in 0..len {
                        let byte = self.exchange(write.get(i).copied().unwrap_or(0x00))?;
                        if let Some(slot) = read.get_mut(i) {
                            *slot = byte;
                        }
                    }
                }
                Operation::TransferInPlace(words) => {
                    for word in words.iter_mut() {
                        *word = self.exchange(*word)?;
                    }
                }
                Operation::DelayNs(ns) => self.delay.delay_ns(*ns),
            }
        }
        Ok(())
    }
}

impl<CLK, CS, MISO, MOSI, D, E> ErrorType for SoftSpi<CLK, CS, MISO, MOSI, D>
where
    E: core::fmt::Debug,
    CLK: OutputPin<Error = E>,
{
    type Error = Error<E>;
}

impl<CLK, CS, MISO, MOSI, D, E> SpiDevice for SoftSpi<CLK, CS, MISO, MOSI, D>
where
    E: core::fmt::Debug,
    CLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    MOSI: OutputPin<Error = E>,
    D: DelayNs,
{
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.cs.set_low()?;
        let result = self.run(operations);
        // deassert even when a pin failed mid-frame
        let deassert = self.cs.set_high();
        result?;
        deassert?;
        Ok(())
    }
}
