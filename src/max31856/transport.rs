//! Byte exchange with the chip.
//!
//! Every register access is one chip-select framed, full-duplex transfer of
//! two bytes: the address, then either the value to write or a dummy byte
//! while the register is clocked out.

use embedded_hal_02::blocking::spi::Transfer as LegacyTransfer;
use embedded_hal_02::digital::v2::OutputPin as LegacyOutputPin;
use embedded_hal_1::spi::{self, SpiDevice};

/// SPI mode 1: clock idles low, data is sampled on the trailing edge.
pub const MODE: spi::Mode = spi::MODE_1;

/// [`MODE`] for `embedded-hal` 0.2 buses.
pub const LEGACY_MODE: embedded_hal_02::spi::Mode = embedded_hal_02::spi::MODE_1;

/// Maximum serial clock.
pub const CLOCK_HZ: u32 = 5_000_000;

/// Bytes in one register access: address, data.
pub const FRAME_LEN: usize = 2;

/// A blocking, full-duplex byte exchange with the chip.
pub trait Transport {
    type Error;

    /// Shift `out` onto the bus inside one chip-select frame while capturing
    /// the incoming bytes into `response`.
    ///
    /// Returns how many bytes were received.
    fn transfer(&mut self, out: &[u8], response: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Hardware SPI through an `embedded-hal` 1.0 [`SpiDevice`], which owns
/// chip-select.
#[derive(Debug)]
pub struct SpiTransport<SPI> {
    spi: SPI,
}

impl<SPI> SpiTransport<SPI> {
    pub fn new(spi: SPI) -> Self {
        SpiTransport { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> Transport for SpiTransport<SPI> {
    type Error = SPI::Error;

    fn transfer(&mut self, out: &[u8], response: &mut [u8]) -> Result<usize, Self::Error> {
        let len = out.len().min(response.len());
        self.spi.transfer(&mut response[..len], out)?;
        Ok(len)
    }
}

/// Errors of an `embedded-hal` 0.2 bus and its chip-select pin.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LegacyError<SpiE, CsE> {
    Spi(SpiE),
    ChipSelect(CsE),
}

/// SPI through an `embedded-hal` 0.2 blocking bus plus a chip-select pin.
pub struct LegacySpiTransport<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS, SpiE, CsE> LegacySpiTransport<SPI, CS>
where
    SPI: LegacyTransfer<u8, Error = SpiE>,
    CS: LegacyOutputPin<Error = CsE>,
{
    /// Takes the bus and deasserts chip-select.
    pub fn new(spi: SPI, mut cs: CS) -> Result<Self, LegacyError<SpiE, CsE>> {
        cs.set_high().map_err(LegacyError::ChipSelect)?;
        Ok(LegacySpiTransport { spi, cs })
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Clock all of `out` through a frame-sized buffer. Returns the bytes the
    /// bus handed back, including those that did not fit in `response`.
    fn exchange(&mut self, out: &[u8], response: &mut [u8]) -> Result<usize, SpiE> {
        let mut received = 0;
        for chunk in out.chunks(FRAME_LEN) {
            let mut frame = [0u8; FRAME_LEN];
            let words = &mut frame[..chunk.len()];
            words.copy_from_slice(chunk);

            let words = self.spi.transfer(words)?;
            if let Some(dst) = response.get_mut(received..) {
                let n = words.len().min(dst.len());
                dst[..n].copy_from_slice(&words[..n]);
            }
            received += words.len();
        }
        Ok(received)
    }
}

impl<SPI, CS, SpiE, CsE> Transport for LegacySpiTransport<SPI, CS>
where
    SPI: LegacyTransfer<u8, Error = SpiE>,
    CS: LegacyOutputPin<Error = CsE>,
{
    type Error = LegacyError<SpiE, CsE>;

    fn transfer(&mut self, out: &[u8], response: &mut [u8]) -> Result<usize, Self::Error> {
        self.cs.set_low().map_err(LegacyError::ChipSelect)?;
        let result = self.exchange(out, response);
        // release the bus even if the transfer failed
        self.cs.set_high().map_err(LegacyError::ChipSelect)?;

        result.map_err(LegacyError::Spi)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::max31856::registers::*;
    use crate::max31856::{Config, Error, Max31856, ThermocoupleType};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use std::vec;

    #[test]
    fn mode_is_cpol0_cpha1() {
        assert_eq!(MODE.polarity, spi::Polarity::IdleLow);
        assert_eq!(MODE.phase, spi::Phase::CaptureOnSecondTransition);
    }

    #[test]
    fn spi_transport_exchanges_both_bytes() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer(vec![0x0A, 0x00], vec![0xFF, 0x19]),
            SpiTransaction::transaction_end(),
        ];
        let spi = SpiMock::new(&expectations);
        let mut transport = SpiTransport::new(spi);

        let mut response = [0u8; 2];
        assert_eq!(transport.transfer(&[0x0A, 0x00], &mut response).unwrap(), 2);
        assert_eq!(response, [0xFF, 0x19]);

        transport.release().done();
    }

    #[test]
    fn spi_transport_reports_short_response_buffer() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer(vec![0x0A, 0x00], vec![0xFF]),
            SpiTransaction::transaction_end(),
        ];
        let spi = SpiMock::new(&expectations);
        let mut transport = SpiTransport::new(spi);

        let mut response = [0u8; 1];
        assert_eq!(transport.transfer(&[0x0A, 0x00], &mut response).unwrap(), 1);

        transport.release().done();
    }

    /// 0.2 bus that echoes each byte back inverted, or fails.
    struct InvertingBus {
        fail: bool,
    }

    impl LegacyTransfer<u8> for InvertingBus {
        type Error = ();

        fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], ()> {
            if self.fail {
                return Err(());
            }
            for w in words.iter_mut() {
                *w = !*w;
            }
            Ok(words)
        }
    }

    #[derive(Default)]
    struct CsLog {
        levels: std::vec::Vec<bool>,
    }

    impl LegacyOutputPin for CsLog {
        type Error = ();

        fn set_low(&mut self) -> Result<(), ()> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), ()> {
            self.levels.push(true);
            Ok(())
        }
    }

    #[test]
    fn legacy_transport_frames_with_chip_select() {
        let mut transport = LegacySpiTransport::new(InvertingBus { fail: false }, CsLog::default()).unwrap();

        let mut response = [0u8; 2];
        assert_eq!(transport.transfer(&[0x0F, 0x00], &mut response).unwrap(), 2);
        assert_eq!(response, [0xF0, 0xFF]);

        let (_, cs) = transport.release();
        assert_eq!(cs.levels, vec![true, false, true]);
    }

    #[test]
    fn legacy_transport_releases_chip_select_on_error() {
        let mut transport = LegacySpiTransport::new(InvertingBus { fail: true }, CsLog::default()).unwrap();

        let mut response = [0u8; 2];
        assert!(matches!(
            transport.transfer(&[0x0F, 0x00], &mut response),
            Err(LegacyError::Spi(()))
        ));

        let (_, cs) = transport.release();
        assert_eq!(cs.levels, vec![true, false, true]);
    }

    #[test]
    fn legacy_transport_streams_long_output() {
        let mut transport = LegacySpiTransport::new(InvertingBus { fail: false }, CsLog::default()).unwrap();

        let mut response = [0u8; 3];
        let out = [0x00, 0x01, 0x02, 0x03, 0x04];
        assert_eq!(transport.transfer(&out, &mut response).unwrap(), 5);
        assert_eq!(response, [0xFF, 0xFE, 0xFD]);

        let (_, cs) = transport.release();
        assert_eq!(cs.levels, vec![true, false, true]);
    }

    /// 0.2 bus wired to a MAX31856 register file.
    #[derive(Default)]
    struct LegacyChip {
        regs: [u8; 16],
    }

    impl LegacyTransfer<u8> for LegacyChip {
        type Error = ();

        fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], ()> {
            let reg = usize::from(words[0] & !WRITE_BIT);
            if words[0] & WRITE_BIT != 0 {
                self.regs[reg] = words[1];
            }
            words[0] = 0x00;
            words[1] = self.regs[reg];
            Ok(words)
        }
    }

    #[test]
    fn driver_over_legacy_bus() {
        let mut chip = LegacyChip::default();
        chip.regs[CJTH_READ as usize] = 0x19;
        let transport = LegacySpiTransport::new(chip, CsLog::default()).unwrap();
        let config = Config {
            thermocouple: ThermocoupleType::K,
            ..Config::default()
        };

        let mut dev = Max31856::new(transport, config).unwrap();
        assert_eq!(dev.read_internal_temperature().unwrap(), 25.0);

        let (chip, cs) = dev.release().release();
        assert_eq!(chip.regs[CR0_READ as usize], CR0_CONTINUOUS);
        assert_eq!(chip.regs[CR1_READ as usize], TC_TYPE_K);
        // idle, then CR0, CR1, CJTH, CJTL frames
        assert_eq!(
            cs.levels,
            vec![true, false, true, false, true, false, true, false, true]
        );
    }

    /// 0.2 bus that hands back fewer words than it was given.
    struct ShortBus;

    impl LegacyTransfer<u8> for ShortBus {
        type Error = ();

        fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], ()> {
            Ok(&words[..words.len() / 2])
        }
    }

    #[test]
    fn short_legacy_response_is_protocol_violation() {
        let transport = LegacySpiTransport::new(ShortBus, CsLog::default()).unwrap();
        let mut dev = Max31856::new(transport, Config::default()).unwrap();
        assert!(matches!(
            dev.read_register(SR_READ),
            Err(Error::ProtocolViolation { expected: 2, received: 1 })
        ));
    }
}
