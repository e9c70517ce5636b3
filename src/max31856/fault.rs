use super::registers::*;

/// Decoded fault status register (0x0F).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatus {
    /// Cold-junction temperature outside the thermocouple type's range
    pub cold_junction_range: bool,
    /// Thermocouple temperature outside the thermocouple type's range
    pub thermocouple_range: bool,
    pub cold_junction_high: bool,
    pub cold_junction_low: bool,
    pub thermocouple_high: bool,
    pub thermocouple_low: bool,
    /// Input over- or under-voltage, set when a thermocouple lead is shorted
    /// to ground or to the supply.
    pub over_under_voltage: bool,
    pub open_circuit: bool,
}

impl FaultStatus {
    pub fn from_register(reg: u8) -> Self {
        FaultStatus {
            cold_junction_range: reg & SR_CJ_RANGE != 0,
            thermocouple_range: reg & SR_TC_RANGE != 0,
            cold_junction_high: reg & SR_CJ_HIGH != 0,
            cold_junction_low: reg & SR_CJ_LOW != 0,
            thermocouple_high: reg & SR_TC_HIGH != 0,
            thermocouple_low: reg & SR_TC_LOW != 0,
            over_under_voltage: reg & SR_OVUV != 0,
            open_circuit: reg & SR_OPEN != 0,
        }
    }

    /// The chip does not tell the two shorts apart, both raise OVUV.
    pub fn short_to_ground(&self) -> bool {
        self.over_under_voltage
    }

    pub fn short_to_supply(&self) -> bool {
        self.over_under_voltage
    }

    /// Any fault bit set.
    pub fn has_fault(&self) -> bool {
        self.cold_junction_range
            || self.thermocouple_range
            || self.cold_junction_high
            || self.cold_junction_low
            || self.thermocouple_high
            || self.thermocouple_low
            || self.over_under_voltage
            || self.open_circuit
    }
}

impl From<u8> for FaultStatus {
    fn from(reg: u8) -> Self {
        FaultStatus::from_register(reg)
    }
}
