// src/port_info.rs
//
// Port metadata for hosts: ranges, defaults and display units.

use std::fmt;

use crate::consts::{DBGAIN_MAX, DBGAIN_MIN, MAX_FREQ, MIN_FREQ, Q_MAX, Q_MIN};
use crate::parameter::{DEFAULT_DBGAIN, DEFAULT_FREQ, DEFAULT_GAIN, DEFAULT_PITCH, DEFAULT_RESO};

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    #[default]
    None,
    /// Hertz (frequency)
    Hz,
    /// Decibels (gain)
    Db,
}

impl fmt::Display for ParamUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamUnit::None => Ok(()),
            ParamUnit::Hz => write!(f, "Hz"),
            ParamUnit::Db => write!(f, "dB"),
        }
    }
}

/// How the host feeds a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    AudioInput,
    AudioOutput,
    /// One value per block.
    Control,
    /// One value per sample; may be left unconnected.
    Cv,
}

/// What a port means to the filter, independent of its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRole {
    Input,
    Output,
    Gain,
    FreqOffset,
    FreqPitch,
    FreqCv,
    ResoOffset,
    ResoCv,
    DbGainOffset,
    DbGainCv,
}

impl PortRole {
    pub const COUNT: usize = 10;

    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }
}

/// Metadata describing one port of a plugin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortInfo {
    pub index: u32,
    pub role: PortRole,
    pub kind: PortKind,
    /// Stable identifier, as a host would show in automation lanes.
    pub symbol: &'static str,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub unit: ParamUnit,
}

impl PortInfo {
    pub const fn new(index: u32, role: PortRole) -> Self {
        let (kind, symbol, name, min, max, default, unit) = match role {
            PortRole::Input => (PortKind::AudioInput, "input", "Input", 0.0, 0.0, 0.0, ParamUnit::None),
            PortRole::Output => (PortKind::AudioOutput, "output", "Output", 0.0, 0.0, 0.0, ParamUnit::None),
            PortRole::Gain => (PortKind::Control, "gain", "Gain", 0.0, 1.0, DEFAULT_GAIN, ParamUnit::None),
            PortRole::FreqOffset => (
                PortKind::Control,
                "freq_ofs",
                "Frequency Offset",
                MIN_FREQ as f32,
                MAX_FREQ as f32,
                DEFAULT_FREQ,
                ParamUnit::Hz,
            ),
            PortRole::FreqPitch => (
                PortKind::Control,
                "freq_pitch",
                "Frequency Pitch",
                -2.0,
                2.0,
                DEFAULT_PITCH,
                ParamUnit::None,
            ),
            PortRole::FreqCv => (PortKind::Cv, "freq_in", "Frequency CV", 0.0, 1.0, 0.0, ParamUnit::None),
            PortRole::ResoOffset => (
                PortKind::Control,
                "reso_ofs",
                "Resonance Offset",
                Q_MIN as f32,
                Q_MAX as f32,
                DEFAULT_RESO,
                ParamUnit::None,
            ),
            PortRole::ResoCv => (PortKind::Cv, "reso_in", "Resonance CV", -1.0, 1.0, 0.0, ParamUnit::None),
            PortRole::DbGainOffset => (
                PortKind::Control,
                "dBgain_ofs",
                "dB Gain Offset",
                DBGAIN_MIN as f32,
                DBGAIN_MAX as f32,
                DEFAULT_DBGAIN,
                ParamUnit::Db,
            ),
            PortRole::DbGainCv => (PortKind::Cv, "dBgain_in", "dB Gain CV", -1.0, 1.0, 0.0, ParamUnit::None),
        };
        Self {
            index,
            role,
            kind,
            symbol,
            name,
            min,
            max,
            default,
            unit,
        }
    }

    #[inline]
    pub fn is_control(&self) -> bool {
        self.kind == PortKind::Control
    }

    /// Clamp a value to the advertised range.
    ///
    /// The engine clamps on its own; this is for hosts and UIs.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Format a value for display.
    pub fn format(&self, value: f32) -> String {
        if self.unit == ParamUnit::None {
            format!("{:.3}", value)
        } else {
            format!("{:.3} {}", value, self.unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_fill_in_ranges() {
        let reso = PortInfo::new(5, PortRole::ResoOffset);
        assert_eq!(reso.kind, PortKind::Control);
        assert_eq!(reso.clamp(3.0), 1.0);
        assert_eq!(reso.clamp(0.0), 0.001);

        let freq = PortInfo::new(3, PortRole::FreqOffset);
        assert_eq!(freq.unit, ParamUnit::Hz);
        assert_eq!(freq.format(440.0), "440.000 Hz");
    }

    #[test]
    fn cv_ports_default_to_zero() {
        for role in [PortRole::FreqCv, PortRole::ResoCv, PortRole::DbGainCv] {
            let port = PortInfo::new(0, role);
            assert_eq!(port.kind, PortKind::Cv);
            assert_eq!(port.default, 0.0);
            assert!(!port.is_control());
        }
    }

    #[test]
    fn slots_are_distinct() {
        let roles = [
            PortRole::Input,
            PortRole::Output,
            PortRole::Gain,
            PortRole::FreqOffset,
            PortRole::FreqPitch,
            PortRole::FreqCv,
            PortRole::ResoOffset,
            PortRole::ResoCv,
            PortRole::DbGainOffset,
            PortRole::DbGainCv,
        ];
        let mut seen = [false; PortRole::COUNT];
        for role in roles {
            assert!(!seen[role.slot()]);
            seen[role.slot()] = true;
        }
    }
}
