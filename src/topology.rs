// src/topology.rs
//
// The nine filter responses and what each one lets modulation touch.

use std::fmt;
use std::str::FromStr;

use crate::error::VcfError;

/// Filter response, fixed for the lifetime of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Lowpass,
    Highpass,
    /// Band-pass with constant skirt gain (peak gain = Q).
    BandpassSkirt,
    /// Band-pass with constant 0 dB peak gain.
    BandpassPeak,
    Notch,
    LowShelf,
    HighShelf,
    /// Peaking (bell) equalizer.
    PeakEq,
    /// Two-stage one-pole feedback ladder. Not a biquad.
    ResonantLowpass,
}

/// Which parameters participate in per-sample recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModTargets {
    pub freq: bool,
    pub reso: bool,
    pub gain: bool,
}

impl Topology {
    pub const ALL: [Topology; 9] = [
        Topology::Lowpass,
        Topology::Highpass,
        Topology::BandpassSkirt,
        Topology::BandpassPeak,
        Topology::Notch,
        Topology::LowShelf,
        Topology::HighShelf,
        Topology::PeakEq,
        Topology::ResonantLowpass,
    ];

    /// Short machine name, as used in plugin URIs and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Topology::Lowpass => "lowpass",
            Topology::Highpass => "highpass",
            Topology::BandpassSkirt => "bandpass1",
            Topology::BandpassPeak => "bandpass2",
            Topology::Notch => "notch",
            Topology::LowShelf => "low_shelf",
            Topology::HighShelf => "high_shelf",
            Topology::PeakEq => "peak_eq",
            Topology::ResonantLowpass => "resonant_lowpass",
        }
    }

    /// Position in [`Topology::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the topology has a dB gain parameter (shelves and peaking EQ).
    #[inline]
    pub const fn uses_db_gain(self) -> bool {
        matches!(
            self,
            Topology::LowShelf | Topology::HighShelf | Topology::PeakEq
        )
    }

    #[inline]
    pub const fn is_ladder(self) -> bool {
        matches!(self, Topology::ResonantLowpass)
    }

    #[inline]
    pub const fn mod_targets(self) -> ModTargets {
        ModTargets {
            freq: true,
            reso: true,
            gain: self.uses_db_gain(),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topology {
    type Err = VcfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        let topology = match key.as_str() {
            "lowpass" | "lp" => Topology::Lowpass,
            "highpass" | "hp" => Topology::Highpass,
            "bandpass1" | "bandpass_skirt" => Topology::BandpassSkirt,
            "bandpass2" | "bandpass_peak" | "bp" => Topology::BandpassPeak,
            "notch" => Topology::Notch,
            "low_shelf" | "lowshelf" => Topology::LowShelf,
            "high_shelf" | "highshelf" => Topology::HighShelf,
            "peak_eq" | "peak" | "peaking" => Topology::PeakEq,
            "resonant_lowpass" | "ladder" => Topology::ResonantLowpass,
            _ => return Err(VcfError::UnknownTopology(s.to_string())),
        };
        Ok(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for topology in Topology::ALL {
            assert_eq!(topology.name().parse::<Topology>(), Ok(topology));
        }
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, topology) in Topology::ALL.into_iter().enumerate() {
            assert_eq!(topology.index(), i);
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert_eq!("Low-Shelf".parse::<Topology>(), Ok(Topology::LowShelf));
        assert_eq!("ladder".parse::<Topology>(), Ok(Topology::ResonantLowpass));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            "comb".parse::<Topology>(),
            Err(VcfError::UnknownTopology(name)) if name == "comb"
        ));
    }

    #[test]
    fn only_shelves_and_peak_modulate_gain() {
        let with_gain: Vec<_> = Topology::ALL
            .into_iter()
            .filter(|t| t.mod_targets().gain)
            .collect();
        assert_eq!(
            with_gain,
            vec![Topology::LowShelf, Topology::HighShelf, Topology::PeakEq]
        );
        assert!(Topology::ALL.iter().all(|t| t.mod_targets().freq && t.mod_targets().reso));
    }
}
