// src/descriptor.rs
//
// Plugin registration table.
//
// Every topology is published twice: a plain variant with block-rate controls
// only, and a `_cv` variant that adds audio-rate modulation inputs. The table is
// immutable static data; nothing is built lazily.

use std::ffi::CStr;

use log::warn;

use crate::error::{VcfError, VcfResult};
use crate::filter::VcfFilter;
use crate::port_info::{PortInfo, PortRole};
use crate::topology::Topology;

/// Description of one published filter plugin.
#[derive(Debug)]
pub struct PluginDescriptor {
    /// NUL-terminated so it can be handed straight to C hosts.
    pub uri: &'static CStr,
    pub name: &'static str,
    pub topology: Topology,
    /// Whether the plugin exposes CV (audio-rate modulation) ports.
    pub cv: bool,
    pub ports: &'static [PortInfo],
}

impl PluginDescriptor {
    pub fn uri(&self) -> &'static str {
        self.uri.to_str().unwrap_or_default()
    }

    pub fn port(&self, index: u32) -> Option<&'static PortInfo> {
        self.ports.get(index as usize)
    }

    pub fn port_for(&self, role: PortRole) -> Option<&'static PortInfo> {
        self.ports.iter().find(|p| p.role == role)
    }

    /// Create an inactive filter for this plugin.
    pub fn instantiate(&self, sample_rate: f64) -> VcfResult<VcfFilter> {
        VcfFilter::new(self.topology, sample_rate)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Port layouts
// ═══════════════════════════════════════════════════════════════════

static BASIC_PORTS: [PortInfo; 6] = [
    PortInfo::new(0, PortRole::Input),
    PortInfo::new(1, PortRole::Output),
    PortInfo::new(2, PortRole::Gain),
    PortInfo::new(3, PortRole::FreqOffset),
    PortInfo::new(4, PortRole::FreqPitch),
    PortInfo::new(5, PortRole::ResoOffset),
];

static SHELF_PORTS: [PortInfo; 7] = [
    PortInfo::new(0, PortRole::Input),
    PortInfo::new(1, PortRole::Output),
    PortInfo::new(2, PortRole::Gain),
    PortInfo::new(3, PortRole::FreqOffset),
    PortInfo::new(4, PortRole::FreqPitch),
    PortInfo::new(5, PortRole::ResoOffset),
    PortInfo::new(6, PortRole::DbGainOffset),
];

static BASIC_CV_PORTS: [PortInfo; 8] = [
    PortInfo::new(0, PortRole::Input),
    PortInfo::new(1, PortRole::Output),
    PortInfo::new(2, PortRole::Gain),
    PortInfo::new(3, PortRole::FreqOffset),
    PortInfo::new(4, PortRole::FreqPitch),
    PortInfo::new(5, PortRole::FreqCv),
    PortInfo::new(6, PortRole::ResoOffset),
    PortInfo::new(7, PortRole::ResoCv),
];

static SHELF_CV_PORTS: [PortInfo; 10] = [
    PortInfo::new(0, PortRole::Input),
    PortInfo::new(1, PortRole::Output),
    PortInfo::new(2, PortRole::Gain),
    PortInfo::new(3, PortRole::FreqOffset),
    PortInfo::new(4, PortRole::FreqPitch),
    PortInfo::new(5, PortRole::FreqCv),
    PortInfo::new(6, PortRole::ResoOffset),
    PortInfo::new(7, PortRole::ResoCv),
    PortInfo::new(8, PortRole::DbGainOffset),
    PortInfo::new(9, PortRole::DbGainCv),
];

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

macro_rules! registry {
    ($($topology:ident, $name:literal, $uri:literal, $uri_cv:literal, $ports:ident, $ports_cv:ident;)*) => {
        [$(
            PluginDescriptor {
                uri: $uri,
                name: $name,
                topology: Topology::$topology,
                cv: false,
                ports: &$ports,
            },
            PluginDescriptor {
                uri: $uri_cv,
                name: concat!($name, " CV"),
                topology: Topology::$topology,
                cv: true,
                ports: &$ports_cv,
            },
        )*]
    };
}

/// All published plugins, in host enumeration order: plain then CV, per topology,
/// in [`Topology::ALL`] order.
static DESCRIPTORS: [PluginDescriptor; 18] = registry! {
    Lowpass, "Lowpass",
        c"urn:vcf-filters:lowpass", c"urn:vcf-filters:lowpass_cv",
        BASIC_PORTS, BASIC_CV_PORTS;
    Highpass, "Highpass",
        c"urn:vcf-filters:highpass", c"urn:vcf-filters:highpass_cv",
        BASIC_PORTS, BASIC_CV_PORTS;
    BandpassSkirt, "Bandpass (constant skirt)",
        c"urn:vcf-filters:bandpass1", c"urn:vcf-filters:bandpass1_cv",
        BASIC_PORTS, BASIC_CV_PORTS;
    BandpassPeak, "Bandpass (constant peak)",
        c"urn:vcf-filters:bandpass2", c"urn:vcf-filters:bandpass2_cv",
        BASIC_PORTS, BASIC_CV_PORTS;
    Notch, "Notch",
        c"urn:vcf-filters:notch", c"urn:vcf-filters:notch_cv",
        BASIC_PORTS, BASIC_CV_PORTS;
    LowShelf, "Low Shelf",
        c"urn:vcf-filters:low_shelf", c"urn:vcf-filters:low_shelf_cv",
        SHELF_PORTS, SHELF_CV_PORTS;
    HighShelf, "High Shelf",
        c"urn:vcf-filters:high_shelf", c"urn:vcf-filters:high_shelf_cv",
        SHELF_PORTS, SHELF_CV_PORTS;
    PeakEq, "Peaking EQ",
        c"urn:vcf-filters:peak_eq", c"urn:vcf-filters:peak_eq_cv",
        SHELF_PORTS, SHELF_CV_PORTS;
    ResonantLowpass, "Resonant Lowpass",
        c"urn:vcf-filters:resonant_lowpass", c"urn:vcf-filters:resonant_lowpass_cv",
        BASIC_PORTS, BASIC_CV_PORTS;
};

pub fn descriptors() -> impl Iterator<Item = &'static PluginDescriptor> {
    DESCRIPTORS.iter()
}

pub fn descriptor_count() -> u32 {
    DESCRIPTORS.len() as u32
}

pub fn descriptor(index: u32) -> VcfResult<&'static PluginDescriptor> {
    DESCRIPTORS
        .get(index as usize)
        .ok_or(VcfError::UnknownDescriptor(index))
}

pub fn find_descriptor(uri: &str) -> VcfResult<&'static PluginDescriptor> {
    descriptors().find(|d| d.uri() == uri).ok_or_else(|| {
        warn!("no plugin registered for {uri}");
        VcfError::UnknownUri(uri.to_string())
    })
}

/// The descriptor for a topology, plain or CV.
pub fn descriptor_for(topology: Topology, cv: bool) -> &'static PluginDescriptor {
    &DESCRIPTORS[topology.index() * 2 + cv as usize]
}
