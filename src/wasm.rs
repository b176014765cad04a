//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { vcf_init, WebFilter } from './vcf.js';
//!
//! await init();
//! vcf_init();
//!
//! const filter = new WebFilter("lowpass", 48000);
//! filter.set_freq(800);
//! filter.set_reso(0.3);
//!
//! // In an AudioWorklet
//! filter.process(inputs[0][0], outputs[0][0]);
//! filter.process_modulated(input, output, sweep, undefined, undefined);
//! ```

use log::info;
use wasm_bindgen::prelude::*;

use crate::filter::VcfFilter;
use crate::modulation::ModInput;
use crate::parameter::FilterParams;
use crate::topology::Topology;

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn vcf_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

/// Names accepted by the `WebFilter` constructor.
#[wasm_bindgen]
pub fn topology_names() -> Vec<String> {
    Topology::ALL.iter().map(|t| t.name().to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Filter
// ═══════════════════════════════════════════════════════════════════════════

/// One mono filter with block-rate settings held between calls.
#[wasm_bindgen]
pub struct WebFilter {
    inner: VcfFilter,
    gain: f32,
    freq: f32,
    pitch: f32,
    reso: f32,
    db_gain: f32,
}

#[wasm_bindgen]
impl WebFilter {
    /// Create an active filter. Fails on an unknown topology name or a bad
    /// sample rate.
    #[wasm_bindgen(constructor)]
    pub fn new(topology: &str, sample_rate: f64) -> Result<WebFilter, JsValue> {
        let topology: Topology = topology
            .parse()
            .map_err(|e: crate::error::VcfError| JsValue::from_str(&e.to_string()))?;
        let mut inner =
            VcfFilter::new(topology, sample_rate).map_err(|e| JsValue::from_str(&e.to_string()))?;
        inner.activate();
        info!("WebFilter {} at {} Hz", topology, sample_rate);

        let defaults = FilterParams::default();
        Ok(WebFilter {
            inner,
            gain: defaults.gain,
            freq: defaults.freq_offset,
            pitch: defaults.freq_pitch,
            reso: defaults.reso_offset,
            db_gain: defaults.db_gain_offset,
        })
    }

    pub fn topology(&self) -> String {
        self.inner.topology().name().to_string()
    }

    pub fn sample_rate(&self) -> f64 {
        self.inner.sample_rate()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block-rate parameters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Base frequency in Hz.
    pub fn set_freq(&mut self, hz: f32) {
        self.freq = hz;
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    pub fn set_reso(&mut self, reso: f32) {
        self.reso = reso;
    }

    /// Shelf/peak gain in dB. Ignored by the other topologies.
    pub fn set_db_gain(&mut self, db: f32) {
        self.db_gain = db;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Processing
    // ─────────────────────────────────────────────────────────────────────────

    /// Filter one block with block-rate parameters only.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let params = self.params();
        self.inner.process(&params, input, output);
    }

    /// Filter one block with optional per-sample modulation buffers.
    pub fn process_modulated(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        freq_mod: Option<Vec<f32>>,
        reso_mod: Option<Vec<f32>>,
        db_gain_mod: Option<Vec<f32>>,
    ) {
        let mut params = self.params();
        params.freq_mod = ModInput::from_option(freq_mod.as_deref());
        params.reso_mod = ModInput::from_option(reso_mod.as_deref());
        params.db_gain_mod = ModInput::from_option(db_gain_mod.as_deref());
        self.inner.process(&params, input, output);
    }

    /// Clear the filter memory.
    pub fn reset(&mut self) {
        self.inner.activate();
    }
}

impl WebFilter {
    fn params<'a>(&self) -> FilterParams<'a> {
        FilterParams::new()
            .gain(self.gain)
            .freq(self.freq)
            .pitch(self.pitch)
            .reso(self.reso)
            .db_gain(self.db_gain)
    }
}
