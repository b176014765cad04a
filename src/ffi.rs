// C-compatible host glue, shaped after the LV2 plugin lifecycle.
//
// Safety requirements:
// - All handles must be created by this module and not fabricated
// - Connected buffers must stay valid for `sample_count` floats during `vcf_run`
// - CV buffers must not alias the output buffer (input/output may alias)
// - Caller must call `vcf_cleanup` for each successful instantiate

use std::ffi::{CStr, c_char};
use std::ptr;

use log::{debug, error, info, warn};

use crate::descriptor::{self, PluginDescriptor};
use crate::filter::VcfFilter;
use crate::modulation::ModInput;
use crate::parameter::FilterParams;
use crate::port_info::{PortKind, PortRole};

/// Frames per inner chunk. The input is copied through a stack buffer so the
/// host may run in place.
const RUN_CHUNK: usize = 256;

// Logger subsystem identifier
#[cfg(feature = "ios")]
const LOG_SUBSYSTEM: &str = "org.vcf-filters";

// ═══════════════════════════════════════════════════════════════════════════
// Logger Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the oslog logger.
///
/// Call once at startup, before any other function here. Messages appear in
/// Console.app and the Xcode debug console.
#[cfg(feature = "ios")]
#[unsafe(no_mangle)]
pub extern "C" fn vcf_init_logger() {
    oslog::OsLogger::new(LOG_SUBSYSTEM)
        .level_filter(log::LevelFilter::Debug)
        .init()
        .ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// Opaque Handle Types
// ═══════════════════════════════════════════════════════════════════════════

/// Opaque handle to one running plugin instance.
pub struct VcfInstance {
    descriptor: &'static PluginDescriptor,
    filter: VcfFilter,
    /// Connected host buffers, indexed by [`PortRole::slot`].
    ports: [*mut f32; PortRole::COUNT],
}

impl VcfInstance {
    fn new(descriptor: &'static PluginDescriptor, filter: VcfFilter) -> Self {
        Self {
            descriptor,
            filter,
            ports: [ptr::null_mut(); PortRole::COUNT],
        }
    }

    fn buffer(&self, role: PortRole) -> *mut f32 {
        self.ports[role.slot()]
    }

    /// Block-rate control value; an unconnected port reads its default.
    ///
    /// # Safety
    /// A connected control port must point at one readable float.
    unsafe fn control(&self, role: PortRole, fallback: f32) -> f32 {
        let p = self.buffer(role);
        if p.is_null() {
            self.descriptor
                .port_for(role)
                .map_or(fallback, |port| port.default)
        } else {
            unsafe { *p }
        }
    }

    /// # Safety
    /// See the module safety requirements.
    unsafe fn run(&mut self, frames: usize) {
        let output = self.buffer(PortRole::Output);
        if output.is_null() || frames == 0 {
            return;
        }
        let input = self.buffer(PortRole::Input);

        let defaults = FilterParams::default();
        let mut params = unsafe {
            FilterParams::new()
                .gain(self.control(PortRole::Gain, defaults.gain))
                .freq(self.control(PortRole::FreqOffset, defaults.freq_offset))
                .pitch(self.control(PortRole::FreqPitch, defaults.freq_pitch))
                .reso(self.control(PortRole::ResoOffset, defaults.reso_offset))
                .db_gain(self.control(PortRole::DbGainOffset, defaults.db_gain_offset))
        };
        let (freq_cv, reso_cv, db_gain_cv) = unsafe {
            (
                cv_buffer(self.buffer(PortRole::FreqCv), frames),
                cv_buffer(self.buffer(PortRole::ResoCv), frames),
                cv_buffer(self.buffer(PortRole::DbGainCv), frames),
            )
        };

        let mut scratch = [0.0_f32; RUN_CHUNK];
        let mut offset = 0;
        while offset < frames {
            let n = (frames - offset).min(RUN_CHUNK);
            let x = &mut scratch[..n];
            if input.is_null() {
                x.fill(0.0);
            } else {
                unsafe { ptr::copy(input.add(offset), x.as_mut_ptr(), n) };
            }

            params.freq_mod = ModInput::from_option(freq_cv.map(|b| &b[offset..offset + n]));
            params.reso_mod = ModInput::from_option(reso_cv.map(|b| &b[offset..offset + n]));
            params.db_gain_mod =
                ModInput::from_option(db_gain_cv.map(|b| &b[offset..offset + n]));

            let y = unsafe { std::slice::from_raw_parts_mut(output.add(offset), n) };
            self.filter.process(&params, x, y);
            offset += n;
        }
    }
}

/// # Safety
/// A non-null `p` must point at `frames` readable floats that outlive `'a`.
unsafe fn cv_buffer<'a>(p: *const f32, frames: usize) -> Option<&'a [f32]> {
    if p.is_null() {
        None
    } else {
        Some(unsafe { std::slice::from_raw_parts(p, frames) })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Descriptor Table
// ═══════════════════════════════════════════════════════════════════════════

/// Number of published plugins.
#[unsafe(no_mangle)]
pub extern "C" fn vcf_descriptor_count() -> u32 {
    descriptor::descriptor_count()
}

/// URI of the plugin at `index`, or NULL past the end.
///
/// The string is static and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn vcf_descriptor_uri(index: u32) -> *const c_char {
    match descriptor::descriptor(index) {
        Ok(d) => d.uri.as_ptr(),
        Err(_) => ptr::null(),
    }
}

/// Number of ports of the plugin at `index`, or 0 past the end.
#[unsafe(no_mangle)]
pub extern "C" fn vcf_descriptor_port_count(index: u32) -> u32 {
    descriptor::descriptor(index).map_or(0, |d| d.ports.len() as u32)
}

// ═══════════════════════════════════════════════════════════════════════════
// Instance Lifecycle
// ═══════════════════════════════════════════════════════════════════════════

fn instantiate(d: &'static PluginDescriptor, sample_rate: f64) -> *mut VcfInstance {
    match d.instantiate(sample_rate) {
        Ok(filter) => {
            info!("instantiate {} at {} Hz", d.uri(), sample_rate);
            Box::into_raw(Box::new(VcfInstance::new(d, filter)))
        }
        Err(e) => {
            error!("instantiate {}: {}", d.uri(), e);
            ptr::null_mut()
        }
    }
}

/// Create an inactive instance of the plugin at `index`.
///
/// Returns NULL for an unknown index or an invalid sample rate.
#[unsafe(no_mangle)]
pub extern "C" fn vcf_instantiate(index: u32, sample_rate: f64) -> *mut VcfInstance {
    match descriptor::descriptor(index) {
        Ok(d) => instantiate(d, sample_rate),
        Err(e) => {
            warn!("{}", e);
            ptr::null_mut()
        }
    }
}

/// Create an inactive instance by plugin URI.
///
/// # Safety
/// `uri` must be a valid null-terminated string or NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vcf_instantiate_uri(
    uri: *const c_char,
    sample_rate: f64,
) -> *mut VcfInstance {
    if uri.is_null() {
        return ptr::null_mut();
    }
    let Ok(uri) = (unsafe { CStr::from_ptr(uri) }).to_str() else {
        warn!("plugin URI is not valid UTF-8");
        return ptr::null_mut();
    };
    match descriptor::find_descriptor(uri) {
        Ok(d) => instantiate(d, sample_rate),
        Err(_) => ptr::null_mut(),
    }
}

/// Attach a host buffer to a port. Passing NULL disconnects it.
///
/// Unknown port indices are ignored.
///
/// # Safety
/// `instance` must come from `vcf_instantiate*`. `data` must stay valid until
/// it is replaced or the instance is cleaned up.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vcf_connect_port(instance: *mut VcfInstance, port: u32, data: *mut f32) {
    if instance.is_null() {
        return;
    }
    let instance = unsafe { &mut *instance };
    match instance.descriptor.port(port) {
        Some(info) => {
            debug!(
                "connect {} port {} ({}){}",
                instance.descriptor.name,
                port,
                info.symbol,
                if data.is_null() { " -> none" } else { "" }
            );
            instance.ports[info.role.slot()] = data;
        }
        None => warn!(
            "{} has no port {}; ignoring connection",
            instance.descriptor.name, port
        ),
    }
}

/// Zero the filter memory.
///
/// # Safety
/// `instance` must come from `vcf_instantiate*`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vcf_activate(instance: *mut VcfInstance) {
    if instance.is_null() {
        return;
    }
    let instance = unsafe { &mut *instance };
    debug!("activate {}", instance.descriptor.name);
    instance.filter.activate();
}

/// # Safety
/// `instance` must come from `vcf_instantiate*`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vcf_deactivate(instance: *mut VcfInstance) {
    if instance.is_null() {
        return;
    }
    let instance = unsafe { &mut *instance };
    debug!("deactivate {}", instance.descriptor.name);
    instance.filter.deactivate();
}

/// Process `sample_count` frames from the connected buffers.
///
/// A missing output makes this a no-op; a missing input reads as silence.
///
/// # Safety
/// `instance` must come from `vcf_instantiate*`. Every connected audio and CV
/// buffer must hold at least `sample_count` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vcf_run(instance: *mut VcfInstance, sample_count: u32) {
    if instance.is_null() {
        return;
    }
    unsafe { (*instance).run(sample_count as usize) };
}

/// Destroy an instance.
///
/// # Safety
/// `instance` must come from `vcf_instantiate*` and must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vcf_cleanup(instance: *mut VcfInstance) {
    if instance.is_null() {
        return;
    }
    let instance = unsafe { Box::from_raw(instance) };
    info!("cleanup {}", instance.descriptor.uri());
}

/// Whether a port of the plugin at `index` carries per-sample modulation.
#[unsafe(no_mangle)]
pub extern "C" fn vcf_port_is_cv(index: u32, port: u32) -> bool {
    descriptor::descriptor(index)
        .ok()
        .and_then(|d| d.port(port))
        .is_some_and(|p| p.kind == PortKind::Cv)
}
