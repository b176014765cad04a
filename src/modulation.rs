/// A read-only view of one audio-rate modulation (CV) input.
///
/// This is intentionally lightweight:
/// - no ownership
/// - no allocation
/// - "not connected" is a variant, not a null pointer
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ModInput<'a> {
    /// Nothing patched in. The parameter stays at its block-rate value.
    #[default]
    Disconnected,

    /// One value per sample.
    Audio(&'a [f32]),
}

impl<'a> ModInput<'a> {
    /// Wrap an optional buffer, as handed over by a host.
    #[inline]
    pub fn from_option(buf: Option<&'a [f32]>) -> Self {
        match buf {
            Some(buf) => ModInput::Audio(buf),
            None => ModInput::Disconnected,
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, ModInput::Audio(_))
    }

    /// Modulation value at `frame`, or `None` when disconnected.
    ///
    /// Frames past the end of a short buffer read as disconnected.
    #[inline]
    pub fn value_audio(&self, frame: usize) -> Option<f32> {
        match *self {
            ModInput::Disconnected => None,
            ModInput::Audio(buf) => buf.get(frame).copied(),
        }
    }
}

impl<'a> From<&'a [f32]> for ModInput<'a> {
    fn from(buf: &'a [f32]) -> Self {
        ModInput::Audio(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_has_no_values() {
        let input = ModInput::default();
        assert!(!input.is_connected());
        assert_eq!(input.value_audio(0), None);
    }

    #[test]
    fn audio_reads_per_frame_and_stops_at_the_end() {
        let buf = [0.25, -0.5];
        let input = ModInput::from_option(Some(&buf[..]));
        assert!(input.is_connected());
        assert_eq!(input.value_audio(1), Some(-0.5));
        assert_eq!(input.value_audio(2), None);
    }
}
