use proptest::prelude::*;
use vcf::{
    BiquadCoeffs, DBGAIN_MAX, DBGAIN_MIN, DBGAIN_SCALE, FilterParams, MAX_FREQ, MIN_FREQ, Q_MAX,
    Q_MIN, ResolvedSample, Resolver, Topology, VcfFilter, raw_biquad,
};

const SR: f64 = 48_000.0;
const FRAMES: usize = 256;

fn topology_strategy() -> impl Strategy<Value = Topology> {
    prop::sample::select(Topology::ALL.to_vec())
}

fn run(topology: Topology, params: &FilterParams<'_>, input: &[f32]) -> Vec<f32> {
    let mut filter = VcfFilter::new(topology, SR).unwrap();
    filter.activate();
    let mut output = vec![0.0; input.len()];
    filter.process(params, input, &mut output);
    output
}

fn impulse() -> Vec<f32> {
    let mut v = vec![0.0; FRAMES];
    v[0] = 1.0;
    v
}

proptest! {
    #[test]
    fn a0_is_strictly_positive(
        topology in topology_strategy().prop_filter("biquads only", |t| !t.is_ladder()),
        freq in MIN_FREQ..=MAX_FREQ,
        q in Q_MIN..=Q_MAX,
        db in (DBGAIN_MIN - DBGAIN_SCALE)..=(DBGAIN_MAX + DBGAIN_SCALE),
    ) {
        let raw = raw_biquad(topology, SR, &ResolvedSample { freq, q, db_gain: Some(db) });
        prop_assert!(raw.is_some_and(|raw| raw.a0 > 0.0));
    }

    #[test]
    fn non_positive_freq_behaves_like_the_floor(
        topology in topology_strategy().prop_filter("biquads only", |t| !t.is_ladder()),
        freq in -50_000.0f32..=0.0,
    ) {
        let input = impulse();
        let clamped = run(topology, &FilterParams::new().freq(freq), &input);
        let floor = run(topology, &FilterParams::new().freq(MIN_FREQ as f32), &input);
        prop_assert_eq!(clamped, floor);
    }

    #[test]
    fn high_freq_saturates_at_the_ceiling(
        topology in topology_strategy().prop_filter("biquads only", |t| !t.is_ladder()),
        pitch in -2.0f32..=2.0,
        excess in 1.01f32..4.0,
    ) {
        let factor = vcf::pitch_factor(pitch);
        let freq = MAX_FREQ as f32 / factor * excess;
        let input = impulse();
        let saturated = run(topology, &FilterParams::new().freq(freq).pitch(pitch), &input);
        let ceiling = run(topology, &FilterParams::new().freq(MAX_FREQ as f32), &input);
        prop_assert_eq!(saturated, ceiling);
    }

    #[test]
    fn resonance_saturates_at_the_nearer_bound(
        topology in topology_strategy(),
        over in 1.0f32..100.0,
        under in -100.0f32..=0.0,
    ) {
        let input = impulse();
        let high = run(topology, &FilterParams::new().reso(over), &input);
        let max = run(topology, &FilterParams::new().reso(Q_MAX as f32), &input);
        prop_assert_eq!(high, max);

        let low = Resolver::new(topology, SR, &FilterParams::new().reso(under));
        prop_assert_eq!(low.block().q, Q_MIN);
        let low = run(topology, &FilterParams::new().reso(under), &input);
        let lower = run(topology, &FilterParams::new().reso(under - 1.0), &input);
        prop_assert_eq!(low, lower);
    }

    #[test]
    fn silence_in_silence_out(
        topology in topology_strategy(),
        freq in 0.0f32..30_000.0,
        reso in 0.0f32..2.0,
        db in DBGAIN_MIN as f32..=DBGAIN_MAX as f32,
        cv in prop::collection::vec(-1.0f32..=1.0, FRAMES),
    ) {
        let params = FilterParams::new()
            .freq(freq)
            .reso(reso)
            .db_gain(db)
            .freq_mod(&cv[..])
            .reso_mod(&cv[..])
            .db_gain_mod(&cv[..]);
        let output = run(topology, &params, &[0.0; FRAMES]);
        prop_assert!(output.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn zero_modulation_matches_the_block_rate_path(
        topology in topology_strategy(),
        freq in MIN_FREQ as f32..=MAX_FREQ as f32,
        reso in Q_MIN as f32..=Q_MAX as f32,
        db in DBGAIN_MIN as f32..=DBGAIN_MAX as f32,
        input in prop::collection::vec(-1.0f32..=1.0, FRAMES),
    ) {
        let zeros = [0.0f32; FRAMES];
        let base = FilterParams::new().freq(freq).reso(reso).db_gain(db);
        let modulated = base
            .freq_mod(&zeros[..])
            .reso_mod(&zeros[..])
            .db_gain_mod(&zeros[..]);

        prop_assert_eq!(run(topology, &base, &input), run(topology, &modulated, &input));
    }

    #[test]
    fn gain_scales_the_output(
        topology in topology_strategy(),
        freq in 100.0f32..10_000.0,
        reso in 0.01f32..0.5,
        gain in 0.1f32..1.0,
        k in 0.25f32..4.0,
        input in prop::collection::vec(-1.0f32..=1.0, FRAMES),
    ) {
        let params = FilterParams::new().freq(freq).reso(reso).gain(gain);
        let base = run(topology, &params, &input);
        let scaled = run(topology, &params.gain(gain * k), &input);

        let peak = base.iter().fold(1.0f32, |m, y| m.max(y.abs()));
        for (a, b) in base.iter().zip(&scaled) {
            prop_assert!((a * k - b).abs() <= 1e-4 * peak * k.max(1.0));
        }
    }
}

#[test]
fn lowpass_impulse_matches_closed_form() {
    let q = 0.707 / 32.0;
    let output = run(
        Topology::Lowpass,
        &FilterParams::new().freq(1_000.0).reso(q as f32),
        &impulse(),
    );

    // Reference coefficients straight from the cookbook, Q = 0.707.
    let w0 = 2.0 * std::f64::consts::PI * 1_000.0 / SR;
    let alpha = w0.sin() / (2.0 * 0.707);
    let a0 = 1.0 + alpha;
    let c = BiquadCoeffs {
        b0: (1.0 - w0.cos()) / 2.0 / a0,
        b1: (1.0 - w0.cos()) / a0,
        b2: (1.0 - w0.cos()) / 2.0 / a0,
        a1: -2.0 * w0.cos() / a0,
        a2: (1.0 - alpha) / a0,
    };

    // Complex-conjugate poles r·e^{±jθ}; g[n] is the all-pole impulse response.
    let r = c.a2.sqrt();
    let theta = (-c.a1 / (2.0 * r)).acos();
    let g = |n: i64| -> f64 {
        if n < 0 {
            0.0
        } else {
            r.powi(n as i32) * ((n + 1) as f64 * theta).sin() / theta.sin()
        }
    };

    for (n, &y) in output.iter().enumerate() {
        let n = n as i64;
        let expected = c.b0 * g(n) + c.b1 * g(n - 1) + c.b2 * g(n - 2);
        assert!(
            (y as f64 - expected).abs() < 1e-6,
            "n={n}: got {y}, expected {expected}"
        );
    }
}

#[test]
fn peak_eq_at_zero_db_is_identity() {
    let input: Vec<f32> = (0..FRAMES).map(|i| ((i * 7919) % 200) as f32 / 100.0 - 1.0).collect();
    let output = run(
        Topology::PeakEq,
        &FilterParams::new().freq(2_500.0).reso(0.3).db_gain(0.0),
        &input,
    );
    for (x, y) in input.iter().zip(&output) {
        assert!((x - y).abs() < 1e-6);
    }
}

#[test]
fn ladder_at_zero_frequency_stays_silent() {
    let mut filter = VcfFilter::new(Topology::ResonantLowpass, SR).unwrap();
    filter.activate();
    let params = FilterParams::new().freq(0.0).reso(1.0);
    let mut output = [1.0f32; FRAMES];
    for _ in 0..64 {
        filter.process(&params, &[0.0; FRAMES], &mut output);
        assert!(output.iter().all(|&y| y == 0.0));
    }
}
