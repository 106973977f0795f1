//! Channels eligible for generator control.
//!
//! Only these parameter paths are ever walked; anything else in a parameter
//! map is left alone by `start`.

/// Number of allow-listed generator channels.
pub const N_TARGETS: usize = 26;

/// Parameter paths the generator may drive, grouped by synth section.
pub const GENERATOR_TARGETS: [&str; N_TARGETS] = [
    // reverb
    "poly/reverb/mix",
    "poly/reverb/size",
    "poly/reverb/diff",
    "poly/reverb/jitter",
    "poly/reverb/damp",
    "poly/reverb/chorus",
    "poly/reverb/feedback",
    // overdrive
    "poly/overdrive/mix",
    "poly/overdrive/drive",
    // delay
    "poly/delay/wet",
    "poly/delay/stereo-delay",
    "poly/delay/feedback",
    // oscillator levels
    "osc1",
    "osc2",
    "osc3",
    // tremolo
    "poly/trem/depth",
    "poly/trem/rate",
    "poly/trem/spread",
    // envelope
    "poly/adsr/attack",
    "poly/adsr/delay",
    "poly/adsr/sustain",
    "poly/adsr/release",
    // filters
    "poly/filter1/q",
    "poly/filter1/freq",
    "poly/filter2/q",
    "poly/filter2/freq",
];

/// `true` if `name` is one of the [`GENERATOR_TARGETS`].
#[inline]
pub fn is_generator_target(name: &str) -> bool {
    GENERATOR_TARGETS.contains(&name)
}
