//! Built-in pulse composition for running without a microphone.

/// Glicol composition: a decaying low thump on a half-second grid with
/// randomly skipped hits, loud enough to cross the default threshold.
pub const GLICOL_COMPOSITION: &str = r#"
~gate: speed 2.0 >> seq 45 _45 _~a 45
~a: choose 45 45 45 57 0 0
~amp: ~gate >> envperc 0.001 0.25
~pit: ~gate >> mul 110.0
~thump: sin ~pit >> mul ~amp >> mul 0.95
o: ~thump
"#;

/// Gain applied to the synth before it reaches the speakers. The analysis
/// buffer sees the full-scale signal.
pub const MONITOR_GAIN: f32 = 0.5;
