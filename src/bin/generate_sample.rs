use std::fmt::Write as _;

use anyhow::{Context, Result};

/// Layers of the synthetic site: (top m, bottom m, Vs m/s, density g/cm³).
const SITE: [(f64, f64, f64, f64); 4] = [
    (0.0, 6.0, 180.0, 1.8),
    (6.0, 18.0, 320.0, 1.9),
    (18.0, 40.0, 520.0, 2.0),
    (40.0, 100.0, 900.0, 2.2),
];

// The two functions below mirror `ApproxVelocityModel` in src/solver.rs
// (same ratio, wave factor 2). This binary is built without the editor's
// modules, so a change to that model must be repeated here.
const RAYLEIGH_RATIO: f64 = 0.92;
const WAVE_FACTOR: f64 = 2.0;

/// Travel-time average Vs from the surface down to `depth`.
fn average_vs(depth: f64) -> f64 {
    let mut time = 0.0;
    for (i, &(top, bottom, vs, _)) in SITE.iter().enumerate() {
        if top >= depth {
            break;
        }
        let bottom = if i + 1 == SITE.len() { depth } else { bottom.min(depth) };
        time += (bottom - top) / vs;
    }
    depth / time
}

/// Rough fundamental-mode phase velocity at `period` (half-wavelength rule).
fn phase_velocity(period: f64) -> f64 {
    let mut c = RAYLEIGH_RATIO * SITE[0].2;
    for _ in 0..50 {
        c = 0.5 * (c + RAYLEIGH_RATIO * average_vs((c * period / WAVE_FACTOR).max(1e-3)));
    }
    c
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Seven columns per line; frequency in column 2, slowness in column 4.
fn pick_file(rng: &mut SimpleRng) -> String {
    let mut out = String::new();
    for (i, frequency) in (0..60).map(|k| 5.0 + k as f64 * 0.75).enumerate() {
        let velocity = phase_velocity(1.0 / frequency) * (1.0 + rng.gauss(0.0, 0.02));
        let _ = writeln!(
            out,
            "{i} 0 {frequency:.4} {velocity:.4} {:.8} 1.0 0",
            1.0 / velocity
        );
    }
    out
}

/// `depth density ignore velocity`, two nodes per layer.
fn model_file() -> String {
    SITE.iter()
        .flat_map(|&(top, bottom, vs, rho)| {
            [
                format!("{top:.3} {rho:.3} 0.000 {vs:.3}"),
                format!("{bottom:.3} {rho:.3} 0.000 {vs:.3}"),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let picks_path = "sample_picks.pck";
    std::fs::write(picks_path, pick_file(&mut rng)).with_context(|| format!("writing {picks_path}"))?;

    let model_path = "sample_velocity_model.txt";
    std::fs::write(model_path, model_file()).with_context(|| format!("writing {model_path}"))?;

    println!(
        "Wrote 60 picks to {picks_path} and a {}-layer model to {model_path}",
        SITE.len()
    );
    Ok(())
}
