use anyhow::{Context, Result};

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let incident_types = ["hurto", "lesiones", "riña", "accidente", "vandalismo"];
    let localities = ["Chapinero", "Kennedy", "Suba", "Usaquén", "Teusaquillo"];

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| incident_loader::DEFAULT_PATH.to_string());
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["id", "fecha", "tipo", "localidad", "latitud", "longitud"])?;

    let n_rows = 500;
    let mut missing = 0;
    for id in 0..n_rows {
        let day = 1 + rng.next_u64() % 28;
        let hour = rng.next_u64() % 24;
        let fecha = format!("2024-03-{day:02} {hour:02}:00");

        // Roughly one row in ten lacks a coordinate.
        let (lat, lon) = match rng.next_u64() % 20 {
            0 => (String::new(), format!("{:.5}", rng.uniform(-74.20, -74.00))),
            1 => (format!("{:.5}", rng.uniform(4.50, 4.80)), String::new()),
            _ => (
                format!("{:.5}", rng.uniform(4.50, 4.80)),
                format!("{:.5}", rng.uniform(-74.20, -74.00)),
            ),
        };
        if lat.is_empty() || lon.is_empty() {
            missing += 1;
        }

        writer.write_record([
            id.to_string(),
            fecha,
            rng.pick(&incident_types).to_string(),
            rng.pick(&localities).to_string(),
            lat,
            lon,
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {n_rows} incidents ({missing} without coordinates) to {output_path}");
    Ok(())
}
