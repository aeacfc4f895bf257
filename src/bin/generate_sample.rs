use std::fs;

/// Output directory, matching the dashboard's configured archive location.
const DATA_DIR: &str = "data/FIRMS/modis-c6.1/Russia_Asia";

/// Cluster centres for synthetic fire activity: (latitude, longitude).
const HUBS: &[(f64, f64)] = &[
    (55.7558, 37.6173),  // Moscow
    (56.0153, 92.8932),  // Krasnoyarsk
    (52.2869, 104.3050), // Irkutsk
    (48.4827, 135.0838), // Khabarovsk
];

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: u64) -> u64 {
        (self.next_f64() * n as f64) as u64
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    fs::create_dir_all(DATA_DIR).expect("Failed to create data directory");

    let mut total = 0usize;
    for year in [2020u32, 2021] {
        let path = format!("{DATA_DIR}/modis_{year}_Russia_Asia.csv");
        let mut writer = csv::Writer::from_path(&path).expect("Failed to create output file");
        writer
            .write_record([
                "latitude",
                "longitude",
                "brightness",
                "scan",
                "track",
                "acq_date",
                "acq_time",
                "confidence",
            ])
            .expect("Failed to write header");

        for &(hub_lat, hub_lon) in HUBS {
            for _ in 0..400 {
                // Fire season peaks mid-year; off-season detections are rare
                // and dim.
                let month = 1 + rng.below(12) as i32;
                let seasonal = f64::from(6 - (month - 7).abs()) / 6.0;
                let brightness = (rng.gauss(300.0 + 45.0 * seasonal, 18.0)).max(265.0);
                // Confidence tracks brightness.
                let confidence = ((brightness - 270.0) * 1.1 + rng.gauss(0.0, 8.0))
                    .clamp(0.0, 100.0) as u32;

                let day = 1 + rng.below(28) as u32;
                let hour = rng.below(24);
                let minute = rng.below(60);

                writer
                    .write_record([
                        format!("{:.4}", rng.gauss(hub_lat, 0.6)),
                        format!("{:.4}", rng.gauss(hub_lon, 0.9)),
                        format!("{brightness:.1}"),
                        format!("{:.1}", 1.0 + rng.next_f64() * 3.0),
                        format!("{:.1}", 1.0 + rng.next_f64()),
                        format!("{year}-{month:02}-{day:02}"),
                        format!("{:04}", hour * 100 + minute),
                        confidence.to_string(),
                    ])
                    .expect("Failed to write record");
                total += 1;
            }
        }
        writer.flush().expect("Failed to flush output");
        println!("Wrote {path}");
    }

    println!("Generated {total} synthetic detections under {DATA_DIR}");
}
