//! Writes a deterministic sample street-tree dataset for local use:
//! `cargo run --bin generate_sample [output.csv]`

use anyhow::{Context, Result};

const GENERA: [(&str, &[&str]); 6] = [
    ("ACER", &["RUBRUM", "PLATANOIDES", "CAMPESTRE"]),
    ("PRUNUS", &["SERRULATA", "CERASIFERA"]),
    ("QUERCUS", &["ROBUR", "PALUSTRIS"]),
    ("FRAXINUS", &["AMERICANA"]),
    ("TILIA", &["CORDATA", "AMERICANA"]),
    ("CARPINUS", &["BETULUS"]),
];

const NEIGHBOURHOODS: [&str; 6] = [
    "KITSILANO",
    "DOWNTOWN",
    "SUNSET",
    "MARPOLE",
    "KERRISDALE",
    "FAIRVIEW",
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let u = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + u * (hi - lo)
    }

    fn pick(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn main() -> Result<()> {
    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_trees.csv".to_string());

    let mut rng = SimpleRng::new(20260827);
    let mut wtr = csv::Writer::from_path(&out).with_context(|| format!("creating {out}"))?;

    wtr.write_record([
        "tree_id",
        "genus_name",
        "species_name",
        "neighbourhood_name",
        "latitude",
        "longitude",
        "date_planted",
    ])?;

    for id in 1..=2000u64 {
        let (genus, species_list) = GENERA[rng.pick(GENERA.len())];
        let species = species_list[rng.pick(species_list.len())];
        let hood = NEIGHBOURHOODS[rng.pick(NEIGHBOURHOODS.len())];

        // A few percent of rows are incomplete, so the preparation
        // step's row dropping is visible on the sample data.
        let missing_date = rng.pick(100) < 3;
        let missing_coords = rng.pick(100) < 2;

        let date = if missing_date {
            String::new()
        } else {
            format!(
                "{:04}-{:02}-{:02}",
                1990 + rng.pick(31),
                1 + rng.pick(12),
                1 + rng.pick(28)
            )
        };
        let (lat, lon) = if missing_coords {
            (String::new(), String::new())
        } else {
            (
                format!("{:.6}", rng.uniform(49.2005, 49.2895)),
                format!("{:.6}", rng.uniform(-123.1995, -123.0005)),
            )
        };

        wtr.write_record([
            id.to_string(),
            genus.to_string(),
            species.to_string(),
            hood.to_string(),
            lat,
            lon,
            date,
        ])?;
    }

    wtr.flush()?;
    println!("wrote 2000 sample rows to {out}");
    Ok(())
}
