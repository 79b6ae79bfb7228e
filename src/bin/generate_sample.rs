use std::sync::Arc;

use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
}

/// Per-country baselines: (life expectancy, population, schooling, GDP,
/// hepatitis B coverage, polio coverage, HIV/AIDS deaths, income composition).
const COUNTRIES: &[(&str, f64, f64, f64, f64, f64, f64, f64, f64)] = &[
    ("Angola", 52.0, 23.0e6, 9.0, 3500.0, 70.0, 72.0, 2.1, 0.50),
    ("Brasil", 73.0, 195.0e6, 11.5, 11000.0, 95.0, 97.0, 0.3, 0.72),
    ("Chile", 79.0, 17.5e6, 15.0, 13500.0, 96.0, 96.0, 0.1, 0.84),
    ("Moçambique", 54.0, 25.0e6, 8.5, 600.0, 76.0, 80.0, 4.5, 0.41),
    ("Portugal", 80.0, 10.5e6, 16.0, 22000.0, 97.0, 98.0, 0.2, 0.83),
];

const YEARS: std::ops::RangeInclusive<i32> = 2000..=2015;

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut countries: Vec<String> = Vec::new();
    let mut years: Vec<i32> = Vec::new();
    let mut life: Vec<f64> = Vec::new();
    let mut population: Vec<f64> = Vec::new();
    let mut schooling: Vec<f64> = Vec::new();
    let mut gdp: Vec<f64> = Vec::new();
    let mut measles: Vec<f64> = Vec::new();
    let mut hep_b: Vec<f64> = Vec::new();
    let mut polio: Vec<f64> = Vec::new();
    let mut hiv: Vec<f64> = Vec::new();
    let mut income: Vec<f64> = Vec::new();

    for &(name, le, pop, school, pib, hb, pol, aids, renda) in COUNTRIES {
        for year in YEARS {
            // Slow improvement over the years plus noise.
            let t = (year - 2000) as f64;

            countries.push(name.to_string());
            years.push(year);
            life.push(rng.gauss(le + 0.2 * t, 0.4));
            population.push(pop * (1.0 + 0.012 * t) * (1.0 + rng.gauss(0.0, 0.002)));
            schooling.push(rng.gauss(school + 0.08 * t, 0.15));
            gdp.push(rng.gauss(pib * (1.0 + 0.03 * t), pib * 0.04));
            // Outbreak years spike the case count.
            let outbreak = if rng.next_f64() < 0.15 { 8.0 } else { 1.0 };
            measles.push((rng.gauss(400.0, 150.0) * outbreak).max(0.0).round());
            hep_b.push(rng.gauss(hb + 0.3 * t, 1.5).clamp(0.0, 99.0));
            polio.push(rng.gauss(pol + 0.2 * t, 1.2).clamp(0.0, 99.0));
            hiv.push(rng.gauss(aids * (1.0 - 0.02 * t), 0.05).max(0.01));
            income.push(rng.gauss(renda + 0.004 * t, 0.01).clamp(0.0, 1.0));
        }
    }

    let n_rows = countries.len();

    // Build Arrow arrays
    let country_array = StringArray::from(countries.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let year_array = Int32Array::from(years.clone());
    let life_array = Float64Array::from(life.clone());
    let pop_array = Float64Array::from(population.clone());
    let school_array = Float64Array::from(schooling.clone());
    let gdp_array = Float64Array::from(gdp.clone());
    let measles_array = Float64Array::from(measles.clone());
    let hep_b_array = Float64Array::from(hep_b.clone());
    let polio_array = Float64Array::from(polio.clone());
    let hiv_array = Float64Array::from(hiv.clone());
    let income_array = Float64Array::from(income.clone());

    let schema = Arc::new(Schema::new(vec![
        Field::new("País", DataType::Utf8, false),
        Field::new("Ano", DataType::Int32, false),
        Field::new("Expectativa_de_vida", DataType::Float64, false),
        Field::new("População", DataType::Float64, false),
        Field::new("Escolaridade", DataType::Float64, false),
        Field::new("PIB", DataType::Float64, false),
        Field::new("Sarampo", DataType::Float64, false),
        Field::new("Hepatite_B", DataType::Float64, false),
        Field::new("Poliomielite", DataType::Float64, false),
        Field::new("HIV/AIDS", DataType::Float64, false),
        Field::new("Composição_de_renda", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(country_array),
            Arc::new(year_array),
            Arc::new(life_array),
            Arc::new(pop_array),
            Arc::new(school_array),
            Arc::new(gdp_array),
            Arc::new(measles_array),
            Arc::new(hep_b_array),
            Arc::new(polio_array),
            Arc::new(hiv_array),
            Arc::new(income_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // Write the same rows as CSV
    let csv_path = "sample_data.csv";
    let mut csv = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    csv.write_record([
        "País",
        "Ano",
        "Expectativa_de_vida",
        "População",
        "Escolaridade",
        "PIB",
        "Sarampo",
        "Hepatite_B",
        "Poliomielite",
        "HIV/AIDS",
        "Composição_de_renda",
    ])
    .expect("Failed to write CSV header");
    for i in 0..n_rows {
        csv.write_record([
            countries[i].clone(),
            years[i].to_string(),
            format!("{:.1}", life[i]),
            format!("{:.0}", population[i]),
            format!("{:.1}", schooling[i]),
            format!("{:.2}", gdp[i]),
            format!("{:.0}", measles[i]),
            format!("{:.1}", hep_b[i]),
            format!("{:.1}", polio[i]),
            format!("{:.2}", hiv[i]),
            format!("{:.3}", income[i]),
        ])
        .expect("Failed to write CSV row");
    }
    csv.flush().expect("Failed to flush CSV");

    println!("Wrote {n_rows} observations to {parquet_path} and {csv_path}");
}
