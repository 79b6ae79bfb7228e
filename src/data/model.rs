use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Observation – one row of the source table
// ---------------------------------------------------------------------------

/// One country-year record with its health/education/economic indicators.
///
/// Missing numeric cells are stored as `f64::NAN`; aggregations skip them.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub life_expectancy: f64,
    pub population: f64,
    pub schooling: f64,
    pub gdp: f64,
    pub measles: f64,
    pub hepatitis_b: f64,
    pub polio: f64,
    pub hiv_aids: f64,
    pub income_composition: f64,
}

// ---------------------------------------------------------------------------
// Indicator – the numeric columns, by name
// ---------------------------------------------------------------------------

/// The numeric indicator columns of an [`Observation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    LifeExpectancy,
    Population,
    Schooling,
    Gdp,
    Measles,
    HepatitisB,
    Polio,
    HivAids,
    IncomeComposition,
}

impl Indicator {
    /// Column header in the source spreadsheet.
    pub fn source_column(self) -> &'static str {
        match self {
            Indicator::LifeExpectancy => "Expectativa_de_vida",
            Indicator::Population => "População",
            Indicator::Schooling => "Escolaridade",
            Indicator::Gdp => "PIB",
            Indicator::Measles => "Sarampo",
            Indicator::HepatitisB => "Hepatite_B",
            Indicator::Polio => "Poliomielite",
            Indicator::HivAids => "HIV/AIDS",
            Indicator::IncomeComposition => "Composição_de_renda",
        }
    }

    /// Human-readable label used in chart titles and table headers.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::LifeExpectancy => "Life expectancy",
            Indicator::Population => "Population",
            Indicator::Schooling => "Schooling",
            Indicator::Gdp => "GDP",
            Indicator::Measles => "Measles cases",
            Indicator::HepatitisB => "Hepatitis B coverage",
            Indicator::Polio => "Polio coverage",
            Indicator::HivAids => "HIV/AIDS deaths",
            Indicator::IncomeComposition => "Income composition",
        }
    }

    /// Read this indicator's value from a row.
    pub fn value(self, obs: &Observation) -> f64 {
        match self {
            Indicator::LifeExpectancy => obs.life_expectancy,
            Indicator::Population => obs.population,
            Indicator::Schooling => obs.schooling,
            Indicator::Gdp => obs.gdp,
            Indicator::Measles => obs.measles,
            Indicator::HepatitisB => obs.hepatitis_b,
            Indicator::Polio => obs.polio,
            Indicator::HivAids => obs.hiv_aids,
            Indicator::IncomeComposition => obs.income_composition,
        }
    }

    /// All indicators in source-column order.
    pub const ALL: [Indicator; 9] = [
        Indicator::LifeExpectancy,
        Indicator::Population,
        Indicator::Schooling,
        Indicator::Gdp,
        Indicator::Measles,
        Indicator::HepatitisB,
        Indicator::Polio,
        Indicator::HivAids,
        Indicator::IncomeComposition,
    ];
}

/// Source column holding the country name.
pub const COUNTRY_COLUMN: &str = "País";
/// Source column holding the year.
pub const YEAR_COLUMN: &str = "Ano";

// ---------------------------------------------------------------------------
// HealthDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed country list and year bounds.
#[derive(Debug, Clone)]
pub struct HealthDataset {
    /// All observations (rows), in file order. Duplicate (country, year)
    /// pairs are allowed and aggregate together.
    pub rows: Vec<Observation>,
    /// Sorted unique country names.
    pub countries: Vec<String>,
    /// Smallest year present in the data.
    pub year_min: i32,
    /// Largest year present in the data.
    pub year_max: i32,
}

impl HealthDataset {
    /// Build the country index and year bounds from the loaded rows.
    pub fn from_rows(rows: Vec<Observation>) -> Self {
        let countries: Vec<String> = rows
            .iter()
            .map(|o| o.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let year_min = rows.iter().map(|o| o.year).min().unwrap_or(0);
        let year_max = rows.iter().map(|o| o.year).max().unwrap_or(0);

        HealthDataset {
            rows,
            countries,
            year_min,
            year_max,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
