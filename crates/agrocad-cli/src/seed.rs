//! # Seed Subcommand
//!
//! Emits a JSON fixture of producers and farms for local development. All
//! generated data passes the registry's own rules: documents carry valid
//! check digits, areas respect the land-use invariant, and crop lists hold
//! no duplicate (kind, harvest) pairs.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Args;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use agrocad_core::document::{self, generate_with};
use agrocad_core::DocumentKind;
use agrocad_model::{Crop, CropKind, FarmAreas, HarvestYear, Uf};

const FIRST_NAMES: [&str; 8] = [
    "Maria", "João", "Ana", "Carlos", "Fernanda", "Paulo", "Luiza", "Rafael",
];

const SURNAMES: [&str; 8] = [
    "Silva", "Souza", "Oliveira", "Santos", "Pereira", "Costa", "Almeida", "Ribeiro",
];

const CITIES: [&str; 8] = [
    "Campinas",
    "Rondonópolis",
    "Uberlândia",
    "Londrina",
    "Barreiras",
    "Dourados",
    "Rio Verde",
    "Sorriso",
];

/// Arguments for the `agrocad seed` subcommand.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// How many producers to generate.
    #[arg(long, default_value_t = 10)]
    pub producers: usize,

    /// How many farms per producer.
    #[arg(long, default_value_t = 2)]
    pub farms_per_producer: usize,

    /// Write the fixture here instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Seed for the random generator, for reproducible fixtures.
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SeedAddress {
    street: String,
    city: String,
    state: String,
    zip_code: String,
}

#[derive(Debug, Serialize)]
struct SeedProducer {
    id: Uuid,
    document: String,
    name: String,
    email: String,
    phone: String,
    address: SeedAddress,
}

#[derive(Debug, Serialize)]
struct SeedFarm {
    id: Uuid,
    producer_id: Uuid,
    name: String,
    city: String,
    state: String,
    total_area: f64,
    agricultural_area: f64,
    vegetation_area: f64,
    crops: Vec<Crop>,
}

#[derive(Debug, Serialize)]
struct SeedFixture {
    producers: Vec<SeedProducer>,
    farms: Vec<SeedFarm>,
}

/// Execute the seed subcommand.
pub fn run_seed(args: &SeedArgs) -> Result<u8> {
    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let fixture = build_fixture(args.producers, args.farms_per_producer, &mut rng)?;
    let json = serde_json::to_string_pretty(&fixture).context("failed to serialize fixture")?;

    match &args.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(json.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                producers = fixture.producers.len(),
                farms = fixture.farms.len(),
                path = %path.display(),
                "fixture written"
            );
        }
        None => println!("{json}"),
    }

    Ok(0)
}

fn build_fixture(
    producer_count: usize,
    farms_per_producer: usize,
    rng: &mut StdRng,
) -> Result<SeedFixture> {
    let mut producers = Vec::with_capacity(producer_count);
    let mut farms = Vec::with_capacity(producer_count * farms_per_producer);
    let mut seen_documents = std::collections::HashSet::new();

    for i in 0..producer_count {
        // Alternate between natural persons and companies.
        let kind = if i % 2 == 0 {
            DocumentKind::Cpf
        } else {
            DocumentKind::Cnpj
        };
        let mut doc = generate_with(kind, rng);
        while !seen_documents.insert(doc.clone()) {
            doc = generate_with(kind, rng);
        }

        let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Maria");
        let last = SURNAMES.choose(rng).copied().unwrap_or("Silva");
        let name = match kind {
            DocumentKind::Cpf => format!("{first} {last}"),
            DocumentKind::Cnpj => format!("Agropecuária {last} Ltda"),
        };
        let email = format!(
            "{}.{}{}@example.com.br",
            first.to_lowercase(),
            last.to_lowercase(),
            i
        );

        let producer = SeedProducer {
            id: Uuid::new_v4(),
            document: doc,
            name,
            email,
            phone: format!("+55 {} 9{:04}-{:04}", rng.gen_range(11..=99), rng.gen_range(0..10000u32), rng.gen_range(0..10000u32)),
            address: SeedAddress {
                street: format!("Rodovia BR-{}, km {}", rng.gen_range(100..400), rng.gen_range(1..300)),
                city: CITIES.choose(rng).copied().unwrap_or("Campinas").to_string(),
                state: random_uf(rng).as_str().to_string(),
                zip_code: format!("{:05}-{:03}", rng.gen_range(1000..99999), rng.gen_range(0..1000)),
            },
        };

        for f in 0..farms_per_producer {
            farms.push(build_farm(&producer, f, rng)?);
        }

        producers.push(producer);
    }

    Ok(SeedFixture { producers, farms })
}

fn build_farm(producer: &SeedProducer, index: usize, rng: &mut StdRng) -> Result<SeedFarm> {
    // Partition a random total so the invariant holds by construction.
    let total = rng.gen_range(50.0..20_000.0_f64).round();
    let agricultural = (total * rng.gen_range(0.3..0.7)).round();
    let vegetation = ((total - agricultural) * rng.gen_range(0.4..0.9)).round();
    let areas = FarmAreas::new(total, agricultural, vegetation)?;

    let current_year = Utc::now().year();
    let mut kinds = CropKind::ALL;
    kinds.shuffle(rng);
    let crops = kinds
        .iter()
        .take(rng.gen_range(1..=3))
        .map(|kind| {
            let harvest = HarvestYear::new(rng.gen_range(current_year - 2..=current_year))?;
            let planted = if rng.gen_bool(0.7) {
                Some((areas.agricultural * rng.gen_range(0.1..0.5)).round())
            } else {
                None
            };
            Crop::new(*kind, harvest, planted)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SeedFarm {
        id: Uuid::new_v4(),
        producer_id: producer.id,
        name: format!("Fazenda {} {}", SURNAMES[index % SURNAMES.len()], index + 1),
        city: producer.address.city.clone(),
        state: random_uf(rng).as_str().to_string(),
        total_area: areas.total,
        agricultural_area: areas.agricultural,
        vegetation_area: areas.vegetation,
        crops,
    })
}

fn random_uf(rng: &mut StdRng) -> Uf {
    *Uf::ALL.choose(rng).unwrap_or(&Uf::SP)
}
