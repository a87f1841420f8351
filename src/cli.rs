//! Command-line interface: argument parsing and the `stats` / `seed`
//! console commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::city::CityInput;
use crate::repository::{CityRepository, RepositoryError};

/// cityd — City CRUD API over a JSON file.
#[derive(Parser, Debug)]
#[command(name = "cityd")]
#[command(about = "REST service exposing CRUD over a JSON-file-backed city collection")]
#[command(version)]
pub struct Cli {
    /// Path of the JSON file holding the collection.
    #[arg(long, default_value = "cities.json", env = "CITYD_DATA_FILE", value_name = "PATH")]
    pub data_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:3000", env = "CITYD_LISTEN")]
        listen: String,
        /// API key clients must send in the X-API-KEY header.
        #[arg(long, env = "CITYD_API_KEY")]
        api_key: String,
    },
    /// Print statistics about the stored cities.
    Stats,
    /// Append randomly generated cities to the collection.
    Seed {
        /// How many cities to generate.
        #[arg(long, default_value_t = 20)]
        count: usize,
    },
}

/// Print collection statistics: count, population totals, oldest and
/// newest city by founding date.
pub fn stats(repo: &CityRepository) -> Result<(), RepositoryError> {
    let cities = repo.all()?;

    if cities.is_empty() {
        println!("No cities found.");
        return Ok(());
    }

    let count = cities.len();
    let total_population: u64 = cities.iter().map(|city| city.population).sum();
    let average_population = total_population / count as u64;

    // Zero-padded ISO dates order correctly as strings.
    let oldest = cities.iter().min_by(|a, b| a.founded_at.cmp(&b.founded_at));
    let newest = cities.iter().max_by(|a, b| a.founded_at.cmp(&b.founded_at));

    println!("City Database Statistics");
    println!("{:<22} {}", "Total Cities", count);
    println!("{:<22} {}", "Total Population", total_population);
    println!("{:<22} {}", "Average Population", average_population);
    if let Some(city) = oldest {
        println!("{:<22} {} ({})", "Oldest City", city.name, city.founded_at);
    }
    if let Some(city) = newest {
        println!("{:<22} {} ({})", "Newest City", city.name, city.founded_at);
    }

    Ok(())
}

const SEED_NAMES: &[&str] = &[
    "Ravenport", "Stonebridge", "Eastmere", "Northvale", "Goldharbor", "Ashfield",
    "Westbrook", "Oakhaven", "Silvermoor", "Redcliffe", "Brightwater", "Thornbury",
];

const SEED_COUNTRIES: &[&str] = &[
    "Japan", "UK", "USA", "Spain", "France", "Germany", "Brazil", "India", "Canada", "Kenya",
];

/// Append `count` randomly generated cities.
pub fn seed(repo: &CityRepository, count: usize) -> Result<(), RepositoryError> {
    println!("Seeding {count} cities...");

    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let name = SEED_NAMES.choose(&mut rng).copied().unwrap_or("Ravenport");
        let country = SEED_COUNTRIES.choose(&mut rng).copied().unwrap_or("UK");
        let year: u32 = rng.gen_range(800..2000);
        let month: u32 = rng.gen_range(1..=12);
        let day: u32 = rng.gen_range(1..=28);

        repo.create(CityInput {
            name: name.to_string(),
            country: country.to_string(),
            population: rng.gen_range(100_000..10_000_000),
            founded_at: format!("{year:04}-{month:02}-{day:02}"),
        })?;
    }

    println!("Cities seeded successfully!");
    Ok(())
}
