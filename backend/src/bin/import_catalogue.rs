//! Import tag and ingredient fixtures into the catalogue tables.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;

use camino::Utf8PathBuf;
use catalogue_data::{CatalogueFixture, IngredientSeed, TagSeed};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;

use foodgram::domain::ports::CatalogueRepository;
use foodgram::domain::{CatalogueValidationError, NewIngredient, NewTag};
use foodgram::outbound::persistence::{
    DbPool, DieselCatalogueRepository, PoolConfig, run_pending_migrations,
};

/// `import-catalogue` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-catalogue",
    about = "Load tag and ingredient fixtures into the Foodgram catalogue",
    version
)]
struct CliArgs {
    /// Path to a JSON fixture, or a headed `tags.csv` / `ingredients.csv` export.
    #[arg(value_name = "path")]
    fixture: Utf8PathBuf,
    /// Database connection URL. Falls back to `FOODGRAM_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations before importing.
    #[arg(long)]
    migrate: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let fixture = CatalogueFixture::from_file(&args.fixture)
        .wrap_err_with(|| format!("load fixture {}", args.fixture))?;
    let tags = to_new_tags(fixture.tags())?;
    let ingredients = to_new_ingredients(fixture.ingredients())?;

    let database_url = resolve_database_url(args.database_url)?;
    if args.migrate {
        run_pending_migrations(&database_url)
            .await
            .wrap_err("apply migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;
    let repository = DieselCatalogueRepository::new(pool);

    let summary = repository
        .import(&tags, &ingredients)
        .await
        .wrap_err("import catalogue")?;

    println!("tags_added={}", summary.tags_added);
    println!("tags_existing={}", tags.len() - summary.tags_added);
    println!("ingredients_added={}", summary.ingredients_added);
    println!(
        "ingredients_existing={}",
        ingredients.len() - summary.ingredients_added
    );
    println!("duplicates_skipped={}", fixture.duplicates_skipped());
    Ok(())
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| env::var("FOODGRAM_DATABASE_URL").ok())
        .ok_or_else(|| eyre!("pass --database-url or set FOODGRAM_DATABASE_URL"))
}

fn to_new_tags(seeds: &[TagSeed]) -> Result<Vec<NewTag>> {
    seeds
        .iter()
        .map(|seed| {
            NewTag::new(&seed.name, &seed.slug).map_err(|err| rejected("tag", &seed.slug, err))
        })
        .collect()
}

fn to_new_ingredients(seeds: &[IngredientSeed]) -> Result<Vec<NewIngredient>> {
    seeds
        .iter()
        .map(|seed| {
            NewIngredient::new(&seed.name, &seed.measurement_unit)
                .map_err(|err| rejected("ingredient", &seed.name, err))
        })
        .collect()
}

fn rejected(kind: &str, label: &str, err: CatalogueValidationError) -> color_eyre::Report {
    eyre!("{kind} '{label}' rejected: {err}")
}
