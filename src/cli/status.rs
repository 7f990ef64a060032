use crate::dataset::DataContext;
use crate::error::Result;
use crate::fmt::money;
use crate::models::ALL_SOURCES;
use crate::settings::{load_settings, resolve_data_dir, settings_file_path};

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let dir = resolve_data_dir(&settings, data_dir);
    let settings_path = settings_file_path();

    println!(
        "Settings:   {}{}",
        settings_path.display(),
        if settings_path.exists() { "" } else { " (defaults)" }
    );
    println!("Data dir:   {}", dir.display());
    println!("Aggregate:  {:?}", settings.aggregate);
    println!();

    for &kind in ALL_SOURCES {
        let spec = settings.sources.get(kind);
        let path = dir.join(&spec.file);
        let state = if path.exists() { "ok" } else { "missing" };
        println!(
            "{:<9}{:<16}{:<8}{} / {}",
            kind.key(),
            spec.file,
            state,
            spec.date_column,
            spec.value_column
        );
    }

    let a = &settings.assumptions;
    println!();
    println!(
        "Housing:    {:.0}% of the price over {} years",
        a.occupancy_fraction * 100.0,
        a.loan_term_years
    );
    println!("Gas:        {} miles per gallon", a.miles_per_gallon);
    println!("Chicken:    {} meals per pound", a.meals_per_pound);
    println!();

    match DataContext::load(&dir, &settings.sources, settings.aggregate) {
        Ok(ctx) => {
            if let Some((first, last)) = ctx.year_range() {
                println!("Years:      {first}-{last} ({} joined)", ctx.len());
            }
            if let Some(latest) = ctx.records().last() {
                println!(
                    "Latest:     {} income {}, monthly housing {}",
                    latest.year,
                    money(latest.income),
                    money(a.monthly_housing(latest.house))
                );
            }
        }
        Err(e) => {
            println!("Data not loadable: {e}");
            println!("Run `wage-explore demo` for sample files.");
        }
    }
    Ok(())
}
