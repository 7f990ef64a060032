use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_file_path, shellexpand_path};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    save_settings(&settings)?;

    println!("Settings:   {}", settings_file_path().display());
    println!("Data dir:   {}", resolved.display());
    println!();
    println!("Put income.csv, house.csv, chicken.csv and gas.csv from FRED in the data dir,");
    println!("or run `wage-explore demo` to write sample files.");
    Ok(())
}
