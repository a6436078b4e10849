//! The `tutorkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use tutorkit_core::bank::parse_bank;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = parse_bank(&bank_path)?;
    if bank.is_empty() {
        anyhow::bail!("bank '{}' contains no questions", bank.id);
    }
    println!(
        "OK: bank '{}' ({}) with {} questions",
        bank.id,
        bank.name,
        bank.len()
    );
    Ok(())
}
