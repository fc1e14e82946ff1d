//! `tafsync locate`: find the descriptor for a model.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::WorkingCopyArgs;

/// Arguments for `tafsync locate`.
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Model number, e.g. `10000001`.
    pub model: String,

    #[command(flatten)]
    pub working_copy: WorkingCopyArgs,
}

impl LocateArgs {
    pub fn run(self) -> Result<()> {
        let store = self.working_copy.store();
        match store.find_by_model(Some(&self.model)) {
            Some(path) => println!("{}", path.display()),
            None => println!(
                "{} no descriptor for model '{}' under {}",
                "✗".red(),
                self.model,
                store.root().display()
            ),
        }
        Ok(())
    }
}
