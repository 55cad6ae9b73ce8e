use clap::Args;
use std::path::PathBuf;

use batch_replace::log_status;
use batch_replace::mapping::{Mapping, DEFAULT_MAPPING_FILE};
use batch_replace::replace::{self, ReplaceOptions, RunReport};
use batch_replace::Strategy;

use crate::commands::CmdResult;

#[derive(Args, Debug)]
pub struct ReplaceArgs {
    /// Root directory to process
    pub root: PathBuf,

    /// Mapping file with `key,value` lines (value is replaced by key)
    #[arg(long, default_value = DEFAULT_MAPPING_FILE)]
    pub mapping: PathBuf,

    /// Substitution strategy: sequential, simultaneous
    #[arg(long, default_value = "sequential")]
    pub strategy: String,

    /// Report what would change without touching the tree
    #[arg(long)]
    pub dry_run: bool,

    /// Leave files that are not valid UTF-8 untouched instead of failing
    #[arg(long)]
    pub skip_non_text: bool,

    /// Append completed edits and renames to this JSON Lines file
    #[arg(long, value_name = "FILE")]
    pub journal: Option<PathBuf>,
}

impl ReplaceArgs {
    fn options(&self) -> batch_replace::Result<ReplaceOptions> {
        Ok(ReplaceOptions {
            strategy: Strategy::from_str(&self.strategy)?,
            dry_run: self.dry_run,
            skip_non_text: self.skip_non_text,
            journal: self.journal.clone(),
        })
    }
}

pub fn run(args: ReplaceArgs) -> CmdResult<RunReport> {
    let options = args.options()?;

    let mapping = Mapping::load(&args.mapping)?;
    log_status!(
        "mapping",
        "Loaded {} pair(s) from {}",
        mapping.len(),
        args.mapping.display()
    );

    let report = replace::run(&args.root, &mapping, &options)?;

    Ok((report, 0))
}
