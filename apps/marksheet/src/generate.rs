//! Offline batch: `marksheet generate`

use anyhow::Context;
use chrono::Local;
use marksheet_core::{archive_file_name, bundle_documents, generate_marksheets, renderer_for, Roster};

use crate::{load_config, GenerateArgs};

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.template)?;
    let renderer = renderer_for(&config)
        .with_context(|| format!("loading template {}", config.template_image.display()))?;
    let roster = Roster::open(&args.input)?;

    let documents = generate_marksheets(&roster, &config, &renderer, &args.output)?;
    for path in &documents {
        println!("{}", path.display());
    }

    if !args.no_archive {
        let archive_path = args.output.join(archive_file_name(&Local::now()));
        let archive = bundle_documents(&documents, &archive_path)?;
        println!("{}", archive.path.display());
    }

    Ok(())
}
