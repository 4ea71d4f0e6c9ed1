//! `toolforge assemble` command

use anyhow::Result;

use crate::cli::AssembleArgs;
use crate::commands::find_manifest;
use toolforge::core::manifest::Manifest;
use toolforge::ops::assemble::SourceAssembler;
use toolforge::SourceComponent;

pub fn execute(args: AssembleArgs) -> Result<()> {
    let manifest_path = find_manifest(args.manifest)?;
    let manifest = Manifest::load(&manifest_path)?;
    let layout = manifest.source_layout()?;

    let mut components: Vec<SourceComponent> = manifest
        .components
        .iter()
        .map(|c| SourceComponent::new(&c.name, &c.path))
        .collect();

    let root = SourceAssembler::new(&layout).assemble(&mut components)?;

    eprintln!("    Assembled source tree at {}", root.display());
    for component in components.iter().filter(|c| c.is_relocated()) {
        eprintln!(
            "    Relocated {} -> {}",
            component.name(),
            component.path().display()
        );
    }

    Ok(())
}
