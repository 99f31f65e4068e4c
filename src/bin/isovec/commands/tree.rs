use std::io::Write;

use anyhow::{Context, Result};

use isovec::{CharSet, RenderOptions, TreeOptions};

use crate::cli::{Charset, ShownQuantity, TreeArgs};
use crate::io::create_output;

pub fn run(args: TreeArgs) -> Result<()> {
    let (_, substance) = super::load_substance(&args.source)?;

    let options = tree_options(&args);
    let tree = if args.composition {
        substance
            .composition_tree(&options)
            .with_context(|| format!("Failed to build element tree of \"{}\"", substance.name()))?
    } else {
        substance.input_tree(&options)
    };

    let render = RenderOptions {
        char_set: match args.charset {
            Charset::Box => CharSet::BoxDrawingsLight,
            Charset::Ascii => CharSet::Basic,
        },
        ..RenderOptions::default()
    };

    let mut out = create_output(args.output.output.as_deref())?;
    tree.write_to(&mut out, &render)
        .context("Failed to write tree")?;
    out.flush()?;
    Ok(())
}

fn tree_options(args: &TreeArgs) -> TreeOptions {
    let shows = |q: ShownQuantity| args.show.contains(&q);
    TreeOptions {
        scale: args.scale,
        atomic: shows(ShownQuantity::Atomic),
        weight: shows(ShownQuantity::Weight),
        volume: shows(ShownQuantity::Volume),
        molar_mass: shows(ShownQuantity::MolarMass),
        density: shows(ShownQuantity::Density),
        align_isotopes: !args.no_align,
    }
}
