use std::io::Write;

use anyhow::{Context, Result, bail};

use isovec::io::{MaterialCard, serpent};

use crate::cli::CardArgs;
use crate::io::create_output;

pub fn run(args: CardArgs) -> Result<()> {
    let (library, substance) = super::load_substance(&args.source)?;
    let natural = super::natural_selection(&library, args.natural.natural.as_deref())?;

    let density = match args.density {
        Some(density) => density,
        None if substance.density() > 0.0 => -substance.density(),
        None => bail!(
            "\"{}\" has no density; give one with --density",
            substance.name()
        ),
    };

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| card_name(substance.name()));
    let mut card = MaterialCard::new(name, density)
        .with_library(args.library.clone())
        .with_fraction(args.fraction.into())
        .with_natural(natural);
    if let Some(rgb) = args.rgb {
        card = card.with_rgb(rgb.0, rgb.1, rgb.2);
    }

    let mut out = create_output(args.output.output.as_deref())?;
    serpent::write(&mut out, &card, &substance)
        .with_context(|| format!("Failed to write material card of \"{}\"", substance.name()))?;
    out.flush()?;
    Ok(())
}

/// Material names on cards cannot contain whitespace.
fn card_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_names_have_no_whitespace() {
        assert_eq!(card_name("enriched  uranium oxide"), "enriched_uranium_oxide");
        assert_eq!(card_name("UO2"), "UO2");
    }
}
