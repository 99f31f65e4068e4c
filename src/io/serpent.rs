use std::io::Write;

use crate::io::error::Error;
use crate::substance::{Constituent, Fraction, NaturalSelection};

const DEFAULT_LIBRARY: &str = "03c";

/// Header data of a Serpent material card.
#[derive(Debug, Clone)]
pub struct MaterialCard {
    pub name: String,
    /// Written as given: positive values are atomic densities [1/(b cm)],
    /// negative values mass densities [g/cm^3].
    pub density: f64,
    pub rgb: Option<(u8, u8, u8)>,
    /// Cross section library suffix, e.g. `03c` for 300 K data.
    pub library: String,
    pub fraction: Fraction,
    pub natural: NaturalSelection,
}

impl MaterialCard {
    pub fn new(name: impl Into<String>, density: f64) -> Self {
        Self {
            name: name.into(),
            density,
            rgb: None,
            library: DEFAULT_LIBRARY.to_string(),
            fraction: Fraction::Atomic,
            natural: NaturalSelection::None,
        }
    }

    pub fn with_rgb(mut self, r: u8, g: u8, b: u8) -> Self {
        self.rgb = Some((r, g, b));
        self
    }

    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    pub fn with_fraction(mut self, fraction: Fraction) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn with_natural(mut self, natural: NaturalSelection) -> Self {
        self.natural = natural;
        self
    }
}

/// Writes `card` with one line per isotope of `constituent`, sorted by
/// `(Z, A, I)`. Weight fractions are written negative.
pub fn write<W: Write>(
    mut writer: W,
    card: &MaterialCard,
    constituent: &Constituent,
) -> Result<(), Error> {
    write!(writer, "mat {} {}", card.name, card.density)?;
    if let Some((r, g, b)) = card.rgb {
        write!(writer, " rgb {r} {g} {b}")?;
    }
    writeln!(writer)?;

    let sign = match card.fraction {
        Fraction::Atomic => 1.0,
        Fraction::Weight => -1.0,
    };
    for (isotope, fraction) in constituent.isotopes(card.fraction, &card.natural)? {
        let za = format!("{}{:03}.{}", isotope.z(), isotope.a(), card.library);
        writeln!(
            writer,
            "        {za:>10}  {:>11}     % {}",
            scientific(sign * fraction),
            isotope.name()
        )?;
    }
    Ok(())
}

/// `7.204000E-03`: six decimals and at least two exponent digits.
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.6E}");
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(e) => format!("{mantissa}E{}{:02}", if e < 0 { '-' } else { '+' }, e.abs()),
            Err(_) => formatted,
        },
        None => formatted,
    }
}
