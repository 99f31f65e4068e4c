use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseSymbolError(String);

/// Heaviest element with an assigned symbol.
pub const MAX_ATOMIC_NUMBER: u32 = 118;

#[rustfmt::skip]
const SYMBOLS: [&str; MAX_ATOMIC_NUMBER as usize] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg",
    "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr",
    "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf",
    "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po",
    "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs",
    "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

#[rustfmt::skip]
const NAMES: [&str; MAX_ATOMIC_NUMBER as usize] = [
    "hydrogen", "helium", "lithium", "beryllium", "boron", "carbon", "nitrogen", "oxygen",
    "fluorine", "neon", "sodium", "magnesium", "aluminium", "silicon", "phosphorus", "sulphur",
    "chlorine", "argon", "potassium", "calcium", "scandium", "titanium", "vanadium", "chromium",
    "manganese", "iron", "cobalt", "nickel", "copper", "zinc", "gallium", "germanium",
    "arsenic", "selenium", "bromine", "krypton", "rubidium", "strontium", "yttrium", "zirconium",
    "niobium", "molybdenum", "technetium", "ruthenium", "rhodium", "palladium", "silver", "cadmium",
    "indium", "tin", "antimony", "tellurium", "iodine", "xenon", "caesium", "barium",
    "lanthanum", "cerium", "praseodymium", "neodymium", "promethium", "samarium", "europium", "gadolinium",
    "terbium", "dysprosium", "holmium", "erbium", "thulium", "ytterbium", "lutetium", "hafnium",
    "tantalum", "tungsten", "rhenium", "osmium", "iridium", "platinum", "gold", "mercury",
    "thallium", "lead", "bismuth", "polonium", "astatine", "radon", "francium", "radium",
    "actinium", "thorium", "protactinium", "uranium", "neptunium", "plutonium", "americium", "curium",
    "berkelium", "californium", "einsteinium", "fermium", "mendelevium", "nobelium", "lawrencium", "rutherfordium",
    "dubnium", "seaborgium", "bohrium", "hassium", "meitnerium", "darmstadtium", "roentgenium", "copernicium",
    "nihonium", "flerovium", "moscovium", "livermorium", "tennessine", "oganesson",
];

/// Element symbol for atomic number `z`.
pub fn symbol(z: u32) -> Option<&'static str> {
    index(z).map(|i| SYMBOLS[i])
}

/// English element name for atomic number `z`.
pub fn name(z: u32) -> Option<&'static str> {
    index(z).map(|i| NAMES[i])
}

/// Atomic number of a case sensitive element symbol (`"Fe"`, not `"fe"`).
pub fn atomic_number(symbol: &str) -> Result<u32, ParseSymbolError> {
    SYMBOLS
        .iter()
        .position(|s| *s == symbol)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| ParseSymbolError(symbol.to_string()))
}

fn index(z: u32) -> Option<usize> {
    (1..=MAX_ATOMIC_NUMBER).contains(&z).then(|| z as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_and_names_by_atomic_number() {
        assert_eq!(symbol(1), Some("H"));
        assert_eq!(symbol(26), Some("Fe"));
        assert_eq!(symbol(118), Some("Og"));
        assert_eq!(name(92), Some("uranium"));
    }

    #[test]
    fn out_of_range_atomic_numbers() {
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(119), None);
        assert_eq!(name(0), None);
    }

    #[test]
    fn atomic_number_round_trips_symbol() {
        for z in 1..=MAX_ATOMIC_NUMBER {
            let sym = symbol(z).unwrap();
            assert_eq!(atomic_number(sym).unwrap(), z);
        }
    }

    #[test]
    fn atomic_number_rejects_wrong_case() {
        let err = atomic_number("fe").unwrap_err();
        assert_eq!(err.to_string(), "invalid or unsupported element symbol: 'fe'");
    }
}
