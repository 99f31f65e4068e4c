use std::io::Write;

use anyhow::Result;

use isovec::{Isotope, Substance, data};

use crate::cli::NuclideArgs;
use crate::display::{write_kv_table, write_vector_table};
use crate::io::create_output;

pub fn run(args: NuclideArgs) -> Result<()> {
    let mut out = create_output(None)?;

    if let Ok(isotope) = data::parse_isotope(&args.name) {
        write_kv_table(&mut out, isotope.name(), &isotope_rows(&isotope))?;
    } else {
        let element = data::natural_element_by_symbol(args.name.trim()).map_err(|e| {
            anyhow::Error::new(e).context(format!(
                "\"{}\" is neither a known isotope nor a natural element",
                args.name
            ))
        })?;
        let rows = vec![
            ("Name", element.name().to_string()),
            ("Symbol", element.element_symbol().to_string()),
            ("Z", element.z().to_string()),
            ("A_r", format!("{:.6}", element.a_r())),
            ("Molar mass", format!("{:.6} g/mol", element.molar_mass())),
        ];
        write_kv_table(&mut out, element.name(), &rows)?;

        let abundances: Vec<(String, f64)> = element
            .isotopes_iter()
            .map(|(isotope, x)| (isotope.name().to_string(), x))
            .collect();
        write_vector_table(&mut out, "Natural abundance", &abundances, "at.%", 1e2)?;
    }

    out.flush()?;
    Ok(())
}

fn isotope_rows(isotope: &Isotope) -> Vec<(&'static str, String)> {
    vec![
        ("Name", isotope.name().to_string()),
        ("Z", isotope.z().to_string()),
        ("A", isotope.a().to_string()),
        ("N", isotope.neutrons().to_string()),
        ("Isomeric state", isotope.i().to_string()),
        ("ZAI", isotope.zai().to_string()),
        ("A_r", format!("{:.8}", isotope.a_r())),
        ("Molar mass", format!("{:.8} g/mol", isotope.molar_mass())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isotope_rows_describe_the_nuclide() {
        let u235 = data::parse_isotope("U-235").unwrap();
        let rows = isotope_rows(&u235);
        assert_eq!(rows[0], ("Name", "U-235".to_string()));
        assert_eq!(rows[3], ("N", "143".to_string()));
        assert_eq!(rows[5], ("ZAI", "922350".to_string()));
    }
}
