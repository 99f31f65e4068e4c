use std::io::{self, Write};

use isovec::Constituent;

use crate::util::text::truncate;

const INDENT: &str = "  ";

const TABLE_WIDTH: usize = 64;

/// `(label, fraction)` rows with a distribution bar, fractions given as
/// plain numbers and printed in `unit` (`scale` per unit fraction).
pub fn write_vector_table(
    out: &mut impl Write,
    title: &str,
    rows: &[(String, f64)],
    unit: &str,
    scale: f64,
) -> io::Result<()> {
    let name_w = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(8, 16);
    let value_w = 14usize;
    let sep_overhead = 10;
    let bar_w = TABLE_WIDTH.saturating_sub(name_w + value_w + sep_overhead);

    let lines = [name_w, value_w, bar_w].map(|w| "─".repeat(w + 2));

    writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, TABLE_WIDTH - 6))?;
    writeln!(out, "{INDENT}┌{}┬{}┬{}┐", lines[0], lines[1], lines[2])?;
    writeln!(
        out,
        "{INDENT}│ {:<name_w$} │ {:>value_w$} │ {:<bar_w$} │",
        "Name",
        truncate(unit, value_w),
        "Distribution",
    )?;
    writeln!(out, "{INDENT}├{}┼{}┼{}┤", lines[0], lines[1], lines[2])?;

    for (name, fraction) in rows {
        writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:>value_w$} │ {:<bar_w$} │",
            truncate(name, name_w),
            format_value(fraction * scale),
            make_bar(*fraction, bar_w),
        )?;
    }

    let total: f64 = rows.iter().map(|(_, f)| f).sum();
    writeln!(out, "{INDENT}├{}┼{}┼{}┤", lines[0], lines[1], lines[2])?;
    writeln!(
        out,
        "{INDENT}│ {:<name_w$} │ {:>value_w$} │ {:<bar_w$} │",
        "Total",
        format_value(total * scale),
        format!("{} entries", rows.len()),
    )?;
    writeln!(out, "{INDENT}└{}┴{}┴{}┘", lines[0], lines[1], lines[2])
}

/// One row per substance with its kind, symbol, molar mass and density.
pub fn write_substance_table<'a>(
    out: &mut impl Write,
    title: &str,
    substances: impl IntoIterator<Item = &'a Constituent>,
) -> io::Result<()> {
    let (name_w, kind_w, symbol_w, mass_w, density_w) = (18usize, 8usize, 10usize, 10usize, 8usize);
    let lines = [name_w, kind_w, symbol_w, mass_w, density_w].map(|w| "─".repeat(w + 2));

    writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, TABLE_WIDTH - 6))?;
    writeln!(
        out,
        "{INDENT}┌{}┬{}┬{}┬{}┬{}┐",
        lines[0], lines[1], lines[2], lines[3], lines[4]
    )?;
    writeln!(
        out,
        "{INDENT}│ {:<name_w$} │ {:<kind_w$} │ {:<symbol_w$} │ {:>mass_w$} │ {:>density_w$} │",
        "Name", "Kind", "Symbol", "M [g/mol]", "ρ [g/cc]",
    )?;
    writeln!(
        out,
        "{INDENT}├{}┼{}┼{}┼{}┼{}┤",
        lines[0], lines[1], lines[2], lines[3], lines[4]
    )?;

    for substance in substances {
        let symbol = substance.core().map_or("", |core| core.symbol());
        writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:<kind_w$} │ {:<symbol_w$} │ {:>mass_w$} │ {:>density_w$} │",
            truncate(substance.name(), name_w),
            substance.kind().to_string(),
            truncate(symbol, symbol_w),
            optional(substance.molar_mass(), 4),
            optional(substance.density(), 4),
        )?;
    }

    writeln!(
        out,
        "{INDENT}└{}┴{}┴{}┴{}┴{}┘",
        lines[0], lines[1], lines[2], lines[3], lines[4]
    )
}

/// Two column table of labelled values.
pub fn write_kv_table(
    out: &mut impl Write,
    title: &str,
    rows: &[(&str, String)],
) -> io::Result<()> {
    let key_w = 18usize;
    let sep_overhead = 7;
    let val_w = TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, TABLE_WIDTH - 6))?;
    writeln!(out, "{INDENT}┌{k_line}┬{v_line}┐")?;
    for (key, val) in rows {
        writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w),
        )?;
    }
    writeln!(out, "{INDENT}└{k_line}┴{v_line}┘")
}

fn format_value(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-4 {
        format!("{value:.6e}")
    } else {
        format!("{value:.6}")
    }
}

fn optional(value: f64, precision: usize) -> String {
    if value > 0.0 {
        format!("{value:.precision$}")
    } else {
        "-".to_string()
    }
}

fn make_bar(fraction: f64, max_width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(make_bar(0.5, 4), "██░░");
        assert_eq!(make_bar(1.5, 2), "██");
        assert_eq!(make_bar(-0.1, 2), "░░");
    }

    #[test]
    fn small_values_switch_to_exponent() {
        assert_eq!(format_value(99.2745), "99.274500");
        assert_eq!(format_value(5.4e-5), "5.400000e-5");
        assert_eq!(format_value(0.0), "0.000000");
    }

    #[test]
    fn unknown_properties_are_dashed() {
        assert_eq!(optional(0.0, 4), "-");
        assert_eq!(optional(7.874, 2), "7.87");
    }

    #[test]
    fn vector_table_lists_rows_and_total() {
        let rows = vec![("U-235".to_string(), 0.25), ("U-238".to_string(), 0.75)];
        let mut buffer = Vec::new();
        write_vector_table(&mut buffer, "Isotopes", &rows, "at.%", 100.0).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Isotopes"));
        assert!(lines[4].contains("U-235") && lines[4].contains("25.000000"));
        assert!(lines[7].contains("Total") && lines[7].contains("100.000000"));
        assert!(lines[7].contains("2 entries"));
        let widths: Vec<usize> = lines[1..].iter().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
