use anyhow::Result;

use crate::cli::ListArgs;
use crate::display::write_substance_table;

pub fn run(args: ListArgs) -> Result<()> {
    let library = super::load_library(&args.file)?;
    let mut out = crate::io::create_output(None)?;
    let title = format!("Substances in {}", args.file.display());
    write_substance_table(&mut out, &title, library.iter())?;
    std::io::Write::flush(&mut out)?;
    Ok(())
}
