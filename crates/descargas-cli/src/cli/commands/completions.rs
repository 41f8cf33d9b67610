//! `descargas completions <shell>` – print shell completions.

use anyhow::Result;
use clap_complete::Shell;
use std::io::Write;

pub fn run_completions(shell: Shell, cmd: &mut clap::Command, out: &mut dyn Write) -> Result<()> {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, out);
    out.flush()?;
    Ok(())
}
