use std::io::{self, Write};

use anyhow::Context;

use pwgen::{Alphabet, GenerationConfig};

pub(crate) fn show_settings(config: &GenerationConfig) -> anyhow::Result<()> {
    let mut stderr = io::stderr().lock();
    serde_json::to_writer_pretty(&mut stderr, config).context("failed to serialize settings")?;
    writeln!(stderr).context("failed to write settings")?;
    Ok(())
}

pub(crate) fn show_alphabet(alphabet: &Alphabet) -> anyhow::Result<()> {
    writeln!(io::stderr().lock(), "{alphabet}").context("failed to write alphabet")?;
    Ok(())
}
