// Writes changedesk.1 (and one page per subcommand) into the given directory

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::CommandFactory;
use changedesk::cli::Cli;

fn write_page(cmd: clap::Command, dir: &std::path::Path, name: &str) -> Result<()> {
    let path = dir.join(format!("{}.1", name));
    let mut buffer: Vec<u8> = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buffer)
        .with_context(|| format!("Failed to render man page {}", name))?;
    std::fs::write(&path, buffer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let cmd = Cli::command();
    for sub in cmd.get_subcommands() {
        let name = format!("changedesk-{}", sub.get_name());
        write_page(sub.clone(), &out_dir, &name)?;
    }
    write_page(cmd, &out_dir, "changedesk")
}
