//! `generate` subcommand.
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Render man pages for `jb` and its subcommands into `output_dir`,
/// defaulting to the current directory.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the output directory cannot be created
/// or a page cannot be written.
pub fn man_pages(
    cmd: &clap::Command,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let output_dir: PathBuf = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolve current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .context("create man page output directory")?;

    render_page(cmd.clone(), &output_dir, cmd.get_name())?;
    render_subcommand_pages(cmd, &output_dir, cmd.get_name())
}

fn render_subcommand_pages(
    cmd: &clap::Command,
    output_dir: &Path,
    prefix: &str,
) -> Result<()> {
    for subcmd in cmd.get_subcommands() {
        let page_name = format!("{}-{}", prefix, subcmd.get_name());
        // clap_mangen takes the page title from the Command name, so the
        // subcommand is renamed to its man-page form. The leak is fine for
        // a one-shot generation pass.
        let leaked: &'static str =
            Box::leak(page_name.clone().into_boxed_str());
        let renamed =
            subcmd.clone().name(leaked).disable_help_subcommand(true);
        render_page(renamed, output_dir, &page_name)?;
        if subcmd.has_subcommands() {
            render_subcommand_pages(subcmd, output_dir, &page_name)?;
        }
    }
    Ok(())
}

fn render_page(
    cmd: clap::Command,
    output_dir: &Path,
    page_name: &str,
) -> Result<()> {
    let path = output_dir.join(format!("{page_name}.1"));
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(cmd).render(&mut file)?;
    println!("Generated: {}", path.display());
    Ok(())
}
