use anyhow::Result;

#[cfg(feature = "download")]
pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::DownloadArgs) -> Result<()> {
    use countymander::{download_file, CENSUS_ADJACENCY_URL};

    let url = args.url.as_deref().unwrap_or(CENSUS_ADJACENCY_URL);
    let out_path = args.output.clone().unwrap_or_else(|| "county_adjacency.txt".into());

    download_file(url, &out_path, args.force)?;
    tracing::info!("[download] saved {}", out_path.display());

    Ok(())
}

#[cfg(not(feature = "download"))]
pub fn run(_cli: &crate::cli::Cli, _args: &crate::cli::DownloadArgs) -> Result<()> {
    anyhow::bail!("[download] this build was compiled without the download feature")
}
