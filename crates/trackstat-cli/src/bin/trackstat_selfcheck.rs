use std::path::Path;
use std::process::Command;

use trackstat_cli::TrackerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TrackerConfig::from_env();

    println!(
        "trackstat-selfcheck: starting with output_dir={}",
        config.output_dir.display()
    );
    config.aggregator.validate()?;
    ensure_output_dir(&config.output_dir).await?;
    ensure_tool("ffprobe", "-version")?;

    // Creation dates are optional; a missing exiftool only degrades the report.
    if let Err(e) = ensure_tool("exiftool", "-ver") {
        println!("trackstat-selfcheck: warning: {}", e);
    }

    println!("trackstat-selfcheck: ok");
    Ok(())
}

async fn ensure_output_dir<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

fn ensure_tool(program: &str, version_flag: &str) -> anyhow::Result<()> {
    let output = Command::new(program)
        .arg(version_flag)
        .output()
        .map_err(|e| anyhow::anyhow!("{} not available: {}", program, e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "{} {} failed: {:?}",
            program,
            version_flag,
            output.status
        ));
    }
    Ok(())
}
