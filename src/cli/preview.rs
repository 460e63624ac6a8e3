use std::path::Path;

use crate::delivery::build_summary;
use crate::importer::Upload;
use crate::render;

pub fn run(file: &str, today: Option<&str>) -> anyhow::Result<()> {
    let today = super::parse_today(today)?;
    let upload = Upload::from_path(Path::new(file))?;
    let summary = build_summary(&upload, today)?;
    println!("{}", render::text::weekly_report(&summary));
    Ok(())
}
