use anyhow::Result;
use log::info;

use crate::{cli::RenderArgs, delegate, io_utils};

pub fn execute(args: &RenderArgs) -> Result<()> {
    let explorer = crate::open_explorer(&args.source)?;
    let selection = crate::selection_from_args(&explorer, &args.selection);
    let dashboard = explorer.render(&selection);
    let out = io_utils::open_output(args.output.as_deref())?;
    delegate::present(&dashboard, args.format, out)?;
    info!(
        "Rendered dashboard with {} point(s) and {} preview row(s)",
        dashboard.map.points.len(),
        dashboard.preview.rows.len()
    );
    Ok(())
}
