// Url command for printing an installer download link

use crate::commands::parse_key;
use crate::platform::{CpuArch, HostPlatform};
use crate::runtime::download;
use crate::ui;

pub fn url(raw: &str) -> anyhow::Result<()> {
    let key = parse_key(raw);
    let url = download::installer_url(&key, HostPlatform::current(), CpuArch::current())
        .ok_or_else(|| anyhow::anyhow!("'{}' is not a Product.Year.Build key", raw))?;
    ui::plain(&url);
    Ok(())
}
