// Versions command for listing installed builds

use crate::runtime::{InstalledVersion, Resolver};
use crate::ui;
use std::collections::BTreeMap;

pub fn versions() -> anyhow::Result<()> {
    let resolver = Resolver::from_env();
    let installs = resolver.installations();

    if installs.is_empty() {
        ui::warning(&format!(
            "No TouchDesigner builds found on this {} machine",
            resolver.platform().name()
        ));
        return Ok(());
    }

    print_group("TouchDesigner", &installs.designers);
    print_group("TouchPlayer", &installs.players);
    Ok(())
}

fn print_group<K>(title: &str, versions: &BTreeMap<K, InstalledVersion>) {
    if versions.is_empty() {
        return;
    }
    ui::header(&format!("{} ({})", title, versions.len()));
    for version in versions.values() {
        let location = version.bundle.as_ref().unwrap_or(&version.executable);
        ui::plain(&format!("  {}  {}", version.key, location.display()));
    }
}
