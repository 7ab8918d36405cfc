/*!
 * Standalone TypeScript type generator for the ACL transfer types
 *
 * Only depends on warden-types, so generating the front end bindings does
 * not need the engine to compile.
 *
 * Usage: cargo run -p warden-ts-generator
 */

use std::path::Path;
use warden_types::{ts_rs::TS, *};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // CARGO_MANIFEST_DIR points to the generator crate, its parent is the workspace root
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .ok_or("Failed to get workspace root")?;
    let export_dir = workspace_root.join("bindings");

    std::env::set_var("TS_RS_EXPORT_DIR", &export_dir);

    println!("Generating TypeScript bindings for access control lists...");

    AccessLevel::export()?;
    HolderKind::export()?;

    AclId::export()?;
    RecordId::export()?;
    UserId::export()?;
    UserGroupId::export()?;
    RoleId::export()?;
    AssetId::export()?;

    HolderDto::export()?;
    AccessControlRecordDto::export()?;
    AccessControlListDto::export()?;

    println!("Generated files location: {}", export_dir.display());

    if export_dir.exists() {
        let mut entries: Vec<_> = std::fs::read_dir(&export_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext == "ts")
                    .unwrap_or(false)
            })
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            println!("   - {}", entry.file_name().to_string_lossy());
        }
    }

    Ok(())
}
