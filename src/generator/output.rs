use std::path::{Path, PathBuf};

use anyhow::Context;

use super::render::{render_model, GenerationOptions};
use crate::schema::ContentSchema;

/// Default output filename for a content type's model.
pub fn model_file_name(post_type: &str) -> String {
    format!("{post_type}_class.rs")
}

/// Render the model for `schema` and write it under `dir`.
///
/// Returns the path written. Existing files are only replaced with `force`.
pub fn write_model_file(
    dir: &Path,
    schema: &ContentSchema,
    opts: &GenerationOptions,
    force: bool,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(model_file_name(&schema.post_type));
    if path.exists() && !force {
        println!("⚠️  Skipping existing model file: {path:?}");
        return Ok(path);
    }
    let rendered = render_model(schema, opts);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {dir:?}"))?;
    std::fs::write(&path, rendered)
        .with_context(|| format!("failed to write model file {path:?}"))?;
    println!("✅ Generated model: {path:?}");
    Ok(path)
}
