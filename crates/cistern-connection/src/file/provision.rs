//! Backing-file provisioning
//!
//! Creates a missing database file from a template before the first
//! connect. A template reference is either an absolute filesystem path or
//! the name of a bundled template resource.

use std::path::Path;

use cistern_core::{CisternError, Result};
use rust_embed::RustEmbed;
use tokio::io::AsyncWriteExt;

/// Read-only template files shipped with the program.
#[derive(RustEmbed)]
#[folder = "templates"]
struct Templates;

/// What to do when the template cannot be resolved.
///
/// Both behaviors exist in deployed variants of this component, so the
/// choice is an explicit parameter instead of an implementation detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTemplate {
    /// Provisioning fails and no destination file is created.
    #[default]
    Fail,
    /// An empty destination file is created and provisioning succeeds.
    CreateEmpty,
}

enum TemplateSource {
    Disk(tokio::fs::File),
    Bundled(std::borrow::Cow<'static, [u8]>),
}

/// Ensure `destination` exists, copying it from the `source` template if
/// absent.
///
/// Returns `true` when a file was created. An existing destination is
/// never touched, which makes repeated calls on the same path a no-op.
pub async fn provision(
    source: &Path,
    destination: &Path,
    policy: MissingTemplate,
) -> Result<bool> {
    if destination.is_file() {
        return Ok(false);
    }

    let template = match resolve_template(source).await {
        Some(template) => template,
        None => match policy {
            MissingTemplate::Fail => {
                return Err(CisternError::Provisioning(format!(
                    "Database template not found: {}",
                    source.display()
                )));
            }
            MissingTemplate::CreateEmpty => {
                tracing::warn!(
                    template = %source.display(),
                    destination = %destination.display(),
                    "template not found; creating empty database file"
                );
                create_destination(destination).await?;
                return Ok(true);
            }
        },
    };

    let mut file = create_destination(destination).await?;
    let copied = match template {
        TemplateSource::Disk(mut reader) => tokio::io::copy(&mut reader, &mut file).await,
        TemplateSource::Bundled(data) => file.write_all(&data).await.map(|_| data.len() as u64),
    };

    match copied {
        Ok(bytes) => {
            file.flush().await?;
            tracing::info!(
                template = %source.display(),
                destination = %destination.display(),
                bytes,
                "database file provisioned"
            );
            Ok(true)
        }
        Err(e) => {
            // A half-written destination must not survive: a retry would
            // mistake it for an already-provisioned database.
            drop(file);
            let _ = tokio::fs::remove_file(destination).await;
            Err(CisternError::Io(e))
        }
    }
}

/// Resolve the template reference to readable bytes: absolute paths come
/// from disk, anything else from the bundled resources.
async fn resolve_template(source: &Path) -> Option<TemplateSource> {
    if source.is_absolute() {
        match tokio::fs::File::open(source).await {
            Ok(file) => Some(TemplateSource::Disk(file)),
            Err(_) => None,
        }
    } else {
        let key = source.to_string_lossy().replace('\\', "/");
        Templates::get(&key).map(|file| TemplateSource::Bundled(file.data))
    }
}

/// Create the destination file, with parents, refusing to overwrite.
async fn create_destination(destination: &Path) -> Result<tokio::fs::File> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .await?;
    Ok(file)
}
