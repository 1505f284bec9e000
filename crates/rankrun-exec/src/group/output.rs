use tracing::{debug, trace};

use rankrun_core::launcher::LaunchError;
use rankrun_model::OutputTemplate;

/// Make the output directory exist and remove files left behind by an earlier run of the same template.
///
/// Files of other templates in the same directory are left alone.
pub(crate) async fn prepare_output_dir(template: &OutputTemplate) -> Result<usize, LaunchError> {
    let dir = template.output_dir();
    let prepare_err = |e: std::io::Error| LaunchError::Prepare {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };

    tokio::fs::create_dir_all(dir).await.map_err(prepare_err)?;

    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await.map_err(prepare_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(prepare_err)? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !template.owns(name) || !entry.file_type().await.map_err(prepare_err)?.is_file() {
            continue;
        }
        trace!(file = name, "removing stale rank output");
        tokio::fs::remove_file(entry.path())
            .await
            .map_err(prepare_err)?;
        removed += 1;
    }

    debug!(dir = %dir.display(), removed, "output directory prepared");
    Ok(removed)
}
