use vecna::{SelectionClipboard, SystemClipboard, VecnaResult, VectorizeParams, copy_svg};

use crate::cli::{CopyCommand, GlobalOptions};

use super::utils::{build_settings, vectorize_with_spinner};

/// The main function to run the copy command.
pub async fn run(global: &GlobalOptions, cmd: CopyCommand) -> VecnaResult<()> {
    let params = VectorizeParams::from(&cmd.params);
    let settings = build_settings(global);
    let (svg, notifier) = vectorize_with_spinner(&cmd.input, &params, &settings).await?;

    // arboard blocks briefly so clipboard managers can pick the text up
    tokio::task::spawn_blocking(move || {
        copy_svg(Some(&svg), &SystemClipboard, &SelectionClipboard, &notifier)
    })
    .await??;

    Ok(())
}
