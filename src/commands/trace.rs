use vecna::{VecnaResult, VectorizeParams, download_svg, write_svg};

use crate::cli::{GlobalOptions, TraceCommand};

use super::utils::{build_settings, vectorize_with_spinner};

/// The main function to run the trace command.
pub async fn run(global: &GlobalOptions, cmd: TraceCommand) -> VecnaResult<()> {
    let params = VectorizeParams::from(&cmd.params);
    let settings = build_settings(global);
    let (svg, notifier) = vectorize_with_spinner(&cmd.input, &params, &settings).await?;

    match &cmd.output {
        Some(path) => {
            write_svg(&svg, path)?;
            println!("SVG saved to {}", path.display());
        }
        None => {
            if let Some(path) = download_svg(Some(&svg), ".", &notifier)? {
                println!("SVG saved to {}", path.display());
            }
        }
    }

    Ok(())
}
