use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use vecna::{
    Notice, NoticeKind, Notifier, PipelineSettings, SharedEngine, VecnaResult, VectorizeParams,
    VtracerEngine, vectorize_file,
};

use crate::cli::GlobalOptions;

/// Pipeline settings from the global flags.
pub fn build_settings(global: &GlobalOptions) -> PipelineSettings {
    PipelineSettings::default()
        .with_max_dimension(global.max_dimension)
        .with_resize_filter(global.resample_filter.into())
}

/// Prints notices to stderr without tearing the spinner.
pub struct ConsoleNotifier {
    pb: ProgressBar,
}

impl ConsoleNotifier {
    pub fn new(pb: ProgressBar) -> Self {
        Self { pb }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        self.pb.suspend(|| match notice.kind {
            NoticeKind::Success => eprintln!("{}", notice.message),
            NoticeKind::Error => eprintln!("Error: {}", notice.message),
        });
    }
}

fn spinner(input: &Path) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Vectorizing {}", input.display()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Trace `input` with VTracer while showing a spinner.
///
/// Returns the markup and a notifier that keeps printing below the finished spinner.
pub async fn vectorize_with_spinner(
    input: &Path,
    params: &VectorizeParams,
    settings: &PipelineSettings,
) -> VecnaResult<(String, ConsoleNotifier)> {
    let engine = SharedEngine::new(VtracerEngine);
    let pb = spinner(input);
    let notifier = ConsoleNotifier::new(pb.clone());

    let result = vectorize_file(&engine, input, params, settings, &notifier).await;
    pb.finish_and_clear();
    result.map(|svg| (svg, notifier))
}
