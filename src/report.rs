use vecna::{MAX_VECTORIZE_DIMENSION, VecnaError};

pub fn report_error(err: &VecnaError) {
    match err {
        VecnaError::DimensionsTooLarge { .. } | VecnaError::FileTooLarge { .. } => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Downscale or recompress the image and try again.");
        }
        VecnaError::Trace(_) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!(
                "Images are traced at up to {MAX_VECTORIZE_DIMENSION}px; try a lower --max-dimension."
            );
        }
        VecnaError::Clipboard(detail) => {
            eprintln!("{err}: {detail}");
            eprintln!();
            eprintln!("Use `vecna trace` to write the SVG to a file instead.");
        }
        VecnaError::Io(io) => {
            eprintln!("I/O error: {io}");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
