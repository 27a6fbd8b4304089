use std::sync::LazyLock;

use regex::Regex;

static VIEW_BOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"viewBox\s*=\s*["']?\s*(-?\d*\.?\d+)\s+(-?\d*\.?\d+)\s+(-?\d*\.?\d+)\s+(-?\d*\.?\d+)\s*["']?"#,
    )
    .expect("viewBox pattern is valid")
});

/// The `viewBox` attribute of an SVG document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Whether engine output is acceptable as a vector result.
pub fn is_valid_svg(markup: &str) -> bool {
    markup.contains("<svg")
}

/// Markup suitable for display: trimmed and starting at the `<svg` element.
///
/// Returns `None` when there is no `<svg` element at all.
pub fn sanitize(markup: &str) -> Option<&str> {
    let trimmed = markup.trim();
    trimmed.find("<svg").map(|start| &trimmed[start..])
}

/// Parse the first `viewBox` attribute; `None` when absent or when its size is not positive.
pub fn view_box(markup: &str) -> Option<ViewBox> {
    let caps = VIEW_BOX.captures(markup)?;
    let num = |i: usize| caps.get(i)?.as_str().parse::<f64>().ok();
    let vb = ViewBox {
        min_x: num(1)?,
        min_y: num(2)?,
        width: num(3)?,
        height: num(4)?,
    };
    (vb.width > 0.0 && vb.height > 0.0).then_some(vb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_requires_svg_element() {
        assert!(is_valid_svg("<?xml version=\"1.0\"?><svg></svg>"));
        assert!(!is_valid_svg("<html></html>"));
        assert!(!is_valid_svg(""));
    }

    #[test]
    fn sanitize_drops_prolog_and_whitespace() {
        let raw = "  <?xml version=\"1.0\"?>\n<svg width=\"1\"></svg>\n ";
        assert_eq!(sanitize(raw), Some("<svg width=\"1\"></svg>"));
        assert_eq!(sanitize("no markup"), None);
    }

    #[test]
    fn view_box_parses_quoted_values() {
        let vb = view_box(r#"<svg viewBox="0 -1.5 200 100.25">"#).unwrap();
        assert_eq!(
            vb,
            ViewBox {
                min_x: 0.0,
                min_y: -1.5,
                width: 200.0,
                height: 100.25
            }
        );
    }

    #[test]
    fn view_box_accepts_single_quotes_and_spacing() {
        let vb = view_box("<svg viewBox = ' 10 20 30 40 '>").unwrap();
        assert_eq!((vb.min_x, vb.min_y, vb.width, vb.height), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn view_box_rejects_non_positive_size() {
        assert_eq!(view_box(r#"<svg viewBox="0 0 0 10">"#), None);
        assert_eq!(view_box(r#"<svg viewBox="0 0 10 -1">"#), None);
    }

    #[test]
    fn view_box_missing_or_malformed() {
        assert_eq!(view_box("<svg width=\"10\">"), None);
        assert_eq!(view_box(r#"<svg viewBox="0 0 10">"#), None);
    }
}
