//! HTML rendering for the upload and result pages.

use std::fmt::Write;

use image::RgbImage;

use crate::error::Result;
use crate::image::{to_data_uri, UploadedImage};
use crate::model::StyleVariant;
use crate::pipeline::ScaleSelection;

const STYLE: &str = "
body { font-family: sans-serif; max-width: 1100px; margin: 2em auto; padding: 0 1em; }
.columns { display: flex; gap: 2em; margin-top: 1.5em; }
.columns > section { flex: 1; }
.columns img { max-width: 100%; }
.caption { color: #666; font-size: 0.9em; }
.error { color: #b00020; border: 1px solid #b00020; padding: 0.5em 1em; border-radius: 5px; }
.download button { background-color: #4CAF50; color: white; padding: 0.5em 1em; border: none;
  border-radius: 5px; font-size: 16px; cursor: pointer; margin-top: 1em; }
";

/// Render the upload form, optionally with an error message above it.
#[must_use]
pub fn upload_page(variant: StyleVariant, selected: ScaleSelection, error: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(message) = error {
        let _ = write!(body, r#"<p class="error">{}</p>"#, escape(message));
    }
    body.push_str(&upload_form(variant, selected));
    document(variant, &body)
}

/// Render the original and stylized images side by side with a download link.
///
/// # Errors
///
/// Returns an error if either image cannot be encoded as PNG.
pub fn present(
    variant: StyleVariant,
    scale: ScaleSelection,
    original: &UploadedImage,
    stylized: &RgbImage,
) -> Result<String> {
    let original_uri = to_data_uri(original.pixels())?;
    let stylized_uri = to_data_uri(stylized)?;

    let mut body = upload_form(variant, scale);
    let _ = write!(
        body,
        r#"<div class="columns">
<section>
<h3>Original</h3>
<img src="{original_uri}" alt="Original image">
<p class="caption">Size: {} x {}</p>
</section>
<section>
<h3>Stylized</h3>
<img src="{stylized_uri}" alt="Stylized image">
<p class="caption">Size: {} x {}</p>
<a class="download" href="{stylized_uri}" download="{}"><button type="button">Download Output Image</button></a>
</section>
</div>"#,
        original.width(),
        original.height(),
        stylized.width(),
        stylized.height(),
        variant.download_filename(),
    );

    Ok(document(variant, &body))
}

fn upload_form(variant: StyleVariant, selected: ScaleSelection) -> String {
    let mut options = String::new();
    for &scale in variant.scales() {
        let marker = if scale == selected { " selected" } else { "" };
        let _ = write!(options, r#"<option value="{0}"{marker}>{0}</option>"#, scale.label());
    }

    format!(
        r#"<p>Upload an image, choose output scale, and download the anime-styled version.</p>
<form action="/stylize" method="post" enctype="multipart/form-data">
<label>Upload an image <input type="file" name="file" accept=".jpg,.jpeg,.png" required></label>
<label>Output scale <select name="scale">{options}</select></label>
<button type="submit">Stylize</button>
</form>"#
    )
}

fn document(variant: StyleVariant, body: &str) -> String {
    let title = variant.title();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#
    )
}

/// Escape text for inclusion in HTML element content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_page_lists_offered_scales() {
        let html = upload_page(StyleVariant::Hayao, ScaleSelection::Double, None);

        assert!(html.contains("AnimeGANv3 - Image Stylizer"));
        assert!(html.contains(r#"<option value="2x" selected>2x</option>"#));
        assert!(html.contains(r#"<option value="0.5x">0.5x</option>"#));
        assert!(!html.contains("3x"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let html = upload_page(
            StyleVariant::Face2Paint,
            ScaleSelection::Original,
            Some("<script>bad</script>"),
        );

        assert!(html.contains("&lt;script&gt;bad&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_present_captions_and_download() {
        let original = UploadedImage::from_rgb(RgbImage::new(30, 20));
        let stylized = RgbImage::new(60, 40);
        let html = present(
            StyleVariant::Face2Paint,
            ScaleSelection::Double,
            &original,
            &stylized,
        )
        .unwrap();

        assert!(html.contains("Size: 30 x 20"));
        assert!(html.contains("Size: 60 x 40"));
        assert!(html.contains(r#"download="anime_output.png""#));
        assert!(html.contains(r#"href="data:image/png;base64,"#));
    }
}
