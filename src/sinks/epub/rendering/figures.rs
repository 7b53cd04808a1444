//! Figure markup for chapter illustrations.

use crate::source::ImageRef;

/// Render an illustration as a `<figure>` block.
///
/// Without an image there is nothing to show, so the result is empty rather
/// than an `<img>` pointing nowhere. The caption is trusted markup and is
/// inserted as-is; alt text is escaped.
pub fn figure(image: Option<&ImageRef>, alt: &str, caption: &str) -> String {
    let Some(image) = image else {
        return String::new();
    };

    let caption_html = if caption.trim().is_empty() {
        String::new()
    } else {
        format!("\n<figcaption>{}</figcaption>", caption.trim())
    };

    format!(
        r#"<figure class="chapter-figure">
<img src="{src}" alt="{alt}"/>{caption}
</figure>"#,
        src = html_escape::encode_double_quoted_attribute(&image.href),
        alt = html_escape::encode_double_quoted_attribute(alt),
        caption = caption_html,
    )
}
