//! Image exports
//!
//! Chart exports go through the engine's encoder; download helpers export an
//! image element that is already in the page.

use reportviz_core::ImageFormat;

use crate::error::{RenderError, RenderResult};
use crate::host::{Document, ElementImage, FilePayload, View};

const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

/// File name used for chart exports
pub fn visualization_file(format: ImageFormat) -> String {
    format!("visualization.{}", format.extension())
}

/// Data URL carrying inline SVG markup
pub fn svg_data_url(markup: &str) -> String {
    format!("{}{}", SVG_DATA_URL_PREFIX, urlencoding::encode(markup))
}

/// Encode the live view and save it, returning the saved file name
pub async fn export_view_image(
    view: &dyn View,
    document: &dyn Document,
    format: ImageFormat,
) -> RenderResult<String> {
    let url = view
        .to_image_url(format)
        .await
        .map_err(|e| RenderError::export_unavailable(e.to_string()))?;

    let name = visualization_file(format);
    document.save_file(&name, FilePayload::DataUrl(url))?;
    log::info!("Exported {}", name);
    Ok(name)
}

/// Save the image element `element_id` under the chart export file name
pub fn export_element_image(
    document: &dyn Document,
    element_id: &str,
    format: ImageFormat,
) -> RenderResult<String> {
    let image = document.element_image(element_id).ok_or_else(|| {
        RenderError::export_unavailable(format!("no image element '{}'", element_id))
    })?;

    let url = match (image, format) {
        (ElementImage::Raster { src }, ImageFormat::Png) => src,
        (ElementImage::Svg(markup), ImageFormat::Svg) => svg_data_url(&markup),
        (_, format) => {
            return Err(RenderError::export_unavailable(format!(
                "element '{}' cannot be saved as {}",
                element_id,
                format.extension()
            )))
        }
    };

    let name = visualization_file(format);
    document.save_file(&name, FilePayload::DataUrl(url))?;
    log::info!("Exported image '{}' as {}", element_id, name);
    Ok(name)
}
