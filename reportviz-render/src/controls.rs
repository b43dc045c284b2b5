//! DOM control ids and the actions bound to them
//!
//! Controls never capture session state. Each listener carries a
//! [`ControlAction`] value that the host hands back to
//! [`Report::dispatch`](crate::Report::dispatch) when the event fires.

use reportviz_core::{ImageFormat, PlotKind};

/// Action delivered by a bound control
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlAction {
    ToggleScale { plot: String },
    ExportImage { plot: String, format: ImageFormat },
    OpenInEditor { plot: String },
    SelectionChanged { plot: String },
    DownloadNodeList { plot: String },
    DownloadElementImage { element: String, format: ImageFormat },
    DownloadTable { name: String },
}

/// Element ids owned by one chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlIds {
    pub target: String,
    pub scale_toggle: String,
    pub png: String,
    pub svg: String,
    pub editor: String,
    /// Only hexbin charts have a node-list button
    pub node_list: Option<String>,
}

impl ControlIds {
    pub fn for_plot(kind: PlotKind, id: &str) -> Self {
        let k = kind.dom_name();
        Self {
            target: format!("chart-{}-{}", k, id),
            scale_toggle: format!("btn-logscale-plot-{}-{}", k, id),
            png: format!("btn-download-plot-png-{}", id),
            svg: format!("btn-download-plot-svg-{}", id),
            editor: format!("btn-download-plot-vega-editor-{}", id),
            node_list: (kind == PlotKind::Hexbin).then(|| format!("btn-download-node-list-{}", id)),
        }
    }

    pub fn export_button(&self, format: ImageFormat) -> &str {
        match format {
            ImageFormat::Png => &self.png,
            ImageFormat::Svg => &self.svg,
        }
    }
}

/// Button exporting the already rendered image element `id`
pub fn download_helper_button(id: &str, format: ImageFormat) -> String {
    format!("btn-download-plot-{}-{}", format.extension(), id)
}

pub fn table_button(name: &str) -> String {
    format!("btn-download-table-{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_ids() {
        let ids = ControlIds::for_plot(PlotKind::Hexbin, "7");
        assert_eq!(ids.target, "chart-hexbin-7");
        assert_eq!(ids.scale_toggle, "btn-logscale-plot-hexbin-7");
        assert_eq!(ids.export_button(ImageFormat::Svg), "btn-download-plot-svg-7");
        assert_eq!(ids.editor, "btn-download-plot-vega-editor-7");
        assert_eq!(ids.node_list.as_deref(), Some("btn-download-node-list-7"));

        let ids = ControlIds::for_plot(PlotKind::VegaPlot, "v");
        assert_eq!(ids.target, "chart-vega-v");
        assert!(ids.node_list.is_none());
    }

    #[test]
    fn test_helper_and_table_buttons() {
        assert_eq!(download_helper_button("fig1", ImageFormat::Png), "btn-download-plot-png-fig1");
        assert_eq!(table_button("stats"), "btn-download-table-stats");
    }
}
