//! Editor configuration supplied by the host.

use crate::catalog::FieldKind;
use crate::model::CurveKind;
use crate::viewport::ViewportSize;
use serde::{Deserialize, Serialize};

/// Tunables for both editing surfaces.
///
/// Every field has a default, so hosts may pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas units of margin around content for zoom-to-fit. Default: **50**.
    pub fit_padding: f32,

    /// Scale change per keyboard zoom step. Default: **0.1**.
    pub zoom_step: f32,

    /// Scale change per wheel pixel (negative `dy` zooms in). Default: **0.001**.
    pub wheel_zoom_step: f32,

    /// Curve style for connections created interactively. Default: `smooth`.
    pub default_curve: CurveKind,

    /// Field type created by clicking an empty grid cell. Default: `text`.
    pub default_field_kind: FieldKind,

    /// Initial host surface size.
    pub viewport: ViewportSize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fit_padding: 50.0,
            zoom_step: 0.1,
            wheel_zoom_step: 0.001,
            default_curve: CurveKind::Smooth,
            default_field_kind: FieldKind::Text,
            viewport: ViewportSize::default(),
        }
    }
}
