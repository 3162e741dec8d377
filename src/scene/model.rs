use serde::{Deserialize, Serialize};

use crate::{
    assets::color::Color,
    effects::{adjust::ColorAdjust, blur::MAX_BLUR_SIGMA},
    foundation::{
        core::{MAX_COORDINATE, MAX_LAYER_EXTENT, Position, Size},
        error::{ThumbError, ThumbResult},
    },
};

/// Largest accepted text size.
pub const MAX_FONT_SIZE_PT: f64 = 1024.0;

/// Largest accepted text stroke width.
pub const MAX_STROKE_WIDTH_PX: f64 = 256.0;

/// Largest accepted shadow offset or tracking magnitude.
pub const MAX_SHADOW_OFFSET: f64 = 1024.0;

/// Stable identifier of a layer within a workspace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Wrap an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random (v4 UUID) id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Axis along which a gradient runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradientDirection {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Top-left corner to bottom-right corner.
    #[serde(alias = "diagonal-tl-br")]
    DiagonalTlBr,
    /// Top-right corner to bottom-left corner.
    #[serde(alias = "diagonal-tr-bl")]
    DiagonalTrBl,
}

/// One color stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the axis in `[0, 1]`.
    pub offset: f64,
    /// Color at `offset`.
    pub color: Color,
}

impl GradientStop {
    /// Shorthand constructor.
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// How the canvas base is produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BackgroundSpec {
    /// Single color.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// Linear multi-stop gradient.
    Gradient {
        /// Stops, strictly increasing by offset.
        stops: Vec<GradientStop>,
        /// Axis of the gradient.
        #[serde(default)]
        direction: GradientDirection,
    },
    /// Imported picture, aspect-filled, blurred and color corrected.
    #[serde(rename_all = "camelCase")]
    Image {
        /// Path of the source picture.
        source_path: String,
        /// Gaussian sigma in canonical pixels (`0` = sharp).
        #[serde(default)]
        blur_radius: f64,
        /// Brightness factor (`1.0` neutral).
        #[serde(default = "neutral")]
        brightness: f64,
        /// Contrast factor (`1.0` neutral).
        #[serde(default = "neutral")]
        contrast: f64,
        /// Saturation factor (`1.0` neutral).
        #[serde(default = "neutral")]
        saturation: f64,
    },
}

fn neutral() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self::Solid {
            color: Color::rgb(0x11, 0x11, 0x11),
        }
    }
}

impl BackgroundSpec {
    /// Structural checks (stop ordering, finite factors).
    pub fn validate(&self) -> ThumbResult<()> {
        match self {
            Self::Solid { .. } => Ok(()),
            Self::Gradient { stops, .. } => validate_stops(stops),
            Self::Image {
                source_path: _,
                blur_radius,
                brightness,
                contrast,
                saturation,
            } => {
                blur_sigma("background blurRadius", *blur_radius)?;
                ColorAdjust {
                    brightness: *brightness,
                    contrast: *contrast,
                    saturation: *saturation,
                }
                .validate()
            }
        }
    }
}

/// Require at least two stops with offsets in `[0, 1]`, strictly increasing.
pub fn validate_stops(stops: &[GradientStop]) -> ThumbResult<()> {
    if stops.len() < 2 {
        return Err(ThumbError::invalid_spec(format!(
            "gradient needs at least 2 stops, got {}",
            stops.len()
        )));
    }
    for (i, stop) in stops.iter().enumerate() {
        if !stop.offset.is_finite() || !(0.0..=1.0).contains(&stop.offset) {
            return Err(ThumbError::invalid_spec(format!(
                "gradient stop {i} offset {} is outside [0, 1]",
                stop.offset
            )));
        }
    }
    for (i, pair) in stops.windows(2).enumerate() {
        if pair[1].offset <= pair[0].offset {
            return Err(ThumbError::invalid_spec(format!(
                "gradient stop offsets must be strictly increasing (stop {} at {} after {})",
                i + 1,
                pair[1].offset,
                pair[0].offset
            )));
        }
    }
    Ok(())
}

/// Horizontal alignment of wrapped text lines inside the text box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush right.
    Right,
}

/// Soft drop shadow behind text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShadow {
    /// Horizontal offset in pixels.
    pub offset_x: f64,
    /// Vertical offset in pixels.
    pub offset_y: f64,
    /// Gaussian sigma.
    #[serde(default)]
    pub blur_radius: f64,
    /// Shadow color; its alpha sets the shadow strength.
    pub color: Color,
}

/// Styled text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Text; `\n` forces a line break.
    pub text: String,
    /// Requested family (family name, PostScript name or font file stem).
    pub font_family: String,
    /// Size, rasterized 1:1 in canonical pixels.
    pub font_size_pt: f64,
    /// Fill color.
    #[serde(default = "white")]
    pub color: Color,
    /// Extra advance after each character; may be negative.
    #[serde(default)]
    pub tracking_px: f64,
    /// Outline width grown outward from the glyphs.
    #[serde(default)]
    pub stroke_width_px: f64,
    /// Outline color.
    #[serde(default = "black")]
    pub stroke_color: Color,
    /// Optional drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<TextShadow>,
    /// Wrap width; enables shrink-before-break.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width_px: Option<f64>,
    /// Line alignment.
    #[serde(default)]
    pub align: TextAlign,
}

fn white() -> Color {
    Color::WHITE
}

fn black() -> Color {
    Color::BLACK
}

impl TextLayer {
    /// Plain white text in the given family and size.
    pub fn new(text: impl Into<String>, font_family: impl Into<String>, font_size_pt: f64) -> Self {
        Self {
            text: text.into(),
            font_family: font_family.into(),
            font_size_pt,
            color: Color::WHITE,
            tracking_px: 0.0,
            stroke_width_px: 0.0,
            stroke_color: Color::BLACK,
            shadow: None,
            max_width_px: None,
            align: TextAlign::Center,
        }
    }

    fn validate(&self) -> ThumbResult<()> {
        if !self.font_size_pt.is_finite()
            || self.font_size_pt <= 0.0
            || self.font_size_pt > MAX_FONT_SIZE_PT
        {
            return Err(ThumbError::invalid_spec(format!(
                "fontSizePt must be in (0, {MAX_FONT_SIZE_PT}], got {}",
                self.font_size_pt
            )));
        }
        bounded("trackingPx", self.tracking_px, MAX_SHADOW_OFFSET)?;
        non_negative("strokeWidthPx", self.stroke_width_px)?;
        bounded("strokeWidthPx", self.stroke_width_px, MAX_STROKE_WIDTH_PX)?;
        if let Some(shadow) = &self.shadow {
            bounded("shadow offsetX", shadow.offset_x, MAX_SHADOW_OFFSET)?;
            bounded("shadow offsetY", shadow.offset_y, MAX_SHADOW_OFFSET)?;
            blur_sigma("shadow blurRadius", shadow.blur_radius)?;
        }
        if let Some(w) = self.max_width_px
            && (!w.is_finite() || w <= 0.0 || w > MAX_LAYER_EXTENT)
        {
            return Err(ThumbError::invalid_spec(format!(
                "maxWidthPx must be in (0, {MAX_LAYER_EXTENT}], got {w}"
            )));
        }
        Ok(())
    }
}

/// Highlight shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayShape {
    /// Rounded body, optionally with ribbon tails.
    Banner,
    /// Rounded rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the size box.
    Circle,
}

/// Colored highlight shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayer {
    /// Shape kind.
    pub shape: OverlayShape,
    /// Box the shape fills.
    pub size: Size,
    /// Fill color.
    pub color: Color,
    /// Corner radius for rectangles and banners (`0` = sharp).
    #[serde(default)]
    pub corner_radius: f64,
    /// Gaussian sigma applied to the whole shape.
    #[serde(default)]
    pub blur_radius: f64,
    /// Draw two ribbon tails under a banner.
    #[serde(default)]
    pub banner_tails: bool,
}

impl OverlayLayer {
    /// Sharp, unblurred shape.
    pub fn new(shape: OverlayShape, size: Size, color: Color) -> Self {
        Self {
            shape,
            size,
            color,
            corner_radius: 0.0,
            blur_radius: 0.0,
            banner_tails: false,
        }
    }

    fn validate(&self) -> ThumbResult<()> {
        self.size.validate("overlay")?;
        non_negative("cornerRadius", self.corner_radius)?;
        blur_sigma("overlay blurRadius", self.blur_radius)
    }
}

/// Soft drop shadow under an image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageShadow {
    /// Horizontal offset in pixels.
    pub offset_x: f64,
    /// Vertical offset in pixels.
    pub offset_y: f64,
    /// Gaussian sigma.
    #[serde(default)]
    pub blur_radius: f64,
    /// Shadow strength in `[0, 1]`.
    pub opacity: f64,
    /// Shadow tint.
    #[serde(default = "black")]
    pub color: Color,
}

/// Imported picture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    /// Path of the source picture.
    pub source_path: String,
    /// Size after scaling.
    pub size: Size,
    /// Mirror left-to-right.
    #[serde(default)]
    pub flip_horizontal: bool,
    /// Mirror top-to-bottom.
    #[serde(default)]
    pub flip_vertical: bool,
    /// Optional drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ImageShadow>,
}

impl ImageLayer {
    /// Unflipped image without shadow.
    pub fn new(source_path: impl Into<String>, size: Size) -> Self {
        Self {
            source_path: source_path.into(),
            size,
            flip_horizontal: false,
            flip_vertical: false,
            shadow: None,
        }
    }

    fn validate(&self) -> ThumbResult<()> {
        self.size.validate("image")?;
        if let Some(shadow) = &self.shadow {
            bounded("shadow offsetX", shadow.offset_x, MAX_SHADOW_OFFSET)?;
            bounded("shadow offsetY", shadow.offset_y, MAX_SHADOW_OFFSET)?;
            blur_sigma("shadow blurRadius", shadow.blur_radius)?;
            unit("shadow opacity", shadow.opacity)?;
        }
        Ok(())
    }
}

/// Variant payload of a layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerKind {
    /// Styled text.
    Text(TextLayer),
    /// Highlight shape.
    Overlay(OverlayLayer),
    /// Imported picture.
    Image(ImageLayer),
}

impl LayerKind {
    /// Tag used in documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Overlay(_) => "overlay",
            Self::Image(_) => "image",
        }
    }
}

/// One entry of the layer stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    id: LayerId,
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Top-left of the content box in canonical pixels.
    #[serde(default)]
    pub position: Position,
    /// Counter-clockwise rotation about the content box center.
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Multiplier on the layer's alpha at composite time.
    #[serde(default = "neutral")]
    pub opacity: f64,
    /// Hidden layers are skipped entirely.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Variant payload.
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    /// New visible, opaque, unrotated layer at the origin with a fresh id.
    pub fn new(kind: LayerKind) -> Self {
        Self::with_id(LayerId::generate(), kind)
    }

    /// Same as [`Layer::new`] with a caller-chosen id.
    pub fn with_id(id: impl Into<LayerId>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            position: Position::default(),
            rotation_degrees: 0.0,
            opacity: 1.0,
            visible: true,
            kind,
        }
    }

    /// Builder-style position setter.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Builder-style label setter.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder-style rotation setter.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Builder-style opacity setter.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    fn validate_fields(&self) -> ThumbResult<()> {
        bounded("position x", self.position.x, MAX_COORDINATE)?;
        bounded("position y", self.position.y, MAX_COORDINATE)?;
        finite("rotationDegrees", self.rotation_degrees)?;
        unit("opacity", self.opacity)?;
        match &self.kind {
            LayerKind::Text(t) => t.validate(),
            LayerKind::Overlay(o) => o.validate(),
            LayerKind::Image(i) => i.validate(),
        }
    }

    /// Layer id.
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: LayerId) {
        self.id = id;
    }

    /// Structural checks for shared and variant fields.
    pub fn validate(&self) -> ThumbResult<()> {
        self.validate_fields().map_err(|e| match e {
            ThumbError::InvalidSpec(msg) => {
                ThumbError::invalid_spec(format!("layer {}: {msg}", self.id))
            }
            other => other,
        })
    }
}

impl From<String> for LayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

fn finite(what: &str, v: f64) -> ThumbResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ThumbError::invalid_spec(format!("{what} must be finite")))
    }
}

fn bounded(what: &str, v: f64, limit: f64) -> ThumbResult<()> {
    if v.is_finite() && v.abs() <= limit {
        Ok(())
    } else {
        Err(ThumbError::invalid_spec(format!(
            "{what} must be within [-{limit}, {limit}], got {v}"
        )))
    }
}

fn blur_sigma(what: &str, v: f64) -> ThumbResult<()> {
    non_negative(what, v)?;
    if v > MAX_BLUR_SIGMA {
        return Err(ThumbError::invalid_spec(format!(
            "{what} must be at most {MAX_BLUR_SIGMA}, got {v}"
        )));
    }
    Ok(())
}

fn non_negative(what: &str, v: f64) -> ThumbResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ThumbError::invalid_spec(format!("{what} must be >= 0, got {v}")))
    }
}

fn unit(what: &str, v: f64) -> ThumbResult<()> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(ThumbError::invalid_spec(format!("{what} must be in [0, 1], got {v}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
