use std::borrow::Cow;

use image::RgbaImage;

use crate::{
    assets::{AssetSource, decode_premul},
    catalog::{Catalog, Category, Layer},
    composite, encode,
    error::{IconError, IconResult},
    placement, transform,
};

/// One externally fetched subject image, named for diagnostics.
#[derive(Clone, Debug)]
pub struct SubjectImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SubjectImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A single composition: an event's layer stack, 1..=4 subject images, and
/// zero or more cosmetic selections.
#[derive(Clone, Debug, Default)]
pub struct CompositionRequest {
    pub event: String,
    pub subjects: Vec<SubjectImage>,
    pub cosmetics: Vec<String>,
}

enum Source<'a> {
    /// Bytes come from the caller's [`AssetSource`] via the layer's `image`
    /// reference.
    Asset,
    /// Bytes supplied inline with the request (subject images).
    Inline(&'a [u8]),
}

/// Flatten one request into an encoded PNG.
///
/// The pipeline is strictly linear: sort the event's layers by category,
/// splice the subject layout in at the first cosmetic layer (or the end),
/// append selected cosmetics, then decode → transform → place → blend each
/// layer onto a canvas sized to the background's decoded bounds. The first
/// error aborts the whole request; no partial image is ever returned.
#[tracing::instrument(
    skip(catalog, assets, request),
    fields(event = %request.event, subjects = request.subjects.len())
)]
pub fn compose(
    catalog: &Catalog,
    assets: &dyn AssetSource,
    request: &CompositionRequest,
) -> IconResult<Vec<u8>> {
    let event = catalog.lookup_event(&request.event)?;

    let mut layers = event.layers.clone();
    layers.sort_by_key(|l| l.category.order());

    let splice_at = layers
        .iter()
        .position(|l| l.category == Category::Cosmetic)
        .unwrap_or(layers.len());

    let table = catalog.layout_table();
    let slots = table.resolve(request.subjects.len())?;

    let mut staged: Vec<(Layer, Source)> =
        layers.into_iter().map(|l| (l, Source::Asset)).collect();
    let subject_layers = slots.iter().zip(&request.subjects).map(|(slot, subject)| {
        let mut layer = slot.clone();
        layer.image = subject.name.clone();
        (layer, Source::Inline(subject.bytes.as_slice()))
    });
    // empty replace range: this inserts the subject layers at splice_at
    staged
        .splice(splice_at..splice_at, subject_layers)
        .for_each(drop);

    for name in &request.cosmetics {
        let cosmetic = catalog.lookup_cosmetic(name)?;
        staged.extend(
            cosmetic
                .layers
                .iter()
                .cloned()
                .map(|l| (l, Source::Asset)),
        );
    }

    let mut stack = staged.iter();
    let Some((background, bg_source)) = stack.next() else {
        return Err(IconError::composition(format!(
            "event {:?} has no layers",
            request.event
        )));
    };
    if background.category != Category::Background {
        return Err(IconError::composition(format!(
            "event {:?} has no background layer",
            request.event
        )));
    }

    // The background's decoded bounds fix the canvas size for good.
    let decoded = decode_layer(assets, background, bg_source)?;
    let (canvas_w, canvas_h) = decoded.dimensions();
    let mut canvas = RgbaImage::new(canvas_w, canvas_h);
    render_layer(&mut canvas, background, decoded);

    for (layer, source) in stack {
        let decoded = decode_layer(assets, layer, source)?;
        render_layer(&mut canvas, layer, decoded);
    }

    encode::encode_png(&canvas)
}

fn decode_layer(
    assets: &dyn AssetSource,
    layer: &Layer,
    source: &Source<'_>,
) -> IconResult<RgbaImage> {
    let desc = layer.describe();
    tracing::debug!(layer = %desc, "compositing layer");

    let bytes: Cow<'_, [u8]> = match source {
        Source::Inline(bytes) => Cow::Borrowed(*bytes),
        Source::Asset => Cow::Owned(
            assets
                .fetch(&layer.image)
                .map_err(|err| err.for_layer(&desc))?,
        ),
    };
    decode_premul(&bytes).map_err(|err| err.for_layer(&desc))
}

fn render_layer(canvas: &mut RgbaImage, layer: &Layer, decoded: RgbaImage) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    let transformed = transform::apply(layer, decoded, canvas_w, canvas_h);
    let (x, y) = placement::place(
        layer.position,
        transformed.width(),
        transformed.height(),
        canvas_w,
        canvas_h,
        layer.offset_x,
        layer.offset_y,
    );
    composite::draw_over(canvas, &transformed, x, y);
}
