//! Map composition: wiring adapted fields and symbology into a map backend.

use field_common::{SymbologyError, SymbologyResult};
use field_geojson::{DateSelector, FieldCollection, FieldFeature};
use symbology::{resolve, ColorTable, PathStyle, Symbology};
use tracing::{debug, warn};

use crate::config::ErrorPolicy;

/// The per-feature visual a styler writes into.
pub trait StyleTarget {
    fn set_style(&mut self, style: PathStyle);
}

/// An interactive mapping capability.
///
/// The backend owns rendering: it invokes the styler once per feature during
/// its own pass, and never observes a return value from it.
pub trait MapCapability {
    type Handle: Copy;
    type Layer: StyleTarget;

    /// Add a collection as a layer, styling each feature with `styler`.
    fn register_feature_styler<F>(&mut self, collection: FieldCollection, styler: F) -> Self::Handle
    where
        F: FnMut(&FieldFeature, &mut Self::Layer);

    /// Move the viewport so every feature of the layer is visible.
    fn fit_viewport_to_bounds(&mut self, handle: Self::Handle);
}

/// Styles fields for one render session from a fixed date and color table.
pub struct FieldStyler<'a> {
    selector: DateSelector,
    table: &'a ColorTable,
    styled: usize,
    failures: Vec<(String, SymbologyError)>,
}

impl<'a> FieldStyler<'a> {
    pub fn new(selector: DateSelector, table: &'a ColorTable) -> Self {
        Self {
            selector,
            table,
            styled: 0,
            failures: Vec::new(),
        }
    }

    /// Symbology for the selected observation of a feature.
    pub fn symbology_for(&self, feature: &FieldFeature) -> SymbologyResult<Symbology> {
        let value = self.selector.select(feature)?;
        resolve(value, self.table)
    }

    /// Style one feature's layer. Failures are recorded, never propagated, so
    /// one bad field leaves the others untouched.
    pub fn apply<L: StyleTarget>(&mut self, feature: &FieldFeature, layer: &mut L) {
        match self.symbology_for(feature) {
            Ok(symbology) => {
                debug!(
                    field = %feature.label(),
                    fill = %symbology.fill,
                    outline = %symbology.outline,
                    "Styled field"
                );
                layer.set_style(PathStyle::from(symbology));
                self.styled += 1;
            }
            Err(e) => {
                warn!(field = %feature.label(), error = %e, code = e.code(), "Could not style field");
                self.failures.push((feature.label(), e));
            }
        }
    }

    /// Close the session under an error policy.
    pub fn finish(self, policy: ErrorPolicy) -> SymbologyResult<StyleReport> {
        if let (ErrorPolicy::Abort, Some((_, err))) = (policy, self.failures.first()) {
            return Err(err.clone());
        }
        Ok(StyleReport {
            styled: self.styled,
            skipped: self.failures,
        })
    }
}

/// Outcome of a styling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleReport {
    pub styled: usize,
    /// Fields left unstyled, with the reason
    pub skipped: Vec<(String, SymbologyError)>,
}

/// Register the collection with the map, style every field, and fit the view.
pub fn render<M: MapCapability>(
    map: &mut M,
    collection: FieldCollection,
    selector: DateSelector,
    table: &ColorTable,
    policy: ErrorPolicy,
) -> SymbologyResult<StyleReport> {
    let mut styler = FieldStyler::new(selector, table);
    let handle = map.register_feature_styler(collection, |feature, layer| {
        styler.apply(feature, layer)
    });

    let report = styler.finish(policy)?;
    map.fit_viewport_to_bounds(handle);
    Ok(report)
}
