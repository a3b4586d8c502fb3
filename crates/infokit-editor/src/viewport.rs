//! Viewport and coordinate transformation.
//!
//! Converts between screen coordinates (host pointer events) and scene-local
//! coordinates (node bounds). Both spaces have +Y pointing down; the
//! transform is a uniform zoom, a pan offset and the view padding derived
//! from the options.

use std::fmt;

use crate::scene::Point;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 50.0;

/// View transform state.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    /// top, right, bottom, left
    padding: [f64; 4],
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            padding: [0.0; 4],
        }
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level; values outside 0.1..50.0 are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > MIN_ZOOM && zoom < MAX_ZOOM {
            self.zoom = zoom;
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Resets zoom and pan; padding is kept.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    pub fn padding(&self) -> [f64; 4] {
        self.padding
    }

    /// Applies the padding derived from the options (top, right, bottom, left).
    pub fn apply_padding(&mut self, padding: [f64; 4]) {
        if self.padding != padding {
            tracing::debug!("Viewport padding {:?} -> {:?}", self.padding, padding);
            self.padding = padding;
        }
    }

    /// Screen position of the scene-local origin.
    fn origin(&self) -> (f64, f64) {
        (
            self.pan_x + self.padding[3] * self.zoom,
            self.pan_y + self.padding[0] * self.zoom,
        )
    }

    /// Converts a screen point to scene-local coordinates.
    ///
    /// ```text
    /// local_x = (screen_x - pan_x) / zoom - padding_left
    /// local_y = (screen_y - pan_y) / zoom - padding_top
    /// ```
    pub fn screen_to_local(&self, screen: Point) -> Point {
        let (ox, oy) = self.origin();
        Point::new((screen.x - ox) / self.zoom, (screen.y - oy) / self.zoom)
    }

    /// Converts a scene-local point to screen coordinates.
    pub fn local_to_screen(&self, local: Point) -> Point {
        let (ox, oy) = self.origin();
        Point::new(local.x * self.zoom + ox, local.y * self.zoom + oy)
    }

    /// Converts a screen-space distance to a scene-local distance.
    pub fn screen_distance_to_local(&self, distance: f64) -> f64 {
        distance / self.zoom
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport(zoom: {:.2}, pan: ({:.2}, {:.2}), padding: {:?})",
            self.zoom, self.pan_x, self.pan_y, self.padding
        )
    }
}
