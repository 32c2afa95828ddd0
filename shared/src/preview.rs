//! Preview lifecycle for the selected image.
//!
//! A selection moves through `Unloaded → Loading → (Decoded | LoadFailed) →
//! Measured`. Decode and layout measurements arrive asynchronously, tagged
//! with the [`Generation`] handed out by [`PreviewController::select`]; results
//! for an older selection are dropped.
//!
//! The controller owns the preview source (an object URL in the browser).
//! Replacing it drops the previous one, so a superseded URL is never
//! reachable from here.

use derive_more::{Display, From};

use crate::geometry::{PreviewGeometry, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    Unloaded,
    Loading,
    Decoded,
    LoadFailed,
    Measured,
    LoadFailedMeasured,
}

impl PreviewPhase {
    pub fn is_measured(self) -> bool {
        matches!(self, PreviewPhase::Measured | PreviewPhase::LoadFailedMeasured)
    }

    fn awaiting_layout(self) -> bool {
        matches!(self, PreviewPhase::Decoded | PreviewPhase::LoadFailed)
    }
}

pub struct PreviewController<U> {
    source: Option<U>,
    generation: Generation,
    phase: PreviewPhase,
    natural: Size,
    display: Size,
}

impl<U> Default for PreviewController<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> PreviewController<U> {
    pub fn new() -> Self {
        Self {
            source: None,
            generation: Generation::default(),
            phase: PreviewPhase::Unloaded,
            natural: Size::default(),
            display: Size::default(),
        }
    }

    /// Replaces the current preview source.
    ///
    /// Returns the generation that later decode/measure results must carry,
    /// or `None` when nothing was selected.
    pub fn select(&mut self, source: Option<U>) -> Option<Generation> {
        self.generation = Generation(self.generation.0 + 1);
        self.natural = Size::default();
        self.display = Size::default();

        match source {
            Some(source) => {
                self.source = Some(source);
                self.phase = PreviewPhase::Loading;
                Some(self.generation)
            }
            None => {
                self.source = None;
                self.phase = PreviewPhase::Unloaded;
                None
            }
        }
    }

    pub fn decoded(&mut self, generation: Generation, natural: Size) -> bool {
        if !self.accepts(generation, PreviewPhase::Loading) {
            return false;
        }
        self.natural = natural;
        self.phase = PreviewPhase::Decoded;
        true
    }

    /// Records a failed decode. `natural` is whatever size the element still
    /// reports, which may be zero; the flow continues either way.
    pub fn decode_failed(&mut self, generation: Generation, natural: Size) -> bool {
        if !self.accepts(generation, PreviewPhase::Loading) {
            return false;
        }
        self.natural = natural;
        self.phase = PreviewPhase::LoadFailed;
        true
    }

    /// Stores the laid-out size once the browser has settled the new image.
    pub fn layout_settled(&mut self, generation: Generation, display: Size) -> bool {
        if generation != self.generation || !self.phase.awaiting_layout() {
            log::debug!("Ignoring layout for stale preview generation {}", generation);
            return false;
        }
        self.display = display;
        self.phase = match self.phase {
            PreviewPhase::LoadFailed => PreviewPhase::LoadFailedMeasured,
            _ => PreviewPhase::Measured,
        };
        true
    }

    /// Re-reads the display size after the page was re-laid out.
    pub fn remeasure(&mut self, display: Size) -> bool {
        if !self.phase.is_measured() || self.display == display {
            return false;
        }
        self.display = display;
        true
    }

    /// Geometry for the overlay, available once the preview has been measured.
    pub fn geometry(&self) -> Option<PreviewGeometry> {
        self.phase.is_measured().then_some(PreviewGeometry {
            natural: self.natural,
            display: self.display,
        })
    }

    pub fn source(&self) -> Option<&U> {
        self.source.as_ref()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn phase(&self) -> PreviewPhase {
        self.phase
    }

    fn accepts(&self, generation: Generation, phase: PreviewPhase) -> bool {
        if generation != self.generation || self.phase != phase {
            log::debug!("Ignoring decode result for stale preview generation {}", generation);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts how many sources have been released.
    struct Source {
        released: Rc<Cell<usize>>,
    }

    impl Drop for Source {
        fn drop(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn source(released: &Rc<Cell<usize>>) -> Option<Source> {
        Some(Source {
            released: released.clone(),
        })
    }

    #[test]
    fn decode_then_measure() {
        let mut preview = PreviewController::<&str>::new();
        let generation = preview.select(Some("blob:1")).unwrap();
        assert_eq!(preview.phase(), PreviewPhase::Loading);
        assert!(preview.geometry().is_none());

        assert!(preview.decoded(generation, Size::new(1000.0, 500.0)));
        assert!(preview.geometry().is_none());

        assert!(preview.layout_settled(generation, Size::new(500.0, 250.0)));
        assert_eq!(preview.phase(), PreviewPhase::Measured);
        assert_eq!(
            preview.geometry(),
            Some(PreviewGeometry {
                natural: Size::new(1000.0, 500.0),
                display: Size::new(500.0, 250.0),
            })
        );
    }

    #[test]
    fn decode_failure_still_measures() {
        let mut preview = PreviewController::<&str>::new();
        let generation = preview.select(Some("blob:1")).unwrap();
        assert!(preview.decode_failed(generation, Size::default()));
        assert_eq!(preview.phase(), PreviewPhase::LoadFailed);

        assert!(preview.layout_settled(generation, Size::new(320.0, 200.0)));
        assert_eq!(preview.phase(), PreviewPhase::LoadFailedMeasured);

        let geometry = preview.geometry().unwrap();
        assert_eq!(geometry.display, Size::new(320.0, 200.0));
        assert!(geometry.scale().is_none());
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut preview = PreviewController::<&str>::new();
        let first = preview.select(Some("blob:1")).unwrap();
        let second = preview.select(Some("blob:2")).unwrap();
        assert!(second > first);

        assert!(!preview.decoded(first, Size::new(10.0, 10.0)));
        assert!(preview.decoded(second, Size::new(20.0, 20.0)));
        assert!(!preview.layout_settled(first, Size::new(1.0, 1.0)));
        assert!(preview.layout_settled(second, Size::new(40.0, 40.0)));

        assert_eq!(preview.source(), Some(&"blob:2"));
        assert_eq!(preview.geometry().unwrap().natural, Size::new(20.0, 20.0));
    }

    #[test]
    fn layout_before_decode_is_rejected() {
        let mut preview = PreviewController::<&str>::new();
        let generation = preview.select(Some("blob:1")).unwrap();
        assert!(!preview.layout_settled(generation, Size::new(10.0, 10.0)));
        assert_eq!(preview.phase(), PreviewPhase::Loading);
    }

    #[test]
    fn replacing_a_source_releases_the_previous_one() {
        let released = Rc::new(Cell::new(0));
        let mut preview = PreviewController::new();

        preview.select(source(&released));
        assert_eq!(released.get(), 0);

        preview.select(source(&released));
        assert_eq!(released.get(), 1);

        assert!(preview.select(None).is_none());
        assert_eq!(released.get(), 2);
        assert!(!preview.has_source());
        assert_eq!(preview.phase(), PreviewPhase::Unloaded);
    }

    #[test]
    fn remeasure_only_after_layout() {
        let mut preview = PreviewController::<&str>::new();
        assert!(!preview.remeasure(Size::new(10.0, 10.0)));

        let generation = preview.select(Some("blob:1")).unwrap();
        preview.decoded(generation, Size::new(100.0, 100.0));
        preview.layout_settled(generation, Size::new(50.0, 50.0));

        assert!(!preview.remeasure(Size::new(50.0, 50.0)));
        assert!(preview.remeasure(Size::new(80.0, 80.0)));
        assert_eq!(preview.geometry().unwrap().display, Size::new(80.0, 80.0));
    }
}
