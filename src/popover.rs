//! The text popover: message, layout cache and dismissal lifecycle.
//!
//! A popover is shown once, redrawn any number of times from its cached
//! layout, and dismissed exactly once:
//!
//! ```text
//! Idle --show--> Visible --hide(animated)--> Fading --tick(after fade)--> Dismissed
//!                   \________________hide(immediate)____________________/
//! ```
//!
//! The fade is driven by the host calling [`TextPopover::tick`] with the
//! current time; there is no background timer. The dismissal observer is held
//! weakly and notified at most once per instance.

use std::rc::Weak;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::config::{Font, PopoverConfig};
use crate::defaults;
use crate::errors::{PopoverError, finite, non_negative};
use crate::layout::{ArrowDirection, LayoutMetrics, PopoverLayout, compute_layout};
use crate::measure::{TextMeasurer, message_size};
use crate::outline::{Outline, outline_for_layout};
use crate::render::PopoverRenderer;
use crate::types::{Point, Rect, Size};

/// Process-unique popover identity, passed to the dismissal observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopoverId(u64);

impl PopoverId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        PopoverId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Told when a popover has been removed.
pub trait DismissObserver {
    fn popover_did_dismiss(&self, popover: PopoverId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Visible,
    Fading { started: Instant },
    Dismissed,
}

/// Outcome of routing a pointer event through [`TextPopover::hit_test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The popover takes the event.
    Popover,
    /// The point was over a pass-through rect; the popover dismissed itself
    /// and the event should go on to whatever is underneath.
    PassThrough,
    /// Not ours; forward the event unchanged.
    Miss,
}

pub struct TextPopover<M: TextMeasurer> {
    id: PopoverId,
    message: String,
    message_size: Size,
    preferred_width: f64,
    measurer: M,
    config: PopoverConfig,
    metrics: LayoutMetrics,
    fade_duration: Duration,
    layout: Option<PopoverLayout>,
    phase: Phase,
    opacity: f64,
    interactive: bool,
    passthrough: Vec<Rect>,
    observer: Option<Weak<dyn DismissObserver>>,
    notified: bool,
}

impl<M: TextMeasurer> TextPopover<M> {
    pub fn new(message: impl Into<String>, measurer: M) -> Self {
        Self::build(message.into(), measurer, PopoverConfig::default())
    }

    /// Like [`new`](Self::new) with custom styling. The config is validated
    /// the same way [`set_config`](Self::set_config) validates it.
    pub fn with_config(
        message: impl Into<String>,
        measurer: M,
        config: PopoverConfig,
    ) -> Result<Self, PopoverError> {
        config.validate()?;
        Ok(Self::build(message.into(), measurer, config))
    }

    fn build(message: String, measurer: M, config: PopoverConfig) -> Self {
        let metrics = LayoutMetrics {
            edge_offset: config.offset,
            ..LayoutMetrics::default()
        };
        let mut popover = Self {
            id: PopoverId::next(),
            message,
            message_size: Size::ZERO,
            preferred_width: defaults::PREFERRED_WIDTH,
            measurer,
            config,
            metrics,
            fade_duration: defaults::FADE_DURATION,
            layout: None,
            phase: Phase::Idle,
            opacity: 1.0,
            interactive: true,
            passthrough: Vec::new(),
            observer: None,
            notified: false,
        };
        popover.remeasure();
        popover
    }

    fn remeasure(&mut self) {
        self.message_size = message_size(
            &self.measurer,
            &self.message,
            &self.config.font,
            self.preferred_width,
            self.metrics.text_margin,
        );
    }

    pub fn id(&self) -> PopoverId {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_size(&self) -> Size {
        self.message_size
    }

    pub fn preferred_width(&self) -> f64 {
        self.preferred_width
    }

    /// Width the popover wraps its message to, margins included.
    pub fn set_preferred_width(&mut self, width: f64) -> Result<(), PopoverError> {
        self.preferred_width = non_negative("preferred_width", width)?;
        self.remeasure();
        Ok(())
    }

    pub fn config(&self) -> &PopoverConfig {
        &self.config
    }

    /// Replace the styling. Takes effect on the next `show`; the message is
    /// re-measured since the font may have changed.
    pub fn set_config(&mut self, config: PopoverConfig) -> Result<(), PopoverError> {
        config.validate()?;
        self.metrics.edge_offset = config.offset;
        self.config = config;
        self.remeasure();
        Ok(())
    }

    pub fn set_font(&mut self, font: Font) -> Result<(), PopoverError> {
        non_negative("font.size", font.size)?;
        self.config.font = font;
        self.remeasure();
        Ok(())
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Override margins, tail height and screen inset. The edge offset stays
    /// in sync with `config.offset`.
    pub fn set_metrics(&mut self, metrics: LayoutMetrics) -> Result<(), PopoverError> {
        metrics.validate()?;
        self.config.offset = metrics.edge_offset;
        self.metrics = metrics;
        self.remeasure();
        Ok(())
    }

    pub fn set_fade_duration(&mut self, duration: Duration) {
        self.fade_duration = duration;
    }

    /// Rects (in container coordinates) that dismiss the popover when tapped.
    pub fn set_passthrough_rects(&mut self, rects: Vec<Rect>) {
        self.passthrough = rects;
    }

    /// Register the single dismissal observer. The popover does not keep it alive.
    pub fn set_observer(&mut self, observer: Weak<dyn DismissObserver>) {
        self.observer = Some(observer);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.phase, Phase::Visible | Phase::Fading { .. })
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn layout(&self) -> Option<&PopoverLayout> {
        self.layout.as_ref()
    }

    pub fn frame(&self) -> Option<Rect> {
        self.layout.map(|l| l.frame)
    }

    /// Lay the popover out against `anchor` inside `container` and make it visible.
    ///
    /// Showing a visible popover again recomputes the layout. A popover that
    /// has started dismissing cannot come back.
    pub fn show(
        &mut self,
        container: Rect,
        anchor: Rect,
        direction: ArrowDirection,
    ) -> Result<&PopoverLayout, PopoverError> {
        if matches!(self.phase, Phase::Fading { .. } | Phase::Dismissed) {
            return Err(PopoverError::Dismissed);
        }
        finite("container.width", container.width)?;
        for (field, value) in [
            ("anchor.x", anchor.x),
            ("anchor.y", anchor.y),
            ("anchor.width", anchor.width),
            ("anchor.height", anchor.height),
        ] {
            finite(field, value)?;
        }

        if self.message_size.is_empty() {
            crate::log::warn!(id = self.id.0, "showing a popover with no measurable content");
        }

        let layout = compute_layout(anchor, container, self.message_size, direction, &self.metrics);
        self.phase = Phase::Visible;
        self.opacity = 1.0;
        self.interactive = true;
        crate::log::debug!(id = self.id.0, frame = %layout.frame, "popover shown");

        Ok(self.layout.insert(layout))
    }

    /// Start dismissing. An animated hide fades out over the fade duration and
    /// finishes in [`tick`](Self::tick); an immediate hide removes the popover
    /// now, cutting short any fade in progress. Repeated hides are no-ops.
    pub fn hide(&mut self, animated: bool, now: Instant) {
        match self.phase {
            Phase::Idle | Phase::Dismissed => {
                crate::log::debug!(id = self.id.0, phase = ?self.phase, "hide ignored");
            }
            Phase::Fading { .. } if animated => {}
            Phase::Visible if animated => {
                crate::log::debug!(id = self.id.0, "popover fading out");
                self.phase = Phase::Fading { started: now };
            }
            Phase::Visible | Phase::Fading { .. } => self.finish_dismiss(),
        }
    }

    /// Advance the fade. Returns true when this call completed the dismissal.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Phase::Fading { started } = self.phase else {
            return false;
        };

        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.fade_duration {
            self.finish_dismiss();
            return true;
        }

        let progress = elapsed.as_secs_f64() / self.fade_duration.as_secs_f64();
        self.opacity = 1.0 - progress;
        false
    }

    fn finish_dismiss(&mut self) {
        self.phase = Phase::Dismissed;
        self.opacity = 0.0;
        self.interactive = false;
        crate::log::debug!(id = self.id.0, "popover dismissed");

        if self.notified {
            return;
        }
        self.notified = true;
        if let Some(observer) = self.observer.as_ref().and_then(Weak::upgrade) {
            observer.popover_did_dismiss(self.id);
        }
    }

    /// A touch landed on the popover: stop taking events and fade out.
    pub fn touch_began(&mut self, now: Instant) {
        if !self.is_visible() {
            return;
        }
        self.interactive = false;
        self.hide(true, now);
    }

    /// Route a pointer event at `point` (container coordinates).
    ///
    /// While interactive, points inside the frame belong to the popover.
    /// Anything else that lands on a pass-through rect dismisses the popover
    /// immediately before the event moves on.
    pub fn hit_test(&mut self, point: Point) -> Hit {
        if !self.is_visible() {
            return Hit::Miss;
        }
        let inside = self.frame().is_some_and(|f| f.contains(point));
        if inside && self.interactive {
            return Hit::Popover;
        }
        if self.passthrough.iter().any(|r| r.contains(point)) {
            crate::log::debug!(id = self.id.0, %point, "pass-through tap");
            self.finish_dismiss();
            return Hit::PassThrough;
        }
        Hit::Miss
    }

    /// The popover contour for the cached layout, in popover-local coordinates.
    pub fn outline(&self) -> Option<Outline> {
        self.layout
            .as_ref()
            .map(|l| outline_for_layout(l, self.config.radius, self.metrics.arrow_height))
    }

    /// Where the message is drawn, in popover-local coordinates.
    pub fn text_frame(&self) -> Option<Rect> {
        self.layout
            .as_ref()
            .map(|l| Rect::from_origin_size(l.text_origin(&self.metrics), self.message_size))
    }

    /// Paint the popover. Does nothing unless it is visible.
    pub fn draw<R: PopoverRenderer + ?Sized>(&self, renderer: &mut R) -> bool {
        if !self.is_visible() {
            return false;
        }
        let (Some(layout), Some(outline), Some(text_frame)) = (self.layout, self.outline(), self.text_frame())
        else {
            return false;
        };

        renderer.begin_popover(layout.frame, self.opacity);
        renderer.fill_outline(&outline, &self.config.background_color);
        if let Some(border) = &self.config.border_color {
            renderer.stroke_outline(&outline, border, self.config.border_width);
        }
        renderer.draw_text(&self.message, text_frame, &self.config.font, &self.config.text_color);
        renderer.end_popover();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Fixed(Size);

    impl TextMeasurer for Fixed {
        fn measure(&self, _text: &str, _font: &Font, _max_width: f64) -> Size {
            self.0
        }
    }

    #[derive(Default)]
    struct Counter(Cell<usize>);

    impl DismissObserver for Counter {
        fn popover_did_dismiss(&self, _popover: PopoverId) {
            self.0.set(self.0.get() + 1);
        }
    }

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);
    const ANCHOR: Rect = Rect::new(100.0, 500.0, 60.0, 30.0);

    fn shown() -> TextPopover<Fixed> {
        let mut p = TextPopover::new("hello", Fixed(Size::new(60.0, 20.0)));
        p.show(CONTAINER, ANCHOR, ArrowDirection::Up).unwrap();
        p
    }

    fn observe(p: &mut TextPopover<Fixed>) -> Rc<Counter> {
        let counter = Rc::new(Counter::default());
        let weak: Weak<dyn DismissObserver> = Rc::downgrade(&counter) as Weak<dyn DismissObserver>;
        p.set_observer(weak);
        counter
    }

    #[test]
    fn show_caches_layout() {
        let p = shown();
        assert_eq!(p.phase(), Phase::Visible);
        assert_eq!(p.frame(), Some(Rect::new(90.0, 535.0, 80.0, 48.0)));
        assert_eq!(p.text_frame(), Some(Rect::new(10.0, 18.0, 60.0, 20.0)));
    }

    #[test]
    fn immediate_hide_notifies_once() {
        let mut p = shown();
        let counter = observe(&mut p);
        let now = Instant::now();
        p.hide(false, now);
        p.hide(false, now);
        p.hide(true, now);
        assert_eq!(counter.0.get(), 1);
        assert_eq!(p.phase(), Phase::Dismissed);
    }

    #[test]
    fn animated_hide_fades_then_notifies() {
        let mut p = shown();
        let counter = observe(&mut p);
        let start = Instant::now();
        p.hide(true, start);
        assert!(matches!(p.phase(), Phase::Fading { .. }));

        assert!(!p.tick(start + Duration::from_millis(150)));
        assert!((p.opacity() - 0.5).abs() < 1e-9);
        assert_eq!(counter.0.get(), 0);

        assert!(p.tick(start + Duration::from_millis(300)));
        assert_eq!(counter.0.get(), 1);
        assert!(!p.tick(start + Duration::from_millis(400)));
        assert_eq!(counter.0.get(), 1);
    }

    #[test]
    fn immediate_hide_cuts_fade_short() {
        let mut p = shown();
        let counter = observe(&mut p);
        let start = Instant::now();
        p.hide(true, start);
        p.hide(false, start + Duration::from_millis(10));
        assert_eq!(p.phase(), Phase::Dismissed);
        p.tick(start + Duration::from_secs(1));
        assert_eq!(counter.0.get(), 1);
    }

    #[test]
    fn hide_before_show_is_ignored() {
        let mut p = TextPopover::new("hello", Fixed(Size::new(60.0, 20.0)));
        let counter = observe(&mut p);
        p.hide(false, Instant::now());
        assert_eq!(p.phase(), Phase::Idle);
        assert_eq!(counter.0.get(), 0);
    }

    #[test]
    fn dropped_observer_is_skipped() {
        let mut p = shown();
        drop(observe(&mut p));
        p.hide(false, Instant::now());
        assert_eq!(p.phase(), Phase::Dismissed);
    }

    #[test]
    fn cannot_reshow_after_dismissal() {
        let mut p = shown();
        p.hide(false, Instant::now());
        assert_eq!(
            p.show(CONTAINER, ANCHOR, ArrowDirection::Up).err(),
            Some(PopoverError::Dismissed)
        );
    }

    #[test]
    fn show_rejects_non_finite_anchor() {
        let mut p = TextPopover::new("hello", Fixed(Size::new(60.0, 20.0)));
        let anchor = Rect::new(f64::NAN, 0.0, 10.0, 10.0);
        assert!(p.show(CONTAINER, anchor, ArrowDirection::Up).is_err());
        assert_eq!(p.phase(), Phase::Idle);
    }

    #[test]
    fn hit_test_routes_points() {
        let mut p = shown();
        let counter = observe(&mut p);
        p.set_passthrough_rects(vec![Rect::new(0.0, 0.0, 50.0, 50.0)]);

        assert_eq!(p.hit_test(Point::new(100.0, 550.0)), Hit::Popover);
        assert_eq!(p.hit_test(Point::new(300.0, 10.0)), Hit::Miss);
        assert_eq!(counter.0.get(), 0);

        assert_eq!(p.hit_test(Point::new(10.0, 10.0)), Hit::PassThrough);
        assert_eq!(p.phase(), Phase::Dismissed);
        assert_eq!(counter.0.get(), 1);

        assert_eq!(p.hit_test(Point::new(10.0, 10.0)), Hit::Miss);
        assert_eq!(counter.0.get(), 1);
    }

    #[test]
    fn touched_popover_lets_taps_through_its_own_frame() {
        let mut p = shown();
        let counter = observe(&mut p);
        // pass-through rect underneath the popover frame
        p.set_passthrough_rects(vec![Rect::new(80.0, 530.0, 100.0, 60.0)]);
        let inside = Point::new(100.0, 550.0);

        assert_eq!(p.hit_test(inside), Hit::Popover);
        p.touch_began(Instant::now());
        assert!(!p.is_interactive());

        assert_eq!(p.hit_test(inside), Hit::PassThrough);
        assert_eq!(p.phase(), Phase::Dismissed);
        assert_eq!(counter.0.get(), 1);
    }

    #[test]
    fn with_config_validates() {
        let bad = PopoverConfig {
            radius: f64::NAN,
            ..PopoverConfig::default()
        };
        assert!(matches!(
            TextPopover::with_config("hello", Fixed(Size::ZERO), bad),
            Err(PopoverError::InvalidMetric { .. })
        ));

        let ok = PopoverConfig {
            offset: 12.0,
            ..PopoverConfig::default()
        };
        let p = TextPopover::with_config("hello", Fixed(Size::ZERO), ok).unwrap();
        assert_eq!(p.metrics().edge_offset, 12.0);
    }

    #[test]
    fn touch_disables_interaction_and_fades() {
        let mut p = shown();
        let now = Instant::now();
        p.touch_began(now);
        assert!(!p.is_interactive());
        assert!(matches!(p.phase(), Phase::Fading { .. }));
        assert_eq!(p.hit_test(Point::new(100.0, 550.0)), Hit::Miss);
    }

    #[test]
    fn preferred_width_remeasures() {
        struct Echo;
        impl TextMeasurer for Echo {
            fn measure(&self, _text: &str, _font: &Font, max_width: f64) -> Size {
                Size::new(max_width, 10.0)
            }
        }
        let mut p = TextPopover::new("hello", Echo);
        assert_eq!(p.message_size(), Size::new(100.0, 10.0));
        p.set_preferred_width(220.0).unwrap();
        assert_eq!(p.message_size(), Size::new(200.0, 10.0));
        assert!(p.set_preferred_width(-1.0).is_err());
    }

    #[test]
    fn config_offset_drives_layout() {
        let mut p = TextPopover::new("hello", Fixed(Size::new(60.0, 20.0)));
        p.set_config(PopoverConfig {
            offset: 12.0,
            ..PopoverConfig::default()
        })
        .unwrap();
        let layout = p.show(CONTAINER, ANCHOR, ArrowDirection::Up).unwrap();
        assert_eq!(layout.frame.y, 530.0 + 12.0);
    }

    #[test]
    fn ids_are_unique() {
        let a = TextPopover::new("a", Fixed(Size::ZERO));
        let b = TextPopover::new("b", Fixed(Size::ZERO));
        assert_ne!(a.id(), b.id());
    }
}
