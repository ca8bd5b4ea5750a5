//! End-to-end pipeline: signals through the debounced observer into a
//! full orchestrator pass over a region with mixed children.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use scalefit_engine::{
    CharGridSurface, ClampTriple, ElementOutcome, FitMethod, JsonConfigResolver, LayoutUpdate,
    MeasureSurface, ObserverConfig, ObserverHandle, Orientation, OrientationPreference,
    ReferenceDesign, RegionTransform, SignalKind, TargetRegion, TextChild, TextFitMode, Viewport,
};
use serde_json::json;
use uuid::Uuid;

/// Scoreboard-like region: a handful of text cells backed by the
/// deterministic character-grid surface.
struct BoardRegion {
    children: Vec<(TextChild, CharGridSurface)>,
    transform: Option<RegionTransform>,
    properties: Vec<(String, ClampTriple)>,
}

impl BoardRegion {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            transform: None,
            properties: Vec::new(),
        }
    }

    fn add(&mut self, content: &str, font_size: f32, w: f32, h: f32) -> Uuid {
        let id = Uuid::new_v4();
        self.children.push((
            TextChild {
                id,
                content: content.to_string(),
                font_size,
            },
            CharGridSurface::new(content, w, h),
        ));
        id
    }
}

impl TargetRegion for BoardRegion {
    fn set_transform(&mut self, transform: RegionTransform) {
        self.transform = Some(transform);
    }

    fn set_scale_property(&mut self, name: &str, value: ClampTriple) {
        self.properties.push((name.to_string(), value));
    }

    fn fittable_children(&self) -> Vec<TextChild> {
        self.children.iter().map(|(c, _)| c.clone()).collect()
    }

    fn measure_surface(&mut self, id: Uuid) -> Option<&mut dyn MeasureSurface> {
        self.children
            .iter_mut()
            .find(|(c, _)| c.id == id)
            .map(|(_, s)| s as &mut dyn MeasureSurface)
    }
}

#[test]
fn resize_burst_produces_one_fitted_update() {
    let mut region = BoardRegion::new();
    let short_id = region.add("LAP 12", 14.0, 400.0, 40.0);
    let long_id = region.add("CHAMPIONSHIPLEADERBOARD", 36.0, 300.0, 50.0);
    let wrap_id = region.add("PIT IN", 16.0, 36.0, 60.0);
    let static_id = region.add("ticker ticker ticker", 16.0, 10.0, 10.0);

    let mut resolver = JsonConfigResolver::new();
    resolver.insert(long_id, json!({ "textFit": "shrink", "maxReductionPercent": 60.0 }));
    resolver.insert(static_id, json!({ "textFit": "ellipsis" }));

    let updates: Rc<RefCell<Vec<LayoutUpdate>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = updates.clone();

    let t0 = Instant::now();
    let mut handle = ObserverHandle::observe(
        Viewport::new(1920.0, 1080.0),
        move |u: &LayoutUpdate| sink.borrow_mut().push(u.clone()),
        ObserverConfig::default(),
        t0,
    );

    let design = ReferenceDesign::FULL_HD;
    let pump = |handle: &mut ObserverHandle, region: &mut BoardRegion, now: Instant| {
        handle
            .pump(now, region, &design, OrientationPreference::Auto, &resolver)
            .unwrap()
    };

    // Initial pass.
    assert!(pump(&mut handle, &mut region, t0));

    // A drag-resize burst followed by quiet; only the trailing edge runs.
    for i in 1..=8u64 {
        handle.signal(
            SignalKind::Resize,
            Viewport::new(1920.0 - 100.0 * i as f32, 1080.0),
            t0 + Duration::from_millis(20 * i),
        );
    }
    assert!(!pump(&mut handle, &mut region, t0 + Duration::from_millis(200)));
    assert!(pump(&mut handle, &mut region, t0 + Duration::from_millis(160 + 150)));

    let updates = updates.borrow();
    assert_eq!(updates.len(), 2);

    // Final viewport is 1120x1080: width-limited fit of a 16:9 design.
    let last = &updates[1];
    assert_eq!(last.fit.orientation, Orientation::Landscape);
    assert!((last.fit.width - 1120.0).abs() < 1e-2);
    assert!((last.fit.scale - 1120.0 / 1920.0).abs() < 1e-4);
    assert_eq!(last.fit.offset_x, 0.0);
    assert!(last.fit.offset_y > 0.0);

    // Transform and the full property ladder reached the region on the
    // second pass as well.
    let transform = region.transform.unwrap();
    assert!((transform.scale - last.fit.scale).abs() < 1e-6);
    assert_eq!(region.properties.len(), 2 * last.properties.len());

    // Per-element outcomes: untouched, shrunk, wrapped, bypassed.
    assert!(matches!(
        &last.elements[&short_id],
        ElementOutcome::Fitted(o) if o.method == FitMethod::Unchanged && o.fits
    ));
    assert!(matches!(
        &last.elements[&long_id],
        ElementOutcome::Fitted(o)
            if o.method == FitMethod::FontReduction && o.fits && o.final_font_size < 36.0
    ));
    assert!(matches!(
        &last.elements[&wrap_id],
        ElementOutcome::Fitted(o) if o.method == FitMethod::WordWrap && o.fits
    ));
    assert_eq!(
        last.elements[&static_id],
        ElementOutcome::Static(TextFitMode::Ellipsis)
    );
}

#[test]
fn rotation_refits_in_portrait_after_settling() {
    let mut region = BoardRegion::new();
    region.add("POS 1", 14.0, 400.0, 40.0);

    let updates: Rc<RefCell<Vec<LayoutUpdate>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = updates.clone();

    let t0 = Instant::now();
    let mut handle = ObserverHandle::observe(
        Viewport::new(1920.0, 1080.0),
        move |u: &LayoutUpdate| sink.borrow_mut().push(u.clone()),
        ObserverConfig::default(),
        t0,
    );

    let design = ReferenceDesign::FULL_HD;
    let resolver = JsonConfigResolver::new();
    let pump = |handle: &mut ObserverHandle, region: &mut BoardRegion, now: Instant| {
        handle
            .pump(now, region, &design, OrientationPreference::Auto, &resolver)
            .unwrap()
    };

    assert!(pump(&mut handle, &mut region, t0));

    handle.signal(
        SignalKind::OrientationChange,
        Viewport::new(1080.0, 1920.0),
        t0,
    );
    // Base debounce alone is not enough after rotation.
    assert!(!pump(&mut handle, &mut region, t0 + Duration::from_millis(150)));
    assert!(pump(&mut handle, &mut region, t0 + Duration::from_millis(250)));

    let updates = updates.borrow();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1].fit.orientation, Orientation::Portrait);
    // Rotated reference fills the portrait viewport exactly.
    assert!((updates[1].fit.width - 1080.0).abs() < 1e-2);
    assert!((updates[1].fit.height - 1920.0).abs() < 1e-2);
    assert_eq!(updates[1].fit.offset_x, 0.0);
    assert_eq!(updates[1].fit.offset_y, 0.0);
}

#[test]
fn released_handle_never_reaches_callback() {
    let mut region = BoardRegion::new();
    region.add("X", 14.0, 400.0, 40.0);

    let calls = Rc::new(RefCell::new(0u32));
    let sink = calls.clone();

    let t0 = Instant::now();
    let mut handle = ObserverHandle::observe(
        Viewport::new(1920.0, 1080.0),
        move |_: &LayoutUpdate| *sink.borrow_mut() += 1,
        ObserverConfig::default(),
        t0,
    );

    handle.signal(SignalKind::Resize, Viewport::new(800.0, 600.0), t0);
    handle.release();
    handle.release();

    let fired = handle
        .pump(
            t0 + Duration::from_secs(5),
            &mut region,
            &ReferenceDesign::FULL_HD,
            OrientationPreference::Auto,
            &JsonConfigResolver::new(),
        )
        .unwrap();
    assert!(!fired);
    assert_eq!(*calls.borrow(), 0);
}
