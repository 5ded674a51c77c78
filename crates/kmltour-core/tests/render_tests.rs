//! End-to-end rendering tests
//!
//! Builds small scene graphs through the public API and checks the rendered
//! element tree and its serialized text.

use kmltour_core::{
    AbstractView, AltitudeMode, AnimatedUpdate, AnimatedUpdateOptions, Color, Document, Element,
    Feature, FlyTo, FlyToMode, GroundOverlay, IconStyle, KmlError, LabelStyle, LatLonBox,
    LineString, LookAt, Placemark, Point, Render, RenderContext, ScreenOverlay, Style, StyleMap,
    StyleRef, StyleSelector, TimeStamp, TourPrimitive, ViewParams, XY,
};

fn named_placemark(name: &str, point: Point) -> Placemark {
    Placemark::new(Some(name.to_string()), Some(point.into()))
}

fn document_element(doc: &Document) -> Element {
    let kml = doc.to_kml_document().unwrap();
    kml.document().cloned().unwrap()
}

// ============================================================================
// Feature trees
// ============================================================================

#[test]
fn test_children_render_in_insertion_order() {
    let mut doc = Document::new(Some("ordered".to_string()));
    doc.add(named_placemark("a", Point::new(1.0, 1.0, 0.0)));
    doc.new_folder(Some("folder".to_string()));
    doc.add(named_placemark("b", Point::new(2.0, 2.0, 0.0)));
    doc.add(named_placemark("c", Point::new(3.0, 3.0, 0.0)));
    doc.leave_folder();
    doc.add(named_placemark("d", Point::new(4.0, 4.0, 0.0)));

    let document = document_element(&doc);
    let top: Vec<String> = document
        .elements()
        .filter(|e| e.name == "Placemark" || e.name == "Folder")
        .map(|e| e.child_text("name").unwrap_or_default())
        .collect();
    assert_eq!(top, ["a", "folder", "d"]);

    let folder = document.child("Folder").unwrap();
    let inner: Vec<String> = folder
        .elements()
        .filter(|e| e.name == "Placemark")
        .map(|e| e.child_text("name").unwrap_or_default())
        .collect();
    assert_eq!(inner, ["b", "c"]);
}

#[test]
fn test_placemark_with_line_string() {
    let mut line = LineString::new([[0.0, 0.0, 10.0], [1.0, 1.0, 20.0]]);
    line.path.tessellate = Some(true);
    line.path.altitude_mode = Some(AltitudeMode::RelativeToSeaFloor);
    let mut doc = Document::default();
    doc.add(Placemark::new(Some("route".to_string()), Some(line.into())));

    let document = document_element(&doc);
    let line = document.find("LineString").unwrap();
    assert_eq!(line.child_text("coordinates").as_deref(), Some("0,0,10 1,1,20"));
    assert_eq!(line.child_text("tessellate").as_deref(), Some("1"));
    assert_eq!(
        line.child_text("gx:altitudeMode").as_deref(),
        Some("relativeToSeaFloor")
    );
}

#[test]
fn test_feature_view_and_time() {
    let mut placemark = named_placemark("viewed", Point::new(5.0, 6.0, 0.0));
    placemark.feature.abstract_view = Some(
        ViewParams {
            longitude: 5.0,
            latitude: 6.0,
            range: Some(800.0),
            ..ViewParams::default()
        }
        .build(),
    );
    placemark.feature.time_primitive = Some(TimeStamp::new("2012-01-01").into());
    let mut doc = Document::default();
    doc.add(placemark);

    let document = document_element(&doc);
    let placemark = document.child("Placemark").unwrap();
    let look_at = placemark.child("LookAt").unwrap();
    assert_eq!(look_at.child_text("range").as_deref(), Some("800"));
    assert_eq!(
        placemark.child("TimeStamp").unwrap().child_text("when").as_deref(),
        Some("2012-01-01")
    );
}

// ============================================================================
// Styles
// ============================================================================

#[test]
fn test_shared_style_and_style_url() {
    let mut style = Style::new();
    let mut icon = IconStyle::new(Some("pin.png".to_string()));
    icon.scale = Some(1.5);
    icon.hot_spot = Some(XY::default());
    icon.colors.color = Some(Color::new(0xff, 0x00, 0x00, 0xff));
    style.icon = Some(icon);
    style.label = Some(LabelStyle::new(Some(0.8)));

    let mut doc = Document::default();
    let mut placemark = named_placemark("styled", Point::new(0.0, 0.0, 0.0));
    placemark.feature.set_style_url_to(&style);
    doc.feature.add_style(style).unwrap();
    doc.add(placemark);

    let document = document_element(&doc);
    let style = document.child("Style").unwrap();
    let style_id = style.get_attr("id").unwrap().to_string();
    let icon = style.child("IconStyle").unwrap();
    assert_eq!(icon.child_text("color").as_deref(), Some("ff0000ff"));
    assert_eq!(
        icon.child("Icon").unwrap().child_text("href").as_deref(),
        Some("pin.png")
    );
    assert_eq!(icon.child("hotSpot").unwrap().get_attr("xunits"), Some("fraction"));

    let placemark = document.child("Placemark").unwrap();
    assert_eq!(
        placemark.child_text("styleUrl"),
        Some(format!("#{style_id}"))
    );
}

#[test]
fn test_style_map_pairs() {
    let normal = Style::new();
    let map = StyleMap::new([
        ("normal", StyleRef::from(normal)),
        ("highlight", StyleRef::from("#hot")),
    ]);
    let mut placemark = named_placemark("mapped", Point::new(0.0, 0.0, 0.0));
    placemark.feature.set_style_selector(map).unwrap();

    let element = placemark.render(&RenderContext::new()).unwrap().unwrap();
    let map = element.child("StyleMap").unwrap();
    let pairs: Vec<&Element> = map.elements().filter(|e| e.name == "Pair").collect();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].child_text("key").as_deref(), Some("normal"));
    assert!(pairs[0].child("Style").is_some());
    assert_eq!(pairs[1].child_text("styleUrl").as_deref(), Some("#hot"));
}

#[test]
fn test_style_attached_twice_fails() {
    let mut first = named_placemark("first", Point::new(0.0, 0.0, 0.0));
    let mut second = named_placemark("second", Point::new(0.0, 0.0, 0.0));
    first.feature.add_style(Style::new()).unwrap();

    let stolen: StyleSelector = first.feature.styles()[0].clone();
    let err = second.feature.add_style(stolen).unwrap_err();
    assert!(matches!(err, KmlError::StyleAttachment(_)));
}

#[test]
fn test_style_owned_by_another_feature_fails_to_render() {
    let mut first = named_placemark("first", Point::new(0.0, 0.0, 0.0));
    let mut second = named_placemark("second", Point::new(0.0, 0.0, 0.0));
    first.feature.add_style(Style::new()).unwrap();
    let foreign = first.feature.styles()[0].clone();
    second.feature.styles_mut().push(foreign);

    let err = second.render(&RenderContext::new()).unwrap_err();
    assert!(matches!(err, KmlError::StyleAttachment(_)));
}

// ============================================================================
// Overlays
// ============================================================================

#[test]
fn test_screen_overlay() {
    let mut overlay = ScreenOverlay::new(Some("logo.png".to_string()));
    overlay.overlay_xy = Some(XY::default());
    overlay.rotation = Some(15.0);
    overlay.overlay.draw_order = Some(3);
    let mut doc = Document::default();
    doc.add(overlay);

    let document = document_element(&doc);
    let overlay = document.child("ScreenOverlay").unwrap();
    assert_eq!(overlay.child_text("drawOrder").as_deref(), Some("3"));
    assert_eq!(overlay.child_text("rotation").as_deref(), Some("15"));
    assert_eq!(
        overlay.child("Icon").unwrap().child_text("href").as_deref(),
        Some("logo.png")
    );
    assert_eq!(overlay.child("overlayXY").unwrap().get_attr("x"), Some("0.5"));
}

#[test]
fn test_ground_overlay_requires_bounds() {
    let mut doc = Document::default();
    doc.add(GroundOverlay::new(Some("map.png".to_string())));
    assert!(matches!(
        doc.to_kml_document(),
        Err(KmlError::MissingState(_))
    ));

    let mut doc = Document::default();
    let mut overlay = GroundOverlay::new(Some("map.png".to_string()));
    overlay.lat_lon_box = Some(LatLonBox::new(10.0, 0.0, 10.0, 0.0));
    doc.add(overlay);
    let document = document_element(&doc);
    let bounds = document.find("LatLonBox").unwrap();
    assert_eq!(bounds.child_text("north").as_deref(), Some("10"));
}

// ============================================================================
// Tours
// ============================================================================

#[test]
fn test_tour_renders_before_children() {
    let mut doc = Document::default();
    doc.add(named_placemark("p", Point::new(0.0, 0.0, 0.0)));
    doc.flyto_mode = Some(FlyToMode::Smooth);
    doc.fly_to(Point::new(0.0, 0.0, 0.0), 2.0);

    let document = document_element(&doc);
    let names: Vec<&str> = document.elements().map(|e| e.name.as_str()).collect();
    let tour = names.iter().position(|n| *n == "gx:Tour").unwrap();
    let placemark = names.iter().position(|n| *n == "Placemark").unwrap();
    assert!(tour < placemark);

    let playlist = document.child("gx:Tour").unwrap().child("gx:Playlist").unwrap();
    let fly = playlist.child("gx:FlyTo").unwrap();
    assert_eq!(fly.child_text("gx:flyToMode").as_deref(), Some("smooth"));
    assert_eq!(fly.child_text("gx:duration").as_deref(), Some("2"));
}

#[test]
fn test_animated_update_in_tour() {
    let mut update = AnimatedUpdate::new(AnimatedUpdateOptions {
        duration: 1.5,
        ..AnimatedUpdateOptions::default()
    });
    update
        .push(r#"<Change><Placemark targetId="pm_1"><visibility>0</visibility></Placemark></Change>"#)
        .unwrap();
    let mut doc = Document::default();
    doc.push_to_tour(update);

    let text = doc.to_kml_document().unwrap().to_string_pretty().unwrap();
    assert!(text.contains("<gx:AnimatedUpdate"));
    assert!(text.contains(r#"<Placemark targetId="pm_1">"#));
    assert!(text.contains("<visibility>0</visibility>"));
}

#[test]
fn test_camera_wins_over_range() {
    let view = ViewParams {
        roll: Some(10.0),
        range: Some(500.0),
        ..ViewParams::default()
    }
    .build();
    assert!(view.is_camera());
    assert_eq!(view.range(), None);

    let element = view.render(&RenderContext::new()).unwrap().unwrap();
    assert_eq!(element.name, "Camera");
    assert_eq!(element.child_text("roll").as_deref(), Some("10"));
    assert!(element.child("range").is_none());
}

#[test]
fn test_fly_to_wraps_view() {
    let fly = FlyTo::new(LookAt::new(Point::new(3.0, 4.0, 0.0))).with_duration(6.0);
    let element = TourPrimitive::from(fly)
        .render(&RenderContext::new())
        .unwrap()
        .unwrap();
    assert_eq!(element.name, "gx:FlyTo");
    let look_at = element.child("LookAt").unwrap();
    assert_eq!(look_at.child_text("longitude").as_deref(), Some("3"));
}

// ============================================================================
// Render policies
// ============================================================================

#[test]
fn test_render_is_repeatable() {
    let mut doc = Document::new(Some("repeat".to_string()));
    doc.add(named_placemark("p", Point::new(1.0, 2.0, 3.0)));
    doc.fly_to(LookAt::new(Point::new(1.0, 2.0, 3.0)), 1.0);

    let first = doc.to_kml_document().unwrap().to_string_pretty().unwrap();
    let second = doc.to_kml_document().unwrap().to_string_pretty().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compact_rerender_drops_ids() {
    let mut doc = Document::default();
    doc.add(named_placemark("p", Point::new(1.0, 2.0, 3.0)));

    let full = doc.to_kml_document().unwrap();
    let placemark = full.document().unwrap().child("Placemark").unwrap();
    assert!(placemark.get_attr("id").is_some());

    let compact = doc
        .to_kml_document_with(RenderContext::new().with_compact(true))
        .unwrap();
    let placemark = compact.document().unwrap().child("Placemark").unwrap();
    assert!(placemark.get_attr("id").is_none());
    assert_eq!(
        placemark.child("Point").unwrap().child_text("coordinates").as_deref(),
        Some("1,2,3")
    );
}

#[test]
fn test_master_only_gate() {
    let mut doc = Document::default();
    let mut secret = named_placemark("secret", Point::new(0.0, 0.0, 0.0));
    secret.feature.object.master_only = true;
    doc.add(secret);
    doc.add(named_placemark("public", Point::new(0.0, 0.0, 0.0)));

    let count = |doc: &Document| {
        document_element(doc)
            .elements()
            .filter(|e| e.name == "Placemark")
            .count()
    };
    assert_eq!(count(&doc), 1);
    doc.master_mode = true;
    assert_eq!(count(&doc), 2);
}

#[test]
fn test_comment_survives_serialization_escaped() {
    let mut doc = Document::default();
    let mut placemark = named_placemark("p", Point::new(0.0, 0.0, 0.0));
    placemark.feature.object.comment = Some("a < b & c".to_string());
    doc.add(placemark);
    let text = doc.to_kml_document().unwrap().to_string_pretty().unwrap();
    assert!(text.contains("<!--a &lt; b &amp; c-->"));
}

#[test]
fn test_kml_root_namespaces() {
    let doc = Document::default();
    let text = doc.to_kml_document().unwrap().to_string_pretty().unwrap();
    for ns in [
        r#"xmlns="http://www.opengis.net/kml/2.2""#,
        r#"xmlns:gx="http://www.google.com/kml/ext/2.2""#,
        r#"xmlns:kml="http://www.opengis.net/kml/2.2""#,
        r#"xmlns:atom="http://www.w3.org/2005/Atom""#,
    ] {
        assert!(text.contains(ns), "missing {ns}");
    }
}

#[test]
fn test_feature_enum_dispatch() {
    let feature: Feature = named_placemark("p", Point::new(0.0, 0.0, 0.0)).into();
    assert_eq!(feature.kind(), "Placemark");
    let element = feature.render(&RenderContext::new()).unwrap().unwrap();
    assert_eq!(element.name, "Placemark");
    assert!(matches!(
        AbstractView::from(Point::new(0.0, 0.0, 0.0)),
        AbstractView::LookAt(_)
    ));
}
