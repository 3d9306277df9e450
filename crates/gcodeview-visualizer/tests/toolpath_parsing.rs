//! End-to-end parsing of realistic G-code programs

use gcodeview_core::Position;
use gcodeview_settings::ParserSettings;
use gcodeview_visualizer::{parse_document, z_levels, ParsedDocument};

const POCKET: &str = "\
; Generated pocket
(Tool: 3mm flat end mill)
G21 G90 G17
M3 S12000
G0 Z5
G0 X0 Y0
G1 Z-1 F300          ; plunge
G1 X20 F800
G1 Y10
G1 X0
G1 Y0
G0 Z5
G0 X30 Y5
G1 Z-2 F300
G2 X40 Y5 I5 J0      (half circle)
G2 X30 Y5 I-5 J0
G0 Z5
M5
M30
";

fn parse(text: &str) -> ParsedDocument {
    parse_document(text, &ParserSettings::default())
}

fn assert_segments_rebuild_stream(doc: &ParsedDocument) {
    let mut rebuilt: Vec<Position> = Vec::new();
    for (i, segment) in doc.segments.iter().enumerate() {
        let skip = usize::from(i > 0);
        rebuilt.extend(segment.points.iter().skip(skip));
    }
    assert_eq!(rebuilt, doc.points);

    for pair in doc.segments.windows(2) {
        assert_ne!(pair[0].is_travel, pair[1].is_travel);
        assert_eq!(pair[0].last(), pair[1].first());
    }
}

#[test]
fn test_pocket_program_structure() {
    let doc = parse(POCKET);
    let stats = doc.stats();

    assert_eq!(doc.points.len(), doc.travel_flags.len());
    assert_eq!(doc.points.len(), doc.z_values.len());
    assert_eq!(stats.arc_count, 2);

    // travel, cut rectangle, travel, cut circle, travel
    let classes: Vec<bool> = doc.segments.iter().map(|s| s.is_travel).collect();
    assert_eq!(classes, vec![true, false, true, false, true]);

    assert_segments_rebuild_stream(&doc);
}

#[test]
fn test_pocket_program_starts_at_origin() {
    let doc = parse(POCKET);
    assert_eq!(doc.points[0], Position::origin());
    assert_eq!(doc.points[1], Position::new(0.0, 0.0, 5.0));
    assert!(doc.travel_flags[0] && doc.travel_flags[1]);
}

#[test]
fn test_circle_stays_on_radius() {
    let doc = parse(POCKET);
    let circle = &doc.segments[3];
    for p in &circle.points[1..] {
        let r = ((p.x - 35.0).powi(2) + (p.y - 5.0).powi(2)).sqrt();
        assert!((r - 5.0).abs() < 1e-3, "point {p} off radius: {r}");
        assert_eq!(p.z, -2.0);
    }
    assert_eq!(*circle.last().unwrap(), Position::new(30.0, 5.0, -2.0));
}

#[test]
fn test_pocket_bounds_and_z_levels() {
    let doc = parse(POCKET);
    let cutting = doc.cutting_bounds().unwrap();
    assert_eq!(cutting.min_x, 0.0);
    assert_eq!(cutting.max_x, 40.0);
    assert_eq!(cutting.min_z, -2.0);
    assert!(cutting.max_y > 9.9);

    let levels = z_levels(&doc.z_values);
    assert_eq!(levels.len(), 4);
    assert_eq!(levels.level_of(-2.0), Some(0.0));
    assert_eq!(levels.level_of(5.0), Some(1.0));
}

#[test]
fn test_comment_only_and_blank_programs() {
    assert!(parse("").is_empty());
    assert!(parse("\n\n   \n").is_empty());
    assert!(parse("; a\n(b)\n%\n").is_empty());
}

#[test]
fn test_malformed_words_are_skipped() {
    let doc = parse("G1 X10 Yabc\nG1 X#5\nG1 Y5 Z");
    assert_eq!(
        doc.points,
        vec![Position::new(10.0, 0.0, 0.0), Position::new(10.0, 5.0, 0.0)]
    );
}

#[test]
fn test_windows_line_endings() {
    let doc = parse("G0 X1\r\nG1 Y1\r\n");
    assert_eq!(doc.len(), 3);
}

#[test]
fn test_incremental_spiral_is_continuous() {
    let mut program = String::from("G91\nG1 X10\n");
    for _ in 0..4 {
        program.push_str("G3 X-10 Y10 I-10 J0\nG3 X-10 Y-10 I0 J-10\nG3 X10 Y-10 I10 J0\nG3 X10 Y10 I0 J10\n");
    }
    let doc = parse(&program);
    let last = *doc.points.last().unwrap();
    assert!(last.approx_eq(&Position::new(10.0, 0.0, 0.0), 1e-3));
    assert_eq!(doc.stats().arc_count, 16);
    assert_eq!(doc.segments.len(), 1);
}

#[test]
fn test_high_detail_adds_points() {
    let normal = parse(POCKET);
    let detailed = parse_document(POCKET, &ParserSettings::high_detail());
    assert!(detailed.len() > normal.len());
}

#[test]
fn test_helical_setting_ramps_z() {
    let program = "G1 X10 Y0 Z0\nG3 X-10 Y0 Z-5 I-10 J0";
    let flat = parse(program);
    let helical = parse_document(
        program,
        &ParserSettings {
            helical_interpolation: true,
            ..ParserSettings::default()
        },
    );

    let mid = flat.len() / 2;
    assert_eq!(flat.points[mid].z, 0.0);
    assert!(helical.points[mid].z < 0.0 && helical.points[mid].z > -5.0);
    assert_eq!(helical.points.last(), flat.points.last());
}
