//! LOD behaviour on parsed documents

use gcodeview_core::Position;
use gcodeview_settings::{Config, LodSettings, ParserSettings, Preset};
use gcodeview_visualizer::{is_small_feature, parse_document, simplify_segments, PathSegment};

/// Long facing pass followed by a small tab, each as its own cutting segment
fn facing_and_tab() -> String {
    let mut program = String::from("G0 X0 Y0 Z1\nG1 Z-1\n");
    for i in 1..=500 {
        program.push_str(&format!("G1 X{:.1}\n", i as f32 * 0.4));
    }
    program.push_str("G0 Z1\nG0 X300 Y0\nG1 Z-1\n");
    // 1 x 3 tab, densely sampled
    for i in 1..=15 {
        program.push_str(&format!("G1 Y{:.1}\n", i as f32 * 0.2));
    }
    for i in 1..=5 {
        program.push_str(&format!("G1 X{:.1}\n", 300.0 + i as f32 * 0.2));
    }
    for i in 1..=15 {
        program.push_str(&format!("G1 Y{:.1}\n", 3.0 - i as f32 * 0.2));
    }
    program
}

fn total_points(segments: &[PathSegment]) -> usize {
    segments.iter().map(PathSegment::len).sum()
}

fn cutting(segments: &[PathSegment]) -> Vec<&PathSegment> {
    segments.iter().filter(|s| !s.is_travel).collect()
}

#[test]
fn test_budget_reduces_long_runs() {
    let doc = parse_document(&facing_and_tab(), &ParserSettings::default());
    let before = total_points(&doc.segments);

    let out = simplify_segments(&doc.segments, 100, &LodSettings::default());
    let after = total_points(&out);

    assert!(after < before / 2, "{after} not well below {before}");
    assert_eq!(out.len(), doc.segments.len());
}

#[test]
fn test_tab_is_small_feature_and_kept_dense() {
    let doc = parse_document(&facing_and_tab(), &ParserSettings::default());
    let cuts = cutting(&doc.segments);
    assert_eq!(cuts.len(), 2);

    let tab = cuts[1];
    assert!(is_small_feature(&tab.points, 5.0));
    assert!(!is_small_feature(&cuts[0].points, 5.0));

    let out = simplify_segments(&doc.segments, 100, &LodSettings::default());
    let out_cuts = cutting(&out);
    // Small-feature skip is 2, far gentler than the budget skip
    assert!(out_cuts[1].len() >= tab.len() / 2);
    assert!(out_cuts[0].len() < cuts[0].len() / 4);
}

#[test]
fn test_tab_corners_survive_aggressive_budget() {
    let doc = parse_document(&facing_and_tab(), &ParserSettings::default());
    let config = Config::from_preset(Preset::Aggressive);
    let out = simplify_segments(&doc.segments, 10, &config.lod);
    let tab = cutting(&out)[1];

    assert!(tab.points.contains(&Position::new(300.0, 3.0, -1.0)));
    assert!(tab.points.contains(&Position::new(301.0, 3.0, -1.0)));
    assert_eq!(*tab.last().unwrap(), Position::new(301.0, 0.0, -1.0));
}

#[test]
fn test_disabling_preservation_thins_tab() {
    let doc = parse_document(&facing_and_tab(), &ParserSettings::default());
    let settings = LodSettings {
        preserve_small_features: false,
        ..LodSettings::default()
    };
    let preserved = simplify_segments(&doc.segments, 100, &LodSettings::default());
    let thinned = simplify_segments(&doc.segments, 100, &settings);
    assert!(cutting(&thinned)[1].len() < cutting(&preserved)[1].len());
}
