use clanops::{
    AppConfig, ClanopsError, MissionPipeline, REJECTION_TEXT,
    engine::AssignmentError,
    protocol::{Mission, Selection, ValueTable},
    render::{AssetResolution, AssetResolver},
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::{path::Path, sync::Arc};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

const VALUES: &str = r#"{
    "Breach": { "Moses": 9, "Chen li": 7, "Diana": 5 },
    "Bayonet": { "Moses": 9, "Diana": 6, "Hawk": 2 },
    "Cover": {},
    "B.S.S": { "Chen li": 8 }
}"#;

fn write_portrait(dir: &Path, file: &str) {
    RgbaImage::from_pixel(64, 64, Rgba([30, 120, 220, 255]))
        .save_with_format(dir.join(file), ImageFormat::Png)
        .unwrap();
}

fn setup(portraits: &Path) -> MissionPipeline {
    let mut config = AppConfig::default();
    config.assets.search_dirs = vec![portraits.to_path_buf()];
    config.render.load_system_fonts = false;
    let values = ValueTable::from_json_str(VALUES).unwrap();
    MissionPipeline::new(Arc::new(values), &config).unwrap()
}

#[test]
fn test_breach_only_ranks_by_score() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = setup(dir.path());
    let selection = Selection::parse_slots(&["Breach"]).unwrap();
    let output = pipeline.run(&selection).unwrap();

    let names = output
        .report
        .get(Mission::Breach)
        .unwrap()
        .iter()
        .map(|p| p.operator.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Moses", "Chen li", "Diana"]);
    assert!(
        output
            .reply
            .starts_with("**Best operator placement for your clan:**\n\nM1 - Breach:\nMoses (9), Chen li (7), Diana (5)\n\n")
    );
    assert!(output.reply.contains("M8 - (skipped)\n\n"));
}

#[test]
fn test_breach_bayonet_tie_keeps_earliest_slot() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = setup(dir.path());
    let selection = Selection::parse_slots(&["Breach", "Bayonet"]).unwrap();
    let output = pipeline.run(&selection).unwrap();

    let breach = output.report.get(Mission::Breach).unwrap();
    let bayonet = output.report.get(Mission::Bayonet).unwrap();
    assert!(breach.iter().any(|p| p.operator == "Moses"));
    assert!(!bayonet.iter().any(|p| p.operator == "Moses"));
    // Diana scores higher on Bayonet, so she moves there
    assert_eq!(
        bayonet.iter().map(|p| p.operator.as_str()).collect::<Vec<_>>(),
        ["Diana", "Hawk"]
    );
}

#[test]
fn test_all_skip_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = setup(dir.path());
    let selection = Selection::parse_slots(&["Skip", "skip", "SKIP"]).unwrap();
    let err = pipeline.run(&selection).unwrap_err();
    assert!(matches!(
        err,
        ClanopsError::Assignment(AssignmentError::NoMissionSelected)
    ));
    assert_eq!(REJECTION_TEXT, "You must pick at least one mission.");
}

#[test]
fn test_empty_cover_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = setup(dir.path());
    let selection = Selection::parse_slots(&["Cover"]).unwrap();
    let output = pipeline.run(&selection).unwrap();

    assert_eq!(output.report.get(Mission::Cover).map(<[_]>::len), Some(0));
    assert!(
        output
            .reply
            .contains("M1 - Cover:\nNo operators found for this mission\n\n")
    );
    let image = output.image.unwrap();
    assert!(image.png.starts_with(PNG_SIGNATURE));
    assert_eq!(
        image.height,
        pipeline.composer().config().layout.min_canvas_height
    );
}

#[test]
fn test_chen_li_spellings_share_one_portrait() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "chen_li.png.jpeg");
    let mut config = AppConfig::default();
    config.assets.search_dirs = vec![dir.path().to_path_buf()];

    let resolver = AssetResolver::new(&config.assets);
    let spaced = resolver.resolve("Chen li");
    let snake = resolver.resolve("chen_li");
    assert!(spaced.is_found());
    assert_eq!(spaced, snake);
    assert_eq!(
        spaced.path().unwrap(),
        dir.path().join("chen_li.png.jpeg").as_path()
    );
    assert_eq!(resolver.resolve("Nobody"), AssetResolution::NotFound);
}

#[test]
fn test_portraits_are_embedded_and_failures_degrade() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "chen_li.png.jpeg");
    write_portrait(dir.path(), "moses.png");
    std::fs::write(dir.path().join("diana.png.jpeg"), b"corrupt").unwrap();
    let pipeline = setup(dir.path());

    let selection = Selection::parse_slots(&["Breach", "Skip", "Bayonet"]).unwrap();
    let output = pipeline.run(&selection).unwrap();
    let image = output.image.unwrap();
    assert_eq!(image.portraits.embedded, 2);
    assert_eq!(image.portraits.unreadable, 1);
    assert_eq!(image.portraits.missing, 1);

    let decoded = image::load_from_memory(&image.png).unwrap();
    assert_eq!(decoded.width(), image.width);
    assert_eq!(decoded.height(), image.height);
}

#[test]
fn test_config_file_drives_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let values_path = dir.path().join("values.json");
    std::fs::write(&values_path, VALUES).unwrap();
    let config_path = dir.path().join("clanops.json");
    std::fs::write(
        &config_path,
        serde_json::json!({
            "values": values_path,
            "assets": { "search_dirs": [dir.path()] },
            "render": { "load_system_fonts": false, "title": "OPS" }
        })
        .to_string(),
    )
    .unwrap();

    let config = AppConfig::load_from_path(&config_path).unwrap();
    let values = ValueTable::load_from_path(config.values.as_ref().unwrap()).unwrap();
    let pipeline = MissionPipeline::new(Arc::new(values), &config).unwrap();
    let selection = Selection::parse_slots(&["B.S.S"]).unwrap();
    let output = pipeline.run(&selection).unwrap();

    let svg = &output.svg;
    assert!(svg.contains("OPS"));
    assert!(!svg.contains("TACTIOPBOT"));
    assert!(svg.contains("M1 - B.S.S"));
}

#[test]
fn test_fractional_scores_rank_and_print() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.assets.search_dirs = vec![dir.path().to_path_buf()];
    config.render.load_system_fonts = false;
    let values = ValueTable::from_json_str(r#"{"Breach": {"Moses": 7.5, "Diana": 9}}"#).unwrap();
    let pipeline = MissionPipeline::new(Arc::new(values), &config).unwrap();

    let selection = Selection::parse_slots(&["Breach"]).unwrap();
    let (report, reply) = pipeline.run_text(&selection).unwrap();
    let names = report
        .get(Mission::Breach)
        .unwrap()
        .iter()
        .map(|p| p.operator.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Diana", "Moses"]);
    assert!(reply.contains("M1 - Breach:\nDiana (9), Moses (7.5)\n\n"));
}
