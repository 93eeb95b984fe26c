use super::*;

fn full_result() -> PlantResult {
    PlantResult {
        plant_name: "Lavandula".into(),
        common_names: vec!["Lavender".into(), "English lavender".into()],
        wiki_url: "https://en.wikipedia.org/wiki/Lavandula".into(),
        description: "Aromatic herb with purple flowers".into(),
        care_tips: vec!["Well-drained soil".into(), "Full sun".into()],
    }
}

#[test]
fn renders_every_section_when_present() {
    let rendered = render_result(&full_result());
    assert!(rendered.contains("  Lavandula\n"));
    assert!(rendered.contains("Also known as: Lavender, English lavender"));
    assert!(rendered.contains("Description\n  Aromatic herb with purple flowers"));
    assert!(rendered.contains("Learn more on Wikipedia: https://en.wikipedia.org/wiki/Lavandula"));
    assert!(rendered.contains("Care Tips\n  1. Well-drained soil\n  2. Full sun\n"));
}

#[test]
fn omits_empty_sections() {
    let result = PlantResult {
        plant_name: "Rosa".into(),
        common_names: Vec::new(),
        wiki_url: String::new(),
        description: "  ".into(),
        care_tips: Vec::new(),
    };
    let rendered = render_result(&result);
    assert_eq!(rendered, "Plant Identification Results\n  Rosa\n");
}
