//! Terminal rendering of identification results.

use std::fmt::Write as _;

use shared::domain::PlantResult;

pub fn render_result(result: &PlantResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Plant Identification Results");
    let _ = writeln!(out, "  {}", result.plant_name);

    if result.has_common_names() {
        let _ = writeln!(out, "  Also known as: {}", result.common_names.join(", "));
    }

    if result.has_description() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Description");
        let _ = writeln!(out, "  {}", result.description.trim());
    }

    if result.has_wiki_url() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Learn more on Wikipedia: {}", result.wiki_url);
    }

    if result.has_care_tips() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Care Tips");
        for (index, tip) in result.care_tips.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", index + 1, tip);
        }
    }

    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
