//! Human-readable console reports for the three tools.

use colored::Colorize;
use skill_mirror::report::{CoverageSummary, InspectionReport};
use skill_mirror::{LocationKind, SyncReport};
use std::path::{Path, PathBuf};

/// Categories listed in full before the rest are summarized.
const MAX_LISTED_CATEGORIES: usize = 10;

pub fn banner(title: &str, width: usize) {
    println!("{}", title.bright_white().bold());
    println!("{}", "=".repeat(width));
}

pub fn step(icon: &str, message: &str) {
    println!("\n{} {}", icon, message.bright_white());
}

pub fn failure(err: &anyhow::Error) {
    println!("\n{} {}", "❌ Error:".red().bold(), err);
    println!("{err:?}");
}

pub fn sync_report(report: &SyncReport) {
    if report.flat_fallback {
        println!("  {} organizational tree not found, used flat structure", "⚠️".yellow());
    } else {
        println!("  📂 Found {} total skills in repository", report.discovered);
    }

    for record in &report.records {
        println!("  {} Synced: {}", "✅".green(), record.path);
    }

    println!(
        "\n{} Synced {} Microsoft skills",
        "✨ Success!".green().bold(),
        report.synced.to_string().cyan()
    );
    println!("📁 Location: {}", report.output_root.display());

    let categories = report.top_level_categories();
    println!("\n{}", "📊 Organization:".yellow().bold());
    println!("  Total skills: {}", report.synced);
    let listed: Vec<_> = categories.iter().take(MAX_LISTED_CATEGORIES).map(String::as_str).collect();
    println!("  Categories: {}", listed.join(", "));
    if categories.len() > MAX_LISTED_CATEGORIES {
        println!("  ... and {} more", categories.len() - MAX_LISTED_CATEGORIES);
    }

    println!("\n{}", "📋 Next steps:".yellow().bold());
    println!("1. Review synced skills");
    println!("2. Run: npm run validate");
    println!("3. Update CATALOG.md");
    println!("4. Update docs/SOURCES.md");
    println!("5. Commit changes and create PR");
}

pub fn inspection(report: &InspectionReport) {
    step("2️⃣", "Repository structure:");
    println!("\nTop-level directories:");
    for name in &report.top_level_dirs {
        println!("  📁 {name}/");
    }

    if let Some(ref primary) = report.primary {
        step("3️⃣", &format!("Found {} directories in .github/skills/:", primary.len()));
        for entry in primary.iter().take(5) {
            let mark = if entry.has_marker { "✅" } else { "❌" };
            println!("  {mark} {}", entry.name);
        }
        remainder(primary.len(), 5, "  ");
    }

    if let Some(ref markers) = report.plugin_markers {
        step("🔌", &format!("Found {} plugin skills in .github/plugins/:", markers.len()));
        for marker in markers.iter().take(5) {
            println!("  ✅ {}", marker.display());
        }
        remainder(markers.len(), 5, "  ");
    }

    if let Some(ref stats) = report.structure {
        step("4️⃣", "Checking skills/ directory structure:");
        println!("  Total items: {}", stats.total_items);
        println!("  Regular directories: {}", stats.regular_dirs);
        println!("  Symlinked directories: {}", stats.symlinked_dirs);
        println!("  Symlinked files: {}", stats.symlinked_files);

        println!("\n  Top-level categories in skills/:");
        for (name, count) in &stats.categories {
            println!("    📁 {name}/ ({count} items)");
        }

        if !stats.symlink_samples.is_empty() {
            println!("\n  Sample symlinked directories:");
            for sample in stats.symlink_samples.iter().take(5) {
                let target = sample.target_name.as_deref().unwrap_or("broken");
                println!("    {} → {}", sample.path.display(), target);
            }
        }
    }

    step("5️⃣", "Comprehensive SKILL.md search:");
    println!("  Total SKILL.md files found: {}", report.marker_total);
    println!("\n  Distribution by location:");
    for (bucket, count) in &report.distribution {
        println!("    {bucket}: {count}");
    }

    step("6️⃣", "Sample skills by category:");
    for category in &report.category_samples {
        println!("\n  {}/ ({} skills):", category.name, category.skill_count);
        for sample in &category.samples {
            println!("    - {}", sample.display());
        }
    }

    step("7️⃣", "Recommendations:");
    println!("  ✅ Preserve skills/ directory structure (Microsoft's organization)");
    println!("  ✅ Resolve symlinks to actual content in .github/skills/");
    println!("  ✅ Include plugin skills from .github/plugins/");
    println!("  ✅ This gives you the cleanest, most maintainable structure");

    println!("\n{}", "✨ Inspection complete!".green().bold());
}

fn handled_by(kind: LocationKind) -> Option<&'static str> {
    match kind {
        LocationKind::GithubSkills => Some("primary scan (SkillLocator::primary_skills)"),
        LocationKind::GithubPlugins => Some("supplemental plugin pass (SkillLocator::plugin_skills)"),
        LocationKind::SkillsSymlinked => Some("structure walk, symlinked entries"),
        LocationKind::SkillsDirect => Some("structure walk, direct directories"),
        LocationKind::SkillsViaSymlinkParent | LocationKind::Other => None,
    }
}

pub fn coverage(summary: &CoverageSummary, snapshot_unlinked: Option<&[PathBuf]>) {
    step("2️⃣", &format!("Total SKILL.md files found: {}", summary.total));

    step("3️⃣", "Skills by Location Type:");
    println!("{}", "-".repeat(60));
    for (kind, paths) in &summary.breakdown {
        println!("\n  📍 {}: {} skills", kind, paths.len());
        let shown = if paths.len() <= 5 { paths.len() } else { 3 };
        for path in paths.iter().take(shown) {
            println!("      - {}", path.display());
        }
        remainder(paths.len(), shown, "      ");
    }

    step("4️⃣", "Sync Coverage Analysis:");
    println!("{}", "-".repeat(60));
    for kind in LocationKind::ALL {
        let Some(handler) = handled_by(kind) else { continue };
        let count = summary.count(kind);
        if kind == LocationKind::SkillsDirect && count == 0 {
            println!("\n  ℹ️  {kind}: 0");
            println!("     └─ None found, but the structure walk would handle them");
            continue;
        }
        println!("\n  {} {kind}: {count}", "✅".green());
        println!("     └─ Handled by: {handler}");
    }
    let via_parent = summary.count(LocationKind::SkillsViaSymlinkParent);
    if via_parent > 0 {
        println!("\n  {} {}: {via_parent}", "⚠️".yellow(), LocationKind::SkillsViaSymlinkParent);
        println!("     └─ Not copied: the structure walk does not enter symlinked directories");
    }

    step("5️⃣", "Summary:");
    println!("{}", "-".repeat(60));
    println!("\n  Total SKILL.md files: {}", summary.total);
    println!("  Handled by sync: {}", summary.handled);
    if summary.is_complete() {
        println!("\n  {} 100% Coverage - All skills will be synced!", "✅".green());
    } else if summary.is_comprehensive() {
        println!("\n  {} ~100% Coverage - Sync handles all skills!", "✅".green());
        println!("     ({} skills may be duplicates)", summary.missing());
    } else {
        println!("\n  {} Partial Coverage - Missing {} skills", "⚠️".yellow(), summary.missing());
        println!("\n  Skills not covered:");
        for (kind, count) in summary.unhandled() {
            println!("    - {kind}: {count}");
        }
    }

    if let Some(unlinked) = snapshot_unlinked {
        step("6️⃣", "Testing Specific Edge Cases:");
        println!("{}", "-".repeat(60));
        println!("\n  Checking for non-symlinked skills in skills/...");
        if unlinked.is_empty() {
            println!("  ℹ️  No non-symlinked skills found in skills/");
            println!("     The structure walk is ready to handle them if they exist");
        } else {
            println!("  {} Found {} non-symlinked skills:", "✅".green(), unlinked.len());
            for path in unlinked.iter().take(5) {
                println!("     - {}", path.display());
            }
            println!("     These will be synced by the structure walk");
        }
    }

    println!("\n{}", "✨ Analysis complete!".green().bold());
}

pub fn verdict(summary: &CoverageSummary) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "FINAL VERDICT".bold());
    println!("{}", "=".repeat(60));
    println!("\nCoverage: {:.1}%", summary.coverage_percent());
    println!("Skills handled: {}/{}", summary.handled, summary.total);
    if summary.is_comprehensive() {
        println!("\n{}", "✅ SYNC IS COMPREHENSIVE".green().bold());
        println!("   All skill locations are properly handled!");
    } else {
        println!("\n{}", "⚠️  SYNC MAY NEED ENHANCEMENT".yellow().bold());
        println!("   Some edge cases might be missed");
    }
}

pub fn location(path: &Path) {
    println!("📁 Source: {}", path.display());
}

fn remainder(total: usize, shown: usize, indent: &str) {
    if total > shown {
        println!("{indent}... and {} more", total - shown);
    }
}
