//! End-to-end mirror runs against synthetic upstream trees.

use skill_mirror::{
    Attribution, Fetcher, MirrorConfig, MirrorError, MirrorResult, SkillSynchronizer,
    UPSTREAM_README_NAME,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn skill(root: &Path, rel: &str) {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("SKILL.md"), format!("---\nname: {rel}\n---\n")).unwrap();
    fs::write(dir.join("notes.txt"), format!("notes for {rel}")).unwrap();
}

fn read_attribution(config: &MirrorConfig) -> Attribution {
    serde_json::from_str(&fs::read_to_string(config.attribution_path()).unwrap()).unwrap()
}

fn file_contents(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| (e.path().strip_prefix(root).unwrap().to_path_buf(), fs::read(e.path()).unwrap()))
        .collect()
}

/// Number of directories under `root` that contain a marker file.
fn skill_dirs(root: &Path) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir() && e.path().join("SKILL.md").is_file())
        .count()
}

#[cfg(unix)]
#[test]
fn symlinked_structure_entry_is_not_duplicated_under_plugins() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    skill(&upstream, ".github/skills/writer-plugin");
    fs::create_dir_all(upstream.join("skills/productivity")).unwrap();
    symlink(
        upstream.join(".github/skills/writer-plugin"),
        upstream.join("skills/productivity/writer"),
    )
    .unwrap();
    skill(&upstream, ".github/plugins/bundle/writer");

    let config = MirrorConfig::new(temp.path().join("out"));
    let report = SkillSynchronizer::new(&config).sync_snapshot(&upstream).unwrap();

    let output = config.output_root();
    assert!(output.join("productivity/writer/SKILL.md").is_file());
    assert_eq!(
        fs::read_to_string(output.join("productivity/writer/notes.txt")).unwrap(),
        "notes for .github/skills/writer-plugin"
    );
    assert!(!output.join("plugins/writer").exists());
    assert!(!output.join("plugins/writer-plugin").exists());

    assert_eq!(report.synced, 1);
    let record = &report.records[0];
    assert_eq!(record.path, "productivity/writer");
    assert_eq!(record.category, "productivity");
    assert_eq!(record.source.as_deref(), Some(".github/skills/writer-plugin"));
}

#[cfg(unix)]
#[test]
fn symlink_leaving_upstream_tree_is_still_mirrored() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    skill(temp.path(), "shared/writer");
    fs::create_dir_all(upstream.join("skills/productivity")).unwrap();
    symlink(temp.path().join("shared/writer"), upstream.join("skills/productivity/writer"))
        .unwrap();

    let config = MirrorConfig::new(temp.path().join("out"));
    let report = SkillSynchronizer::new(&config).sync_snapshot(&upstream).unwrap();

    assert_eq!(report.synced, 1);
    let output = config.output_root();
    assert!(output.join("productivity/writer/SKILL.md").is_file());
    assert_eq!(
        fs::read_to_string(output.join("productivity/writer/notes.txt")).unwrap(),
        "notes for shared/writer"
    );
    let record = &report.records[0];
    assert_eq!(record.path, "productivity/writer");
    assert_eq!(record.category, "productivity");
    assert!(record.source.is_none());
}

#[test]
fn unreferenced_plugin_skill_lands_under_plugins() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    skill(&upstream, "skills/productivity/writer");
    skill(&upstream, ".github/plugins/tools/helper");

    let config = MirrorConfig::new(temp.path().join("out"));
    let report = SkillSynchronizer::new(&config).sync_snapshot(&upstream).unwrap();

    assert!(config.output_root().join("plugins/helper/SKILL.md").is_file());
    let helper = report.records.iter().find(|r| r.name == "helper").unwrap();
    assert_eq!(helper.path, "plugins/helper");
    assert_eq!(helper.category, "plugins");
    assert_eq!(helper.source.as_deref(), Some(".github/plugins/tools/helper"));
}

#[test]
fn structure_paths_are_mirrored_verbatim() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    let rels = ["skills/data/etl/loader", "skills/productivity/writer", "skills/solo"];
    for rel in rels {
        skill(&upstream, rel);
    }

    let config = MirrorConfig::new(temp.path().join("out"));
    SkillSynchronizer::new(&config).sync_snapshot(&upstream).unwrap();

    for rel in rels {
        let relative = rel.trim_start_matches("skills/");
        assert!(config.output_root().join(relative).join("SKILL.md").is_file(), "{relative}");
    }
    let attribution = read_attribution(&config);
    let solo = attribution.skills.iter().find(|s| s.name == "solo").unwrap();
    assert_eq!(solo.category, ".");
}

#[test]
fn missing_structure_root_uses_flat_layout() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    skill(&upstream, ".github/skills/alpha");
    skill(&upstream, ".github/skills/shared");
    skill(&upstream, ".github/plugins/pack/shared");
    skill(&upstream, ".github/plugins/pack/beta");

    let config = MirrorConfig::new(temp.path().join("out"));
    let report = SkillSynchronizer::new(&config).sync_snapshot(&upstream).unwrap();

    assert!(report.flat_fallback);
    let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "shared", "beta"]);
    for record in &report.records {
        assert_eq!(record.category, "root");
        assert_eq!(record.path, record.name);
        assert!(record.source.is_none());
        assert!(config.output_root().join(&record.name).join("SKILL.md").is_file());
    }
    assert_eq!(
        fs::read_to_string(config.output_root().join("shared/notes.txt")).unwrap(),
        "notes for .github/skills/shared"
    );
}

#[test]
fn count_matches_records_and_directories() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    skill(&upstream, "skills/a/one");
    skill(&upstream, "skills/b/two");
    skill(&upstream, ".github/plugins/x/three");
    skill(&upstream, ".github/plugins/y/one");

    let config = MirrorConfig::new(temp.path().join("out"));
    SkillSynchronizer::new(&config).sync_snapshot(&upstream).unwrap();

    let attribution = read_attribution(&config);
    assert_eq!(attribution.synced_skills, 3);
    assert_eq!(attribution.synced_skills, attribution.skills.len());
    assert_eq!(attribution.synced_skills, skill_dirs(&config.output_root()));
}

#[test]
fn rerun_produces_identical_files() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    skill(&upstream, "skills/productivity/writer");
    skill(&upstream, ".github/plugins/tools/helper");
    fs::write(upstream.join("LICENSE"), "MIT License").unwrap();
    fs::write(upstream.join("README.md"), "# Skills").unwrap();

    let config = MirrorConfig::new(temp.path().join("out"));
    let synchronizer = SkillSynchronizer::new(&config);

    synchronizer.sync_snapshot(&upstream).unwrap();
    let first = file_contents(&config.target_dir);
    synchronizer.sync_snapshot(&upstream).unwrap();
    let second = file_contents(&config.target_dir);

    assert_eq!(first, second);
    assert!(first.contains_key(&PathBuf::from("official/microsoft").join(UPSTREAM_README_NAME)));
    assert!(first.contains_key(Path::new("official/microsoft/LICENSE")));
}

#[test]
fn attribution_has_fixed_provenance() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    skill(&upstream, "skills/productivity/writer");

    let config = MirrorConfig::new(temp.path().join("out"));
    SkillSynchronizer::new(&config).sync_snapshot(&upstream).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config.attribution_path()).unwrap()).unwrap();
    assert_eq!(raw["source"], "microsoft/skills");
    assert_eq!(raw["repository"], "https://github.com/microsoft/skills");
    assert_eq!(raw["license"], "MIT");
    assert_eq!(raw["synced_skills"], 1);
    assert!(raw["note"].as_str().unwrap().contains("Symlinks resolved"));
}

struct FailingFetcher;

impl Fetcher for FailingFetcher {
    fn fetch(&self, _dest: &Path) -> MirrorResult<()> {
        Err(MirrorError::Fetch {
            repository: "https://invalid.example/skills.git".to_string(),
            status: "exit status: 128".to_string(),
            stderr: "fatal: unable to access".to_string(),
        })
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[test]
fn fetch_failure_leaves_output_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let config = MirrorConfig::new(temp.path().join("out"));

    let err = SkillSynchronizer::new(&config).run(&FailingFetcher).unwrap_err();

    assert!(matches!(err, MirrorError::Fetch { .. }));
    assert!(!config.target_dir.exists());
}
