//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use machine_indexer::IndexerConfig;
use tempfile::TempDir;

/// Stand-in for the catalog tool.
///
/// Its data root (`-rootpath`) is a fixture directory: `-ll` prints `listing.txt`,
/// `-lx <stem>*` prints `detail-<stem>.xml`, and exits 3 afterwards if a
/// `fail-<stem>` marker exists. With a `hang-<stem>` marker it prints nothing and
/// blocks until killed. Every invocation is appended to `calls.log`.
const FAKE_TOOL: &str = r#"#!/bin/sh
root="$2"
echo "$@" >> "$root/calls.log"
case "$3" in
    -ll)
        cat "$root/listing.txt"
        ;;
    -lx)
        stem=$(printf '%s' "$4" | tr -d '*')
        if [ -f "$root/hang-$stem" ]; then
            exec sleep 60
        fi
        cat "$root/detail-$stem.xml" || exit 1
        if [ -f "$root/fail-$stem" ]; then
            exit 3
        fi
        ;;
    *)
        exit 64
        ;;
esac
"#;

/// Path of the fake tool script.
///
/// Written once per test process, before any test spawns it, so no test ever
/// executes a file another thread still has open for writing.
pub fn fake_tool() -> &'static Path {
    static TOOL: OnceLock<PathBuf> = OnceLock::new();
    TOOL.get_or_init(|| {
        let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
            .join(format!("fake-catalog-tool-{}.sh", std::process::id()));
        fs::write(&path, FAKE_TOOL).expect("Failed to write fake tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake tool executable");
        path
    })
}

/// Builder for fake tool fixture directories
pub struct CatalogBuilder {
    temp_dir: TempDir,
    names: Vec<String>,
}

impl CatalogBuilder {
    /// Create a new builder with an empty catalog
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, names: Vec::new() }
    }

    /// Add the machines reported for one prefix stem.
    ///
    /// Every machine is listed by `-ll`, qualifying or not.
    pub fn with_prefix(mut self, stem: &str, machines: &[MachineBuilder]) -> Self {
        self.names.extend(machines.iter().map(|m| m.name.clone()));
        let path = self.temp_dir.path().join(format!("detail-{}.xml", stem));
        fs::write(path, machines_xml(machines)).expect("Failed to write detail xml");
        self
    }

    /// Write raw detail output for a prefix stem without listing anything
    pub fn with_raw_detail(self, stem: &str, xml: &str) -> Self {
        let path = self.temp_dir.path().join(format!("detail-{}.xml", stem));
        fs::write(path, xml).expect("Failed to write detail xml");
        self
    }

    /// Add names to the listing without any detail output
    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Make the detail invocation for `stem` exit non-zero after printing its output
    pub fn failing(self, stem: &str) -> Self {
        fs::write(self.temp_dir.path().join(format!("fail-{}", stem)), "")
            .expect("Failed to write fail marker");
        self
    }

    /// Make the detail invocation for `stem` block without output until killed
    pub fn hanging(self, stem: &str) -> Self {
        fs::write(self.temp_dir.path().join(format!("hang-{}", stem)), "")
            .expect("Failed to write hang marker");
        self
    }

    /// Write the listing and return the fixture
    pub fn build(self) -> Catalog {
        let mut listing = String::from("Name:             Description:\n");
        for name in &self.names {
            listing.push_str(&format!("{:<18}\"{} description\"\n", name, name));
        }
        fs::write(self.temp_dir.path().join("listing.txt"), listing)
            .expect("Failed to write listing");

        let index_dir = TempDir::new().expect("Failed to create index dir");
        Catalog { root: self.temp_dir, index_dir }
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built fixture: the tool's data root and an empty directory for the index
pub struct Catalog {
    root: TempDir,
    index_dir: TempDir,
}

impl Catalog {
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn index_path(&self) -> PathBuf {
        self.index_dir.path().join("index")
    }

    pub fn config(&self) -> IndexerConfig {
        IndexerConfig {
            binary_path: fake_tool().to_path_buf(),
            root_path: self.root().to_path_buf(),
            index_path: self.index_path(),
            prefix_length: 2,
            batch_threshold: 500,
            parallelism: 4,
        }
    }

    /// Detail invocations so far
    pub fn detail_calls(&self) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.contains(" -lx ")).collect()
    }

    /// Invocations of the fake tool so far, one line each
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.root().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Builder for one `<machine>` element
#[derive(Clone)]
pub struct MachineBuilder {
    name: String,
    description: String,
    year: String,
    manufacturer: String,
    driver_status: Option<String>,
    flags: Vec<(&'static str, &'static str)>,
}

impl MachineBuilder {
    /// A qualifying machine with default values
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("{} (World)", name),
            year: "1982".to_string(),
            manufacturer: "Namco".to_string(),
            driver_status: Some("good".to_string()),
            flags: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn year(mut self, year: &str) -> Self {
        self.year = year.to_string();
        self
    }

    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = manufacturer.to_string();
        self
    }

    pub fn driver_status(mut self, status: &str) -> Self {
        self.driver_status = Some(status.to_string());
        self
    }

    pub fn device(mut self) -> Self {
        self.flags.push(("isdevice", "yes"));
        self
    }

    pub fn bios(mut self) -> Self {
        self.flags.push(("isbios", "yes"));
        self
    }

    pub fn mechanical(mut self) -> Self {
        self.flags.push(("ismechanical", "yes"));
        self
    }

    pub fn not_runnable(mut self) -> Self {
        self.flags.push(("runnable", "no"));
        self
    }

    pub fn to_xml(&self) -> String {
        let flags: String =
            self.flags.iter().map(|(key, value)| format!(" {}=\"{}\"", key, value)).collect();
        let driver = self
            .driver_status
            .as_ref()
            .map(|status| format!("\t\t<driver status=\"{}\" emulation=\"good\"/>\n", status))
            .unwrap_or_default();
        format!(
            "\t<machine name=\"{}\" sourcefile=\"test.cpp\"{}>\n\
             \t\t<description>{}</description>\n\
             \t\t<year>{}</year>\n\
             \t\t<manufacturer>{}</manufacturer>\n\
             \t\t<rom name=\"{}.1a\" size=\"4096\"/>\n\
             {}\
             \t</machine>\n",
            self.name,
            flags,
            self.description,
            self.year,
            self.manufacturer,
            self.name,
            driver
        )
    }
}

/// Wrap machines in a complete detail document
pub fn machines_xml(machines: &[MachineBuilder]) -> String {
    let body: String = machines.iter().map(MachineBuilder::to_xml).collect();
    format!("<?xml version=\"1.0\"?>\n<mame build=\"0.261\">\n{}</mame>\n", body)
}

/// Three prefixes, each with one qualifying machine and one device
pub fn arcade_catalog() -> Catalog {
    CatalogBuilder::new()
        .with_prefix(
            "pa",
            &[
                MachineBuilder::new("pacman")
                    .description("Pac-Man (Midway)")
                    .year("1980")
                    .manufacturer("Namco (Midway license)"),
                MachineBuilder::new("pacdev").device().not_runnable(),
            ],
        )
        .with_prefix(
            "ga",
            &[
                MachineBuilder::new("galaga")
                    .description("Galaga (Namco rev. B)")
                    .year("1981"),
                MachineBuilder::new("gabios").bios(),
            ],
        )
        .with_prefix(
            "dk",
            &[
                MachineBuilder::new("dkong")
                    .description("Donkey Kong (US set 1)")
                    .year("198?")
                    .manufacturer("Nintendo of America")
                    .driver_status("imperfect"),
                MachineBuilder::new("dkpinball").mechanical(),
            ],
        )
        .build()
}
