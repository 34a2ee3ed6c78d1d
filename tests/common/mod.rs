//! # rendercheck test fixtures
//!
//! Builders for in-memory manifests and on-disk charts with pre-rendered
//! templates and suite files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rendercheck::manifest::{Manifest, RAW_KEY};
use rendercheck::tree::Tree;
use tempfile::TempDir;

pub fn yaml(text: &str) -> Tree {
    serde_yaml::from_str(text).expect("fixture YAML must parse")
}

pub fn manifest(index: usize, text: &str) -> Manifest {
    Manifest::new(index, "templates/fixture.yaml", yaml(text))
}

/// A manifest whose only content is raw text, like a NOTES file.
pub fn raw_manifest(index: usize, text: &str) -> Manifest {
    let mut map = serde_yaml::Mapping::new();
    map.insert(Tree::from(RAW_KEY), Tree::from(text));
    Manifest::new(index, "templates/NOTES.txt", Tree::Mapping(map))
}

/// A chart directory inside a temporary directory.
pub struct ChartFixture {
    _dir: TempDir,
    root: PathBuf,
}

impl ChartFixture {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path().join(name);
        fs::create_dir_all(root.join("tests")).expect("tests dir");
        fs::create_dir_all(root.join("rendered/templates")).expect("rendered dir");
        fs::write(root.join("Chart.yaml"), format!("apiVersion: v2\nname: {name}\nversion: 0.1.0\n"))
            .expect("Chart.yaml");
        Self { _dir: dir, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `rendered/templates/<name>`.
    pub fn template(&self, name: &str, content: &str) -> &Self {
        let path = self.root.join("rendered/templates").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("template dir");
        }
        fs::write(path, content).expect("template");
        self
    }

    /// Writes `tests/<name>`.
    pub fn suite(&self, name: &str, content: &str) -> &Self {
        fs::write(self.root.join("tests").join(name), content).expect("suite");
        self
    }

    pub fn snapshot_file(&self) -> PathBuf {
        self.root.join("tests/__snapshot__/snapshots.yaml")
    }
}

pub const DEPLOYMENT: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  replicas: 3
  template:
    spec:
      containers:
        - name: web
          image: nginx:1.25
";

pub const SERVICE: &str = "\
apiVersion: v1
kind: Service
metadata:
  name: web
spec:
  ports:
    - port: 80
";
