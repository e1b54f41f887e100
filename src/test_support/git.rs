//! Throwaway git repositories built with git2.

use std::fs;
use std::path::Path;

use git2::{Commit, Repository, Signature};

pub struct TestRepo {
    repo: Repository,
}

impl TestRepo {
    pub fn init(path: &Path) -> Self {
        TestRepo {
            repo: Repository::init(path).unwrap(),
        }
    }

    /// Write `rel`, stage it and commit. Returns the commit id.
    pub fn commit_file(&self, rel: &str, contents: &str, message: &str) -> String {
        let workdir = self.repo.workdir().unwrap().to_path_buf();
        let path = workdir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
            .to_string()
    }

    /// Lightweight tag on HEAD.
    pub fn tag(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .unwrap();
    }
}
