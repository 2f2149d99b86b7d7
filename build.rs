use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = match env::var_os("CARGO_MANIFEST_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return,
    };
    let git_dir = manifest_dir.join(".git");
    let head = git_dir.join("HEAD");
    if !head.exists() {
        return;
    }
    println!("cargo:rerun-if-changed={}", head.display());

    if let Some(hash) = resolve_head(&git_dir, &head) {
        println!("cargo:rustc-env=KIRA_CONTRASTQC_GIT_HASH={hash}");
    }
}

fn resolve_head(git_dir: &Path, head: &Path) -> Option<String> {
    let content = fs::read_to_string(head).ok()?;
    let hash = match content.strip_prefix("ref: ") {
        Some(ref_name) => {
            let ref_name = ref_name.trim();
            let ref_path = git_dir.join(ref_name);
            println!("cargo:rerun-if-changed={}", ref_path.display());
            match fs::read_to_string(&ref_path) {
                Ok(hash) => hash,
                Err(_) => packed_ref(git_dir, ref_name)?,
            }
        }
        None => content,
    };
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}

fn packed_ref(git_dir: &Path, ref_name: &str) -> Option<String> {
    let packed = fs::read_to_string(git_dir.join("packed-refs")).ok()?;
    packed.lines().find_map(|line| {
        let (hash, name) = line.split_once(' ')?;
        (name.trim() == ref_name).then(|| hash.to_string())
    })
}
