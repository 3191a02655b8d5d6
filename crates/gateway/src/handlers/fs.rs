//! Filesystem handlers.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde_json::{json, Map, Value};

use super::{opt_u64_arg, str_arg};

type HandlerResult = std::result::Result<Value, String>;

pub(super) async fn read_file(args: Map<String, Value>) -> HandlerResult {
    let path = str_arg(&args, "file_path")?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("read {path}: {e}"))?;

    let offset = opt_u64_arg(&args, "offset");
    let limit = opt_u64_arg(&args, "limit");
    if offset.is_none() && limit.is_none() {
        return Ok(json!(content));
    }

    // 1-based offset, as in editor line numbering.
    let skip = offset.map_or(0, |o| o.saturating_sub(1)) as usize;
    let lines = content.lines().skip(skip);
    let selected: Vec<&str> = match limit {
        Some(n) => lines.take(n as usize).collect(),
        None => lines.collect(),
    };
    Ok(json!(selected.join("\n")))
}

pub(super) async fn write_file(args: Map<String, Value>) -> HandlerResult {
    let path = str_arg(&args, "file_path")?;
    let content = str_arg(&args, "content")?;

    if let Some(parent) = Path::new(path).parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("create {}: {e}", parent.display()))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| format!("write {path}: {e}"))?;

    Ok(json!(format!("File written: {path}")))
}

pub(super) async fn list_dir(args: Map<String, Value>) -> HandlerResult {
    let path = args
        .get("path")
        .and_then(Value::as_str)
        .unwrap_or(".")
        .to_string();

    let mut entries = tokio::fs::read_dir(&path)
        .await
        .map_err(|e| format!("list {path}: {e}"))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| format!("list {path}: {e}"))?
    {
        names.push(entry.path().display().to_string());
    }
    names.sort();
    Ok(json!(names))
}

pub(super) async fn make_dir(args: Map<String, Value>) -> HandlerResult {
    let path = str_arg(&args, "path")?;
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| format!("mkdir {path}: {e}"))?;
    Ok(json!(format!("Directory created: {path}")))
}

pub(super) async fn delete_path(args: Map<String, Value>) -> HandlerResult {
    let path = str_arg(&args, "path")?;
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("stat {path}: {e}"))?;

    if meta.is_dir() {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|e| format!("delete {path}: {e}"))?;
        Ok(json!(format!("Directory deleted: {path}")))
    } else {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| format!("delete {path}: {e}"))?;
        Ok(json!(format!("File deleted: {path}")))
    }
}

pub(super) async fn path_exists(args: Map<String, Value>) -> HandlerResult {
    let path = str_arg(&args, "path")?;
    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|e| format!("stat {path}: {e}"))?;
    Ok(json!(exists))
}

pub(super) async fn copy_path(args: Map<String, Value>) -> HandlerResult {
    let src = str_arg(&args, "src")?.to_string();
    let dst = str_arg(&args, "dst")?.to_string();

    let meta = tokio::fs::metadata(&src)
        .await
        .map_err(|e| format!("stat {src}: {e}"))?;

    if meta.is_dir() {
        // Directory trees are copied on a blocking thread; recursion over
        // async fs would need boxed futures for no benefit.
        let (s, d) = (PathBuf::from(&src), PathBuf::from(&dst));
        tokio::task::spawn_blocking(move || copy_tree(&s, &d))
            .await
            .map_err(|e| format!("copy task failed: {e}"))?
            .map_err(|e| format!("copy {src}: {e}"))?;
        Ok(json!(format!("Directory copied: {src} -> {dst}")))
    } else {
        tokio::fs::copy(&src, &dst)
            .await
            .map_err(|e| format!("copy {src}: {e}"))?;
        Ok(json!(format!("File copied: {src} -> {dst}")))
    }
}

fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

pub(super) async fn move_path(args: Map<String, Value>) -> HandlerResult {
    let src = str_arg(&args, "src")?;
    let dst = str_arg(&args, "dst")?;
    tokio::fs::rename(src, dst)
        .await
        .map_err(|e| format!("move {src}: {e}"))?;
    Ok(json!(format!("Moved: {src} -> {dst}")))
}

pub(super) async fn file_info(args: Map<String, Value>) -> HandlerResult {
    let path = str_arg(&args, "path")?;
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("stat {path}: {e}"))?;

    let modified = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());

    Ok(json!({
        "path": path,
        "size": meta.len(),
        "is_file": meta.is_file(),
        "is_dir": meta.is_dir(),
        "readonly": meta.permissions().readonly(),
        "modified": modified,
    }))
}
